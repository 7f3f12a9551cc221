use std::ptr;

use crate::cl::ll::runtime;
use crate::cl::*;
use crate::device::Device;
use crate::error::{check, error_str, Result};
use crate::interop::{GlSharing, NativeGlSharing};
use crate::platform::Platform;

/// An OpenCL context.
///
/// Released when dropped.
#[derive(Debug)]
pub struct Context {
    ctx: cl_context,
    interop: bool,
}

unsafe impl Sync for Context {}
unsafe impl Send for Context {}

impl Context {
    /// Creates a context for a device.
    pub fn new(dev: &Device) -> Result<Context> {
        Context::create(None, &[*dev], "Creating CL context", false)
    }

    /// Creates a context sharing objects with the calling thread's current
    /// GL context.
    ///
    /// Missing GL handles are logged and creation is attempted anyway; the
    /// driver decides whether the result is usable.
    pub fn with_gl_sharing(device: &Device, platform: &Platform) -> Result<Context> {
        let handles = NativeGlSharing::current_handles();
        let props = NativeGlSharing::context_properties(&handles, platform);
        let devices: &[Device] = if NativeGlSharing::ATTACHES_DEVICE {
            std::slice::from_ref(device)
        } else {
            &[]
        };
        Context::create(Some(&props), devices, "Creating GL-CL shared context", true)
    }

    fn create(
        props: Option<&[cl_context_properties]>,
        devices: &[Device],
        action: &'static str,
        interop: bool,
    ) -> Result<Context> {
        let rt = runtime()?;
        let ids: Vec<cl_device_id> = devices.iter().map(|d| d.cl_id()).collect();
        let props_ptr = match props {
            Some(p) if !p.is_empty() => p.as_ptr(),
            _ => ptr::null(),
        };
        let ids_ptr = if ids.is_empty() { ptr::null() } else { ids.as_ptr() };

        let mut errcode = CL_SUCCESS;
        let ctx = unsafe {
            (rt.clCreateContext)(
                props_ptr,
                ids.len() as cl_uint,
                ids_ptr,
                None,
                ptr::null_mut(),
                &mut errcode,
            )
        };
        check(errcode, action)?;

        Ok(Context { ctx, interop })
    }

    /// The underlying OpenCL context identifier.
    pub fn cl_id(&self) -> cl_context {
        self.ctx
    }

    /// Whether this context shares objects with a GL context.
    pub fn is_interop(&self) -> bool {
        self.interop
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        // A context only exists if the runtime loaded.
        if let Ok(rt) = runtime() {
            let status = unsafe { (rt.clReleaseContext)(self.ctx) };
            if status != CL_SUCCESS {
                error!("Could not release the context: {} ({})", status, error_str(status));
            }
        }
    }
}

/// Creates a context for `device`, shared with the current GL context when
/// `interop` is set.
pub fn create_context(device: &Device, platform: &Platform, interop: bool) -> Result<Context> {
    if interop {
        Context::with_gl_sharing(device, platform)
    } else {
        Context::new(device)
    }
}
