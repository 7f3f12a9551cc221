use std::ptr;
use std::sync::Mutex;

use libc::{c_void, size_t};

use crate::cl::ll::runtime;
use crate::cl::*;
use crate::device::Device;
use crate::error::{check, check_quiet, Error, Result};

// Some ICD loaders return an invalid status when clGetPlatformIDs is
// called concurrently, so enumeration is serialized.
static PLATFORMS_LOCK: Mutex<()> = Mutex::new(());

/// Retrieves all the platforms available in the system.
pub fn platforms() -> Result<Vec<Platform>> {
    let rt = runtime()?;
    let _guard = PLATFORMS_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let mut num_platforms: cl_uint = 0;
    let status = unsafe { (rt.clGetPlatformIDs)(0, ptr::null_mut(), &mut num_platforms) };
    // The ICD loader reports an empty registry as an error.
    if status == CL_PLATFORM_NOT_FOUND_KHR {
        return Ok(Vec::new());
    }
    check(status, "Getting platforms")?;

    if num_platforms == 0 {
        return Ok(Vec::new());
    }

    let mut ids: Vec<cl_platform_id> = id_buffer(num_platforms, "cl_platform ID's")?;

    let status =
        unsafe { (rt.clGetPlatformIDs)(num_platforms, ids.as_mut_ptr(), &mut num_platforms) };
    check_quiet(status, "Listing platforms")?;
    ids.truncate(num_platforms as usize);

    Ok(ids.into_iter().map(|id| Platform { id }).collect())
}

/// A null-filled buffer for `count` driver handles.
fn id_buffer<T>(count: cl_uint, what: &'static str) -> Result<Vec<*mut T>> {
    let mut ids = Vec::new();
    ids.try_reserve_exact(count as usize)
        .map_err(|_| Error::Allocation(what))?;
    ids.resize(count as usize, ptr::null_mut());
    Ok(ids)
}

/// An OpenCL platform.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Platform {
    id: cl_platform_id,
}

unsafe impl Sync for Platform {}
unsafe impl Send for Platform {}

impl Platform {
    /// Retrieves all the platforms available in the system.
    pub fn all() -> Result<Vec<Platform>> {
        platforms()
    }

    /// Unsafely creates a platform from its identifier.
    ///
    /// The identifier validity is not checked.
    pub unsafe fn from_platform_id(id: cl_platform_id) -> Platform {
        Platform { id }
    }

    /// Gets the OpenCL platform identifier.
    pub fn cl_id(&self) -> cl_platform_id {
        self.id
    }

    fn get_devices_internal(&self, dtype: cl_device_type) -> Result<Vec<Device>> {
        let rt = runtime()?;
        let mut num_devices: cl_uint = 0;

        debug!("Looking for devices matching {:#x}", dtype);

        let status =
            unsafe { (rt.clGetDeviceIDs)(self.id, dtype, 0, ptr::null_mut(), &mut num_devices) };
        // Drivers answer CL_DEVICE_NOT_FOUND rather than a zero count.
        if status == CL_DEVICE_NOT_FOUND {
            return Ok(Vec::new());
        }
        check(status, "Fetching device count")?;

        if num_devices == 0 {
            return Ok(Vec::new());
        }

        let mut ids: Vec<cl_device_id> = id_buffer(num_devices, "cl_device ID's")?;
        let status = unsafe {
            (rt.clGetDeviceIDs)(self.id, dtype, num_devices, ids.as_mut_ptr(), ptr::null_mut())
        };
        check(status, "Getting list of devices")?;

        Ok(ids
            .into_iter()
            .map(|id| unsafe { Device::new_unchecked(id) })
            .collect())
    }

    /// Gets the GPU-class devices of this platform, in enumeration order.
    pub fn gpu_devices(&self) -> Result<Vec<Device>> {
        self.get_devices_internal(CL_DEVICE_TYPE_GPU)
    }

    fn profile_info(&self, name: cl_platform_info) -> Result<String> {
        let rt = runtime()?;
        let mut size: size_t = 0;

        let status =
            unsafe { (rt.clGetPlatformInfo)(self.id, name, 0, ptr::null_mut(), &mut size) };
        check_quiet(status, "Determining platform info string length")?;

        let mut buf = vec![0u8; size];
        let status = unsafe {
            (rt.clGetPlatformInfo)(
                self.id,
                name,
                size,
                buf.as_mut_ptr() as *mut c_void,
                ptr::null_mut(),
            )
        };
        check_quiet(status, "Getting platform info string")?;

        Ok(crate::util::c_string(buf))
    }

    /// Gets the platform name.
    pub fn name(&self) -> Result<String> {
        self.profile_info(CL_PLATFORM_NAME)
    }

    /// Gets the platform version.
    pub fn version(&self) -> Result<String> {
        self.profile_info(CL_PLATFORM_VERSION)
    }

    /// Gets the platform profile.
    pub fn profile(&self) -> Result<String> {
        self.profile_info(CL_PLATFORM_PROFILE)
    }

    /// Gets the platform vendor.
    pub fn vendor(&self) -> Result<String> {
        self.profile_info(CL_PLATFORM_VENDOR)
    }

    /// Gets the supported platform extensions.
    pub fn extensions(&self) -> Result<String> {
        self.profile_info(CL_PLATFORM_EXTENSIONS)
    }
}
