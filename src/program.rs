use std::ffi::CString;
use std::mem;
use std::ptr;

use libc::{c_char, c_void, size_t};

use crate::cl::ll::runtime;
use crate::cl::*;
use crate::context::Context;
use crate::device::Device;
use crate::error::{check, check_quiet, error_str, Error, Result};

/// The state of the last build of a program for one device.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BuildStatus {
    Success,
    None,
    Error,
    InProgress,
    Unknown(cl_build_status),
}

impl BuildStatus {
    pub fn from_raw(status: cl_build_status) -> BuildStatus {
        match status {
            CL_BUILD_SUCCESS => BuildStatus::Success,
            CL_BUILD_NONE => BuildStatus::None,
            CL_BUILD_ERROR => BuildStatus::Error,
            CL_BUILD_IN_PROGRESS => BuildStatus::InProgress,
            other => BuildStatus::Unknown(other),
        }
    }
}

fn source_pointer(source: &[u8]) -> Result<(*const c_char, size_t)> {
    if source.is_empty() {
        return Err(Error::Status { action: "Creating program from source", code: CL_INVALID_VALUE });
    }
    Ok((source.as_ptr() as *const c_char, source.len()))
}

/// Represents an OpenCL program, which is a collection of kernels.
///
/// Released when dropped.
#[derive(Debug)]
pub struct Program {
    prg: cl_program,
}

impl Drop for Program {
    fn drop(&mut self) {
        if let Ok(rt) = runtime() {
            let status = unsafe { (rt.clReleaseProgram)(self.prg) };
            if status != CL_SUCCESS {
                error!("Could not release the program: {} ({})", status, error_str(status));
            }
        }
    }
}

impl Program {
    /// Creates a program from OpenCL C source.
    ///
    /// An empty source is rejected without calling the driver, which would
    /// otherwise read it as a NUL-terminated string.
    pub fn from_source<S: AsRef<[u8]>>(context: &Context, source: S) -> Result<Program> {
        let (text, len) = source_pointer(source.as_ref())?;
        let rt = runtime()?;

        let mut errcode = CL_SUCCESS;
        let prg = unsafe {
            (rt.clCreateProgramWithSource)(context.cl_id(), 1, &text, &len, &mut errcode)
        };
        check(errcode, "Creating program from source")?;

        Ok(Program { prg })
    }

    /// Creates a program from its OpenCL pointer.
    ///
    /// The pointer validity is not checked, and the program takes over the
    /// caller's reference.
    pub unsafe fn new_unchecked(prg: cl_program) -> Program {
        Program { prg }
    }

    /// The underlying OpenCL program pointer.
    pub fn cl_id(&self) -> cl_program {
        self.prg
    }

    /// Builds the program for a given device.
    ///
    /// On failure the build log is available from [`Program::build_log`].
    pub fn build(&self, device: &Device, options: &str) -> Result<()> {
        let rt = runtime()?;
        let options = CString::new(options)
            .map_err(|_| Error::Status { action: "Building program", code: CL_INVALID_BUILD_OPTIONS })?;

        let status = unsafe {
            (rt.clBuildProgram)(
                self.prg,
                1,
                &device.cl_id(),
                options.as_ptr(),
                None,
                ptr::null_mut(),
            )
        };
        check(status, "Building program")
    }

    /// The build status of this program for `device`.
    pub fn build_status(&self, device: &Device) -> Result<BuildStatus> {
        let rt = runtime()?;
        let mut status: cl_build_status = CL_BUILD_NONE;
        let ret = unsafe {
            (rt.clGetProgramBuildInfo)(
                self.prg,
                device.cl_id(),
                CL_PROGRAM_BUILD_STATUS,
                mem::size_of::<cl_build_status>(),
                (&mut status as *mut cl_build_status) as *mut c_void,
                ptr::null_mut(),
            )
        };
        check_quiet(ret, "Getting build status")?;
        Ok(BuildStatus::from_raw(status))
    }

    /// The compiler log of the last build for `device`.
    pub fn build_log(&self, device: &Device) -> Result<String> {
        let rt = runtime()?;
        let mut size: size_t = 0;
        let status = unsafe {
            (rt.clGetProgramBuildInfo)(
                self.prg,
                device.cl_id(),
                CL_PROGRAM_BUILD_LOG,
                0,
                ptr::null_mut(),
                &mut size,
            )
        };
        check_quiet(status, "Getting build log size")?;

        let mut buf = vec![0u8; size];
        let status = unsafe {
            (rt.clGetProgramBuildInfo)(
                self.prg,
                device.cl_id(),
                CL_PROGRAM_BUILD_LOG,
                buf.len(),
                buf.as_mut_ptr() as *mut c_void,
                ptr::null_mut(),
            )
        };
        check_quiet(status, "Getting build log")?;

        Ok(crate::util::c_string(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_status_from_raw() {
        assert_eq!(BuildStatus::from_raw(0), BuildStatus::Success);
        assert_eq!(BuildStatus::from_raw(-1), BuildStatus::None);
        assert_eq!(BuildStatus::from_raw(-2), BuildStatus::Error);
        assert_eq!(BuildStatus::from_raw(-3), BuildStatus::InProgress);
        assert_eq!(BuildStatus::from_raw(7), BuildStatus::Unknown(7));
    }

    #[test]
    fn empty_source_is_an_invalid_value() {
        match source_pointer(b"") {
            Err(Error::Status { action, code }) => {
                assert_eq!(action, "Creating program from source");
                assert_eq!(code, CL_INVALID_VALUE);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn source_length_is_explicit() {
        let source = b"__kernel void f() {}";
        let (text, len) = source_pointer(source).unwrap();
        assert_eq!(text as *const u8, source.as_ptr());
        assert_eq!(len, source.len());
    }
}
