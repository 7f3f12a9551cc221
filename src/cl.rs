//! Low-level OpenCL types, constants and the dynamically loaded entry points.

#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

use libc::{c_char, c_void, size_t};

pub type cl_int = i32;
pub type cl_uint = u32;
pub type cl_ulong = u64;
pub type cl_bool = cl_uint;
pub type cl_bitfield = cl_ulong;

pub type cl_platform_id = *mut c_void;
pub type cl_device_id = *mut c_void;
pub type cl_context = *mut c_void;
pub type cl_program = *mut c_void;

pub type cl_device_type = cl_bitfield;
pub type cl_platform_info = cl_uint;
pub type cl_device_info = cl_uint;
pub type cl_device_fp_config = cl_bitfield;
pub type cl_device_local_mem_type = cl_uint;
pub type cl_command_queue_properties = cl_bitfield;
pub type cl_context_properties = isize;
pub type cl_program_build_info = cl_uint;
pub type cl_build_status = cl_int;

pub const CL_SUCCESS: cl_int = 0;
pub const CL_DEVICE_NOT_FOUND: cl_int = -1;
pub const CL_INVALID_VALUE: cl_int = -30;
pub const CL_INVALID_BUILD_OPTIONS: cl_int = -43;
// cl_khr_icd
pub const CL_PLATFORM_NOT_FOUND_KHR: cl_int = -1001;

pub const CL_TRUE: cl_bool = 1;

pub const CL_PLATFORM_PROFILE: cl_platform_info = 0x0900;
pub const CL_PLATFORM_VERSION: cl_platform_info = 0x0901;
pub const CL_PLATFORM_NAME: cl_platform_info = 0x0902;
pub const CL_PLATFORM_VENDOR: cl_platform_info = 0x0903;
pub const CL_PLATFORM_EXTENSIONS: cl_platform_info = 0x0904;

pub const CL_DEVICE_TYPE_DEFAULT: cl_device_type = 1 << 0;
pub const CL_DEVICE_TYPE_CPU: cl_device_type = 1 << 1;
pub const CL_DEVICE_TYPE_GPU: cl_device_type = 1 << 2;
pub const CL_DEVICE_TYPE_ACCELERATOR: cl_device_type = 1 << 3;

pub const CL_DEVICE_TYPE: cl_device_info = 0x1000;
pub const CL_DEVICE_MAX_COMPUTE_UNITS: cl_device_info = 0x1002;
pub const CL_DEVICE_MAX_WORK_ITEM_DIMENSIONS: cl_device_info = 0x1003;
pub const CL_DEVICE_MAX_WORK_GROUP_SIZE: cl_device_info = 0x1004;
pub const CL_DEVICE_MAX_WORK_ITEM_SIZES: cl_device_info = 0x1005;
pub const CL_DEVICE_PREFERRED_VECTOR_WIDTH_CHAR: cl_device_info = 0x1006;
pub const CL_DEVICE_PREFERRED_VECTOR_WIDTH_SHORT: cl_device_info = 0x1007;
pub const CL_DEVICE_PREFERRED_VECTOR_WIDTH_INT: cl_device_info = 0x1008;
pub const CL_DEVICE_PREFERRED_VECTOR_WIDTH_LONG: cl_device_info = 0x1009;
pub const CL_DEVICE_PREFERRED_VECTOR_WIDTH_FLOAT: cl_device_info = 0x100A;
pub const CL_DEVICE_PREFERRED_VECTOR_WIDTH_DOUBLE: cl_device_info = 0x100B;
pub const CL_DEVICE_MAX_CLOCK_FREQUENCY: cl_device_info = 0x100C;
pub const CL_DEVICE_ADDRESS_BITS: cl_device_info = 0x100D;
pub const CL_DEVICE_MAX_READ_IMAGE_ARGS: cl_device_info = 0x100E;
pub const CL_DEVICE_MAX_WRITE_IMAGE_ARGS: cl_device_info = 0x100F;
pub const CL_DEVICE_MAX_MEM_ALLOC_SIZE: cl_device_info = 0x1010;
pub const CL_DEVICE_IMAGE2D_MAX_WIDTH: cl_device_info = 0x1011;
pub const CL_DEVICE_IMAGE2D_MAX_HEIGHT: cl_device_info = 0x1012;
pub const CL_DEVICE_IMAGE3D_MAX_WIDTH: cl_device_info = 0x1013;
pub const CL_DEVICE_IMAGE3D_MAX_HEIGHT: cl_device_info = 0x1014;
pub const CL_DEVICE_IMAGE3D_MAX_DEPTH: cl_device_info = 0x1015;
pub const CL_DEVICE_IMAGE_SUPPORT: cl_device_info = 0x1016;
pub const CL_DEVICE_SINGLE_FP_CONFIG: cl_device_info = 0x101B;
pub const CL_DEVICE_GLOBAL_MEM_SIZE: cl_device_info = 0x101F;
pub const CL_DEVICE_MAX_CONSTANT_BUFFER_SIZE: cl_device_info = 0x1020;
pub const CL_DEVICE_LOCAL_MEM_TYPE: cl_device_info = 0x1022;
pub const CL_DEVICE_LOCAL_MEM_SIZE: cl_device_info = 0x1023;
pub const CL_DEVICE_ERROR_CORRECTION_SUPPORT: cl_device_info = 0x1024;
pub const CL_DEVICE_QUEUE_PROPERTIES: cl_device_info = 0x102A;
pub const CL_DEVICE_NAME: cl_device_info = 0x102B;
pub const CL_DEVICE_VENDOR: cl_device_info = 0x102C;
pub const CL_DRIVER_VERSION: cl_device_info = 0x102D;
pub const CL_DEVICE_VERSION: cl_device_info = 0x102F;
pub const CL_DEVICE_EXTENSIONS: cl_device_info = 0x1030;
pub const CL_DEVICE_OPENCL_C_VERSION: cl_device_info = 0x103D;

pub const CL_FP_DENORM: cl_device_fp_config = 1 << 0;
pub const CL_FP_INF_NAN: cl_device_fp_config = 1 << 1;
pub const CL_FP_ROUND_TO_NEAREST: cl_device_fp_config = 1 << 2;
pub const CL_FP_ROUND_TO_ZERO: cl_device_fp_config = 1 << 3;
pub const CL_FP_ROUND_TO_INF: cl_device_fp_config = 1 << 4;
pub const CL_FP_FMA: cl_device_fp_config = 1 << 5;

pub const CL_LOCAL: cl_device_local_mem_type = 0x1;
pub const CL_GLOBAL: cl_device_local_mem_type = 0x2;

pub const CL_QUEUE_OUT_OF_ORDER_EXEC_MODE_ENABLE: cl_command_queue_properties = 1 << 0;
pub const CL_QUEUE_PROFILING_ENABLE: cl_command_queue_properties = 1 << 1;

pub const CL_CONTEXT_PLATFORM: cl_context_properties = 0x1084;

pub const CL_PROGRAM_BUILD_STATUS: cl_program_build_info = 0x1181;
pub const CL_PROGRAM_BUILD_LOG: cl_program_build_info = 0x1183;

pub const CL_BUILD_SUCCESS: cl_build_status = 0;
pub const CL_BUILD_NONE: cl_build_status = -1;
pub const CL_BUILD_ERROR: cl_build_status = -2;
pub const CL_BUILD_IN_PROGRESS: cl_build_status = -3;

// cl_gl.h / cl_gl_ext.h
pub const CL_GL_CONTEXT_KHR: cl_context_properties = 0x2008;
pub const CL_GLX_DISPLAY_KHR: cl_context_properties = 0x200A;
pub const CL_WGL_HDC_KHR: cl_context_properties = 0x200B;
pub const CL_CONTEXT_PROPERTY_USE_CGL_SHAREGROUP_APPLE: cl_context_properties = 0x1000_0000;

pub type ContextNotify =
    Option<unsafe extern "C" fn(*const c_char, *const c_void, size_t, *mut c_void)>;
pub type BuildNotify = Option<unsafe extern "C" fn(cl_program, *mut c_void)>;

/// Entry points into the installed OpenCL runtime.
///
/// The runtime is opened on first use, so hosts without an ICD loader still
/// link and run everything that does not talk to a driver.
pub mod ll {
    use super::*;
    use std::sync::OnceLock;

    use libloading::Library;

    use crate::error::Error;

    #[cfg(target_os = "windows")]
    const OPENCL_LIBRARIES: &[&str] = &["OpenCL.dll"];

    #[cfg(target_os = "macos")]
    const OPENCL_LIBRARIES: &[&str] = &["/System/Library/Frameworks/OpenCL.framework/OpenCL"];

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    const OPENCL_LIBRARIES: &[&str] = &["libOpenCL.so.1", "libOpenCL.so"];

    static RUNTIME: OnceLock<Result<Runtime, String>> = OnceLock::new();

    pub struct Runtime {
        _library: Library,
        pub clGetPlatformIDs:
            unsafe extern "C" fn(cl_uint, *mut cl_platform_id, *mut cl_uint) -> cl_int,
        pub clGetPlatformInfo: unsafe extern "C" fn(
            cl_platform_id,
            cl_platform_info,
            size_t,
            *mut c_void,
            *mut size_t,
        ) -> cl_int,
        pub clGetDeviceIDs: unsafe extern "C" fn(
            cl_platform_id,
            cl_device_type,
            cl_uint,
            *mut cl_device_id,
            *mut cl_uint,
        ) -> cl_int,
        pub clGetDeviceInfo: unsafe extern "C" fn(
            cl_device_id,
            cl_device_info,
            size_t,
            *mut c_void,
            *mut size_t,
        ) -> cl_int,
        pub clCreateContext: unsafe extern "C" fn(
            *const cl_context_properties,
            cl_uint,
            *const cl_device_id,
            ContextNotify,
            *mut c_void,
            *mut cl_int,
        ) -> cl_context,
        pub clReleaseContext: unsafe extern "C" fn(cl_context) -> cl_int,
        pub clCreateProgramWithSource: unsafe extern "C" fn(
            cl_context,
            cl_uint,
            *const *const c_char,
            *const size_t,
            *mut cl_int,
        ) -> cl_program,
        pub clBuildProgram: unsafe extern "C" fn(
            cl_program,
            cl_uint,
            *const cl_device_id,
            *const c_char,
            BuildNotify,
            *mut c_void,
        ) -> cl_int,
        pub clGetProgramBuildInfo: unsafe extern "C" fn(
            cl_program,
            cl_device_id,
            cl_program_build_info,
            size_t,
            *mut c_void,
            *mut size_t,
        ) -> cl_int,
        pub clReleaseProgram: unsafe extern "C" fn(cl_program) -> cl_int,
    }

    /// Returns the process-wide runtime, loading it on the first call.
    pub fn runtime() -> Result<&'static Runtime, Error> {
        RUNTIME
            .get_or_init(Runtime::load)
            .as_ref()
            .map_err(|e| Error::Library(e.clone()))
    }

    impl Runtime {
        fn load() -> Result<Runtime, String> {
            let library = open_library(OPENCL_LIBRARIES)?;
            debug!("Loaded OpenCL runtime");

            unsafe {
                Ok(Runtime {
                    clGetPlatformIDs: symbol(&library, b"clGetPlatformIDs\0")?,
                    clGetPlatformInfo: symbol(&library, b"clGetPlatformInfo\0")?,
                    clGetDeviceIDs: symbol(&library, b"clGetDeviceIDs\0")?,
                    clGetDeviceInfo: symbol(&library, b"clGetDeviceInfo\0")?,
                    clCreateContext: symbol(&library, b"clCreateContext\0")?,
                    clReleaseContext: symbol(&library, b"clReleaseContext\0")?,
                    clCreateProgramWithSource: symbol(&library, b"clCreateProgramWithSource\0")?,
                    clBuildProgram: symbol(&library, b"clBuildProgram\0")?,
                    clGetProgramBuildInfo: symbol(&library, b"clGetProgramBuildInfo\0")?,
                    clReleaseProgram: symbol(&library, b"clReleaseProgram\0")?,
                    _library: library,
                })
            }
        }
    }

    /// Opens the first library of `names` that the system loader can find.
    pub(crate) fn open_library(names: &[&str]) -> Result<Library, String> {
        let mut last_error = String::from("no candidate library names");
        for name in names {
            match unsafe { Library::new(name) } {
                Ok(library) => return Ok(library),
                Err(e) => last_error = format!("could not load {}: {}", name, e),
            }
        }
        Err(last_error)
    }

    /// Copies a function pointer out of `library`.
    ///
    /// `name` must be nul-terminated and `T` must match the symbol's real
    /// signature.
    pub(crate) unsafe fn symbol<T: Copy>(library: &Library, name: &[u8]) -> Result<T, String> {
        library.get::<T>(name).map(|sym| *sym).map_err(|e| {
            format!(
                "missing symbol {}: {}",
                String::from_utf8_lossy(&name[..name.len().saturating_sub(1)]),
                e
            )
        })
    }
}
