//! OpenGL sharing support.
//!
//! Each windowing system exposes the current GL context through its own
//! entry points and expects its own context properties. One provider per
//! system implements [`GlSharing`]; [`NativeGlSharing`] names the one used
//! on the target being compiled for.

use std::ptr;
use std::sync::OnceLock;

use libc::c_void;
use libloading::Library;

use crate::cl::ll::{open_library, symbol};
use crate::cl::*;
use crate::platform::Platform;

/// The current GL context and the display connection (or share group) it
/// belongs to. Either may be null.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GlHandles {
    pub context: *mut c_void,
    pub connection: *mut c_void,
}

impl GlHandles {
    pub fn null() -> GlHandles {
        GlHandles { context: ptr::null_mut(), connection: ptr::null_mut() }
    }
}

/// A source of GL handles together with the property layout its OpenCL
/// drivers expect.
pub trait GlSharing {
    /// Call that yields the context handle, for diagnostics.
    const CONTEXT_QUERY: &'static str;
    /// Call that yields the connection handle, for diagnostics.
    const CONNECTION_QUERY: &'static str;
    /// Whether the device is passed to clCreateContext explicitly.
    const ATTACHES_DEVICE: bool = true;

    /// Reads the handles of the calling thread's current GL context.
    fn query_handles() -> GlHandles;

    /// Builds the zero-terminated property list for clCreateContext.
    fn context_properties(handles: &GlHandles, platform: &Platform) -> Vec<cl_context_properties>;

    /// Like [`GlSharing::query_handles`], logging every missing handle.
    fn current_handles() -> GlHandles {
        let handles = Self::query_handles();
        if handles.context.is_null() {
            warn!("{} returned NULL", Self::CONTEXT_QUERY);
        }
        if handles.connection.is_null() {
            warn!("{} returned NULL", Self::CONNECTION_QUERY);
        }
        handles
    }
}

#[cfg(target_os = "macos")]
pub type NativeGlSharing = Cgl;

#[cfg(target_os = "windows")]
pub type NativeGlSharing = Wgl;

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub type NativeGlSharing = Glx;

fn load_or_warn<T>(cell: &'static OnceLock<Option<T>>, load: fn() -> Result<T, String>) -> Option<&'static T> {
    cell.get_or_init(|| match load() {
        Ok(api) => Some(api),
        Err(e) => {
            warn!("GL sharing unavailable: {}", e);
            None
        }
    })
    .as_ref()
}

/// X11 through GLX.
pub struct Glx;

struct GlxApi {
    _library: Library,
    get_current_context: unsafe extern "C" fn() -> *mut c_void,
    get_current_display: unsafe extern "C" fn() -> *mut c_void,
}

static GLX: OnceLock<Option<GlxApi>> = OnceLock::new();

impl GlxApi {
    fn load() -> Result<GlxApi, String> {
        let library = open_library(&["libGL.so.1", "libGL.so"])?;
        unsafe {
            Ok(GlxApi {
                get_current_context: symbol(&library, b"glXGetCurrentContext\0")?,
                get_current_display: symbol(&library, b"glXGetCurrentDisplay\0")?,
                _library: library,
            })
        }
    }
}

impl GlSharing for Glx {
    const CONTEXT_QUERY: &'static str = "glXGetCurrentContext()";
    const CONNECTION_QUERY: &'static str = "glXGetCurrentDisplay()";

    fn query_handles() -> GlHandles {
        match load_or_warn(&GLX, GlxApi::load) {
            Some(api) => unsafe {
                GlHandles {
                    context: (api.get_current_context)(),
                    connection: (api.get_current_display)(),
                }
            },
            None => GlHandles::null(),
        }
    }

    fn context_properties(handles: &GlHandles, platform: &Platform) -> Vec<cl_context_properties> {
        vec![
            CL_GL_CONTEXT_KHR,
            handles.context as cl_context_properties,
            CL_GLX_DISPLAY_KHR,
            handles.connection as cl_context_properties,
            CL_CONTEXT_PLATFORM,
            platform.cl_id() as cl_context_properties,
            0,
        ]
    }
}

/// Win32 through WGL.
pub struct Wgl;

struct WglApi {
    _library: Library,
    get_current_context: unsafe extern "system" fn() -> *mut c_void,
    get_current_dc: unsafe extern "system" fn() -> *mut c_void,
}

static WGL: OnceLock<Option<WglApi>> = OnceLock::new();

impl WglApi {
    fn load() -> Result<WglApi, String> {
        let library = open_library(&["opengl32.dll"])?;
        unsafe {
            Ok(WglApi {
                get_current_context: symbol(&library, b"wglGetCurrentContext\0")?,
                get_current_dc: symbol(&library, b"wglGetCurrentDC\0")?,
                _library: library,
            })
        }
    }
}

impl GlSharing for Wgl {
    const CONTEXT_QUERY: &'static str = "wglGetCurrentContext()";
    const CONNECTION_QUERY: &'static str = "wglGetCurrentDC()";

    fn query_handles() -> GlHandles {
        match load_or_warn(&WGL, WglApi::load) {
            Some(api) => unsafe {
                GlHandles {
                    context: (api.get_current_context)(),
                    connection: (api.get_current_dc)(),
                }
            },
            None => GlHandles::null(),
        }
    }

    fn context_properties(handles: &GlHandles, platform: &Platform) -> Vec<cl_context_properties> {
        vec![
            CL_GL_CONTEXT_KHR,
            handles.context as cl_context_properties,
            CL_WGL_HDC_KHR,
            handles.connection as cl_context_properties,
            CL_CONTEXT_PLATFORM,
            platform.cl_id() as cl_context_properties,
            0,
        ]
    }
}

/// macOS through CGL share groups.
pub struct Cgl;

struct CglApi {
    _library: Library,
    get_current_context: unsafe extern "C" fn() -> *mut c_void,
    get_share_group: unsafe extern "C" fn(*mut c_void) -> *mut c_void,
}

static CGL: OnceLock<Option<CglApi>> = OnceLock::new();

impl CglApi {
    fn load() -> Result<CglApi, String> {
        let library = open_library(&["/System/Library/Frameworks/OpenGL.framework/OpenGL"])?;
        unsafe {
            Ok(CglApi {
                get_current_context: symbol(&library, b"CGLGetCurrentContext\0")?,
                get_share_group: symbol(&library, b"CGLGetShareGroup\0")?,
                _library: library,
            })
        }
    }
}

impl GlSharing for Cgl {
    const CONTEXT_QUERY: &'static str = "CGLGetCurrentContext()";
    const CONNECTION_QUERY: &'static str = "CGLGetShareGroup(kCGLContext)";
    // The share group already names the devices.
    const ATTACHES_DEVICE: bool = false;

    fn query_handles() -> GlHandles {
        match load_or_warn(&CGL, CglApi::load) {
            Some(api) => unsafe {
                let context = (api.get_current_context)();
                let connection = if context.is_null() {
                    ptr::null_mut()
                } else {
                    (api.get_share_group)(context)
                };
                GlHandles { context, connection }
            },
            None => GlHandles::null(),
        }
    }

    fn context_properties(handles: &GlHandles, _platform: &Platform) -> Vec<cl_context_properties> {
        vec![
            CL_CONTEXT_PROPERTY_USE_CGL_SHAREGROUP_APPLE,
            handles.connection as cl_context_properties,
            0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handles() -> GlHandles {
        GlHandles {
            context: 0x1000 as *mut c_void,
            connection: 0x2000 as *mut c_void,
        }
    }

    fn platform() -> Platform {
        unsafe { Platform::from_platform_id(0x3000 as cl_platform_id) }
    }

    #[test]
    fn glx_properties_name_context_display_and_platform() {
        let props = Glx::context_properties(&handles(), &platform());
        assert_eq!(
            props,
            vec![CL_GL_CONTEXT_KHR, 0x1000, CL_GLX_DISPLAY_KHR, 0x2000, CL_CONTEXT_PLATFORM, 0x3000, 0]
        );
        assert!(Glx::ATTACHES_DEVICE);
    }

    #[test]
    fn wgl_properties_use_the_device_context() {
        let props = Wgl::context_properties(&handles(), &platform());
        assert_eq!(
            props,
            vec![CL_GL_CONTEXT_KHR, 0x1000, CL_WGL_HDC_KHR, 0x2000, CL_CONTEXT_PLATFORM, 0x3000, 0]
        );
    }

    #[test]
    fn cgl_properties_carry_only_the_share_group() {
        let props = Cgl::context_properties(&handles(), &platform());
        assert_eq!(props, vec![CL_CONTEXT_PROPERTY_USE_CGL_SHAREGROUP_APPLE, 0x2000, 0]);
        assert!(!Cgl::ATTACHES_DEVICE);
    }

    #[test]
    fn missing_handles_still_produce_a_property_list() {
        let props = NativeGlSharing::context_properties(&GlHandles::null(), &platform());
        assert_eq!(props.last(), Some(&0));
        assert!(props.len() >= 3);
    }

    #[test]
    fn without_current_gl_context_handles_are_null() {
        // Test threads never have a GL context made current.
        assert_eq!(NativeGlSharing::current_handles(), GlHandles::null());
    }
}
