#![allow(clippy::missing_safety_doc)]

//! OpenCL platform and device selection, GL-sharing context creation and
//! diagnostics.
//!
//! The OpenCL runtime is opened the first time a driver call is made. On a
//! host without one every driver-facing function returns
//! [`Error::Library`].

#[macro_use]
extern crate log;

/// Low-level OpenCL bindings. These should primarily be used by the
/// higher level features in this library.
pub mod cl;
pub mod context;
pub mod device;
pub mod error;
pub mod hl;
pub mod interop;
pub mod platform;
pub mod program;
pub mod report;
pub mod select;
pub mod source;
pub mod util;

pub use context::{create_context, Context};
pub use device::{Device, VectorType};
pub use error::{check, error_str, handle_status, Error, Result};
pub use hl::{create_compute_context, ComputeConfig, ComputeContext};
pub use interop::{GlHandles, GlSharing, NativeGlSharing};
pub use platform::{platforms, Platform};
pub use program::{BuildStatus, Program};
pub use report::{
    build_log_report, device_report, platform_report, print_build_log, print_device_info,
    print_platform_info,
};
pub use select::{
    extension_listed, pick_device, pick_platform, select_device, select_platform,
    GL_SHARING_EXTENSION, NVIDIA_PLATFORM,
};
pub use source::{load_program_source, ProgramSource};
