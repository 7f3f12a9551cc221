//! Error handling utilities.

use thiserror::Error;

use crate::cl::{cl_int, CL_SUCCESS};

/// Symbolic names of the OpenCL status codes, indexed by `-status`.
///
/// Gaps in the numbering are empty strings.
static STATUS_NAMES: [&str; 64] = [
    "CL_SUCCESS",
    "CL_DEVICE_NOT_FOUND",
    "CL_DEVICE_NOT_AVAILABLE",
    "CL_COMPILER_NOT_AVAILABLE",
    "CL_MEM_OBJECT_ALLOCATION_FAILURE",
    "CL_OUT_OF_RESOURCES",
    "CL_OUT_OF_HOST_MEMORY",
    "CL_PROFILING_INFO_NOT_AVAILABLE",
    "CL_MEM_COPY_OVERLAP",
    "CL_IMAGE_FORMAT_MISMATCH",
    "CL_IMAGE_FORMAT_NOT_SUPPORTED",
    "CL_BUILD_PROGRAM_FAILURE",
    "CL_MAP_FAILURE",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "CL_INVALID_VALUE",
    "CL_INVALID_DEVICE_TYPE",
    "CL_INVALID_PLATFORM",
    "CL_INVALID_DEVICE",
    "CL_INVALID_CONTEXT",
    "CL_INVALID_QUEUE_PROPERTIES",
    "CL_INVALID_COMMAND_QUEUE",
    "CL_INVALID_HOST_PTR",
    "CL_INVALID_MEM_OBJECT",
    "CL_INVALID_IMAGE_FORMAT_DESCRIPTOR",
    "CL_INVALID_IMAGE_SIZE",
    "CL_INVALID_SAMPLER",
    "CL_INVALID_BINARY",
    "CL_INVALID_BUILD_OPTIONS",
    "CL_INVALID_PROGRAM",
    "CL_INVALID_PROGRAM_EXECUTABLE",
    "CL_INVALID_KERNEL_NAME",
    "CL_INVALID_KERNEL_DEFINITION",
    "CL_INVALID_KERNEL",
    "CL_INVALID_ARG_INDEX",
    "CL_INVALID_ARG_VALUE",
    "CL_INVALID_ARG_SIZE",
    "CL_INVALID_KERNEL_ARGS",
    "CL_INVALID_WORK_DIMENSION",
    "CL_INVALID_WORK_GROUP_SIZE",
    "CL_INVALID_WORK_ITEM_SIZE",
    "CL_INVALID_GLOBAL_OFFSET",
    "CL_INVALID_EVENT_WAIT_LIST",
    "CL_INVALID_EVENT",
    "CL_INVALID_OPERATION",
    "CL_INVALID_GL_OBJECT",
    "CL_INVALID_BUFFER_SIZE",
    "CL_INVALID_MIP_LEVEL",
    "CL_INVALID_GLOBAL_WORK_SIZE",
];

/// Errors produced while talking to the OpenCL runtime.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{action} failed with error code {code} ({})", status_name(.code))]
    Status { action: &'static str, code: cl_int },

    #[error("no OpenCL platform was found")]
    NoPlatform,

    #[error("no GPU devices found on system")]
    NoGpuDevice,

    #[error("couldn't find a GPU device supporting \"{extension}\"")]
    NoMatchingDevice { extension: String },

    #[error("OpenCL library unavailable: {0}")]
    Library(String),

    #[error("failed to allocate memory for {0}")]
    Allocation(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Maps a status code to its symbolic name.
///
/// Codes without a name, and codes outside the table, map to `""`.
pub fn error_str(status: cl_int) -> &'static str {
    let index = -(status as i64);
    if index >= 0 && (index as usize) < STATUS_NAMES.len() {
        STATUS_NAMES[index as usize]
    } else {
        ""
    }
}

fn status_name(status: &cl_int) -> &'static str {
    error_str(*status)
}

/// Reports the outcome of `action` and returns whether it succeeded.
pub fn handle_status(action: &str, status: cl_int) -> bool {
    if status == CL_SUCCESS {
        info!("{}...\tOK", action);
        true
    } else {
        error!("{}...\tFAIL", action);
        error!("Error code {} : {}", status, error_str(status));
        false
    }
}

/// Like [`handle_status`], but turns a failure into an [`Error::Status`].
pub fn check(status: cl_int, action: &'static str) -> Result<()> {
    if handle_status(action, status) {
        Ok(())
    } else {
        Err(Error::Status { action, code: status })
    }
}

/// Like [`check`], for queries that run once per field or candidate.
///
/// Success is not reported.
pub(crate) fn check_quiet(status: cl_int, action: &'static str) -> Result<()> {
    if status == CL_SUCCESS {
        Ok(())
    } else {
        debug!("{} failed: {} ({})", action, status, error_str(status));
        Err(Error::Status { action, code: status })
    }
}
