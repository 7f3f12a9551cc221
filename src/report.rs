//! Human readable platform, device and build diagnostics.
//!
//! Every report is best effort: a field whose query fails is left out and
//! the rest of the report is still produced.

use std::fmt::{Display, Write};

use crate::cl::*;
use crate::device::{Device, VectorType};
use crate::error::Result;
use crate::platform::Platform;
use crate::program::Program;
use crate::util::{kbytes, mbytes};

/// Accumulates `label: value` lines, skipping failed queries.
#[derive(Debug, Default)]
pub struct Report {
    out: String,
}

impl Report {
    pub fn new() -> Report {
        Report::default()
    }

    /// Appends one line, or nothing if `value` is an error.
    pub fn field<T: Display>(&mut self, label: &str, value: Result<T>) -> &mut Report {
        if let Ok(value) = value {
            self.line(label, value);
        }
        self
    }

    /// Appends one line per item, repeating the label.
    pub fn each<I, T>(&mut self, label: &str, values: I) -> &mut Report
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        for value in values {
            self.line(label, value);
        }
        self
    }

    fn line<T: Display>(&mut self, label: &str, value: T) {
        let _ = writeln!(self.out, "  {:<40}{}", format!("{}:", label), value);
    }

    pub fn finish(&mut self) -> String {
        std::mem::take(&mut self.out)
    }
}

/// Names of the device type flags set in `bits`.
pub fn device_type_names(bits: cl_device_type) -> Vec<&'static str> {
    [
        (CL_DEVICE_TYPE_CPU, "CL_DEVICE_TYPE_CPU"),
        (CL_DEVICE_TYPE_GPU, "CL_DEVICE_TYPE_GPU"),
        (CL_DEVICE_TYPE_ACCELERATOR, "CL_DEVICE_TYPE_ACCELERATOR"),
        (CL_DEVICE_TYPE_DEFAULT, "CL_DEVICE_TYPE_DEFAULT"),
    ]
    .iter()
    .filter(|(flag, _)| bits & flag != 0)
    .map(|&(_, name)| name)
    .collect()
}

/// Names of the command queue properties set in `bits`.
pub fn queue_property_names(bits: cl_command_queue_properties) -> Vec<&'static str> {
    [
        (CL_QUEUE_OUT_OF_ORDER_EXEC_MODE_ENABLE, "CL_QUEUE_OUT_OF_ORDER_EXEC_MODE_ENABLE"),
        (CL_QUEUE_PROFILING_ENABLE, "CL_QUEUE_PROFILING_ENABLE"),
    ]
    .iter()
    .filter(|(flag, _)| bits & flag != 0)
    .map(|&(_, name)| name)
    .collect()
}

/// Space separated capabilities of a floating point configuration.
pub fn fp_config_flags(bits: cl_device_fp_config) -> String {
    [
        (CL_FP_DENORM, "denorms"),
        (CL_FP_INF_NAN, "INF-quietNaNs"),
        (CL_FP_ROUND_TO_NEAREST, "round-to-nearest"),
        (CL_FP_ROUND_TO_ZERO, "round-to-zero"),
        (CL_FP_ROUND_TO_INF, "round-to-inf"),
        (CL_FP_FMA, "fma"),
    ]
    .iter()
    .filter(|(flag, _)| bits & flag != 0)
    .map(|&(_, name)| name)
    .collect::<Vec<_>>()
    .join(" ")
}

/// Whether the OpenCL C version query is meaningful for a device reporting
/// `device_version`.
pub fn has_opencl_c_version(device_version: &str) -> bool {
    !cfg!(target_os = "macos") && !device_version.starts_with("OpenCL 1.0")
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

fn local_mem_type_name(ty: cl_device_local_mem_type) -> &'static str {
    if ty == CL_LOCAL {
        "local"
    } else {
        "global"
    }
}

/// Profile, version, name, vendor and extensions of `platform`.
pub fn platform_report(platform: &Platform) -> String {
    Report::new()
        .field("Platform profile", platform.profile())
        .field("Platform version", platform.version())
        .field("Platform name", platform.name())
        .field("Platform vendor", platform.vendor())
        .field("Platform extensions", platform.extensions())
        .finish()
}

/// The capability summary of `device`.
pub fn device_report(device: &Device) -> String {
    let mut report = Report::new();
    let version = device.version();

    report
        .field("CL_DEVICE_NAME", device.name())
        .field("CL_DEVICE_VENDOR", device.vendor())
        .field("CL_DRIVER_VERSION", device.driver_version());

    if let Ok(v) = &version {
        report.field("CL_DEVICE_VERSION", Ok(v.as_str()));
        if has_opencl_c_version(v) {
            report.field("CL_DEVICE_OPENCL_C_VERSION", device.opencl_c_version());
        }
    }

    if let Ok(bits) = device.device_type() {
        report.each("CL_DEVICE_TYPE", device_type_names(bits));
    }

    report
        .field("CL_DEVICE_MAX_COMPUTE_UNITS", device.compute_units())
        .field("CL_DEVICE_MAX_WORK_ITEM_DIMENSIONS", device.max_work_item_dimensions())
        .field(
            "CL_DEVICE_MAX_WORK_ITEM_SIZES",
            device.max_work_item_sizes().map(|sizes| {
                sizes
                    .iter()
                    .take(3)
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(" / ")
            }),
        )
        .field("CL_DEVICE_MAX_WORK_GROUP_SIZE", device.max_work_group_size())
        .field(
            "CL_DEVICE_MAX_CLOCK_FREQUENCY",
            device.max_clock_frequency().map(|mhz| format!("{} MHz", mhz)),
        )
        .field("CL_DEVICE_ADDRESS_BITS", device.address_bits())
        .field(
            "CL_DEVICE_MAX_MEM_ALLOC_SIZE",
            device.max_mem_alloc_size().map(|b| format!("{} MByte", mbytes(b))),
        )
        .field(
            "CL_DEVICE_GLOBAL_MEM_SIZE",
            device.global_mem_size().map(|b| format!("{} MByte", mbytes(b))),
        )
        .field(
            "CL_DEVICE_ERROR_CORRECTION_SUPPORT",
            device.error_correction_support().map(yes_no),
        )
        .field("CL_DEVICE_LOCAL_MEM_TYPE", device.local_mem_type().map(local_mem_type_name))
        .field(
            "CL_DEVICE_LOCAL_MEM_SIZE",
            device.local_mem_size().map(|b| format!("{} KByte", kbytes(b))),
        )
        .field(
            "CL_DEVICE_MAX_CONSTANT_BUFFER_SIZE",
            device.max_constant_buffer_size().map(|b| format!("{} KByte", kbytes(b))),
        );

    if let Ok(bits) = device.queue_properties() {
        report.each("CL_DEVICE_QUEUE_PROPERTIES", queue_property_names(bits));
    }

    report
        .field("CL_DEVICE_IMAGE_SUPPORT", device.image_support().map(u8::from))
        .field("CL_DEVICE_MAX_READ_IMAGE_ARGS", device.max_read_image_args())
        .field("CL_DEVICE_MAX_WRITE_IMAGE_ARGS", device.max_write_image_args())
        .field("CL_DEVICE_SINGLE_FP_CONFIG", device.single_fp_config().map(fp_config_flags))
        .field(
            "CL_DEVICE_IMAGE2D_MAX_WIDTH/HEIGHT",
            device.image2d_max_size().map(|(w, h)| format!("{} / {}", w, h)),
        )
        .field(
            "CL_DEVICE_IMAGE3D_MAX_WIDTH/HEIGHT/DEPTH",
            device.image3d_max_size().map(|(w, h, d)| format!("{} / {} / {}", w, h, d)),
        );

    match device.extensions() {
        Ok(list) if !list.trim().is_empty() => {
            report.each("CL_DEVICE_EXTENSIONS", list.split_whitespace());
        }
        Ok(_) => {
            report.field("CL_DEVICE_EXTENSIONS", Ok("None"));
        }
        Err(_) => {}
    }

    let widths: Vec<String> = VectorType::ALL
        .iter()
        .filter_map(|&ty| {
            device
                .preferred_vector_width(ty)
                .ok()
                .map(|w| format!("{} {}", ty.label(), w))
        })
        .collect();
    if !widths.is_empty() {
        report.field("CL_DEVICE_PREFERRED_VECTOR_WIDTH_<t>", Ok(widths.join(", ")));
    }

    report.finish()
}

/// The build status and compiler log of `program` for `device`.
///
/// Without a program nothing is queried and `None` is returned.
pub fn build_log_report(program: Option<&Program>, device: &Device) -> Option<String> {
    let program = program?;

    let mut out = String::new();
    if let Ok(status) = program.build_status(device) {
        let _ = writeln!(out, "BUILD STATUS: {:?}", status);
    }
    if let Ok(log) = program.build_log(device) {
        let _ = write!(out, "BUILD LOG: \n {}", log);
    }
    Some(out)
}

pub fn print_platform_info(platform: &Platform) {
    print!("{}", platform_report(platform));
}

pub fn print_device_info(device: &Device) {
    print!("{}", device_report(device));
}

pub fn print_build_log(program: Option<&Program>, device: &Device) {
    if let Some(log) = build_log_report(program, device) {
        println!("{}", log);
    }
}
