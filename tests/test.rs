extern crate oclutil;

use oclutil::*;

macro_rules! expect (
    ($test: expr, $expected: expr) => ({
            let test     = $test;
            let expected = $expected;
            if test != expected {
                panic!("Test failure in {}: expected {:?}, got {:?}",
                       stringify!($test),
                       expected, test)
            }
        }
    )
);

/// Runs `test` on every GPU device of every installed platform.
///
/// Does nothing on hosts without a working OpenCL runtime.
pub fn test_all_platforms_devices<F: FnMut(&Platform, &Device)>(mut test: F)
{
    let platforms = match platforms() {
        Ok(platforms) => platforms,
        Err(_) => return,
    };
    for p in platforms.iter() {
        let devices = p.gpu_devices().unwrap_or_default();
        for d in devices.iter() {
            test(p, d);
        }
    }
}

fn names(list: &[&'static str]) -> Vec<&'static str> {
    list.to_vec()
}

fn read(s: &&'static str) -> Result<String> {
    Ok(s.to_string())
}

mod status {
    use oclutil::error_str;

    #[test]
    fn named_codes()
    {
        let table = [
            (0, "CL_SUCCESS"),
            (-1, "CL_DEVICE_NOT_FOUND"),
            (-2, "CL_DEVICE_NOT_AVAILABLE"),
            (-3, "CL_COMPILER_NOT_AVAILABLE"),
            (-4, "CL_MEM_OBJECT_ALLOCATION_FAILURE"),
            (-5, "CL_OUT_OF_RESOURCES"),
            (-6, "CL_OUT_OF_HOST_MEMORY"),
            (-7, "CL_PROFILING_INFO_NOT_AVAILABLE"),
            (-8, "CL_MEM_COPY_OVERLAP"),
            (-9, "CL_IMAGE_FORMAT_MISMATCH"),
            (-10, "CL_IMAGE_FORMAT_NOT_SUPPORTED"),
            (-11, "CL_BUILD_PROGRAM_FAILURE"),
            (-12, "CL_MAP_FAILURE"),
            (-30, "CL_INVALID_VALUE"),
            (-31, "CL_INVALID_DEVICE_TYPE"),
            (-32, "CL_INVALID_PLATFORM"),
            (-33, "CL_INVALID_DEVICE"),
            (-34, "CL_INVALID_CONTEXT"),
            (-35, "CL_INVALID_QUEUE_PROPERTIES"),
            (-36, "CL_INVALID_COMMAND_QUEUE"),
            (-37, "CL_INVALID_HOST_PTR"),
            (-38, "CL_INVALID_MEM_OBJECT"),
            (-39, "CL_INVALID_IMAGE_FORMAT_DESCRIPTOR"),
            (-40, "CL_INVALID_IMAGE_SIZE"),
            (-41, "CL_INVALID_SAMPLER"),
            (-42, "CL_INVALID_BINARY"),
            (-43, "CL_INVALID_BUILD_OPTIONS"),
            (-44, "CL_INVALID_PROGRAM"),
            (-45, "CL_INVALID_PROGRAM_EXECUTABLE"),
            (-46, "CL_INVALID_KERNEL_NAME"),
            (-47, "CL_INVALID_KERNEL_DEFINITION"),
            (-48, "CL_INVALID_KERNEL"),
            (-49, "CL_INVALID_ARG_INDEX"),
            (-50, "CL_INVALID_ARG_VALUE"),
            (-51, "CL_INVALID_ARG_SIZE"),
            (-52, "CL_INVALID_KERNEL_ARGS"),
            (-53, "CL_INVALID_WORK_DIMENSION"),
            (-54, "CL_INVALID_WORK_GROUP_SIZE"),
            (-55, "CL_INVALID_WORK_ITEM_SIZE"),
            (-56, "CL_INVALID_GLOBAL_OFFSET"),
            (-57, "CL_INVALID_EVENT_WAIT_LIST"),
            (-58, "CL_INVALID_EVENT"),
            (-59, "CL_INVALID_OPERATION"),
            (-60, "CL_INVALID_GL_OBJECT"),
            (-61, "CL_INVALID_BUFFER_SIZE"),
            (-62, "CL_INVALID_MIP_LEVEL"),
            (-63, "CL_INVALID_GLOBAL_WORK_SIZE"),
        ];
        for &(code, name) in table.iter() {
            expect!(error_str(code), name);
        }
    }

    #[test]
    fn unassigned_codes_are_empty()
    {
        for code in -29..=-13 {
            expect!(error_str(code), "");
        }
    }

    #[test]
    fn out_of_range_codes_are_empty()
    {
        expect!(error_str(1), "");
        expect!(error_str(42), "");
        expect!(error_str(-64), "");
        expect!(error_str(-1000), "");
    }
}

mod platform_selection {
    use super::{names, read};
    use oclutil::pick_platform;

    #[test]
    fn first_matching_name_wins()
    {
        let platforms = names(&["Intel(R) OpenCL", "NVIDIA CUDA", "NVIDIA CUDA 2"]);
        expect!(pick_platform(&platforms, "NVIDIA", read), Some(1));
    }

    #[test]
    fn falls_back_to_first_platform()
    {
        let platforms = names(&["AMD Accelerated Parallel Processing", "Portable Computing Language"]);
        expect!(pick_platform(&platforms, "NVIDIA", read), Some(0));
    }

    #[test]
    fn empty_enumeration_is_not_found()
    {
        let platforms: Vec<&'static str> = Vec::new();
        expect!(pick_platform(&platforms, "NVIDIA", read), None);
    }
}

mod device_selection {
    use super::{names, read};
    use oclutil::{pick_device, Error};

    #[test]
    fn first_device_with_token_wins()
    {
        let devices = names(&["foo bar", "bar baz"]);
        expect!(pick_device(&devices, Some("bar"), read), Some(0));
        expect!(pick_device(&devices, Some("baz"), read), Some(1));
    }

    #[test]
    fn token_must_match_whole_word()
    {
        let devices = names(&["foo bar", "bar baz"]);
        expect!(pick_device(&devices, Some("barstool"), read), None);
        expect!(pick_device(&devices, Some("ba"), read), None);
    }

    #[test]
    fn no_requirement_takes_first_device()
    {
        let devices = names(&["cl_khr_fp64", "cl_khr_gl_sharing"]);
        expect!(pick_device(&devices, None, read), Some(0));
    }

    #[test]
    fn no_devices_is_not_found()
    {
        let devices: Vec<&'static str> = Vec::new();
        expect!(pick_device(&devices, None, read), None);
        expect!(pick_device(&devices, Some("cl_khr_gl_sharing"), read), None);
    }

    #[test]
    fn unreadable_extensions_never_match()
    {
        let devices = names(&["broken", "cl_khr_gl_sharing"]);
        let picked = pick_device(&devices, Some("cl_khr_gl_sharing"), |d| {
            if *d == "broken" {
                Err(Error::Status { action: "Getting device info string", code: -33 })
            } else {
                Ok(d.to_string())
            }
        });
        expect!(picked, Some(1));
    }
}

mod build_log {
    use oclutil::{build_log_report, Device};
    use std::ptr;

    #[test]
    fn absent_program_reports_nothing()
    {
        // A null device is never touched when there is no program.
        let device = unsafe { Device::new_unchecked(ptr::null_mut()) };
        expect!(build_log_report(None, &device), None);
    }
}

mod hardware {
    use super::test_all_platforms_devices;
    use oclutil::*;

    #[test]
    fn reports_every_device()
    {
        test_all_platforms_devices(|p, d| {
            let text = platform_report(p);
            assert!(text.contains("Platform name"));
            let text = device_report(d);
            assert!(text.contains("CL_DEVICE_NAME"));
        })
    }

    #[test]
    fn context_for_every_gpu()
    {
        test_all_platforms_devices(|p, d| {
            let ctx = create_context(d, p, false).unwrap();
            assert!(!ctx.is_interop());
        })
    }

    #[test]
    fn shared_context_without_gl_is_still_attempted()
    {
        test_all_platforms_devices(|p, d| {
            match create_context(d, p, true) {
                Ok(ctx) => assert!(ctx.is_interop()),
                Err(Error::Status { action, .. }) => {
                    expect!(action, "Creating GL-CL shared context")
                }
                Err(e) => panic!("unexpected error: {}", e),
            }
        })
    }

    #[test]
    fn empty_program_is_rejected()
    {
        test_all_platforms_devices(|p, d| {
            let ctx = create_context(d, p, false).unwrap();
            match Program::from_source(&ctx, "") {
                Err(Error::Status { code, .. }) => expect!(code, -30),
                other => panic!("unexpected result: {:?}", other.map(|_| ())),
            }
        })
    }

    #[test]
    fn build_log_of_broken_program()
    {
        test_all_platforms_devices(|p, d| {
            let ctx = create_context(d, p, false).unwrap();
            let program = Program::from_source(&ctx, "__kernel void f( {").unwrap();
            assert!(program.build(d, "").is_err());
            let log = build_log_report(Some(&program), d).unwrap();
            assert!(log.contains("BUILD LOG"));
        })
    }

    #[test]
    fn selection_without_runtime_is_an_error()
    {
        match select_platform(NVIDIA_PLATFORM) {
            Ok(p) => assert!(p.name().is_ok()),
            Err(Error::Library(_)) | Err(Error::NoPlatform) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
}
