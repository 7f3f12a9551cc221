//! Platform and device selection policy.
//!
//! The scans themselves ([`pick_platform`], [`pick_device`]) only look at
//! the strings they are handed, so they work the same against a driver or
//! against fixed test data.

use crate::device::Device;
use crate::error::{Error, Result};
use crate::platform::{platforms, Platform};

/// Substring identifying NVIDIA's platform name.
pub const NVIDIA_PLATFORM: &str = "NVIDIA";

/// Extension a device must report to share objects with the current GL context.
#[cfg(target_os = "macos")]
pub const GL_SHARING_EXTENSION: &str = "cl_APPLE_gl_sharing";

/// Extension a device must report to share objects with the current GL context.
#[cfg(not(target_os = "macos"))]
pub const GL_SHARING_EXTENSION: &str = "cl_khr_gl_sharing";

/// Whether `token` is one of the whitespace separated entries of `extensions`.
pub fn extension_listed(extensions: &str, token: &str) -> bool {
    extensions.split_whitespace().any(|ext| ext == token)
}

/// Picks the first candidate whose name contains `preferred`.
///
/// Candidates whose name cannot be read are skipped. Without a match the
/// first candidate is picked; `None` only for an empty slice.
pub fn pick_platform<T, F>(candidates: &[T], preferred: &str, name_of: F) -> Option<usize>
where
    F: Fn(&T) -> Result<String>,
{
    if candidates.is_empty() {
        return None;
    }

    info!("Available platforms:");
    for (i, candidate) in candidates.iter().enumerate() {
        if let Ok(name) = name_of(candidate) {
            info!("Platform {}: {}", i, name);
            if name.contains(preferred) {
                info!("Selected platform {}", i);
                return Some(i);
            }
        }
    }

    warn!(
        "Could not find a {} platform, defaulting to first found platform",
        preferred
    );
    info!("Selected platform 0");
    Some(0)
}

/// Picks the first candidate listing `required` among its extensions, or
/// the first candidate when nothing is required.
///
/// Candidates whose extensions cannot be read never match.
pub fn pick_device<T, F>(candidates: &[T], required: Option<&str>, extensions_of: F) -> Option<usize>
where
    F: Fn(&T) -> Result<String>,
{
    if candidates.is_empty() {
        return None;
    }

    let required = match required {
        Some(ext) => ext,
        None => {
            info!("Selected device 0");
            return Some(0);
        }
    };

    let found = candidates.iter().position(|candidate| match extensions_of(candidate) {
        Ok(list) => extension_listed(&list, required),
        Err(e) => {
            warn!("Skipping device: {}", e);
            false
        }
    });

    match found {
        Some(i) => {
            info!("Device {} supports \"{}\"", i, required);
            info!("Selected device {}", i);
        }
        None => warn!("Couldn't find a GPU device supporting \"{}\"", required),
    }
    found
}

/// Selects the platform whose name contains `preferred_vendor`, defaulting
/// to the first installed platform.
pub fn select_platform(preferred_vendor: &str) -> Result<Platform> {
    let all = platforms()?;
    if all.is_empty() {
        error!("No OpenCL platform was found!");
        return Err(Error::NoPlatform);
    }

    pick_platform(&all, preferred_vendor, Platform::name)
        .map(|i| all[i])
        .ok_or(Error::NoPlatform)
}

/// Selects a GPU device of `platform`, optionally one reporting
/// `required_extension`.
pub fn select_device(platform: &Platform, required_extension: Option<&str>) -> Result<Device> {
    let devices = platform.gpu_devices()?;
    choose_device(&devices, required_extension, Device::extensions)
}

fn choose_device<T, F>(candidates: &[T], required: Option<&str>, extensions_of: F) -> Result<T>
where
    T: Copy,
    F: Fn(&T) -> Result<String>,
{
    if candidates.is_empty() {
        error!("No GPU devices found on system");
        return Err(Error::NoGpuDevice);
    }

    pick_device(candidates, required, extensions_of)
        .map(|i| candidates[i])
        .ok_or_else(|| Error::NoMatchingDevice {
            extension: required.unwrap_or_default().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &&str) -> Result<String> {
        Ok(name.to_string())
    }

    #[test]
    fn extension_tokens_are_whole_words() {
        let list = "cl_khr_fp64 cl_khr_gl_sharing  cl_nv_device_attribute_query";
        assert!(extension_listed(list, "cl_khr_gl_sharing"));
        assert!(extension_listed(list, "cl_nv_device_attribute_query"));
        assert!(!extension_listed(list, "cl_khr_gl"));
        assert!(!extension_listed(list, "gl_sharing"));
        assert!(!extension_listed("", "cl_khr_fp64"));
    }

    #[test]
    fn extension_list_may_have_trailing_space() {
        assert!(extension_listed("cl_khr_icd cl_khr_fp64 ", "cl_khr_fp64"));
    }

    #[test]
    fn unreadable_platform_names_are_skipped() {
        let candidates = ["broken", "NVIDIA CUDA"];
        let picked = pick_platform(&candidates, "NVIDIA", |c| {
            if *c == "broken" {
                Err(Error::Status { action: "Getting platform info string", code: -30 })
            } else {
                named(c)
            }
        });
        assert_eq!(picked, Some(1));
    }

    #[test]
    fn platform_match_is_case_sensitive() {
        let candidates = ["nvidia lowercase", "AMD Accelerated Parallel Processing"];
        assert_eq!(pick_platform(&candidates, "NVIDIA", named), Some(0));
        let candidates = ["AMD Accelerated Parallel Processing", "nvidia lowercase"];
        assert_eq!(pick_platform(&candidates, "NVIDIA", named), Some(0));
    }

    #[test]
    fn no_gpu_devices() {
        let candidates: [&str; 0] = [];
        let err = choose_device(&candidates, Some(GL_SHARING_EXTENSION), named).unwrap_err();
        assert!(matches!(err, Error::NoGpuDevice));
        let err = choose_device(&candidates, None, named).unwrap_err();
        assert!(matches!(err, Error::NoGpuDevice));
    }

    #[test]
    fn no_device_with_required_extension() {
        let candidates = ["cl_khr_fp64", "cl_khr_icd cl_khr_gl"];
        match choose_device(&candidates, Some("cl_khr_gl_sharing"), named) {
            Err(Error::NoMatchingDevice { extension }) => assert_eq!(extension, "cl_khr_gl_sharing"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn chosen_device_is_the_matching_one() {
        let candidates = ["cl_khr_fp64", "cl_khr_fp64 cl_khr_gl_sharing"];
        let chosen = choose_device(&candidates, Some("cl_khr_gl_sharing"), named).unwrap();
        assert_eq!(chosen, "cl_khr_fp64 cl_khr_gl_sharing");
        assert_eq!(choose_device(&candidates, None, named).unwrap(), "cl_khr_fp64");
    }
}
