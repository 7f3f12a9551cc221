//! A higher level API.

use crate::context::{create_context, Context};
use crate::device::Device;
use crate::error::Result;
use crate::platform::Platform;
use crate::select::{select_device, select_platform, GL_SHARING_EXTENSION, NVIDIA_PLATFORM};

/// How [`create_compute_context`] picks its platform and context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComputeConfig {
    /// Substring looked for in platform names. The first platform is used
    /// when no name contains it.
    pub preferred_vendor: String,
    /// Share the context with the current GL context. Requires a device
    /// reporting [`GL_SHARING_EXTENSION`].
    pub interop: bool,
}

impl Default for ComputeConfig {
    fn default() -> ComputeConfig {
        ComputeConfig {
            preferred_vendor: NVIDIA_PLATFORM.to_string(),
            interop: false,
        }
    }
}

impl ComputeConfig {
    pub fn preferred_vendor(mut self, vendor: impl Into<String>) -> ComputeConfig {
        self.preferred_vendor = vendor.into();
        self
    }

    pub fn interop(mut self, interop: bool) -> ComputeConfig {
        self.interop = interop;
        self
    }

    /// The extension the selected device has to report, if any.
    pub fn required_extension(&self) -> Option<&'static str> {
        if self.interop {
            Some(GL_SHARING_EXTENSION)
        } else {
            None
        }
    }
}

/// The platform, device and context picked by [`create_compute_context`].
#[derive(Debug)]
pub struct ComputeContext {
    pub platform: Platform,
    pub device: Device,
    pub context: Context,
}

/// Creates a complete compute context.
///
/// Picks the preferred platform, its first suitable GPU device, and a
/// context for that device.
pub fn create_compute_context(config: &ComputeConfig) -> Result<ComputeContext> {
    let platform = select_platform(&config.preferred_vendor)?;
    let device = select_device(&platform, config.required_extension())?;
    let context = create_context(&device, &platform, config.interop)?;
    Ok(ComputeContext { platform, device, context })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prefers_nvidia_without_interop() {
        let config = ComputeConfig::default();
        assert_eq!(config.preferred_vendor, "NVIDIA");
        assert!(!config.interop);
        assert_eq!(config.required_extension(), None);
    }

    #[test]
    fn interop_requires_gl_sharing() {
        let config = ComputeConfig::default().preferred_vendor("AMD").interop(true);
        assert_eq!(config.preferred_vendor, "AMD");
        assert_eq!(config.required_extension(), Some(GL_SHARING_EXTENSION));
    }
}
