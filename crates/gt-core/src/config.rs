//! Detection configuration.
//!
//! Supports configuration via environment variables:
//! - `GT_OS`: force the detected OS (single concrete token, e.g. `win7`)
//! - `GT_GPU`: force the collected GPU (`<vendor>:<device>`, e.g. `nvidia:0x1180`)
//! - `GT_DRM_ROOT`: sysfs DRM class directory (default `/sys/class/drm`)
//!
//! Builder overrides take final precedence. Nothing is persisted.

use crate::logging::event_names;
use gt_common::{GpuInfo, Os, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

pub const ENV_OS: &str = "GT_OS";
pub const ENV_GPU: &str = "GT_GPU";
pub const ENV_DRM_ROOT: &str = "GT_DRM_ROOT";

/// Default location of DRM card nodes on Linux.
pub const DEFAULT_DRM_ROOT: &str = "/sys/class/drm";

/// Default Chrome OS release marker.
pub const DEFAULT_LSB_RELEASE: &str = "/etc/lsb-release";

/// Configuration for the system platform probes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Use this OS instead of probing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_override: Option<Os>,

    /// Use this GPU instead of probing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_override: Option<GpuInfo>,

    /// Directory holding `card*/device/{vendor,device}`.
    pub drm_root: PathBuf,

    /// File checked for a Chrome OS release name.
    pub lsb_release_path: PathBuf,
}

impl Default for GateConfig {
    fn default() -> Self {
        GateConfig {
            os_override: None,
            gpu_override: None,
            drm_root: PathBuf::from(DEFAULT_DRM_ROOT),
            lsb_release_path: PathBuf::from(DEFAULT_LSB_RELEASE),
        }
    }
}

impl GateConfig {
    /// Resolve from the process environment, failing on malformed values.
    pub fn try_from_env() -> Result<Self> {
        Self::try_from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from the process environment; malformed values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup, failing on malformed values.
    pub fn try_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = GateConfig::default();

        if let Some(val) = lookup(ENV_OS) {
            config.os_override = Some(val.parse()?);
        }
        if let Some(val) = lookup(ENV_GPU) {
            config.gpu_override = Some(val.parse()?);
        }
        if let Some(val) = lookup(ENV_DRM_ROOT) {
            config.drm_root = PathBuf::from(val);
        }

        config.log_overrides();
        Ok(config)
    }

    /// Resolve from an arbitrary key lookup, skipping malformed values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = GateConfig::default();

        if let Some(val) = lookup(ENV_OS) {
            match val.parse::<Os>() {
                Ok(os) => config.os_override = Some(os),
                Err(e) => warn!(
                    target: event_names::CONFIG_INVALID,
                    key = ENV_OS,
                    value = %val,
                    code = e.code(),
                    "ignoring invalid override: {}",
                    e
                ),
            }
        }
        if let Some(val) = lookup(ENV_GPU) {
            match val.parse::<GpuInfo>() {
                Ok(info) => config.gpu_override = Some(info),
                Err(e) => warn!(
                    target: event_names::CONFIG_INVALID,
                    key = ENV_GPU,
                    value = %val,
                    code = e.code(),
                    "ignoring invalid override: {}",
                    e
                ),
            }
        }
        if let Some(val) = lookup(ENV_DRM_ROOT) {
            config.drm_root = PathBuf::from(val);
        }

        config.log_overrides();
        config
    }

    fn log_overrides(&self) {
        if let Some(os) = self.os_override {
            debug!(target: event_names::CONFIG_OVERRIDE, key = ENV_OS, os = %os, "OS override active");
        }
        if let Some(gpu) = self.gpu_override {
            debug!(target: event_names::CONFIG_OVERRIDE, key = ENV_GPU, gpu = %gpu, "GPU override active");
        }
    }

    /// Force the OS.
    pub fn with_os_override(mut self, os: Os) -> Self {
        self.os_override = Some(os);
        self
    }

    /// Force the GPU.
    pub fn with_gpu_override(mut self, gpu: GpuInfo) -> Self {
        self.gpu_override = Some(gpu);
        self
    }

    /// Set the DRM sysfs root.
    pub fn with_drm_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.drm_root = root.into();
        self
    }

    /// Set the lsb-release path.
    pub fn with_lsb_release_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.lsb_release_path = path.into();
        self
    }
}
