//! Live platform probes.
//!
//! # Sources
//! - Linux: `/etc/lsb-release` distinguishes Chrome OS, DRM sysfs gives PCI ids
//! - macOS: `sw_vers -productVersion`
//! - Windows: `cmd /C ver`
//!
//! Every probe failure degrades to "unknown" (OS) or zero ids (GPU) and is
//! logged at debug level; nothing here returns an error to the caller.

use super::{os_from_version, OsFamily, Platform};
use crate::config::GateConfig;
use crate::logging::event_names;
use gt_common::{parse_device_id, parse_vendor_id, GpuInfo, Os, Result};
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::{debug, trace};

/// Probes the machine this process runs on.
#[derive(Debug, Clone, Default)]
pub struct SystemPlatform {
    config: GateConfig,
}

impl SystemPlatform {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    /// Platform configured from `GT_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(GateConfig::from_env())
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    fn detect_os(&self) -> Option<Os> {
        if cfg!(any(target_os = "linux", target_os = "openbsd")) {
            let family = if is_chromeos(&self.config.lsb_release_path) {
                OsFamily::ChromeOs
            } else {
                OsFamily::Linux
            };
            os_from_version(family, 0, 0)
        } else if cfg!(target_os = "macos") {
            let output = run_probe("sw_vers", &["-productVersion"])?;
            let (major, minor, _) = parse_version_triple(&output)?;
            os_from_version(OsFamily::Mac, major, minor)
        } else if cfg!(target_os = "windows") {
            let output = run_probe("cmd", &["/C", "ver"])?;
            let (major, minor, _) = parse_windows_ver_output(&output)?;
            os_from_version(OsFamily::Windows, major, minor)
        } else {
            None
        }
    }
}

impl Platform for SystemPlatform {
    fn current_os(&self) -> Option<Os> {
        if let Some(os) = self.config.os_override {
            return Some(os);
        }
        let os = self.detect_os();
        debug!(target: event_names::PROBE_OS, os = ?os, "detected OS");
        os
    }

    fn collect_gpu_info(&self) -> GpuInfo {
        if let Some(gpu) = self.config.gpu_override {
            return gpu;
        }
        if !cfg!(target_os = "linux") {
            debug!(target: event_names::PROBE_GPU, "no GPU probe for this target");
            return GpuInfo::default();
        }
        match scan_drm_cards(&self.config.drm_root) {
            Ok(info) => {
                debug!(target: event_names::PROBE_GPU, gpu = %info, "collected GPU info");
                info
            }
            Err(e) => {
                debug!(
                    target: event_names::PROBE_GPU,
                    root = %self.config.drm_root.display(),
                    "DRM scan failed: {}",
                    e
                );
                GpuInfo::default()
            }
        }
    }
}

/// Run a probe command and return its trimmed stdout.
fn run_probe(program: &str, args: &[&str]) -> Option<String> {
    match Command::new(program).args(args).output() {
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            trace!(target: event_names::PROBE_OS, program, stdout = %stdout, "probe output");
            Some(stdout)
        }
        Ok(output) => {
            debug!(target: event_names::PROBE_OS, program, status = ?output.status, "probe failed");
            None
        }
        Err(e) => {
            debug!(target: event_names::PROBE_OS, program, "failed to run probe: {}", e);
            None
        }
    }
}

fn is_chromeos(lsb_release: &Path) -> bool {
    fs::read_to_string(lsb_release)
        .map(|content| lsb_release_is_chromeos(&content))
        .unwrap_or(false)
}

/// True when lsb-release content names a Chrome OS release.
pub fn lsb_release_is_chromeos(content: &str) -> bool {
    content.lines().any(|line| {
        line.trim_start()
            .strip_prefix("CHROMEOS_RELEASE_NAME=")
            .is_some_and(|name| !name.trim().is_empty())
    })
}

/// Parse `major.minor[.bugfix]`; missing components are zero.
pub fn parse_version_triple(s: &str) -> Option<(u32, u32, u32)> {
    let mut parts = s.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = match parts.next() {
        Some(p) => p.parse().ok()?,
        None => 0,
    };
    let bugfix = match parts.next() {
        Some(p) => p.parse().ok()?,
        None => 0,
    };
    Some((major, minor, bugfix))
}

/// Extract the version from `Microsoft Windows [Version 6.1.7601]`.
pub fn parse_windows_ver_output(s: &str) -> Option<(u32, u32, u32)> {
    let start = s.find("Version ")? + "Version ".len();
    let rest = &s[start..];
    let end = rest.find(']').unwrap_or(rest.len());
    parse_version_triple(&rest[..end])
}

/// Read PCI ids of the first DRM card exposing both nonzero ids.
///
/// Connector nodes (`card0-DP-1`) and render nodes are skipped. Returns zero
/// ids when no card qualifies.
pub fn scan_drm_cards(root: &Path) -> Result<GpuInfo> {
    let mut cards: Vec<_> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| {
            name.strip_prefix("card")
                .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
        })
        .collect();
    cards.sort_by_key(|name| name[4..].parse::<u32>().unwrap_or(u32::MAX));

    for card in cards {
        let device_dir = root.join(&card).join("device");
        match read_card_ids(&device_dir) {
            Ok(info) => return Ok(info),
            Err(e) => trace!(target: event_names::PROBE_GPU, card = %card, "skipping card: {}", e),
        }
    }
    Ok(GpuInfo::default())
}

fn read_card_ids(device_dir: &Path) -> Result<GpuInfo> {
    let vendor = fs::read_to_string(device_dir.join("vendor"))?;
    let device = fs::read_to_string(device_dir.join("device"))?;
    Ok(GpuInfo::new(parse_vendor_id(&vendor)?, parse_device_id(&device)?))
}
