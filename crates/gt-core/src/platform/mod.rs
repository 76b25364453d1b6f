//! External collaborators consumed while resolving the current machine.
//!
//! The matcher never probes hardware itself. A [`Platform`] supplies the
//! current OS identity, the primary GPU ids and the build type; the live
//! implementation is [`SystemPlatform`], tests use `FixedPlatform`.

mod system;

#[cfg(any(test, feature = "test-utils"))]
mod fixed;

pub use system::{
    lsb_release_is_chromeos, parse_version_triple, parse_windows_ver_output, scan_drm_cards,
    SystemPlatform,
};

#[cfg(any(test, feature = "test-utils"))]
pub use fixed::FixedPlatform;

use gt_common::{BuildType, GpuInfo, Os};

/// Source of facts about the running machine.
pub trait Platform {
    /// Current concrete OS identity, or `None` when it cannot be determined.
    fn current_os(&self) -> Option<Os>;

    /// Primary GPU ids. Zero ids mean "could not be collected".
    fn collect_gpu_info(&self) -> GpuInfo;

    /// Build configuration of this binary.
    fn build_type(&self) -> BuildType {
        BuildType::current()
    }
}

/// OS families whose versions map onto concrete identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    Mac,
    Linux,
    ChromeOs,
}

/// Map a family and version numbers onto a concrete identity.
///
/// Linux and Chrome OS are single identities regardless of version.
/// Unlisted Windows/macOS versions are unknown.
pub fn os_from_version(family: OsFamily, major: u32, minor: u32) -> Option<Os> {
    match (family, major, minor) {
        (OsFamily::Windows, 5, _) => Some(Os::WinXp),
        (OsFamily::Windows, 6, 0) => Some(Os::WinVista),
        (OsFamily::Windows, 6, 1) => Some(Os::Win7),
        (OsFamily::Mac, 10, 5) => Some(Os::MacLeopard),
        (OsFamily::Mac, 10, 6) => Some(Os::MacSnowLeopard),
        (OsFamily::Mac, 10, 7) => Some(Os::MacLion),
        (OsFamily::Linux, _, _) => Some(Os::Linux),
        (OsFamily::ChromeOs, _, _) => Some(Os::ChromeOs),
        _ => None,
    }
}
