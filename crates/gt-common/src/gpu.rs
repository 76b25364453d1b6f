//! GPU vendor and device identifiers.
//!
//! Ids are the PCI ids reported by the driver stack. Zero is never a real id:
//! in a constraint it means "unconstrained", in collected data it means
//! "could not be determined".

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const VENDOR_NVIDIA: u32 = 0x10DE;
pub const VENDOR_AMD: u32 = 0x1002;
pub const VENDOR_INTEL: u32 = 0x8086;

/// Parse a hex literal with an optional `0x` prefix.
fn parse_hex(s: &str) -> Option<u32> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u32::from_str_radix(digits, 16).ok()
}

/// Parse a vendor name (`nvidia`, `amd`, `ati`, `intel`) or hex id.
pub fn parse_vendor_id(s: &str) -> Result<u32> {
    let id = match s.trim().to_ascii_lowercase().as_str() {
        "nvidia" => VENDOR_NVIDIA,
        "amd" | "ati" => VENDOR_AMD,
        "intel" => VENDOR_INTEL,
        other => parse_hex(other).ok_or_else(|| Error::InvalidVendor(s.to_string()))?,
    };
    if id == 0 {
        return Err(Error::InvalidVendor(s.to_string()));
    }
    Ok(id)
}

/// Parse a nonzero hex device id.
pub fn parse_device_id(s: &str) -> Result<u32> {
    match parse_hex(s) {
        Some(id) if id != 0 => Ok(id),
        _ => Err(Error::InvalidDeviceId(s.to_string())),
    }
}

/// Short vendor name for known ids, used in log output.
pub fn vendor_name(id: u32) -> Option<&'static str> {
    match id {
        VENDOR_NVIDIA => Some("nvidia"),
        VENDOR_AMD => Some("amd"),
        VENDOR_INTEL => Some("intel"),
        _ => None,
    }
}

/// Primary GPU identity as reported by the collection layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GpuInfo {
    pub vendor_id: u32,
    pub device_id: u32,
}

impl GpuInfo {
    pub const fn new(vendor_id: u32, device_id: u32) -> Self {
        Self {
            vendor_id,
            device_id,
        }
    }

    /// Both ids were collected.
    pub const fn is_complete(&self) -> bool {
        self.vendor_id != 0 && self.device_id != 0
    }
}

impl fmt::Display for GpuInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}:{:#06x}", self.vendor_id, self.device_id)
    }
}

impl FromStr for GpuInfo {
    type Err = Error;

    /// Parse `<vendor>:<device>`, e.g. `nvidia:0x1180` or `10de:1180`.
    fn from_str(s: &str) -> Result<Self> {
        let (vendor, device) = s
            .split_once(':')
            .ok_or_else(|| Error::MalformedGpuInfo(s.to_string()))?;
        Ok(GpuInfo::new(parse_vendor_id(vendor)?, parse_device_id(device)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vendor_names_and_hex() {
        assert_eq!(parse_vendor_id("NVIDIA").unwrap(), VENDOR_NVIDIA);
        assert_eq!(parse_vendor_id("ati").unwrap(), VENDOR_AMD);
        assert_eq!(parse_vendor_id("0x8086").unwrap(), VENDOR_INTEL);
        assert_eq!(parse_vendor_id("1af4").unwrap(), 0x1af4);
    }

    #[test]
    fn test_parse_vendor_rejects_zero_and_garbage() {
        assert!(matches!(parse_vendor_id("0x0"), Err(Error::InvalidVendor(_))));
        assert!(matches!(parse_vendor_id("matrox?"), Err(Error::InvalidVendor(_))));
    }

    #[test]
    fn test_parse_device_id() {
        assert_eq!(parse_device_id("0x1180").unwrap(), 0x1180);
        assert_eq!(parse_device_id(" 0X0a20\n").unwrap(), 0x0a20);
        assert!(parse_device_id("0").is_err());
        assert!(parse_device_id("").is_err());
    }

    #[test]
    fn test_gpu_info_from_str() {
        let info: GpuInfo = "nvidia:0x1180".parse().unwrap();
        assert_eq!(info, GpuInfo::new(0x10de, 0x1180));
        assert!(info.is_complete());

        assert!(matches!(
            "10de".parse::<GpuInfo>(),
            Err(Error::MalformedGpuInfo(_))
        ));
        assert!(matches!(
            "10de:0".parse::<GpuInfo>(),
            Err(Error::InvalidDeviceId(_))
        ));
    }

    #[test]
    fn test_gpu_info_display() {
        assert_eq!(GpuInfo::new(0x10de, 0x1180).to_string(), "0x10de:0x1180");
        assert!(!GpuInfo::default().is_complete());
    }

    #[test]
    fn test_vendor_name() {
        assert_eq!(vendor_name(VENDOR_INTEL), Some("intel"));
        assert_eq!(vendor_name(0x1234), None);
    }
}
