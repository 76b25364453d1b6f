//! Fuzz target for `vendor:device` and sysfs id parsing.
//!
//! Accepted ids are always nonzero.

#![no_main]

use gt_common::{parse_device_id, parse_vendor_id, GpuInfo};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(info) = data.parse::<GpuInfo>() {
        assert!(info.is_complete());
    }
    if let Ok(id) = parse_vendor_id(data) {
        assert_ne!(id, 0);
    }
    if let Ok(id) = parse_device_id(data) {
        assert_ne!(id, 0);
    }
});
