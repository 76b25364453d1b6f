//! Fuzz target for override handling and JSON config loading.
//!
//! Tests that malformed overrides never panic the lenient loader.

#![no_main]

use gt_core::config::{ENV_DRM_ROOT, ENV_GPU, ENV_OS};
use gt_core::GateConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let lookup = |key: &str| match key {
        ENV_OS | ENV_GPU | ENV_DRM_ROOT => Some(data.to_string()),
        _ => None,
    };
    let _ = GateConfig::from_lookup(lookup);
    let _ = GateConfig::try_from_lookup(lookup);
    let _ = serde_json::from_str::<GateConfig>(data);
});
