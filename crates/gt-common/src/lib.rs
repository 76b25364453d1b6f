//! GPU test gate common types and errors.
//!
//! This crate provides the field encodings shared by the matcher:
//! - OS identities and the OS bitmask (with precomputed family bits)
//! - Build type and its bitmask
//! - GPU vendor/device ids and the collected `GpuInfo` record
//! - Common error types for the textual parsers

pub mod build_type;
pub mod error;
pub mod gpu;
pub mod os;

pub use build_type::{BuildType, BuildTypeMask};
pub use error::{Error, ErrorCategory, Result};
pub use gpu::{
    parse_device_id, parse_vendor_id, vendor_name, GpuInfo, VENDOR_AMD, VENDOR_INTEL,
    VENDOR_NVIDIA,
};
pub use os::{Os, OsMask};
