//! Error types for the GPU test gate.
//!
//! Only *recoverable* data problems are modelled here: malformed textual
//! tokens, bad configuration overrides, unreadable probe files. Misuse of the
//! constraint builders (duplicate vendors, out-of-universe masks, calling the
//! matchers on invalid operands) is a programming error and panics instead.
//!
//! Errors carry stable numeric codes grouped by category:
//! - 10-19: Parse errors (tokens, ids)
//! - 20-29: Detection errors (overrides)
//! - 60-69: I/O errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for GPU test gate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Textual token or id parsing.
    Parse,
    /// Machine detection and configuration overrides.
    Detection,
    /// File I/O.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Parse => write!(f, "parse"),
            ErrorCategory::Detection => write!(f, "detection"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for the GPU test gate.
#[derive(Error, Debug)]
pub enum Error {
    // Parse errors (10-19)
    #[error("unknown OS token: {0:?}")]
    UnknownOsToken(String),

    #[error("unknown build type token: {0:?}")]
    UnknownBuildType(String),

    #[error("invalid GPU vendor id: {0:?}")]
    InvalidVendor(String),

    #[error("invalid GPU device id: {0:?}")]
    InvalidDeviceId(String),

    #[error("{kind} mask {bits:#x} has bits outside the known set")]
    UnknownMaskBits { kind: &'static str, bits: u32 },

    #[error("GPU vendor {0:#06x} listed more than once")]
    DuplicateVendor(u32),

    // Detection errors (20-29)
    #[error("malformed GPU info {0:?}: expected <vendor>:<device>")]
    MalformedGpuInfo(String),

    #[error("OS override {0:?} does not name exactly one concrete OS")]
    AmbiguousOs(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> u32 {
        match self {
            Error::UnknownOsToken(_) => 10,
            Error::UnknownBuildType(_) => 11,
            Error::InvalidVendor(_) => 12,
            Error::InvalidDeviceId(_) => 13,
            Error::UnknownMaskBits { .. } => 14,
            Error::DuplicateVendor(_) => 15,
            Error::MalformedGpuInfo(_) => 20,
            Error::AmbiguousOs(_) => 21,
            Error::Io(_) => 60,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::UnknownOsToken(_)
            | Error::UnknownBuildType(_)
            | Error::InvalidVendor(_)
            | Error::InvalidDeviceId(_)
            | Error::UnknownMaskBits { .. }
            | Error::DuplicateVendor(_) => ErrorCategory::Parse,

            Error::MalformedGpuInfo(_) | Error::AmbiguousOs(_) => ErrorCategory::Detection,

            Error::Io(_) => ErrorCategory::Io,
        }
    }
}
