//! GPU Test Gate Core Library
//!
//! Decides whether a GPU-dependent test should run on the current machine:
//! - Constraint sets declared by tests (OS, GPU vendor/device, build type)
//! - The resolved profile of the running machine
//! - Run/skip decisions and expectation conflict analysis
//! - Platform probes, environment overrides and structured logging
//!
//! Typical use in a test harness:
//!
//! ```no_run
//! use gt_core::{ConstraintSet, OsMask, ResolvedMachineProfile, SystemPlatform, TestGate};
//!
//! let (profile, resolved) = ResolvedMachineProfile::detect(&SystemPlatform::from_env());
//! let gate = TestGate::new(&profile, resolved);
//! let decision = gate.decide(&ConstraintSet::new().with_os(OsMask::WIN));
//! if !decision.should_run() {
//!     return;
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod constraint;
pub mod gate;
pub mod logging;
pub mod platform;
pub mod profile;

pub use analysis::{detect_conflicts, expectation_for, Expectation, Finding, Outcome};
pub use config::GateConfig;
pub use constraint::ConstraintSet;
pub use gate::{GateDecision, SkipReason, TestGate};
pub use platform::{os_from_version, OsFamily, Platform, SystemPlatform};
pub use profile::ResolvedMachineProfile;

#[cfg(any(test, feature = "test-utils"))]
pub use platform::FixedPlatform;

pub use gt_common::{
    BuildType, BuildTypeMask, Error, ErrorCategory, GpuInfo, Os, OsMask, Result, VENDOR_AMD,
    VENDOR_INTEL, VENDOR_NVIDIA,
};
