//! Deterministic platform for tests.
//!
//! # Example
//!
//! ```ignore
//! use gt_core::platform::FixedPlatform;
//! use gt_common::{GpuInfo, Os};
//!
//! let platform = FixedPlatform::new(Some(Os::Win7), GpuInfo::new(0x10de, 0x1180));
//! ```

use super::Platform;
use gt_common::{BuildType, GpuInfo, Os};
use std::cell::Cell;

/// A [`Platform`] that reports fixed values and counts GPU collections.
#[derive(Debug, Clone)]
pub struct FixedPlatform {
    os: Option<Os>,
    gpu: GpuInfo,
    build_type: BuildType,
    gpu_collections: Cell<usize>,
}

impl FixedPlatform {
    /// Report `os` and `gpu`; build type defaults to the compile-time value.
    pub fn new(os: Option<Os>, gpu: GpuInfo) -> Self {
        Self {
            os,
            gpu,
            build_type: BuildType::current(),
            gpu_collections: Cell::new(0),
        }
    }

    pub fn with_build_type(mut self, build_type: BuildType) -> Self {
        self.build_type = build_type;
        self
    }

    /// How many times [`Platform::collect_gpu_info`] was called.
    pub fn gpu_collections(&self) -> usize {
        self.gpu_collections.get()
    }
}

impl Platform for FixedPlatform {
    fn current_os(&self) -> Option<Os> {
        self.os
    }

    fn collect_gpu_info(&self) -> GpuInfo {
        self.gpu_collections.set(self.gpu_collections.get() + 1);
        self.gpu
    }

    fn build_type(&self) -> BuildType {
        self.build_type
    }
}
