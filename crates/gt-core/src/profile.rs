//! The fully resolved description of the machine running the tests.
//!
//! A [`ResolvedMachineProfile`] carries the same four fields as a
//! [`ConstraintSet`] but every field is single-valued: one concrete OS, one
//! vendor, a nonzero device id, one build type. It is built once per process
//! (usually via [`ResolvedMachineProfile::detect`]) and then passed by
//! reference to whatever needs to gate tests.
//!
//! The inner set is exposed read-only through `Deref`; every mutation goes
//! through the profile so the single-vendor rule cannot be bypassed.

use crate::constraint::ConstraintSet;
use crate::logging::event_names;
use crate::platform::Platform;
use gt_common::{vendor_name, BuildType, BuildTypeMask, GpuInfo, OsMask};
use serde::Serialize;
use std::fmt;
use std::ops::Deref;
use tracing::{info, warn};

/// One concrete, fully known machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedMachineProfile {
    config: ConstraintSet,
}

impl ResolvedMachineProfile {
    /// An empty profile; not valid until every field is resolved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and load a profile for the current process.
    ///
    /// Returns the profile together with the [`load_current_config`] outcome;
    /// callers should skip GPU-gated tests when it is false.
    ///
    /// [`load_current_config`]: ResolvedMachineProfile::load_current_config
    pub fn detect(platform: &dyn Platform) -> (Self, bool) {
        let mut profile = Self::new();
        let resolved = profile.load_current_config(None, platform);
        (profile, resolved)
    }

    /// The profile viewed as a plain constraint set.
    pub fn as_constraints(&self) -> &ConstraintSet {
        &self.config
    }

    /// See [`ConstraintSet::set_os`].
    pub fn set_os(&mut self, os: OsMask) {
        self.config.set_os(os);
    }

    /// Record the machine's vendor.
    ///
    /// # Panics
    /// If a vendor is already recorded, or `vendor` is zero.
    pub fn add_gpu_vendor(&mut self, vendor: u32) {
        assert!(
            self.config.gpu_vendors().is_empty(),
            "resolved profile already has GPU vendor {:#06x}",
            self.config.gpu_vendors()[0]
        );
        self.config.add_gpu_vendor(vendor);
    }

    pub fn clear_gpu_vendor(&mut self) {
        self.config.clear_gpu_vendor();
    }

    pub fn set_gpu_device_id(&mut self, device_id: u32) {
        self.config.set_gpu_device_id(device_id);
    }

    /// See [`ConstraintSet::set_build_type`].
    pub fn set_build_type(&mut self, build_type: impl Into<BuildTypeMask>) {
        self.config.set_build_type(build_type);
    }

    /// Replace vendor and device from collected GPU info.
    ///
    /// Zero ids leave the profile untouched and return false.
    pub fn set_from_gpu_info(&mut self, info: &GpuInfo) -> bool {
        if info.device_id == 0 || info.vendor_id == 0 {
            return false;
        }
        self.clear_gpu_vendor();
        self.add_gpu_vendor(info.vendor_id);
        self.set_gpu_device_id(info.device_id);
        true
    }

    /// Every field holds exactly one concrete value.
    pub fn is_valid(&self) -> bool {
        if self.config.os().as_concrete().is_none() {
            return false;
        }
        match self.config.gpu_vendors() {
            [vendor] if *vendor != 0 => {}
            _ => return false,
        }
        if self.config.gpu_device_id() == 0 {
            return false;
        }
        self.config.build_type().as_single().is_some()
    }

    /// Does this machine meet `constraints`?
    ///
    /// Wildcard fields in `constraints` always pass. Not symmetric: the
    /// right-hand side may be partial, this profile may not.
    ///
    /// # Panics
    /// If this profile is not [`is_valid`](Self::is_valid) or `constraints`
    /// is not [`ConstraintSet::is_valid`].
    pub fn satisfies(&self, constraints: &ConstraintSet) -> bool {
        assert!(self.is_valid(), "satisfies on unresolved profile {}", self);
        assert!(
            constraints.is_valid(),
            "satisfies against invalid constraint set {}",
            constraints
        );

        if !constraints.os().is_unconstrained() && !self.config.os().intersects(constraints.os()) {
            return false;
        }
        if !constraints.gpu_vendors().is_empty()
            && !constraints.gpu_vendors().contains(&self.config.gpu_vendors()[0])
        {
            return false;
        }
        if constraints.gpu_device_id() != 0
            && constraints.gpu_device_id() != self.config.gpu_device_id()
        {
            return false;
        }
        if !constraints.build_type().is_unconstrained()
            && !self.config.build_type().intersects(constraints.build_type())
        {
            return false;
        }
        true
    }

    /// Resolve this profile for the running process.
    ///
    /// Uses `gpu_info` when given, otherwise asks `platform` to collect it.
    /// Returns false when the GPU ids or the OS could not be determined; the
    /// build type never affects the outcome.
    pub fn load_current_config(
        &mut self,
        gpu_info: Option<&GpuInfo>,
        platform: &dyn Platform,
    ) -> bool {
        let collected;
        let gpu_info = match gpu_info {
            Some(info) => info,
            None => {
                collected = platform.collect_gpu_info();
                &collected
            }
        };
        let mut resolved = self.set_from_gpu_info(gpu_info);

        let os = platform.current_os();
        self.set_os(os.map(OsMask::from).unwrap_or(OsMask::ANY));
        if os.is_none() {
            resolved = false;
        }

        let build_type: BuildType = platform.build_type();
        self.set_build_type(build_type);

        if resolved {
            info!(
                target: event_names::PROFILE_LOADED,
                profile = %self,
                vendor = vendor_name(gpu_info.vendor_id).unwrap_or("other"),
                "resolved machine profile"
            );
        } else {
            warn!(
                target: event_names::PROFILE_UNRESOLVED,
                gpu = %gpu_info,
                os = ?os,
                profile = %self,
                "machine profile could not be fully resolved; GPU-gated tests should be skipped"
            );
        }
        resolved
    }
}

impl Deref for ResolvedMachineProfile {
    type Target = ConstraintSet;

    fn deref(&self) -> &ConstraintSet {
        &self.config
    }
}

impl fmt::Display for ResolvedMachineProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.config, f)
    }
}
