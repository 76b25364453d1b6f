//! Declared machine requirements for a test.
//!
//! A [`ConstraintSet`] starts fully unconstrained and is built up field by
//! field. Every field has a wildcard value (zero mask, empty vendor list, zero
//! device id); a wildcard field never blocks a match.
//!
//! Misuse of the builders (out-of-universe masks, zero or duplicate vendors,
//! matching an invalid set) is a bug in the test declaration and panics.

use gt_common::{BuildTypeMask, Error, OsMask, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A possibly partial description of the machines a test accepts.
///
/// Deserialization enforces the same checks as the setters but reports them
/// as errors: unknown mask bits, zero vendors and duplicate vendors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConstraintSet {
    os: OsMask,
    gpu_vendors: Vec<u32>,
    gpu_device_id: u32,
    build_type: BuildTypeMask,
}

impl ConstraintSet {
    /// A fully unconstrained set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn os(&self) -> OsMask {
        self.os
    }

    pub fn gpu_vendors(&self) -> &[u32] {
        &self.gpu_vendors
    }

    pub fn gpu_device_id(&self) -> u32 {
        self.gpu_device_id
    }

    pub fn build_type(&self) -> BuildTypeMask {
        self.build_type
    }

    /// True when no field carries a constraint.
    pub fn is_unconstrained(&self) -> bool {
        self.os.is_unconstrained()
            && self.gpu_vendors.is_empty()
            && self.gpu_device_id == 0
            && self.build_type.is_unconstrained()
    }

    /// Overwrite the OS constraint.
    ///
    /// # Panics
    /// If `os` carries bits outside [`OsMask::ALL`].
    pub fn set_os(&mut self, os: OsMask) {
        assert!(os.is_known(), "OS mask {:#x} outside the known universe", os.bits());
        self.os = os;
    }

    /// Allow one more GPU vendor.
    ///
    /// # Panics
    /// If `vendor` is zero or already present.
    pub fn add_gpu_vendor(&mut self, vendor: u32) {
        assert_ne!(vendor, 0, "GPU vendor id must be nonzero");
        assert!(
            !self.gpu_vendors.contains(&vendor),
            "GPU vendor {:#06x} added twice",
            vendor
        );
        self.gpu_vendors.push(vendor);
    }

    /// Reset the vendor list to unconstrained.
    pub fn clear_gpu_vendor(&mut self) {
        self.gpu_vendors.clear();
    }

    /// Overwrite the device id. Consistency with the vendor list is only
    /// checked by [`ConstraintSet::is_valid`].
    pub fn set_gpu_device_id(&mut self, device_id: u32) {
        self.gpu_device_id = device_id;
    }

    /// Overwrite the build type constraint.
    ///
    /// # Panics
    /// If `build_type` carries bits other than Release/Debug.
    pub fn set_build_type(&mut self, build_type: impl Into<BuildTypeMask>) {
        let build_type = build_type.into();
        assert!(
            build_type.is_known(),
            "build type mask {:#x} outside the known universe",
            build_type.bits()
        );
        self.build_type = build_type;
    }

    pub fn with_os(mut self, os: OsMask) -> Self {
        self.set_os(os);
        self
    }

    pub fn with_gpu_vendor(mut self, vendor: u32) -> Self {
        self.add_gpu_vendor(vendor);
        self
    }

    pub fn with_gpu_device_id(mut self, device_id: u32) -> Self {
        self.set_gpu_device_id(device_id);
        self
    }

    pub fn with_build_type(mut self, build_type: impl Into<BuildTypeMask>) -> Self {
        self.set_build_type(build_type);
        self
    }

    /// A specific device must be paired with exactly one named vendor.
    pub fn is_valid(&self) -> bool {
        !(self.gpu_device_id != 0 && (self.gpu_vendors.len() != 1 || self.gpu_vendors[0] == 0))
    }

    /// Could some machine satisfy both `self` and `other`?
    ///
    /// Each field is compared only when both sides constrain it. Symmetric.
    ///
    /// # Panics
    /// If either operand is not [`ConstraintSet::is_valid`].
    pub fn overlaps_with(&self, other: &ConstraintSet) -> bool {
        assert!(self.is_valid(), "overlaps_with on invalid constraint set {}", self);
        assert!(other.is_valid(), "overlaps_with against invalid constraint set {}", other);

        if !self.os.is_unconstrained()
            && !other.os.is_unconstrained()
            && !self.os.intersects(other.os)
        {
            return false;
        }
        if !self.gpu_vendors.is_empty()
            && !other.gpu_vendors.is_empty()
            && !self.gpu_vendors.iter().any(|v| other.gpu_vendors.contains(v))
        {
            return false;
        }
        if self.gpu_device_id != 0
            && other.gpu_device_id != 0
            && self.gpu_device_id != other.gpu_device_id
        {
            return false;
        }
        if !self.build_type.is_unconstrained()
            && !other.build_type.is_unconstrained()
            && !self.build_type.intersects(other.build_type)
        {
            return false;
        }
        true
    }
}

#[derive(Deserialize)]
struct RawConstraintSet {
    #[serde(default)]
    os: OsMask,
    #[serde(default)]
    gpu_vendors: Vec<u32>,
    #[serde(default)]
    gpu_device_id: u32,
    #[serde(default)]
    build_type: BuildTypeMask,
}

impl RawConstraintSet {
    fn into_checked(self) -> Result<ConstraintSet> {
        let mut gpu_vendors = Vec::with_capacity(self.gpu_vendors.len());
        for vendor in self.gpu_vendors {
            if vendor == 0 {
                return Err(Error::InvalidVendor(vendor.to_string()));
            }
            if gpu_vendors.contains(&vendor) {
                return Err(Error::DuplicateVendor(vendor));
            }
            gpu_vendors.push(vendor);
        }
        Ok(ConstraintSet {
            os: self.os,
            gpu_vendors,
            gpu_device_id: self.gpu_device_id,
            build_type: self.build_type,
        })
    }
}

impl<'de> Deserialize<'de> for ConstraintSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        RawConstraintSet::deserialize(deserializer)?
            .into_checked()
            .map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "os={} vendor=", self.os)?;
        if self.gpu_vendors.is_empty() {
            write!(f, "ANY")?;
        } else {
            let vendors: Vec<String> = self
                .gpu_vendors
                .iter()
                .map(|v| format!("{:#06x}", v))
                .collect();
            write!(f, "{}", vendors.join("|"))?;
        }
        match self.gpu_device_id {
            0 => write!(f, " device=ANY")?,
            id => write!(f, " device={:#06x}", id)?,
        }
        write!(f, " build={}", self.build_type)
    }
}
