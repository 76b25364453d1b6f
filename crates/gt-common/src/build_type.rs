//! Build configuration (Release/Debug) and its bitmask.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// The build configuration a binary was compiled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    Release,
    Debug,
}

impl BuildType {
    /// Build type of the running binary, fixed at compile time.
    pub const fn current() -> Self {
        if cfg!(debug_assertions) {
            BuildType::Debug
        } else {
            BuildType::Release
        }
    }

    pub const fn mask(self) -> BuildTypeMask {
        match self {
            BuildType::Release => BuildTypeMask::RELEASE,
            BuildType::Debug => BuildTypeMask::DEBUG,
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildType::Release => write!(f, "RELEASE"),
            BuildType::Debug => write!(f, "DEBUG"),
        }
    }
}

/// Bitmask over [`BuildType`]. Zero means "any build".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BuildTypeMask(u32);

impl BuildTypeMask {
    pub const ANY: Self = Self(0);
    pub const RELEASE: Self = Self(1 << 0);
    pub const DEBUG: Self = Self(1 << 1);
    pub const ALL: Self = Self(Self::RELEASE.0 | Self::DEBUG.0);

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Build a mask, rejecting bits outside [`BuildTypeMask::ALL`].
    pub const fn from_bits(bits: u32) -> Option<Self> {
        if bits & !Self::ALL.0 == 0 {
            Some(Self(bits))
        } else {
            None
        }
    }

    /// Build a mask without checking the universe.
    pub const fn from_bits_retain(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn is_unconstrained(self) -> bool {
        self.0 == 0
    }

    pub const fn is_known(self) -> bool {
        self.0 & !Self::ALL.0 == 0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// The single build type, if exactly one bit is set.
    pub const fn as_single(self) -> Option<BuildType> {
        match self {
            Self::RELEASE => Some(BuildType::Release),
            Self::DEBUG => Some(BuildType::Debug),
            _ => None,
        }
    }
}

impl From<BuildType> for BuildTypeMask {
    fn from(build_type: BuildType) -> Self {
        build_type.mask()
    }
}

impl TryFrom<u32> for BuildTypeMask {
    type Error = Error;

    fn try_from(bits: u32) -> Result<Self> {
        Self::from_bits(bits).ok_or(Error::UnknownMaskBits {
            kind: "build type",
            bits,
        })
    }
}

impl From<BuildTypeMask> for u32 {
    fn from(mask: BuildTypeMask) -> u32 {
        mask.0
    }
}

impl BitOr for BuildTypeMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for BuildTypeMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for BuildTypeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ANY => write!(f, "ANY"),
            Self::RELEASE => write!(f, "RELEASE"),
            Self::DEBUG => write!(f, "DEBUG"),
            Self::ALL => write!(f, "RELEASE|DEBUG"),
            other => write!(f, "{:#x}", other.0),
        }
    }
}

impl FromStr for BuildTypeMask {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut mask = BuildTypeMask::ANY;
        for token in s
            .split(|c: char| c == '|' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            mask |= match token.to_ascii_lowercase().as_str() {
                "any" => BuildTypeMask::ANY,
                "release" => BuildTypeMask::RELEASE,
                "debug" => BuildTypeMask::DEBUG,
                _ => return Err(Error::UnknownBuildType(token.to_string())),
            };
        }
        Ok(mask)
    }
}
