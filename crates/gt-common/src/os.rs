//! Operating system identities and the OS bitmask.
//!
//! Every concrete OS identity owns one bit. The `WIN` and `MAC` families are
//! precomputed unions of their versions, so a concrete OS intersects its own
//! family without any runtime lookup. A mask of zero is the wildcard.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::str::FromStr;

/// A single, concrete operating system identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    #[serde(rename = "xp")]
    WinXp,
    #[serde(rename = "vista")]
    WinVista,
    Win7,
    #[serde(rename = "leopard")]
    MacLeopard,
    #[serde(rename = "snowleopard")]
    MacSnowLeopard,
    #[serde(rename = "lion")]
    MacLion,
    Linux,
    #[serde(rename = "chromeos")]
    ChromeOs,
}

impl Os {
    /// All concrete identities, in bit order.
    pub const ALL: [Os; 8] = [
        Os::WinXp,
        Os::WinVista,
        Os::Win7,
        Os::MacLeopard,
        Os::MacSnowLeopard,
        Os::MacLion,
        Os::Linux,
        Os::ChromeOs,
    ];

    /// The single bit this identity occupies.
    pub const fn mask(self) -> OsMask {
        match self {
            Os::WinXp => OsMask::WIN_XP,
            Os::WinVista => OsMask::WIN_VISTA,
            Os::Win7 => OsMask::WIN7,
            Os::MacLeopard => OsMask::MAC_LEOPARD,
            Os::MacSnowLeopard => OsMask::MAC_SNOW_LEOPARD,
            Os::MacLion => OsMask::MAC_LION,
            Os::Linux => OsMask::LINUX,
            Os::ChromeOs => OsMask::CHROMEOS,
        }
    }

    /// Canonical token used in textual masks.
    pub const fn token(self) -> &'static str {
        match self {
            Os::WinXp => "XP",
            Os::WinVista => "VISTA",
            Os::Win7 => "WIN7",
            Os::MacLeopard => "LEOPARD",
            Os::MacSnowLeopard => "SNOWLEOPARD",
            Os::MacLion => "LION",
            Os::Linux => "LINUX",
            Os::ChromeOs => "CHROMEOS",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Os {
    type Err = Error;

    /// Parses exactly one concrete identity; family tokens are rejected.
    fn from_str(s: &str) -> Result<Self> {
        let mask: OsMask = s.parse()?;
        mask.as_concrete()
            .ok_or_else(|| Error::AmbiguousOs(s.to_string()))
    }
}

/// Bitmask over [`Os`] identities. Zero means "any OS".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct OsMask(u32);

impl OsMask {
    pub const ANY: Self = Self(0);
    pub const WIN_XP: Self = Self(1 << 0);
    pub const WIN_VISTA: Self = Self(1 << 1);
    pub const WIN7: Self = Self(1 << 2);
    pub const WIN: Self = Self(Self::WIN_XP.0 | Self::WIN_VISTA.0 | Self::WIN7.0);
    pub const MAC_LEOPARD: Self = Self(1 << 3);
    pub const MAC_SNOW_LEOPARD: Self = Self(1 << 4);
    pub const MAC_LION: Self = Self(1 << 5);
    pub const MAC: Self = Self(Self::MAC_LEOPARD.0 | Self::MAC_SNOW_LEOPARD.0 | Self::MAC_LION.0);
    pub const LINUX: Self = Self(1 << 6);
    pub const CHROMEOS: Self = Self(1 << 7);

    /// Every bit this mask may legally carry.
    pub const ALL: Self = Self(Self::WIN.0 | Self::MAC.0 | Self::LINUX.0 | Self::CHROMEOS.0);

    /// Raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Build a mask, rejecting bits outside [`OsMask::ALL`].
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

    /// True for the wildcard mask.
    pub const fn is_unconstrained(self) -> bool {
        self.0 == 0
    }

    /// True when every bit lies inside [`OsMask::ALL`].
    pub const fn is_known(self) -> bool {
        self.0 & !Self::ALL.0 == 0
    }

    /// True when the two masks share at least one bit.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// True when `other` is a subset of `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// The concrete identity, if this mask holds exactly one concrete bit.
    pub fn as_concrete(self) -> Option<Os> {
        Os::ALL.into_iter().find(|os| os.mask() == self)
    }

    /// Iterate the concrete identities present in this mask.
    pub fn iter_concrete(self) -> impl Iterator<Item = Os> {
        Os::ALL.into_iter().filter(move |os| self.contains(os.mask()))
    }
}

impl From<Os> for OsMask {
    fn from(os: Os) -> Self {
        os.mask()
    }
}

impl TryFrom<u32> for OsMask {
    type Error = Error;

    fn try_from(bits: u32) -> Result<Self> {
        Self::from_bits(bits).ok_or(Error::UnknownMaskBits {
            kind: "OS",
            bits,
        })
    }
}

impl From<OsMask> for u32 {
    fn from(mask: OsMask) -> u32 {
        mask.0
    }
}

impl BitOr for OsMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for OsMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for OsMask {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Display for OsMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unconstrained() {
            return f.write_str("ANY");
        }

        let mut parts: Vec<String> = Vec::new();
        let mut rest = *self;
        for (family, name) in [(OsMask::WIN, "WIN"), (OsMask::MAC, "MAC")] {
            if rest.contains(family) {
                parts.push(name.to_string());
                rest = OsMask(rest.0 & !family.0);
            }
        }
        parts.extend(rest.iter_concrete().map(|os| os.token().to_string()));
        let unknown = rest.0 & !OsMask::ALL.0;
        if unknown != 0 {
            parts.push(format!("{:#x}", unknown));
        }
        f.write_str(&parts.join("|"))
    }
}

impl FromStr for OsMask {
    type Err = Error;

    /// Parse `|`- or whitespace-separated tokens, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let mut mask = OsMask::ANY;
        for token in s
            .split(|c: char| c == '|' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            mask |= match token.to_ascii_lowercase().as_str() {
                "any" => OsMask::ANY,
                "win" | "windows" => OsMask::WIN,
                "xp" | "winxp" => OsMask::WIN_XP,
                "vista" | "winvista" => OsMask::WIN_VISTA,
                "win7" => OsMask::WIN7,
                "mac" | "macos" => OsMask::MAC,
                "leopard" => OsMask::MAC_LEOPARD,
                "snowleopard" => OsMask::MAC_SNOW_LEOPARD,
                "lion" => OsMask::MAC_LION,
                "linux" => OsMask::LINUX,
                "chromeos" => OsMask::CHROMEOS,
                _ => return Err(Error::UnknownOsToken(token.to_string())),
            };
        }
        Ok(mask)
    }
}
