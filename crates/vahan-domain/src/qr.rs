//! QR tag identity and lifecycle types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnknownVariant;

/// A case-normalized QR code string.
///
/// Construction trims surrounding whitespace and uppercases, so `" abc123 "`
/// and `"ABC123"` are the same code. Empty input is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct QrCode(String);

impl QrCode {
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QrCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the tag is attached to. Only vehicle tags carry a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagType {
    Vehicle,
    Other,
}

impl TagType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vehicle => "vehicle",
            Self::Other => "other",
        }
    }
}

impl FromStr for TagType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vehicle" => Ok(Self::Vehicle),
            "other" => Ok(Self::Other),
            _ => Err(UnknownVariant {
                what: "tag type",
                value: s.to_owned(),
            }),
        }
    }
}

/// Lifecycle state of a tag. New tags start `Inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagStatus {
    Inactive,
    Active,
    Revoked,
}

impl TagStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
            Self::Revoked => "revoked",
        }
    }
}

impl FromStr for TagStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inactive" => Ok(Self::Inactive),
            "active" => Ok(Self::Active),
            "revoked" => Ok(Self::Revoked),
            _ => Err(UnknownVariant {
                what: "tag status",
                value: s.to_owned(),
            }),
        }
    }
}
