//! Actions recorded in the emergency contact log.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    View,
    Scan,
    Call,
    Sms,
}

impl ActionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Scan => "scan",
            Self::Call => "call",
            Self::Sms => "sms",
        }
    }

    /// Whether the action reaches out to the owner (and is therefore throttled).
    pub fn is_contact(self) -> bool {
        matches!(self, Self::Call | Self::Sms)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(Self::View),
            "scan" => Ok(Self::Scan),
            "call" => Ok(Self::Call),
            "sms" => Ok(Self::Sms),
            _ => Err(UnknownVariant {
                what: "action type",
                value: s.to_owned(),
            }),
        }
    }
}
