//! Indian mobile numbers.

use std::fmt;

use serde::Serialize;

/// A validated 10-digit mobile number whose first digit is 6-9.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Mobile(String);

impl Mobile {
    /// Parse a submitted number. Surrounding whitespace is ignored; no other
    /// formatting (country code, spaces, dashes) is accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim();
        let bytes = s.as_bytes();
        let valid = bytes.len() == 10
            && matches!(bytes.first(), Some(b'6'..=b'9'))
            && bytes.iter().all(u8::is_ascii_digit);
        valid.then(|| Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last four digits only, for log lines.
    pub fn masked(&self) -> String {
        format!("******{}", &self.0[6..])
    }
}

impl fmt::Display for Mobile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
