//! One-time passcodes for mobile verification.

use std::fmt;

/// Number of digits in every OTP.
pub const OTP_LEN: usize = 6;

/// Exclusive upper bound of the numeric OTP range (`000000..=999999`).
pub const OTP_SPACE: u32 = 1_000_000;

/// A six-digit one-time passcode, leading zeros preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OtpCode(String);

impl OtpCode {
    /// Render `n` as a zero-padded six-digit code. Returns `None` when `n`
    /// does not fit in six digits.
    pub fn from_number(n: u32) -> Option<Self> {
        (n < OTP_SPACE).then(|| Self(format!("{n:0width$}", width = OTP_LEN)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
