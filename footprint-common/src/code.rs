//! Couple code: the short shareable token that scopes every record
//!
//! A code is 8 uppercase ASCII alphanumerics taken from the head of a random
//! v4 UUID. Nothing checks for collisions before insert; the store's primary
//! key turns a collision into an ordinary insert failure.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Number of characters in a couple code
pub const CODE_LEN: usize = 8;

/// Validated couple code
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CoupleCode(String);

impl CoupleCode {
    /// Generate a fresh code from a random UUID
    pub fn generate() -> Self {
        let simple = Uuid::new_v4().simple().to_string();
        Self(simple[..CODE_LEN].to_ascii_uppercase())
    }

    /// Parse user input into a code
    ///
    /// Surrounding whitespace is trimmed and letters are uppercased, so codes
    /// typed by hand on a phone still match.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.len() != CODE_LEN {
            return Err(Error::InvalidInput(format!(
                "couple code must be {} characters, got {}",
                CODE_LEN,
                trimmed.len()
            )));
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidInput(format!(
                "couple code must be alphanumeric: {}",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CoupleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CoupleCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CoupleCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CoupleCode> for String {
    fn from(code: CoupleCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CoupleCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
