use std::convert::TryFrom;
use std::fmt::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of hex digits shown when an ID is abbreviated (e.g. in merge log lines).
pub const ABBREV_LEN: usize = 7;

/// Why a digest or hex string is not a valid object ID.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum ParseIdError {
    #[error("cannot parse object ID from empty string")]
    Empty,

    /// Only lowercase hex digits are accepted.
    #[error("value contains invalid digit `{0}`")]
    InvalidDigit(char),

    #[error("value is more than 40 digits long")]
    Overflow,

    #[error("value is less than 40 digits long")]
    Underflow,

    /// The all-zero ID is reserved.
    #[error("ID would be zero")]
    Zero,
}

/// An object ID identifies an object within a repository.
/// It is stored as a 20-byte SHA-1 digest, but is usually shown as 40 hex digits.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Id {
    id: [u8; 20],
}

impl Id {
    /// Create a new ID from a 20-byte digest.
    ///
    /// It is an error if the slice contains anything other than 20 bytes.
    pub fn new(id: &[u8]) -> Result<Id, ParseIdError> {
        match id.len() {
            20 => {
                let mut bytes = [0; 20];
                bytes.copy_from_slice(id);
                Ok(Id { id: bytes })
            }
            0 => Err(ParseIdError::Empty),
            n if n < 20 => Err(ParseIdError::Underflow),
            _ => Err(ParseIdError::Overflow),
        }
    }

    /// Convert a 40-character hex ID to an object ID.
    ///
    /// It is an error if the ID contains anything other than 40 lowercase hex digits.
    pub fn from_hex<T: AsRef<[u8]>>(id: T) -> Result<Id, ParseIdError> {
        let hex = id.as_ref();

        match hex.len() {
            40 => {
                let mut bytes = [0; 20];
                for (byte, pair) in bytes.iter_mut().zip(hex.chunks(2)) {
                    *byte = digit_value(pair[0])? << 4 | digit_value(pair[1])?;
                }

                if bytes.iter().all(|x| *x == 0) {
                    Err(ParseIdError::Zero)
                } else {
                    Ok(Id { id: bytes })
                }
            }
            0 => Err(ParseIdError::Empty),
            n if n < 40 => Err(ParseIdError::Underflow),
            _ => Err(ParseIdError::Overflow),
        }
    }

    /// Returns the first [`ABBREV_LEN`] hex digits of this ID.
    pub fn abbrev(&self) -> String {
        let mut s = self.to_string();
        s.truncate(ABBREV_LEN);
        s
    }

    /// Returns true if `prefix` is a leading substring of this ID's hex form.
    ///
    /// An empty prefix never matches.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        !prefix.is_empty() && prefix.len() <= 40 && self.to_string().starts_with(prefix)
    }
}

impl FromStr for Id {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Id::from_hex(s.as_bytes())
    }
}

impl TryFrom<String> for Id {
    type Error = ParseIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Id::from_hex(s.as_bytes())
    }
}

impl From<Id> for String {
    fn from(id: Id) -> String {
        id.to_string()
    }
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.id.iter().try_for_each(|byte| {
            f.write_char(char::from(HEX_DIGITS[usize::from(byte >> 4)]))?;
            f.write_char(char::from(HEX_DIGITS[usize::from(byte & 0xf)]))
        })
    }
}

fn digit_value(c: u8) -> Result<u8, ParseIdError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        _ => Err(ParseIdError::InvalidDigit(c as char)),
    }
}
