use crate::error::SplitPayError;
use serde::{Deserialize, Serialize};
use std::fmt;

const PHONE_LEN: usize = 10;
const MOBILE_PREFIXES: [u8; 5] = [b'3', b'5', b'7', b'8', b'9'];

/// A 10-digit local mobile number: `0`, then one of `3 5 7 8 9`, then 8 digits.
///
/// Whitespace, dots and dashes are tolerated on input and stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self, SplitPayError> {
        let digits: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '.' | '-'))
            .collect();
        let bytes = digits.as_bytes();

        let valid = bytes.len() == PHONE_LEN
            && bytes.iter().all(u8::is_ascii_digit)
            && bytes[0] == b'0'
            && MOBILE_PREFIXES.contains(&bytes[1]);

        if valid {
            Ok(Self(digits))
        } else {
            Err(SplitPayError::ValidationError(format!(
                "Invalid phone number: {raw}"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = SplitPayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
