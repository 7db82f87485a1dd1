use core::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{from_hex, AbiError, AbiResult, Word, WORD_LEN};

/// 20-byte contract address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Address(pub [u8; Address::LEN]);

impl Address {
    /// Width of an address in bytes.
    pub const LEN: usize = 20;

    /// The zero address.
    pub const ZERO: Self = Self([0; Self::LEN]);

    /// Wraps raw bytes.
    pub const fn new(bytes: [u8; Self::LEN]) -> Self { Self(bytes) }

    /// Address made of one repeated byte (`0xeeee…eeee`).
    pub const fn repeat_byte(byte: u8) -> Self { Self([byte; Self::LEN]) }

    /// Raw bytes.
    pub const fn as_bytes(&self) -> &[u8; Self::LEN] { &self.0 }

    /// Left-padded ABI word.
    pub fn to_word(&self) -> Word {
        let mut word = [0u8; WORD_LEN];
        word[WORD_LEN - Self::LEN..].copy_from_slice(&self.0);
        word
    }
}

impl FromStr for Address {
    type Err = AbiError;

    fn from_str(s: &str) -> AbiResult<Self> {
        let bytes = from_hex(s.trim()).map_err(|_| AbiError::InvalidAddress(s.to_string()))?;
        let raw: [u8; Self::LEN] =
            bytes.try_into().map_err(|_| AbiError::InvalidAddress(s.to_string()))?;
        Ok(Self(raw))
    }
}

impl TryFrom<String> for Address {
    type Error = AbiError;

    fn try_from(s: String) -> AbiResult<Self> { s.parse() }
}

impl From<Address> for String {
    fn from(a: Address) -> Self { a.to_string() }
}

impl From<[u8; Address::LEN]> for Address {
    fn from(bytes: [u8; Address::LEN]) -> Self { Self(bytes) }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}
