use crate::{AbiError, AbiResult, Address, ParamType, Word, WORD_LEN};

/// Concrete ABI value.
///
/// Integers are kept as 32-byte big-endian words (two's complement for `Int`), so every
/// width up to 256 bits is representable without a bignum dependency.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// `address`
    Address(Address),
    /// `bool`
    Bool(bool),
    /// `uint<bits>`
    Uint(Word),
    /// `int<bits>`
    Int(Word),
    /// `bytes<n>`
    FixedBytes(Vec<u8>),
    /// `bytes`
    Bytes(Vec<u8>),
    /// `string`
    String(String),
    /// `T[]`
    Array(Vec<Token>),
    /// `T[n]`
    FixedArray(Vec<Token>),
    /// `(T1,T2,…)`
    Tuple(Vec<Token>),
}

impl Token {
    /// Unsigned integer token.
    pub fn uint(value: u128) -> Self {
        let mut word = [0u8; WORD_LEN];
        word[WORD_LEN - 16..].copy_from_slice(&value.to_be_bytes());
        Self::Uint(word)
    }

    /// Signed integer token (sign-extended to 256 bits).
    pub fn int(value: i128) -> Self {
        let mut word = if value < 0 { [0xff; WORD_LEN] } else { [0u8; WORD_LEN] };
        word[WORD_LEN - 16..].copy_from_slice(&value.to_be_bytes());
        Self::Int(word)
    }

    /// Short name of the token kind, for diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Address(_) => "address",
            Self::Bool(_) => "bool",
            Self::Uint(_) => "uint",
            Self::Int(_) => "int",
            Self::FixedBytes(_) => "fixed bytes",
            Self::Bytes(_) => "bytes",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::FixedArray(_) => "fixed array",
            Self::Tuple(_) => "tuple",
        }
    }

    /// Whether the ABI encoding of this token goes through an offset word.
    pub fn is_abi_dynamic(&self) -> bool {
        match self {
            Self::Bytes(_) | Self::String(_) | Self::Array(_) => true,
            Self::FixedArray(items) | Self::Tuple(items) => items.iter().any(Self::is_abi_dynamic),
            _ => false,
        }
    }

    /// Checks that this token is a valid value of `ty`, including integer width.
    pub fn type_check(&self, ty: &ParamType) -> AbiResult<()> {
        let mismatch = || AbiError::TypeMismatch {
            expected: ty.to_string(),
            found: self.kind_name().to_string(),
        };
        let out_of_range = || AbiError::OutOfRange(ty.to_string());

        match (self, ty) {
            (Self::Address(_), ParamType::Address)
            | (Self::Bool(_), ParamType::Bool)
            | (Self::Bytes(_), ParamType::Bytes)
            | (Self::String(_), ParamType::String) => Ok(()),
            // signed and unsigned tokens share one word layout: any in-range value fits
            (Self::Uint(word) | Self::Int(word), ParamType::Uint(bits)) => {
                let unused = unused_bytes(*bits, ty)?;
                let negative = matches!(self, Self::Int(_)) && word[0] & 0x80 != 0;
                if !negative && word[..unused].iter().all(|b| *b == 0) {
                    Ok(())
                } else {
                    Err(out_of_range())
                }
            }
            (Self::Uint(word), ParamType::Int(bits)) => {
                let unused = unused_bytes(*bits, ty)?;
                if word[..unused].iter().all(|b| *b == 0) && word[unused] & 0x80 == 0 {
                    Ok(())
                } else {
                    Err(out_of_range())
                }
            }
            (Self::Int(word), ParamType::Int(bits)) => {
                let unused = unused_bytes(*bits, ty)?;
                let fill = if word[unused] & 0x80 == 0 { 0x00 } else { 0xff };
                if word[..unused].iter().all(|b| *b == fill) { Ok(()) } else { Err(out_of_range()) }
            }
            (Self::FixedBytes(bytes), ParamType::FixedBytes(n)) => {
                if bytes.len() == *n { Ok(()) } else { Err(out_of_range()) }
            }
            (Self::Array(items), ParamType::Array(inner)) => {
                items.iter().try_for_each(|item| item.type_check(inner))
            }
            (Self::FixedArray(items), ParamType::FixedArray(inner, n)) => {
                if items.len() != *n {
                    return Err(mismatch());
                }
                items.iter().try_for_each(|item| item.type_check(inner))
            }
            (Self::Tuple(items), ParamType::Tuple(types)) => {
                if items.len() != types.len() {
                    return Err(mismatch());
                }
                items.iter().zip(types).try_for_each(|(item, t)| item.type_check(t))
            }
            _ => Err(mismatch()),
        }
    }
}

/// Number of leading bytes of a word that must be sign/zero fill for a `bits`-wide integer.
fn unused_bytes(bits: usize, ty: &ParamType) -> AbiResult<usize> {
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(AbiError::InvalidType(ty.to_string()));
    }
    Ok(WORD_LEN - bits / 8)
}

/* Conversions */

macro_rules! uint_from {
    ($($t:ty),*) => {$(
        impl From<$t> for Token {
            fn from(v: $t) -> Self { Token::uint(u128::from(v)) }
        }
    )*};
}

macro_rules! int_from {
    ($($t:ty),*) => {$(
        impl From<$t> for Token {
            fn from(v: $t) -> Self { Token::int(i128::from(v)) }
        }
    )*};
}

uint_from!(u8, u16, u32, u64, u128);
int_from!(i8, i16, i32, i64, i128);

impl From<bool> for Token {
    fn from(v: bool) -> Self { Self::Bool(v) }
}
impl From<Address> for Token {
    fn from(v: Address) -> Self { Self::Address(v) }
}
impl From<&str> for Token {
    fn from(v: &str) -> Self { Self::String(v.to_owned()) }
}
impl From<String> for Token {
    fn from(v: String) -> Self { Self::String(v) }
}
impl From<Vec<u8>> for Token {
    fn from(v: Vec<u8>) -> Self { Self::Bytes(v) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(s: &str) -> ParamType { s.parse().unwrap() }

    #[test]
    fn integer_words() {
        let Token::Uint(w) = Token::uint(1) else { panic!("uint") };
        assert_eq!(w[31], 1);
        assert!(w[..31].iter().all(|b| *b == 0));

        let Token::Int(w) = Token::int(-1) else { panic!("int") };
        assert!(w.iter().all(|b| *b == 0xff));
    }

    #[test]
    fn width_checks() {
        assert!(Token::from(255u8).type_check(&ty("uint8")).is_ok());
        assert_eq!(
            Token::from(256u16).type_check(&ty("uint8")),
            Err(AbiError::OutOfRange("uint8".into()))
        );
        assert!(Token::from(-128i16).type_check(&ty("int8")).is_ok());
        assert!(Token::from(127i16).type_check(&ty("int8")).is_ok());
        assert!(Token::from(128i16).type_check(&ty("int8")).is_err());
        assert!(Token::from(-129i16).type_check(&ty("int8")).is_err());
    }

    #[test]
    fn integers_cross_signedness_when_in_range() {
        assert!(Token::from(1i32).type_check(&ty("uint256")).is_ok());
        assert!(Token::from(255i32).type_check(&ty("uint8")).is_ok());
        assert!(Token::from(256i32).type_check(&ty("uint8")).is_err());
        assert_eq!(
            Token::from(-1i32).type_check(&ty("uint256")),
            Err(AbiError::OutOfRange("uint256".into()))
        );

        assert!(Token::from(127u8).type_check(&ty("int8")).is_ok());
        assert!(Token::from(128u8).type_check(&ty("int8")).is_err());
        assert!(Token::Uint([0xff; WORD_LEN]).type_check(&ty("int256")).is_err());
        assert!(Token::uint(u128::MAX).type_check(&ty("int256")).is_ok());
    }

    #[test]
    fn structural_checks() {
        assert!(Token::from("hi").type_check(&ty("string")).is_ok());
        assert!(matches!(
            Token::from("hi").type_check(&ty("uint256")),
            Err(AbiError::TypeMismatch { .. })
        ));
        let pair = Token::Tuple(vec![Token::uint(1), Token::from("x")]);
        assert!(pair.type_check(&ty("(uint256,string)")).is_ok());
        assert!(pair.type_check(&ty("(uint256,string,bool)")).is_err());
        let fixed = Token::FixedArray(vec![Token::uint(1), Token::uint(2)]);
        assert!(fixed.type_check(&ty("uint8[2]")).is_ok());
        assert!(fixed.type_check(&ty("uint8[3]")).is_err());
        assert!(Token::FixedBytes(vec![0; 4]).type_check(&ty("bytes4")).is_ok());
        assert!(Token::FixedBytes(vec![0; 3]).type_check(&ty("bytes4")).is_err());
    }
}
