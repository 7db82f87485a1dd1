use core::{fmt, str::FromStr};

use crate::{AbiError, AbiResult};

/// ABI parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// `address`
    Address,
    /// `bool`
    Bool,
    /// `uint<bits>`
    Uint(usize),
    /// `int<bits>`
    Int(usize),
    /// `bytes<n>` (1..=32)
    FixedBytes(usize),
    /// `bytes`
    Bytes,
    /// `string`
    String,
    /// `T[]`
    Array(Box<ParamType>),
    /// `T[n]`
    FixedArray(Box<ParamType>, usize),
    /// `(T1,T2,…)`
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// `bytes[]`, the type of the whole memory table.
    pub fn bytes_array() -> Self { Self::Array(Box::new(Self::Bytes)) }

    /// Whether a value of this type is stored as a flagged blob rather than one inline word.
    ///
    /// This is the planner's classification: every string, bytes, array or tuple type counts,
    /// whatever its ABI head layout.
    pub const fn is_dynamic(&self) -> bool {
        matches!(
            self,
            Self::Bytes | Self::String | Self::Array(_) | Self::FixedArray(..) | Self::Tuple(_)
        )
    }

    /// Whether the ABI encoding of this type goes through an offset word.
    pub fn is_abi_dynamic(&self) -> bool {
        match self {
            Self::Bytes | Self::String | Self::Array(_) => true,
            Self::FixedArray(inner, _) => inner.is_abi_dynamic(),
            Self::Tuple(items) => items.iter().any(Self::is_abi_dynamic),
            _ => false,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => f.write_str("address"),
            Self::Bool => f.write_str("bool"),
            Self::Uint(bits) => write!(f, "uint{bits}"),
            Self::Int(bits) => write!(f, "int{bits}"),
            Self::FixedBytes(n) => write!(f, "bytes{n}"),
            Self::Bytes => f.write_str("bytes"),
            Self::String => f.write_str("string"),
            Self::Array(inner) => write!(f, "{inner}[]"),
            Self::FixedArray(inner, n) => write!(f, "{inner}[{n}]"),
            Self::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl FromStr for ParamType {
    type Err = AbiError;

    fn from_str(s: &str) -> AbiResult<Self> { parse_type(s.trim()) }
}

fn parse_type(s: &str) -> AbiResult<ParamType> {
    let invalid = || AbiError::InvalidType(s.to_string());
    let s = s.strip_prefix("tuple").filter(|r| r.starts_with('(')).unwrap_or(s);

    if let Some(head) = s.strip_suffix(']') {
        let open = head.rfind('[').ok_or_else(invalid)?;
        let inner = parse_type(&head[..open])?;
        let size = &head[open + 1..];
        if size.is_empty() {
            return Ok(ParamType::Array(Box::new(inner)));
        }
        let n = size.parse::<usize>().map_err(|_| invalid())?;
        return Ok(ParamType::FixedArray(Box::new(inner), n));
    }

    if let Some(body) = s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        let items = split_top_level(body)
            .into_iter()
            .map(|item| parse_type(item.trim()))
            .collect::<AbiResult<Vec<_>>>()?;
        return Ok(ParamType::Tuple(items));
    }

    match s {
        "address" => return Ok(ParamType::Address),
        "bool" => return Ok(ParamType::Bool),
        "string" => return Ok(ParamType::String),
        "bytes" => return Ok(ParamType::Bytes),
        "byte" => return Ok(ParamType::FixedBytes(1)),
        "uint" => return Ok(ParamType::Uint(256)),
        "int" => return Ok(ParamType::Int(256)),
        _ => {}
    }

    if let Some(bits) = s.strip_prefix("uint") {
        return int_width(bits).map(ParamType::Uint).ok_or_else(invalid);
    }
    if let Some(bits) = s.strip_prefix("int") {
        return int_width(bits).map(ParamType::Int).ok_or_else(invalid);
    }
    if let Some(n) = s.strip_prefix("bytes") {
        return match n.parse::<usize>() {
            Ok(n) if (1..=32).contains(&n) => Ok(ParamType::FixedBytes(n)),
            _ => Err(invalid()),
        };
    }

    Err(invalid())
}

fn int_width(bits: &str) -> Option<usize> {
    let bits = bits.parse::<usize>().ok()?;
    (bits % 8 == 0 && (8..=256).contains(&bits)).then_some(bits)
}

/// Splits `a,(b,c),d[]` on the commas that sit outside any parentheses.
pub(crate) fn split_top_level(s: &str) -> Vec<&str> {
    if s.trim().is_empty() {
        return Vec::new();
    }
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

#[cfg(feature = "serde")]
impl serde::Serialize for ParamType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ParamType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ty(s: &str) -> ParamType { s.parse().unwrap() }

    #[test]
    fn canonical_names() {
        for s in ["address", "bool", "uint256", "int8", "bytes32", "bytes", "string", "uint256[]",
            "bytes[3]", "(uint256,string)", "(uint256,(bool,bytes))[]", "uint8[2][]"]
        {
            assert_eq!(ty(s).to_string(), s);
        }
    }

    #[test]
    fn tuple_keyword_at_any_depth() {
        assert_eq!(ty("tuple(uint256,tuple(bool,string))").to_string(), "(uint256,(bool,string))");
        assert_eq!(ty("tuple(address)[]").to_string(), "(address)[]");
    }

    #[test]
    fn aliases_are_expanded() {
        assert_eq!(ty("uint"), ParamType::Uint(256));
        assert_eq!(ty("int"), ParamType::Int(256));
        assert_eq!(ty("byte"), ParamType::FixedBytes(1));
        assert_eq!(ty("uint[]").to_string(), "uint256[]");
    }

    #[test]
    fn nested_arrays_bind_left_to_right() {
        assert_eq!(
            ty("uint8[2][]"),
            ParamType::Array(Box::new(ParamType::FixedArray(Box::new(ParamType::Uint(8)), 2)))
        );
    }

    #[test]
    fn bad_types() {
        for s in ["uint7", "uint264", "bytes0", "bytes33", "foo", "uint256[x]", "tuple"] {
            assert!(s.parse::<ParamType>().is_err(), "{s} should not parse");
        }
    }

    #[test]
    fn dynamic_classification() {
        assert!(!ty("uint256").is_dynamic());
        assert!(!ty("bytes32").is_dynamic());
        assert!(!ty("address").is_dynamic());
        assert!(ty("string").is_dynamic());
        assert!(ty("bytes").is_dynamic());
        assert!(ty("uint256[2]").is_dynamic());
        assert!(ty("(uint256,bool)").is_dynamic());

        assert!(!ty("uint256[2]").is_abi_dynamic());
        assert!(!ty("(uint256,bool)").is_abi_dynamic());
        assert!(ty("(uint256,string)").is_abi_dynamic());
        assert!(ty("string[2]").is_abi_dynamic());
    }

    #[test]
    fn split_respects_parens() {
        assert_eq!(split_top_level("a,(b,c),d"), vec!["a", "(b,c)", "d"]);
        assert!(split_top_level("  ").is_empty());
    }
}
