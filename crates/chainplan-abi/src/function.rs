use core::fmt;

use sha3::{Digest, Keccak256};

use crate::{param::split_top_level, AbiError, AbiResult, ParamType};

/// 4-byte function selector.
pub type Selector = [u8; 4];

/// Keccak-256 digest.
pub fn keccak256(data: impl AsRef<[u8]>) -> [u8; 32] {
    let digest = Keccak256::digest(data.as_ref());
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Selector of a canonical signature such as `add(uint256,uint256)`.
pub fn selector(signature: &str) -> Selector {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Named input or output of a function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    /// Declared name, possibly empty.
    pub name: String,
    /// ABI type.
    pub kind: ParamType,
}

impl Param {
    /// Unnamed parameter.
    pub fn unnamed(kind: ParamType) -> Self { Self { name: String::new(), kind } }
}

/// Function fragment of a contract interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Function {
    /// Function name.
    pub name: String,
    /// Inputs in declaration order.
    pub inputs: Vec<Param>,
    /// Outputs in declaration order.
    pub outputs: Vec<Param>,
}

impl Function {
    /// Canonical signature: `name(type1,type2,…)`.
    pub fn signature(&self) -> String {
        let inputs: Vec<String> = self.inputs.iter().map(|p| p.kind.to_string()).collect();
        format!("{}({})", self.name, inputs.join(","))
    }

    /// First four bytes of the keccak-256 hash of the signature.
    pub fn selector(&self) -> Selector { selector(&self.signature()) }

    /// Parses a human-readable fragment.
    ///
    /// Accepted forms include `add(uint256,uint256)`,
    /// `function strcat(string a, string b) external pure returns (string)` and tuple
    /// parameters such as `f((uint256,bool)[] memory items)`.
    pub fn parse(text: &str) -> AbiResult<Self> {
        let invalid = || AbiError::InvalidSignature(text.to_string());

        let body = text.trim();
        let body = body.strip_prefix("function ").map(str::trim_start).unwrap_or(body);

        let open = body.find('(').ok_or_else(invalid)?;
        let name = body[..open].trim();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
            return Err(invalid());
        }
        let close = matching_paren(body, open).ok_or_else(invalid)?;
        let inputs = parse_params(&body[open + 1..close]).map_err(|_| invalid())?;

        let rest = body[close + 1..].trim();
        let outputs = match rest.find("returns") {
            Some(at) => {
                let after = rest[at + "returns".len()..].trim_start();
                if !after.starts_with('(') {
                    return Err(invalid());
                }
                let end = matching_paren(after, 0).ok_or_else(invalid)?;
                parse_params(&after[1..end]).map_err(|_| invalid())?
            }
            None => Vec::new(),
        };

        Ok(Self { name: name.to_string(), inputs, outputs })
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.signature()) }
}

/// Byte index of the `)` closing the `(` at `open`.
fn matching_paren(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

const MODIFIERS: &[&str] = &["memory", "calldata", "storage", "indexed", "payable"];

fn parse_params(list: &str) -> AbiResult<Vec<Param>> {
    split_top_level(list).into_iter().map(|p| parse_param(p.trim())).collect()
}

fn parse_param(text: &str) -> AbiResult<Param> {
    // the type ends at the first whitespace outside parentheses
    let mut depth = 0usize;
    let mut end = text.len();
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                end = i;
                break;
            }
            _ => {}
        }
    }

    let kind: ParamType = canonical_type(&text[..end])?.parse()?;
    let words: Vec<&str> =
        text[end..].split_whitespace().filter(|w| !MODIFIERS.contains(w)).collect();
    let name = match words.as_slice() {
        [] => String::new(),
        [name] => (*name).to_string(),
        _ => return Err(AbiError::InvalidType(text.to_string())),
    };
    Ok(Param { name, kind })
}

/// Rewrites `tuple(uint256 a, (bool b, string) c)[]` as `(uint256,(bool,string))[]`.
fn canonical_type(text: &str) -> AbiResult<String> {
    let text = text.strip_prefix("tuple").filter(|r| r.starts_with('(')).unwrap_or(text);
    if !text.starts_with('(') {
        return Ok(text.to_string());
    }
    let close = matching_paren(text, 0).ok_or_else(|| AbiError::InvalidType(text.to_string()))?;
    let components: Vec<String> =
        parse_params(&text[1..close])?.iter().map(|p| p.kind.to_string()).collect();
    Ok(format!("({}){}", components.join(","), &text[close + 1..]))
}
