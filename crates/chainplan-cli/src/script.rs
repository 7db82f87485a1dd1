//! Plan scripts: JSON description of contracts and the calls to plan.
//!
//! ```json
//! {
//!   "contracts": {
//!     "math": { "address": "0xeeee…", "abi": "abis/Math.json" },
//!     "test": { "address": "0xeeee…", "abi": ["function useState(bytes[] state) returns (bytes[])"] }
//!   },
//!   "commands": [
//!     { "id": "sum", "call": "math.add", "args": [1, 2] },
//!     { "call": "math.add", "args": [{ "ref": "sum" }, "3"] },
//!     { "call": "test.useState", "args": [{ "state": true }], "replace_state": true }
//!   ]
//! }
//! ```

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context, Result};
use chainplan_abi::{from_hex, Address, ParamType, Token, Word, WORD_LEN};
use chainplan_contract::{Arg, Contract, ContractError, Interface};
use chainplan_planner::{Planner, ReturnValue, Value};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as Json;

/* ───────────────────────────── Format ───────────────────────────── */

/// Whole script.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Contracts by local name.
    pub contracts: IndexMap<String, ContractSpec>,
    /// Calls, in plan order.
    pub commands: Vec<CommandSpec>,
}

/// One contract: address and interface.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractSpec {
    /// Target address.
    pub address: Address,
    /// Interface description.
    pub abi: AbiSource,
}

/// Where an interface comes from.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AbiSource {
    /// JSON ABI or artifact file, relative to the script.
    Path(PathBuf),
    /// Inline JSON ABI entries, or human-readable signatures.
    Inline(Vec<Json>),
}

/// One call.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSpec {
    /// Name later commands use in `{"ref": …}`.
    #[serde(default)]
    pub id: Option<String>,
    /// `contract.function`, the function part being a bare name or a full signature.
    pub call: String,
    /// Arguments: concrete JSON values, `{"ref": id}` or `{"state": true}`.
    #[serde(default)]
    pub args: Vec<Json>,
    /// The call's `bytes[]` output replaces the whole state.
    #[serde(default)]
    pub replace_state: bool,
}

impl Script {
    /// Parses script text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid plan script")
    }

    /// Binds contracts and adds every command to a fresh planner.
    ///
    /// Relative ABI paths resolve against `base_dir`.
    pub fn build(&self, base_dir: &Path) -> Result<Planner> {
        let contracts = self
            .contracts
            .iter()
            .map(|(name, spec)| {
                let iface = load_interface(&spec.abi, base_dir)
                    .with_context(|| format!("contract `{name}`"))?;
                Ok((name.as_str(), Contract::new(spec.address, iface)))
            })
            .collect::<Result<HashMap<_, _>>>()?;

        let mut planner = Planner::new();
        let mut handles: HashMap<&str, ReturnValue> = HashMap::new();

        for (index, spec) in self.commands.iter().enumerate() {
            add_command(&mut planner, &contracts, &mut handles, spec)
                .with_context(|| format!("command {index} (`{}`)", spec.call))?;
        }
        Ok(planner)
    }
}

fn add_command<'s>(
    planner: &mut Planner,
    contracts: &HashMap<&str, Contract>,
    handles: &mut HashMap<&'s str, ReturnValue>,
    spec: &'s CommandSpec,
) -> Result<()> {
    let (contract, key) = spec
        .call
        .split_once('.')
        .ok_or_else(|| anyhow!("`call` must look like `contract.function`"))?;
    let contract = contracts.get(contract).ok_or_else(|| anyhow!("unknown contract `{contract}`"))?;
    let function = contract.function(key)?;

    let inputs = &function.fragment().inputs;
    if spec.args.len() != inputs.len() {
        return Err(ContractError::Arity {
            function: function.signature(),
            expected: inputs.len(),
            got: spec.args.len(),
        }
        .into());
    }

    let args = spec
        .args
        .iter()
        .zip(inputs)
        .enumerate()
        .map(|(i, (json, param))| {
            resolve_arg(json, &param.kind, handles).with_context(|| format!("argument {i}"))
        })
        .collect::<Result<Vec<_>>>()?;
    let call = function.call(args)?;

    if spec.replace_state {
        if spec.id.is_some() {
            bail!("a state-replacing command has no return value to name");
        }
        planner.replace_state(call)?;
        return Ok(());
    }

    let handle = planner.add(call)?;
    if let Some(id) = spec.id.as_deref() {
        let handle = handle.ok_or_else(|| anyhow!("`{id}` names a call without a single output"))?;
        if handles.insert(id, handle).is_some() {
            bail!("duplicate id `{id}`");
        }
    }
    Ok(())
}

fn load_interface(source: &AbiSource, base_dir: &Path) -> Result<Interface> {
    match source {
        AbiSource::Path(path) => {
            let path = base_dir.join(path);
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(Interface::from_json(&text).with_context(|| format!("parsing {}", path.display()))?)
        }
        AbiSource::Inline(items) if items.iter().all(Json::is_string) => {
            Ok(Interface::from_human_readable(items.iter().filter_map(Json::as_str))?)
        }
        AbiSource::Inline(items) => Ok(Interface::from_json_value(Json::Array(items.clone()))?),
    }
}

/* ───────────────────────────── Arguments ───────────────────────────── */

fn resolve_arg(json: &Json, ty: &ParamType, handles: &HashMap<&str, ReturnValue>) -> Result<Arg> {
    if let Json::Object(obj) = json {
        if let Some(id) = obj.get("ref") {
            let id = id.as_str().ok_or_else(|| anyhow!("`ref` must be a string"))?;
            let handle = handles.get(id).ok_or_else(|| anyhow!("unknown ref `{id}`"))?;
            return Ok(Arg::from(handle.clone()));
        }
        if obj.get("state").and_then(Json::as_bool) == Some(true) {
            return Ok(Arg::from(Value::State));
        }
    }
    coerce(json, ty).map(Arg::from)
}

/// Converts a concrete JSON value to a token of type `ty`.
///
/// Integers accept JSON numbers and decimal or `0x` strings (negative decimal for `int`);
/// addresses and byte strings take `0x` hex; arrays and tuples take JSON arrays.
pub fn coerce(json: &Json, ty: &ParamType) -> Result<Token> {
    let mismatch = || anyhow!("cannot use {json} as {ty}");

    Ok(match ty {
        ParamType::Address => {
            let text = json.as_str().ok_or_else(mismatch)?;
            Token::Address(text.parse()?)
        }
        ParamType::Bool => Token::Bool(json.as_bool().ok_or_else(mismatch)?),
        ParamType::Uint(_) => match json {
            Json::Number(n) => Token::uint(u128::from(n.as_u64().ok_or_else(mismatch)?)),
            Json::String(s) => Token::Uint(parse_uint(s).ok_or_else(mismatch)?),
            _ => return Err(mismatch()),
        },
        ParamType::Int(_) => match json {
            Json::Number(n) => Token::int(i128::from(n.as_i64().ok_or_else(mismatch)?)),
            Json::String(s) => Token::Int(parse_int(s).ok_or_else(mismatch)?),
            _ => return Err(mismatch()),
        },
        ParamType::FixedBytes(_) => Token::FixedBytes(from_hex(json.as_str().ok_or_else(mismatch)?)?),
        ParamType::Bytes => Token::Bytes(from_hex(json.as_str().ok_or_else(mismatch)?)?),
        ParamType::String => Token::String(json.as_str().ok_or_else(mismatch)?.to_string()),
        ParamType::Array(inner) => {
            let items = json.as_array().ok_or_else(mismatch)?;
            Token::Array(items.iter().map(|j| coerce(j, inner)).collect::<Result<_>>()?)
        }
        ParamType::FixedArray(inner, n) => {
            let items = json.as_array().filter(|a| a.len() == *n).ok_or_else(mismatch)?;
            Token::FixedArray(items.iter().map(|j| coerce(j, inner)).collect::<Result<_>>()?)
        }
        ParamType::Tuple(types) => {
            let items = json.as_array().filter(|a| a.len() == types.len()).ok_or_else(mismatch)?;
            Token::Tuple(
                items.iter().zip(types).map(|(j, t)| coerce(j, t)).collect::<Result<_>>()?,
            )
        }
    })
}

/// Unsigned 256-bit value from decimal or `0x` hex text.
fn parse_uint(text: &str) -> Option<Word> {
    let text = text.trim();
    let mut word = [0u8; WORD_LEN];

    if let Some(digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        let padded = if digits.len() % 2 == 1 { format!("0{digits}") } else { digits.to_string() };
        let bytes = from_hex(&padded).ok()?;
        if bytes.is_empty() || bytes.len() > WORD_LEN {
            return None;
        }
        word[WORD_LEN - bytes.len()..].copy_from_slice(&bytes);
        return Some(word);
    }

    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    for digit in text.bytes() {
        // word = word * 10 + digit
        let mut carry = u16::from(digit - b'0');
        for byte in word.iter_mut().rev() {
            let v = u16::from(*byte) * 10 + carry;
            *byte = v.to_be_bytes()[1];
            carry = v >> 8;
        }
        if carry != 0 {
            return None;
        }
    }
    Some(word)
}

/// Signed 256-bit value (two's complement).
fn parse_int(text: &str) -> Option<Word> {
    let text = text.trim();
    let (negative, magnitude) = match text.strip_prefix('-') {
        Some(rest) => (true, parse_uint(rest)?),
        None => (false, parse_uint(text)?),
    };
    if !negative {
        return (magnitude[0] & 0x80 == 0).then_some(magnitude);
    }
    if magnitude.iter().all(|b| *b == 0) {
        return Some(magnitude);
    }
    let negated = negate(magnitude);
    (negated[0] & 0x80 != 0).then_some(negated)
}

fn negate(mut word: Word) -> Word {
    for byte in &mut word {
        *byte = !*byte;
    }
    for byte in word.iter_mut().rev() {
        let (v, overflow) = byte.overflowing_add(1);
        *byte = v;
        if !overflow {
            break;
        }
    }
    word
}
