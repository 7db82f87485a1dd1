//! Interface descriptions: the set of functions a contract exposes.
//!
//! Three input forms are accepted:
//! - a JSON ABI array (`[{"type":"function","name":"add",...}]`)
//! - a compiler artifact object carrying that array under `"abi"`
//! - human-readable fragments (`"function add(uint256 a, uint256 b) returns (uint256)"`)
//!
//! Events, errors, constructors and fallback/receive entries are skipped.

use std::sync::Arc;

use chainplan_abi::{Function, Param, ParamType};
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::{ContractError, ContractResult};

/* ───────────────────────────── JSON ABI ───────────────────────────── */

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<RawParam>,
    #[serde(default)]
    outputs: Vec<RawParam>,
}

#[derive(Debug, Deserialize)]
struct RawParam {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    components: Vec<RawParam>,
}

fn function_kind() -> String { "function".into() }

impl RawParam {
    /// Canonical type text, expanding `tuple…` from its components.
    fn canonical_type(&self) -> String {
        match self.ty.strip_prefix("tuple") {
            Some(dims) => {
                let inner: Vec<String> = self.components.iter().map(Self::canonical_type).collect();
                format!("({}){dims}", inner.join(","))
            }
            None => self.ty.clone(),
        }
    }

    fn to_param(&self) -> ContractResult<Param> {
        let kind: ParamType = self.canonical_type().parse()?;
        Ok(Param { name: self.name.clone(), kind })
    }
}

impl RawEntry {
    fn to_function(&self) -> ContractResult<Function> {
        if self.name.is_empty() {
            return Err(ContractError::InvalidInterface("function entry without a name".into()));
        }
        Ok(Function {
            name: self.name.clone(),
            inputs: self.inputs.iter().map(RawParam::to_param).collect::<ContractResult<_>>()?,
            outputs: self.outputs.iter().map(RawParam::to_param).collect::<ContractResult<_>>()?,
        })
    }
}

/* ───────────────────────────── Interface ───────────────────────────── */

/// Functions of a contract, indexed by signature and by bare name.
#[derive(Debug, Clone, Default)]
pub struct Interface {
    by_signature: IndexMap<String, Arc<Function>>,
    by_name: IndexMap<String, Vec<String>>,
}

impl Interface {
    /// Builds an interface, rejecting two functions with the same signature.
    pub fn new(functions: impl IntoIterator<Item = Function>) -> ContractResult<Self> {
        let mut iface = Self::default();
        for function in functions {
            let signature = function.signature();
            if iface.by_signature.contains_key(&signature) {
                return Err(ContractError::DuplicateSignature(signature));
            }
            iface.by_name.entry(function.name.clone()).or_default().push(signature.clone());
            iface.by_signature.insert(signature, Arc::new(function));
        }
        debug!(functions = iface.by_signature.len(), "interface bound");
        Ok(iface)
    }

    /// Parses a JSON ABI array or an artifact object with an `abi` field.
    pub fn from_json(text: &str) -> ContractResult<Self> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json_value(json)
    }

    /// Same as [`Interface::from_json`], from an already parsed document.
    pub fn from_json_value(json: serde_json::Value) -> ContractResult<Self> {
        let entries = match json {
            serde_json::Value::Array(items) => serde_json::Value::Array(items),
            serde_json::Value::Object(mut obj) => obj.remove("abi").ok_or_else(|| {
                ContractError::InvalidInterface("object has no `abi` field".into())
            })?,
            _ => {
                return Err(ContractError::InvalidInterface(
                    "expected an ABI array or an artifact object".into(),
                ))
            }
        };
        let entries: Vec<RawEntry> = serde_json::from_value(entries)?;
        let functions = entries
            .iter()
            .filter(|e| e.kind == "function")
            .map(RawEntry::to_function)
            .collect::<ContractResult<Vec<_>>>()?;
        Self::new(functions)
    }

    /// Parses human-readable fragments, one per item.
    pub fn from_human_readable<I, S>(fragments: I) -> ContractResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        const SKIPPED: &[&str] = &["event ", "error ", "constructor", "fallback", "receive"];

        let mut functions = Vec::new();
        for fragment in fragments {
            let text = fragment.as_ref().trim();
            if text.is_empty() || SKIPPED.iter().any(|p| text.starts_with(p)) {
                continue;
            }
            functions.push(Function::parse(text)?);
        }
        Self::new(functions)
    }

    /// Looks a function up by full signature (`add(uint256,uint256)`) or by bare name.
    ///
    /// A bare name resolves only when it is not overloaded. Signatures are canonicalized
    /// first, so `add(uint,uint)` finds `add(uint256,uint256)`.
    pub fn function(&self, key: &str) -> ContractResult<&Arc<Function>> {
        let key = key.trim();
        if key.contains('(') {
            let signature = Function::parse(key)?.signature();
            return self
                .by_signature
                .get(&signature)
                .ok_or(ContractError::UnknownFunction(signature));
        }

        match self.by_name.get(key).map(Vec::as_slice) {
            Some([signature]) => self
                .by_signature
                .get(signature)
                .ok_or_else(|| ContractError::UnknownFunction(key.to_string())),
            Some(candidates) if !candidates.is_empty() => Err(ContractError::AmbiguousName {
                name: key.to_string(),
                candidates: candidates.to_vec(),
            }),
            _ => Err(ContractError::UnknownFunction(key.to_string())),
        }
    }

    /// Functions in declaration order.
    pub fn functions(&self) -> impl Iterator<Item = &Arc<Function>> { self.by_signature.values() }

    /// Names that resolve without a signature.
    pub fn bare_names(&self) -> impl Iterator<Item = &str> {
        self.by_name.iter().filter(|(_, sigs)| sigs.len() == 1).map(|(name, _)| name.as_str())
    }

    /// Number of functions.
    pub fn len(&self) -> usize { self.by_signature.len() }

    /// Whether the interface has no function.
    pub fn is_empty(&self) -> bool { self.by_signature.is_empty() }
}
