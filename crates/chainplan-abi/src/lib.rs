//! chainplan-abi — primitives ABI partagées
//!
//! Fournit :
//! - `Address` (20 octets, rendu `0x…` en minuscules)
//! - `ParamType` + parsing des types canoniques (`uint256`, `bytes[]`, `(uint256,string)[2]`)
//! - `Token` : valeur concrète, vérifiée contre un `ParamType`
//! - `encode` / `encode_literal` : encodage head/tail, et forme « littéral » sans mot d'en-tête
//! - `Function` / `Param` : fragments, signatures canoniques, sélecteurs keccak-256,
//!   parser de signatures lisibles (`function add(uint a, uint b) returns (uint)`)
//! - Erreurs `AbiError` + alias `AbiResult<T>`
//!
//! Features :
//! - `serde` (par défaut) : (dé)sérialisation d'`Address` et de `ParamType` en chaînes

#![deny(missing_docs)]

/* ─────────────────────────── Modules publics ─────────────────────────── */

/// Adresse de contrat (20 octets).
pub mod address;
/// Encodage ABI head/tail.
pub mod encode;
/// Fragments de fonction, signatures et sélecteurs.
pub mod function;
/// Types de paramètres ABI.
pub mod param;
/// Valeurs concrètes typées.
pub mod token;

mod error;

pub use address::Address;
pub use encode::{encode, encode_literal};
pub use error::{AbiError, AbiResult};
pub use function::{keccak256, selector, Function, Param, Selector};
pub use param::ParamType;
pub use token::Token;

/* ─────────────────────────── Mots ABI ─────────────────────────── */

/// Taille d'un mot ABI en octets.
pub const WORD_LEN: usize = 32;

/// Un mot ABI (big-endian).
pub type Word = [u8; WORD_LEN];

/* ─────────────────────────── Hex ─────────────────────────── */

/// Rend des octets en hex minuscule préfixé par `0x` (`"0x"` pour un slice vide).
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    out.push_str(&hex::encode(bytes));
    out
}

/// Décode une chaîne hex, avec ou sans préfixe `0x`.
pub fn from_hex(text: &str) -> AbiResult<Vec<u8>> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    hex::decode(digits).map_err(|e| AbiError::InvalidHex(format!("`{text}`: {e}")))
}

/* ─────────────────────────── Prélude ─────────────────────────── */

/// Prélude pratique pour importer les types/funcs clés du crate.
pub mod prelude {
    /// Réexports utiles pour une importation rapide.
    pub use super::{
        encode, encode_literal, from_hex, selector, to_hex, AbiError, AbiResult, Address,
        Function, Param, ParamType, Selector, Token, Word, WORD_LEN,
    };
}

/* ─────────────────────────── Tests ─────────────────────────── */
