//! Fixtures partagées par les tests d'intégration.

use chainplan_abi::Address;
use chainplan_contract::{Contract, ContractResult, Interface};

/// Adresse de test `0xeeee…eeee`.
pub const TEST_ADDRESS: Address = Address::repeat_byte(0xee);

/// ABI `Math` (artefact avec champ `abi`).
pub const MATH_JSON: &str = include_str!("../fixtures/Math.json");

/// ABI `Strings` (tableau JSON brut).
pub const STRINGS_JSON: &str = include_str!("../fixtures/Strings.json");

/// `Math` lié à [`TEST_ADDRESS`].
pub fn math() -> ContractResult<Contract> {
    Ok(Contract::new(TEST_ADDRESS, Interface::from_json(MATH_JSON)?))
}

/// `Strings` lié à [`TEST_ADDRESS`].
pub fn strings() -> ContractResult<Contract> {
    Ok(Contract::new(TEST_ADDRESS, Interface::from_json(STRINGS_JSON)?))
}

/// Contrat exposant `useState(bytes[]) returns (bytes[])`.
pub fn state_user() -> ContractResult<Contract> {
    let iface =
        Interface::from_human_readable(["function useState(bytes[] state) returns (bytes[])"])?;
    Ok(Contract::new(TEST_ADDRESS, iface))
}

/// Instruction attendue en hex : sélecteur + opérandes + retour, puis l'adresse de test.
pub fn instruction(head: &str) -> String { format!("0x{head}{}", "ee".repeat(20)) }

/// Mot ABI d'un petit entier, en hex.
pub fn word(n: u8) -> String { format!("0x{n:064x}") }
