//! chainplan-planner — compilation de séquences d'appels en programme à slots
//!
//! Entrée : une suite d'appels externes (`FunctionCall`) dont les arguments sont des
//! littéraux déjà encodés, des références au résultat d'un appel précédent, ou la table
//! d'état entière.
//!
//! Sortie : un `Program`
//! - `instructions` : un enregistrement de 32 octets par commande
//!   `[sélecteur:4][opérandes:7][retour:1][adresse:20]`
//! - `state` : contenu initial des slots (littéraux dédupliqués, puis blobs vides pour les
//!   résultats calculés)
//!
//! Pipeline de `Planner::plan` :
//! 1) passe de durée de vie (dernière lecture de chaque littéral / résultat)
//! 2) allocation des slots avec réutilisation + marquage dynamique (`0x80`)
//! 3) encodage des instructions
//!
//! ```
//! use std::sync::Arc;
//! use chainplan_abi::{encode_literal, Address, Function, ParamType, Token};
//! use chainplan_planner::{FunctionCall, Planner, Value};
//!
//! let add = Arc::new(Function::parse("add(uint256,uint256) returns (uint256)")?);
//! let one = Value::literal(ParamType::Uint(256), encode_literal(&ParamType::Uint(256), &Token::uint(1))?);
//! let two = Value::literal(ParamType::Uint(256), encode_literal(&ParamType::Uint(256), &Token::uint(2))?);
//!
//! let mut planner = Planner::new();
//! planner.add(FunctionCall::new(Address::repeat_byte(0xee), add, vec![one, two]))?;
//! let program = planner.plan()?;
//! assert!(program.commands_hex()[0].starts_with("0x771602f70001ffffffffffff"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/* ─────────────────────────── Modules ─────────────────────────── */

/// Appels et commandes.
pub mod call;
/// Désassemblage textuel.
pub mod disasm;
/// Instructions, programme, géométrie.
pub mod program;
/// Le planificateur.
pub mod planner;
/// Modèle de valeurs.
pub mod value;

mod emit;
mod error;
mod liveness;

pub use call::{Command, FunctionCall};
pub use disasm::disassemble;
pub use error::{PlanError, PlanResult};
pub use planner::Planner;
pub use program::{
    Instruction, Program, SlotRef, DYNAMIC_FLAG, INSTRUCTION_LEN, MAX_OPERANDS, MAX_SLOTS,
    SLOT_ABSENT, SLOT_STATE,
};
pub use value::{CommandId, PlannerId, ReturnValue, Value};

/* ─────────────────────────── Prélude ─────────────────────────── */

/// Prélude pratique pour importer les types clés du crate.
pub mod prelude {
    /// Réexports utiles pour une importation rapide.
    pub use super::{
        disassemble, Command, CommandId, FunctionCall, Instruction, PlanError, PlanResult,
        Planner, Program, ReturnValue, Value,
    };
}
