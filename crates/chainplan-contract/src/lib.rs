//! chainplan-contract — liaison adresse + interface → appels pour le planificateur
//!
//! - `Interface` : fonctions d'un contrat, depuis un ABI JSON, un artefact (`{"abi": [...]}`)
//!   ou des signatures lisibles. Deux signatures identiques = erreur à la construction.
//! - `Contract` : interface liée à une adresse. Chaque fonction est accessible par sa
//!   signature complète, et par son nom nu si elle n'est pas surchargée.
//! - `BoundFunction::call` : vérifie l'arité, encode les arguments concrets (forme « slot »,
//!   sans mot d'en-tête pour les types dynamiques), laisse passer les arguments symboliques
//!   dont le type est exactement celui du paramètre.
//!
//! ```
//! use chainplan_abi::Address;
//! use chainplan_contract::{Arg, Contract, Interface};
//! use chainplan_planner::Planner;
//!
//! let math = Contract::new(
//!     Address::repeat_byte(0xee),
//!     Interface::from_human_readable(["function add(uint256 a, uint256 b) returns (uint256)"])?,
//! );
//! let mut planner = Planner::new();
//! let sum = planner.add(math.call("add", [1u64, 2])?)?.expect("single output");
//! planner.add(math.call("add", [Arg::from(sum), Arg::from(3u64)])?)?;
//! assert_eq!(planner.plan()?.state.len(), 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// Contrats liés et constructeurs d'appels.
pub mod contract;
/// Descriptions d'interface.
pub mod interface;

mod error;

pub use contract::{Arg, BoundFunction, Contract};
pub use error::{ContractError, ContractResult};
pub use interface::Interface;
