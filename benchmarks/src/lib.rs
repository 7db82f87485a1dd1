//! Générateurs de programmes partagés par les benchmarks.
//!
//! Un générateur qui échoue panique : mieux vaut un bench cassé qu'un bench qui mesure un
//! planificateur vide.

use chainplan_abi::Address;
use chainplan_contract::{Arg, Contract, Interface};
use chainplan_planner::{Planner, ReturnValue};

/// Contrat `math` de démonstration (`add`, `strlen`, `strcat`).
pub fn demo_contract() -> Contract {
    let iface = Interface::from_human_readable([
        "function add(uint256 a, uint256 b) returns (uint256)",
        "function strlen(string s) returns (uint256)",
        "function strcat(string a, string b) returns (string)",
    ])
    .expect("demo interface");
    Contract::new(Address::repeat_byte(0xee), iface)
}

/// Chaîne `acc = add(acc, i)` de `len` commandes : un littéral distinct par commande,
/// chaque résultat lu une seule fois par la suivante.
pub fn add_chain(contract: &Contract, len: usize) -> Planner {
    let mut planner = Planner::new();
    let mut acc: Option<ReturnValue> = None;
    for i in 0..len {
        // littéraux recyclés pour rester sous la limite de slots
        let lit = Arg::from((i % 64) as u64);
        let lhs = acc.take().map_or_else(|| Arg::from(0u64), Arg::from);
        let call = contract.call("add", [lhs, lit]).expect("add call");
        acc = planner.add(call).expect("add command");
    }
    planner
}

/// Éventail : `width` résultats indépendants, tous relus à la fin deux à deux.
pub fn fan_in(contract: &Contract, width: usize) -> Planner {
    let mut planner = Planner::new();
    let mut roots = Vec::with_capacity(width);
    for i in 0..width {
        let call = contract.call("strlen", [format!("item-{}", i % 32)]).expect("strlen call");
        roots.push(planner.add(call).expect("strlen command").expect("strlen output"));
    }
    for pair in roots.chunks_exact(2) {
        let call = contract
            .call("add", [Arg::from(pair[0].clone()), Arg::from(pair[1].clone())])
            .expect("add call");
        planner.add(call).expect("add command");
    }
    planner
}
