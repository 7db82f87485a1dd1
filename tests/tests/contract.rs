//! Liaison d'interfaces depuis les fixtures et construction d'appels.

use chainplan_abi::{Function, ParamType};
use chainplan_contract::{Arg, Contract, ContractError, Interface};
use chainplan_planner::{Planner, Value};
use chainplan_tests::{math, strings, MATH_JSON, STRINGS_JSON, TEST_ADDRESS};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn artifact_and_bare_array_both_load() {
    let math = Interface::from_json(MATH_JSON).unwrap();
    assert_eq!(math.len(), 3);
    assert_eq!(math.bare_names().collect::<Vec<_>>(), vec!["add", "sub", "mul"]);

    // L'évènement `Concatenated` est ignoré.
    let strings = Interface::from_json(STRINGS_JSON).unwrap();
    let sigs: Vec<String> = strings.functions().map(|f| f.signature()).collect();
    assert_eq!(sigs, vec!["strlen(string)", "strcat(string,string)"]);
}

#[test]
fn functions_resolve_by_name_or_signature() {
    let math = math().unwrap();
    let by_name = math.function("add").unwrap();
    let by_sig = math.function("add(uint,uint256)").unwrap();
    assert_eq!(by_name.signature(), by_sig.signature());
    assert_eq!(math.address(), TEST_ADDRESS);

    let err = math.function("div").unwrap_err();
    assert!(matches!(err, ContractError::UnknownFunction(_)), "{err}");
}

#[test]
fn overloaded_names_need_a_signature() {
    let iface = Interface::from_human_readable([
        "function add(uint256 a, uint256 b) returns (uint256)",
        "function add(int256 a, int256 b) returns (int256)",
    ])
    .unwrap();
    let contract = Contract::new(TEST_ADDRESS, iface);

    match contract.function("add").unwrap_err() {
        ContractError::AmbiguousName { name, candidates } => {
            assert_eq!(name, "add");
            assert_eq!(candidates, vec!["add(uint256,uint256)", "add(int256,int256)"]);
        }
        other => panic!("unexpected {other:?}"),
    }

    let call = contract.call("add(int256,int256)", [-1i64, 1]).unwrap();
    assert_eq!(call.outputs()[0].kind, ParamType::Int(256));
}

#[test]
fn duplicate_signatures_are_rejected() {
    let err = Interface::from_human_readable([
        "function add(uint256 a, uint256 b) returns (uint256)",
        "function add(uint x, uint y)",
    ])
    .unwrap_err();
    assert_eq!(err.to_string(), ContractError::DuplicateSignature("add(uint256,uint256)".into()).to_string());
}

#[test]
fn arity_mismatch_fails_before_planning() {
    let math = math().unwrap();
    let err = math.call("add", [1u64]).unwrap_err();
    assert!(matches!(err, ContractError::Arity { expected: 2, got: 1, .. }), "{err}");

    let err = math.call("add", [1u64, 2, 3]).unwrap_err();
    assert!(matches!(err, ContractError::Arity { expected: 2, got: 3, .. }), "{err}");
}

#[test]
fn state_is_only_accepted_for_bytes_array_parameters() {
    let strings = strings().unwrap();
    let mut planner = Planner::new();
    let err = strings.call("strlen", [planner.state()]).unwrap_err();
    assert!(matches!(err, ContractError::TypeMismatch { index: 0, .. }), "{err}");
    assert!(planner.add(strings.call("strlen", ["ok"]).unwrap()).unwrap().is_some());
}

#[test]
fn calls_carry_address_and_fragment() {
    let strings = strings().unwrap();
    let call = strings.call("strcat", ["a", "b"]).unwrap();
    assert_eq!(call.address(), TEST_ADDRESS);
    assert_eq!(call.signature(), "strcat(string,string)");
    assert_eq!(call.selector(), Function::parse("strcat(string,string)").unwrap().selector());
    assert!(call.args().iter().all(Value::is_dynamic));
}

proptest! {
    #[test]
    fn any_u64_pair_builds_a_two_literal_call(a in any::<u64>(), b in any::<u64>()) {
        let math = math().unwrap();
        let call = math.call("add", [Arg::from(a), Arg::from(b)]).unwrap();
        prop_assert_eq!(call.args().len(), 2);
        for arg in call.args() {
            match arg {
                Value::Literal { bytes, .. } => { prop_assert_eq!(bytes.len(), 32); }
                other => { prop_assert!(false, "unexpected {:?}", other); }
            }
        }
    }
}
