//! Planification de bout en bout : contrats liés depuis les fixtures JSON.

use chainplan_abi::{encode, selector, to_hex, Token};
use chainplan_contract::Arg;
use chainplan_planner::{disassemble, PlanError, Planner, SlotRef, Value, MAX_SLOTS};
use chainplan_tests::{instruction, math, state_user, strings, word};
use pretty_assertions::assert_eq;

#[test]
fn single_call_with_two_literals() {
    let math = math().unwrap();
    let mut planner = Planner::new();
    planner.add(math.call("add", [1u64, 2]).unwrap()).unwrap();

    let program = planner.plan().unwrap();
    assert_eq!(program.commands_hex(), vec![instruction("771602f70001ffffffffffff")]);
    assert_eq!(program.state_hex(), vec![word(1), word(2)]);
}

#[test]
fn unsuffixed_literals_plan_like_unsigned_ones() {
    let math = math().unwrap();
    let mut planner = Planner::new();
    planner.add(math.call("add", [1, 2]).unwrap()).unwrap();

    let program = planner.plan().unwrap();
    assert_eq!(program.commands_hex(), vec![instruction("771602f70001ffffffffffff")]);
    assert_eq!(program.state_hex(), vec![word(1), word(2)]);
}

#[test]
fn return_value_feeds_next_call() {
    let math = math().unwrap();
    let mut planner = Planner::new();
    let s1 = planner.add(math.call("add", [1u64, 1]).unwrap()).unwrap().unwrap();
    planner.add(math.call("add", [Arg::from(1u64), Arg::from(s1)]).unwrap()).unwrap();

    let program = planner.plan().unwrap();
    assert_eq!(
        program.commands_hex(),
        vec![instruction("771602f70000ffffffffff01"), instruction("771602f70001ffffffffffff")]
    );
    assert_eq!(program.state_hex(), vec![word(1), "0x".to_string()]);
}

#[test]
fn expired_literal_slot_is_recycled_for_a_return() {
    let math = math().unwrap();
    let mut planner = Planner::new();
    let sum = planner.add(math.call("add", [1u64, 2]).unwrap()).unwrap().unwrap();
    planner.add(math.call("mul", [Arg::from(sum), Arg::from(3u64)]).unwrap()).unwrap();

    let program = planner.plan().unwrap();
    let mul = to_hex(&selector("mul(uint256,uint256)"));
    // `1` et `2` meurent à la commande 0, la somme reprend le slot 0.
    assert_eq!(
        program.commands_hex(),
        vec![
            instruction("771602f70001ffffffffff00"),
            instruction(&format!("{}0002ffffffffffff", &mul[2..])),
        ]
    );
    assert_eq!(program.state_hex(), vec![word(1), word(2), word(3)]);
}

#[test]
fn dynamic_literal_loses_its_head_word() {
    let strings = strings().unwrap();
    let mut planner = Planner::new();
    planner.add(strings.call("strlen", ["Hello, world!"]).unwrap()).unwrap();

    let program = planner.plan().unwrap();
    assert_eq!(program.commands_hex(), vec![instruction("367bbd7880ffffffffffffff")]);

    let full = encode(&[Token::from("Hello, world!")]);
    assert_eq!(program.state, vec![full[32..].to_vec()]);
    assert_eq!(program.state[0].len(), 64);
}

#[test]
fn dynamic_return_chains_into_dynamic_parameter() {
    let strings = strings().unwrap();
    let mut planner = Planner::new();
    let joined = planner.add(strings.call("strcat", ["Hello, ", "world!"]).unwrap()).unwrap().unwrap();
    planner.add(strings.call("strlen", [joined]).unwrap()).unwrap();

    let program = planner.plan().unwrap();
    let first = &program.instructions[0];
    assert_eq!(SlotRef::decode(first.operands()[0]), SlotRef::Slot { index: 0, dynamic: true });
    assert_eq!(SlotRef::decode(first.operands()[1]), SlotRef::Slot { index: 1, dynamic: true });
    assert_eq!(SlotRef::decode(first.return_slot()), SlotRef::Slot { index: 0, dynamic: true });
    assert_eq!(program.commands_hex()[1], instruction("367bbd7880ffffffffffffff"));
}

#[test]
fn state_replacement_uses_the_table_sentinel() {
    let user = state_user().unwrap();
    let mut planner = Planner::new();
    planner.replace_state(user.call("useState", [planner.state()]).unwrap()).unwrap();

    let program = planner.plan().unwrap();
    assert_eq!(program.commands_hex(), vec![instruction(&format!("08f389c8fe{}fe", "ff".repeat(6)))]);
    assert!(program.state.is_empty());
}

#[test]
fn only_bytes_array_outputs_may_replace_state() {
    let math = math().unwrap();
    let mut planner = Planner::new();
    let err = planner.replace_state(math.call("add", [1u64, 2]).unwrap()).unwrap_err();
    assert!(matches!(err, PlanError::InvalidStateReplacement { .. }), "{err}");
    assert!(planner.is_empty());
}

#[test]
fn equal_literals_share_one_slot() {
    let math = math().unwrap();
    let mut planner = Planner::new();
    planner.add(math.call("add", [7u64, 7]).unwrap()).unwrap();
    planner.add(math.call("sub", [7u64, 8]).unwrap()).unwrap();

    let program = planner.plan().unwrap();
    assert_eq!(program.state_hex(), vec![word(7), word(8)]);
    assert_eq!(&program.instructions[0].operands()[..2], &[0x00u8, 0x00]);
    assert_eq!(&program.instructions[1].operands()[..2], &[0x00u8, 0x01]);
}

#[test]
fn pre_encoded_literals_pass_through() {
    let math = math().unwrap();
    let mut planner = Planner::new();
    let five = Value::literal("uint256".parse().unwrap(), encode(&[Token::uint(5)]));
    planner.add(math.call("add", [Arg::from(five), Arg::from(5u64)]).unwrap()).unwrap();

    let program = planner.plan().unwrap();
    assert_eq!(program.state_hex(), vec![word(5)]);
}

#[test]
fn returns_from_another_planner_are_rejected() {
    let math = math().unwrap();
    let mut first = Planner::new();
    let sum = first.add(math.call("add", [1u64, 2]).unwrap()).unwrap().unwrap();

    let mut second = Planner::new();
    let err = second.add(math.call("add", [Arg::from(sum), Arg::from(1u64)]).unwrap()).unwrap_err();
    assert_eq!(err, PlanError::ForeignReturn);
    assert!(second.is_empty());
}

#[test]
fn planning_twice_is_stable() {
    let strings = strings().unwrap();
    let math = math().unwrap();
    let mut planner = Planner::new();
    let len = planner.add(strings.call("strlen", ["abc"]).unwrap()).unwrap().unwrap();
    let twice = planner.add(math.call("add", [len.clone(), len]).unwrap()).unwrap().unwrap();
    planner.add(math.call("mul", [Arg::from(twice), Arg::from(10u64)]).unwrap()).unwrap();

    let a = planner.plan().unwrap();
    let b = planner.plan().unwrap();
    assert_eq!(a, b);
    assert!(a.validate().is_ok());
    assert_eq!(disassemble(&a), disassemble(&b));
}

#[test]
fn long_chains_stay_within_the_slot_space() {
    let math = math().unwrap();
    let mut planner = Planner::new();
    let mut acc = planner.add(math.call("add", [0u64, 1]).unwrap()).unwrap().unwrap();
    for i in 0..200u64 {
        let call = math.call("add", [Arg::from(acc), Arg::from(i % 50)]).unwrap();
        acc = planner.add(call).unwrap().unwrap();
    }

    let program = planner.plan().unwrap();
    assert_eq!(program.instructions.len(), 201);
    assert!(program.state.len() <= MAX_SLOTS);
    assert!(program.validate().is_ok());
}
