//! Textual disassembly used by the CLI.

use core::fmt::Write;

use chainplan_abi::to_hex;

use crate::{program::SlotRef, Program};

/// Longest slot preview, in hex digits, before truncation.
const PREVIEW_DIGITS: usize = 64;

/// One line per instruction, then the initial state table.
///
/// ```text
/// 0000 | 771602f7 @ 0xeeee…eeee | s0, s1 -> s2
/// ```
pub fn disassemble(program: &Program) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        ";; instructions={} slots={}",
        program.instructions.len(),
        program.state.len()
    );

    for (pc, ins) in program.instructions.iter().enumerate() {
        let operands: Vec<String> = ins
            .operands()
            .iter()
            .map(|b| SlotRef::decode(*b))
            .take_while(|r| *r != SlotRef::Absent)
            .map(|r| r.to_string())
            .collect();
        let _ = writeln!(
            out,
            "{pc:04} | {} @ {} | {} -> {}",
            hex_selector(ins.selector()),
            ins.address(),
            operands.join(", "),
            SlotRef::decode(ins.return_slot()),
        );
    }

    if !program.state.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, ";; state");
        for (idx, slot) in program.state.iter().enumerate() {
            let _ = writeln!(out, "s{idx:<3} = {}", preview(slot));
        }
    }
    out
}

fn hex_selector(selector: [u8; 4]) -> String {
    selector.iter().fold(String::with_capacity(8), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

fn preview(slot: &[u8]) -> String {
    if slot.is_empty() {
        return "(empty)".into();
    }
    let text = to_hex(slot);
    if text.len() - 2 <= PREVIEW_DIGITS {
        text
    } else {
        format!("{}… ({} bytes)", &text[..2 + PREVIEW_DIGITS], slot.len())
    }
}

#[cfg(test)]
mod tests {
    use chainplan_abi::Address;

    use super::*;
    use crate::{program::MAX_OPERANDS, Instruction};

    #[test]
    fn renders_operands_and_return() {
        let mut ops = [0xff; MAX_OPERANDS];
        ops[0] = 0x00;
        ops[1] = 0x81;
        ops[2] = 0xfe;
        let program = Program {
            instructions: vec![
                Instruction::new([0xd8, 0x24, 0xcc, 0xf3], ops, 0x82, Address::repeat_byte(0xee)),
                Instruction::new([0; 4], [0xff; MAX_OPERANDS], 0xff, Address::ZERO),
            ],
            state: vec![vec![1], vec![], vec![0xab; 40]],
        };
        let text = disassemble(&program);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ";; instructions=2 slots=3");
        assert_eq!(
            lines[1],
            format!("0000 | d824ccf3 @ 0x{} | s0, s1*, state -> s2*", "ee".repeat(20))
        );
        assert!(lines[2].ends_with("|  -> _"));
        assert_eq!(lines[5], "s0   = 0x01");
        assert_eq!(lines[6], "s1   = (empty)");
        assert!(lines[7].ends_with("… (40 bytes)"));
    }
}
