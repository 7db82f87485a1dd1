//! Compiled program: fixed-width instructions plus the initial state table.

use core::fmt;

use chainplan_abi::{to_hex, Address, Selector};

use crate::{PlanError, PlanResult};

/* ───────────────────────────── Géométrie ───────────────────────────── */

/// Width of one instruction in bytes.
pub const INSTRUCTION_LEN: usize = 32;
/// Operand bytes per instruction.
pub const MAX_OPERANDS: usize = 7;
/// Operand/return byte: no argument, or result discarded.
pub const SLOT_ABSENT: u8 = 0xff;
/// Operand/return byte: the whole state table.
pub const SLOT_STATE: u8 = 0xfe;
/// High bit of an operand/return byte: the slot holds a dynamic blob.
pub const DYNAMIC_FLAG: u8 = 0x80;
/// Number of addressable slots. Higher 7-bit indices would collide with the sentinels once
/// flagged dynamic.
pub const MAX_SLOTS: usize = 0x7e;

const SELECTOR_END: usize = 4;
const OPERANDS_END: usize = SELECTOR_END + MAX_OPERANDS;
const RETURN_AT: usize = OPERANDS_END;
const ADDRESS_AT: usize = RETURN_AT + 1;

/* ───────────────────────────── Slot bytes ───────────────────────────── */

/// Decoded meaning of an operand or return byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRef {
    /// `0xff`
    Absent,
    /// `0xfe`
    State,
    /// A real slot.
    Slot {
        /// Slot index.
        index: u8,
        /// Whether the dynamic flag is set.
        dynamic: bool,
    },
}

impl SlotRef {
    /// Decodes one byte.
    pub const fn decode(byte: u8) -> Self {
        match byte {
            SLOT_ABSENT => Self::Absent,
            SLOT_STATE => Self::State,
            b => Self::Slot { index: b & !DYNAMIC_FLAG, dynamic: b & DYNAMIC_FLAG != 0 },
        }
    }

    /// Encodes back to one byte.
    pub const fn encode(self) -> u8 {
        match self {
            Self::Absent => SLOT_ABSENT,
            Self::State => SLOT_STATE,
            Self::Slot { index, dynamic: true } => index | DYNAMIC_FLAG,
            Self::Slot { index, dynamic: false } => index,
        }
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("_"),
            Self::State => f.write_str("state"),
            Self::Slot { index, dynamic: false } => write!(f, "s{index}"),
            Self::Slot { index, dynamic: true } => write!(f, "s{index}*"),
        }
    }
}

/* ───────────────────────────── Instruction ───────────────────────────── */

/// One 32-byte record: `[selector:4][operands:7][return:1][address:20]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction([u8; INSTRUCTION_LEN]);

impl Instruction {
    /// Assembles a record.
    pub fn new(
        selector: Selector,
        operands: [u8; MAX_OPERANDS],
        ret: u8,
        address: Address,
    ) -> Self {
        let mut raw = [0u8; INSTRUCTION_LEN];
        raw[..SELECTOR_END].copy_from_slice(&selector);
        raw[SELECTOR_END..OPERANDS_END].copy_from_slice(&operands);
        raw[RETURN_AT] = ret;
        raw[ADDRESS_AT..].copy_from_slice(address.as_bytes());
        Self(raw)
    }

    /// Wraps raw bytes.
    pub const fn from_bytes(raw: [u8; INSTRUCTION_LEN]) -> Self { Self(raw) }

    /// Raw bytes.
    pub const fn as_bytes(&self) -> &[u8; INSTRUCTION_LEN] { &self.0 }

    /// Function selector.
    pub fn selector(&self) -> Selector {
        [self.0[0], self.0[1], self.0[2], self.0[3]]
    }

    /// Operand bytes, absent positions included.
    pub fn operands(&self) -> &[u8] { &self.0[SELECTOR_END..OPERANDS_END] }

    /// Return byte.
    pub const fn return_slot(&self) -> u8 { self.0[RETURN_AT] }

    /// Target address.
    pub fn address(&self) -> Address {
        let mut raw = [0u8; Address::LEN];
        raw.copy_from_slice(&self.0[ADDRESS_AT..]);
        Address::new(raw)
    }

    /// `0x`-prefixed hex.
    pub fn to_hex(&self) -> String { to_hex(&self.0) }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instruction({})", self.to_hex())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_hex()) }
}

/* ───────────────────────────── Program ───────────────────────────── */

/// Output of [`Planner::plan`](crate::Planner::plan).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// Instructions, one per command, in command order.
    pub instructions: Vec<Instruction>,
    /// Initial slot contents; slots that first receive a result start empty.
    pub state: Vec<Vec<u8>>,
}

impl Program {
    /// Instructions as hex strings.
    pub fn commands_hex(&self) -> Vec<String> {
        self.instructions.iter().map(Instruction::to_hex).collect()
    }

    /// State slots as hex strings (`"0x"` for an empty slot).
    pub fn state_hex(&self) -> Vec<String> { self.state.iter().map(|s| to_hex(s)).collect() }

    /// Structural check: every operand and return byte is a sentinel or a slot that exists,
    /// and no operand follows an absent position.
    pub fn validate(&self) -> PlanResult<()> {
        if self.state.len() > MAX_SLOTS {
            return Err(PlanError::corrupted(format!(
                "state has {} slots, at most {MAX_SLOTS} are addressable",
                self.state.len()
            )));
        }

        for (pc, ins) in self.instructions.iter().enumerate() {
            let mut ended = false;
            for (pos, byte) in ins.operands().iter().enumerate() {
                match SlotRef::decode(*byte) {
                    SlotRef::Absent => ended = true,
                    _ if ended => {
                        return Err(PlanError::corrupted(format!(
                            "instruction {pc} has operand {pos} after an absent position"
                        )));
                    }
                    r => self.check_slot(pc, "operand", r)?,
                }
            }
            self.check_slot(pc, "return", SlotRef::decode(ins.return_slot()))?;
        }
        Ok(())
    }

    fn check_slot(&self, pc: usize, what: &str, slot: SlotRef) -> PlanResult<()> {
        if let SlotRef::Slot { index, .. } = slot {
            if usize::from(index) >= self.state.len() {
                return Err(PlanError::corrupted(format!(
                    "instruction {pc} {what} references slot {index} but state size is {}",
                    self.state.len()
                )));
            }
        }
        Ok(())
    }
}
