//! Slot allocation and instruction encoding.
//!
//! Runs after [`Liveness`]: literals get the first slots in first-encounter order, then each
//! command is encoded in sequence. Slots expiring at a command are released after its operands
//! are read, so a value read for the last time can hand its slot to the same command's output.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use smallvec::SmallVec;
use tracing::trace;

use crate::{
    liveness::Liveness,
    program::{DYNAMIC_FLAG, MAX_OPERANDS, MAX_SLOTS, SLOT_ABSENT, SLOT_STATE},
    Command, Instruction, PlanError, PlanResult, Program, Value,
};

struct SlotAllocator<'a> {
    state: Vec<Vec<u8>>,
    free: BTreeSet<u8>,
    /// Command index → slots released once its operands are read.
    expiring: BTreeMap<usize, SmallVec<[u8; 4]>>,
    literal_slots: HashMap<&'a [u8], u8>,
    return_slots: HashMap<usize, u8>,
}

impl<'a> SlotAllocator<'a> {
    fn with_literals(live: &Liveness<'a>) -> PlanResult<Self> {
        let mut alloc = Self {
            state: Vec::with_capacity(live.literal_last_use.len()),
            free: BTreeSet::new(),
            expiring: BTreeMap::new(),
            literal_slots: HashMap::with_capacity(live.literal_last_use.len()),
            return_slots: HashMap::new(),
        };

        for (&bytes, &last_use) in &live.literal_last_use {
            let slot = alloc.grow(bytes.to_vec(), None)?;
            alloc.literal_slots.insert(bytes, slot);
            alloc.expiring.entry(last_use).or_default().push(slot);
        }
        Ok(alloc)
    }

    /// Appends a slot with the given initial contents.
    fn grow(&mut self, initial: Vec<u8>, command: Option<usize>) -> PlanResult<u8> {
        let slot = u8::try_from(self.state.len())
            .ok()
            .filter(|s| usize::from(*s) < MAX_SLOTS)
            .ok_or(PlanError::SlotOverflow { command, max: MAX_SLOTS })?;
        self.state.push(initial);
        Ok(slot)
    }

    fn operand(&self, command: usize, arg: &Value) -> PlanResult<u8> {
        let slot = match arg {
            Value::State => return Ok(SLOT_STATE),
            Value::Literal { bytes, .. } => self.literal_slots.get(bytes.as_slice()).copied(),
            Value::Return(ret) => self.return_slots.get(&ret.command().index()).copied(),
        };
        // liveness has resolved every reference and every literal, so a miss is internal
        let slot = slot.ok_or_else(|| {
            PlanError::corrupted(format!("command {command}: no slot holds operand {arg:?}"))
        })?;
        Ok(if arg.is_dynamic() { slot | DYNAMIC_FLAG } else { slot })
    }

    fn encode(&mut self, index: usize, command: &Command, live: &Liveness<'_>) -> PlanResult<Instruction> {
        let call = command.call();
        let args = call.args();
        if args.len() > MAX_OPERANDS {
            return Err(PlanError::OperandOverflow {
                command: index,
                signature: call.signature(),
                count: args.len(),
                max: MAX_OPERANDS,
            });
        }

        // 1) operands, read against the current slot maps
        let mut operands = [SLOT_ABSENT; MAX_OPERANDS];
        for (pos, arg) in args.iter().enumerate() {
            operands[pos] = self.operand(index, arg)?;
        }

        // 2) release what dies here
        if let Some(slots) = self.expiring.remove(&index) {
            self.free.extend(slots);
        }

        // 3) output slot, only if someone reads it later
        let ret = match live.command_last_use.get(&index) {
            Some(&consumer) if command.replaces_state() => {
                return Err(PlanError::ReturnReplaceConflict { command: index, consumer });
            }
            Some(&last_use) => {
                let slot = match self.free.pop_first() {
                    Some(slot) => slot,
                    None => self.grow(Vec::new(), Some(index))?,
                };
                self.return_slots.insert(index, slot);
                self.expiring.entry(last_use).or_default().push(slot);
                trace!(command = index, slot, last_use, "output slot assigned");

                let dynamic = call.outputs().first().is_some_and(|p| p.kind.is_dynamic());
                if dynamic { slot | DYNAMIC_FLAG } else { slot }
            }
            None if command.replaces_state() => SLOT_STATE,
            None => SLOT_ABSENT,
        };

        // 4) emit
        Ok(Instruction::new(call.selector(), operands, ret, call.address()))
    }
}

/// Allocates slots and encodes every command.
pub(crate) fn emit(commands: &[Command], live: &Liveness<'_>) -> PlanResult<Program> {
    let mut alloc = SlotAllocator::with_literals(live)?;
    let instructions = commands
        .iter()
        .enumerate()
        .map(|(index, command)| alloc.encode(index, command, live))
        .collect::<PlanResult<Vec<_>>>()?;

    Ok(Program { instructions, state: alloc.state })
}
