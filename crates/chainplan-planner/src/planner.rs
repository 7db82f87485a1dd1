//! `Planner`: the append-only command list and the `plan()` entry point.

use chainplan_abi::ParamType;
use tracing::debug;

use crate::{
    emit, liveness::Liveness, Command, CommandId, FunctionCall, PlanError, PlanResult,
    PlannerId, Program, ReturnValue, Value,
};

/// Owns an ordered sequence of commands and compiles it into a [`Program`].
#[derive(Debug, Clone)]
pub struct Planner {
    id: PlannerId,
    commands: Vec<Command>,
}

impl Default for Planner {
    fn default() -> Self { Self::new() }
}

impl Planner {
    /// Empty planner with a fresh identity.
    pub fn new() -> Self { Self { id: PlannerId::fresh(), commands: Vec::new() } }

    /// Identity stamped on every [`CommandId`] this planner mints.
    pub const fn id(&self) -> PlannerId { self.id }

    /// Argument standing for the whole memory table.
    pub const fn state(&self) -> Value { Value::State }

    /// Commands added so far.
    pub fn commands(&self) -> &[Command] { &self.commands }

    /// Number of commands.
    pub fn len(&self) -> usize { self.commands.len() }

    /// Whether no command was added.
    pub fn is_empty(&self) -> bool { self.commands.is_empty() }

    /// Appends a call.
    ///
    /// Returns a handle to its output when the function declares exactly one output, `None`
    /// otherwise. Fails if an argument is a return value minted by another planner.
    pub fn add(&mut self, call: FunctionCall) -> PlanResult<Option<ReturnValue>> {
        let id = self.push(call, false)?;
        let outputs = self.commands[id.index()].call.outputs();
        Ok(match outputs {
            [only] => Some(ReturnValue::new(id, only.kind.clone())),
            _ => None,
        })
    }

    /// Appends a call whose `bytes[]` output replaces the whole memory table.
    pub fn replace_state(&mut self, call: FunctionCall) -> PlanResult<CommandId> {
        let outputs = call.outputs();
        if !matches!(outputs, [only] if only.kind == ParamType::bytes_array()) {
            let found: Vec<String> = outputs.iter().map(|p| p.kind.to_string()).collect();
            return Err(PlanError::InvalidStateReplacement {
                signature: call.signature(),
                found: found.join(","),
            });
        }
        self.push(call, true)
    }

    fn push(&mut self, call: FunctionCall, replaces_state: bool) -> PlanResult<CommandId> {
        let foreign = call.args().iter().any(|arg| {
            matches!(arg, Value::Return(r) if r.command().planner() != self.id)
        });
        if foreign {
            return Err(PlanError::ForeignReturn);
        }

        let id = CommandId::new(self.id, self.commands.len());
        self.commands.push(Command { call, replaces_state });
        Ok(id)
    }

    /// Compiles the command list.
    ///
    /// Pure over the recorded commands: calling it again yields the same bytes.
    pub fn plan(&self) -> PlanResult<Program> {
        let live = Liveness::analyze(self.id, &self.commands)?;
        let program = emit::emit(&self.commands, &live)?;
        debug!(
            commands = program.instructions.len(),
            literals = live.literal_last_use.len(),
            slots = program.state.len(),
            "plan compiled"
        );
        Ok(program)
    }
}
