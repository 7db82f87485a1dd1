//! Forward liveness pass over the command sequence.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::{Command, PlanError, PlanResult, PlannerId, Value};

/// Last use of every literal and of every consumed command output.
#[derive(Debug, Default)]
pub(crate) struct Liveness<'a> {
    /// Distinct literal bytes → index of the last command reading them.
    /// Iteration order is first-encounter order, which is also slot order.
    pub literal_last_use: IndexMap<&'a [u8], usize>,
    /// Producing command → index of the last command reading its output.
    pub command_last_use: BTreeMap<usize, usize>,
}

impl<'a> Liveness<'a> {
    /// Walks `commands` once, in order.
    ///
    /// Fails on a `Return` that names a later command, the command itself, a command that
    /// does not exist, or a command of another planner.
    pub fn analyze(planner: PlannerId, commands: &'a [Command]) -> PlanResult<Self> {
        let mut live = Self::default();

        for (index, command) in commands.iter().enumerate() {
            for arg in command.call.args() {
                match arg {
                    Value::Literal { bytes, .. } => {
                        live.literal_last_use.insert(bytes.as_slice(), index);
                    }
                    Value::Return(ret) => {
                        let target = ret.command();
                        if target.planner() != planner {
                            return Err(PlanError::ForeignReturn);
                        }
                        if target.index() >= index {
                            return Err(PlanError::DanglingReference {
                                command: index,
                                target: target.index(),
                            });
                        }
                        live.command_last_use.insert(target.index(), index);
                    }
                    Value::State => {}
                }
            }
        }

        Ok(live)
    }
}
