//! Call records and the commands that wrap them.

use std::sync::Arc;

use chainplan_abi::{Address, Function, Param, Selector};

use crate::Value;

/// An external call: target, function fragment and resolved arguments.
///
/// Arguments are expected to be type-checked by whoever builds the call; the planner only
/// reads their kind and declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    address: Address,
    function: Arc<Function>,
    args: Vec<Value>,
}

impl FunctionCall {
    /// New call of `function` on `address`.
    pub fn new(address: Address, function: Arc<Function>, args: Vec<Value>) -> Self {
        Self { address, function, args }
    }

    /// Target contract.
    pub const fn address(&self) -> Address { self.address }

    /// Function fragment.
    pub fn function(&self) -> &Function { &self.function }

    /// Arguments in call order.
    pub fn args(&self) -> &[Value] { &self.args }

    /// Declared outputs.
    pub fn outputs(&self) -> &[Param] { &self.function.outputs }

    /// 4-byte selector of the function.
    pub fn selector(&self) -> Selector { self.function.selector() }

    /// Canonical signature of the function.
    pub fn signature(&self) -> String { self.function.signature() }
}

/// One step of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub(crate) call: FunctionCall,
    pub(crate) replaces_state: bool,
}

impl Command {
    /// The wrapped call.
    pub const fn call(&self) -> &FunctionCall { &self.call }

    /// Whether the call's output replaces the whole memory table.
    pub const fn replaces_state(&self) -> bool { self.replaces_state }
}
