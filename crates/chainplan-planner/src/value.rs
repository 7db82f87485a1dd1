//! Value model: the three kinds of call argument.

use core::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use chainplan_abi::ParamType;

static NEXT_PLANNER: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a [`Planner`](crate::Planner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlannerId(u64);

impl PlannerId {
    pub(crate) fn fresh() -> Self { Self(NEXT_PLANNER.fetch_add(1, Ordering::Relaxed)) }
}

/// Stable handle of a command: owning planner plus position in its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommandId {
    planner: PlannerId,
    index: usize,
}

impl CommandId {
    pub(crate) const fn new(planner: PlannerId, index: usize) -> Self { Self { planner, index } }

    /// Planner that owns the command.
    pub const fn planner(&self) -> PlannerId { self.planner }

    /// Position of the command in its planner.
    pub const fn index(&self) -> usize { self.index }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{}", self.index) }
}

/// Symbolic handle to the single output of a command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReturnValue {
    ty: ParamType,
    command: CommandId,
}

impl ReturnValue {
    /// Handle to the output of `command`, declared as `ty`.
    ///
    /// [`Planner::add`](crate::Planner::add) mints these; building one by hand is only useful
    /// to reference a command whose handle was not returned.
    pub const fn new(command: CommandId, ty: ParamType) -> Self { Self { ty, command } }

    /// Declared type of the output.
    pub const fn ty(&self) -> &ParamType { &self.ty }

    /// Command that produces the value.
    pub const fn command(&self) -> CommandId { self.command }
}

/// One argument of a [`FunctionCall`](crate::FunctionCall).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Constant, already encoded to the bytes stored in its slot.
    Literal {
        /// Declared type.
        ty: ParamType,
        /// Slot contents.
        bytes: Vec<u8>,
    },
    /// Output of an earlier command.
    Return(ReturnValue),
    /// The whole memory table, typed `bytes[]`.
    State,
}

impl Value {
    /// Literal from its declared type and encoded bytes.
    pub fn literal(ty: ParamType, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Literal { ty, bytes: bytes.into() }
    }

    /// Declared type of the value.
    pub fn ty(&self) -> ParamType {
        match self {
            Self::Literal { ty, .. } => ty.clone(),
            Self::Return(r) => r.ty.clone(),
            Self::State => ParamType::bytes_array(),
        }
    }

    /// Whether the value lives in a slot as a dynamic blob.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::Literal { ty, .. } => ty.is_dynamic(),
            Self::Return(r) => r.ty.is_dynamic(),
            Self::State => true,
        }
    }
}

impl From<ReturnValue> for Value {
    fn from(r: ReturnValue) -> Self { Self::Return(r) }
}
