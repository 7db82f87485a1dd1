//! A deployed contract: address plus interface, producing planner calls.

use std::sync::Arc;

use chainplan_abi::{encode_literal, Address, Function, Token};
use chainplan_planner::{FunctionCall, ReturnValue, Value};

use crate::{ContractError, ContractResult, Interface};

/// One argument handed to a [`BoundFunction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// Concrete value, encoded against the parameter type.
    Token(Token),
    /// Symbolic value (or a pre-encoded literal), passed through if its type matches exactly.
    Value(Value),
}

impl From<Token> for Arg {
    fn from(t: Token) -> Self { Self::Token(t) }
}
impl From<Value> for Arg {
    fn from(v: Value) -> Self { Self::Value(v) }
}
impl From<ReturnValue> for Arg {
    fn from(r: ReturnValue) -> Self { Self::Value(Value::Return(r)) }
}

macro_rules! arg_from_token {
    ($($t:ty),*) => {$(
        impl From<$t> for Arg {
            fn from(v: $t) -> Self { Self::Token(Token::from(v)) }
        }
    )*};
}

arg_from_token!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, bool, &str, String, Address, Vec<u8>);

/// Contract at a fixed address.
#[derive(Debug, Clone)]
pub struct Contract {
    address: Address,
    interface: Arc<Interface>,
}

impl Contract {
    /// Binds `interface` at `address`.
    pub fn new(address: Address, interface: impl Into<Arc<Interface>>) -> Self {
        Self { address, interface: interface.into() }
    }

    /// Target address.
    pub const fn address(&self) -> Address { self.address }

    /// Bound interface.
    pub fn interface(&self) -> &Interface { &self.interface }

    /// Function by signature, or by bare name when not overloaded.
    pub fn function(&self, key: &str) -> ContractResult<BoundFunction> {
        let function = Arc::clone(self.interface.function(key)?);
        Ok(BoundFunction { address: self.address, function })
    }

    /// Shorthand for `function(key)?.call(args)`.
    pub fn call<I>(&self, key: &str, args: I) -> ContractResult<FunctionCall>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.function(key)?.call(args)
    }
}

/// One function of a [`Contract`], ready to build calls.
#[derive(Debug, Clone)]
pub struct BoundFunction {
    address: Address,
    function: Arc<Function>,
}

impl BoundFunction {
    /// Function fragment.
    pub fn fragment(&self) -> &Function { &self.function }

    /// Canonical signature.
    pub fn signature(&self) -> String { self.function.signature() }

    /// Builds a call.
    ///
    /// Fails unless the argument count equals the declared inputs. Concrete arguments are
    /// encoded to their slot form (dynamic values lose their head word); symbolic ones must
    /// carry exactly the parameter's type.
    pub fn call<I>(&self, args: I) -> ContractResult<FunctionCall>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        let args: Vec<Arg> = args.into_iter().map(Into::into).collect();
        let inputs = &self.function.inputs;
        if args.len() != inputs.len() {
            return Err(ContractError::Arity {
                function: self.signature(),
                expected: inputs.len(),
                got: args.len(),
            });
        }

        let values = args
            .into_iter()
            .zip(inputs)
            .enumerate()
            .map(|(index, (arg, param))| match arg {
                Arg::Token(token) => encode_literal(&param.kind, &token)
                    .map(|bytes| Value::literal(param.kind.clone(), bytes))
                    .map_err(|source| ContractError::InvalidArgument {
                        function: self.signature(),
                        index,
                        source,
                    }),
                Arg::Value(value) => {
                    let ty = value.ty();
                    if ty == param.kind {
                        Ok(value)
                    } else {
                        Err(ContractError::TypeMismatch {
                            function: self.signature(),
                            index,
                            expected: param.kind.to_string(),
                            found: ty.to_string(),
                        })
                    }
                }
            })
            .collect::<ContractResult<Vec<_>>>()?;

        Ok(FunctionCall::new(self.address, Arc::clone(&self.function), values))
    }
}
