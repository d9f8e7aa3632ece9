//! Call and create frame types exchanged between the host executor and the
//! cheatcode controller.

use crate::gas::Gas;
use alloy_primitives::{Address, Bytes, U256};

/// The result of executing a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InstructionResult {
    /// Execution halted without return data.
    Stop,
    /// Execution returned data.
    #[default]
    Return,
    /// Execution reverted; state changes are rolled back.
    Revert,
    /// The frame ran out of gas.
    OutOfGas,
}

impl InstructionResult {
    /// Returns `true` if the frame completed successfully.
    #[inline]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Stop | Self::Return)
    }

    /// Returns `true` if the frame reverted.
    #[inline]
    pub const fn is_revert(self) -> bool {
        matches!(self, Self::Revert)
    }

}

/// The calling convention of a call frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CallScheme {
    /// `CALL`.
    #[default]
    Call,
    /// `CALLCODE`.
    CallCode,
    /// `DELEGATECALL`.
    DelegateCall,
    /// `STATICCALL`.
    StaticCall,
}

/// Inputs for an outgoing call, mutable by the controller before the host
/// executes it.
#[derive(Clone, Debug, Default)]
pub struct CallInputs {
    /// The call data.
    pub input: Bytes,
    /// The gas limit of the call.
    pub gas_limit: u64,
    /// The account whose storage and balance are operated on.
    pub target_address: Address,
    /// The account whose code is executed. Differs from `target_address`
    /// for delegate calls and redirected (mocked) functions.
    pub bytecode_address: Address,
    /// The effective `msg.sender`.
    pub caller: Address,
    /// The call value.
    pub value: U256,
    /// The calling convention.
    pub scheme: CallScheme,
    /// Whether this is a static call.
    pub is_static: bool,
}

/// The outcome of a completed call frame.
#[derive(Clone, Debug)]
pub struct CallOutcome {
    /// The instruction result of the frame.
    pub result: InstructionResult,
    /// The output or revert data.
    pub output: Bytes,
    /// The frame's gas state at completion.
    pub gas: Gas,
}

impl CallOutcome {
    /// A successful outcome returning `output`.
    pub fn new_return(output: impl Into<Bytes>, gas: Gas) -> Self {
        Self { result: InstructionResult::Return, output: output.into(), gas }
    }

    /// A reverted outcome carrying `output` as the revert payload.
    pub fn new_revert(output: impl Into<Bytes>, gas: Gas) -> Self {
        Self { result: InstructionResult::Revert, output: output.into(), gas }
    }

    /// Returns `true` if the frame reverted.
    #[inline]
    pub const fn is_revert(&self) -> bool {
        self.result.is_revert()
    }
}

/// How a contract creation derives the new account's address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateScheme {
    /// `CREATE`, address derived from sender and nonce.
    Create,
    /// `CREATE2`, address derived from sender, salt and init code hash.
    Create2 {
        /// The create2 salt.
        salt: U256,
    },
}

/// Inputs for a contract creation.
#[derive(Clone, Debug)]
pub struct CreateInputs {
    /// The creating account.
    pub caller: Address,
    /// The creation scheme.
    pub scheme: CreateScheme,
    /// The value sent to the new account.
    pub value: U256,
    /// The init code.
    pub init_code: Bytes,
    /// The gas limit of the creation frame.
    pub gas_limit: u64,
}

/// The outcome of a completed creation frame.
#[derive(Clone, Debug)]
pub struct CreateOutcome {
    /// The instruction result of the frame.
    pub result: InstructionResult,
    /// The created address, if the creation succeeded.
    pub address: Option<Address>,
    /// The output or revert data.
    pub output: Bytes,
    /// The frame's gas state at completion.
    pub gas: Gas,
}
