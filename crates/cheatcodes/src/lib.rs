//! # tevm-cheatcodes
//!
//! Cheatcode dispatch and VM state control for the tevm test VM.
//!
//! The host executor routes every call to the cheatcode address through
//! [`Cheatcodes::call`], which decodes the calldata against the [`Vm`]
//! interface and dispatches to the matching implementation. The remaining
//! hooks ([`Cheatcodes::call_end`], [`Cheatcodes::create`],
//! [`Cheatcodes::create_end`], [`Cheatcodes::finish`]) let the controller
//! intercept ordinary calls for pranks, mocks and revert expectations.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

use alloy_primitives::Address;
use alloy_sol_types::SolCall;
use tevm_core::{EvmContext, Gas};

#[macro_use]
mod error;
pub use error::{Error, Result};

mod evm;
mod inspector;
pub use inspector::{Cheatcodes, GasMetering};

mod random;
mod script;

mod vm;
pub use vm::Vm;

/// Cheatcode implementation.
pub(crate) trait Cheatcode: SolCall {
    /// Applies this cheatcode to the controller state.
    ///
    /// Implement this function if the cheatcode needs no access to the EVM
    /// context.
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let _ = state;
        unimplemented!("{}", Self::SIGNATURE)
    }

    /// Applies this cheatcode to the EVM context.
    ///
    /// Implement this function if the cheatcode needs access to the
    /// environment, the backend or the gas meter; the default delegates to
    /// [`apply`](Self::apply).
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        self.apply(ccx.state)
    }
}

/// The context for a single cheatcode call.
pub struct CheatsCtxt<'cheats, 'evm> {
    /// The controller state.
    pub(crate) state: &'cheats mut Cheatcodes,
    /// The EVM execution context.
    pub(crate) ecx: &'evm mut EvmContext,
    /// The gas meter of the cheatcode call frame.
    pub(crate) gas: &'evm mut Gas,
    /// The caller of the cheatcode.
    pub(crate) caller: Address,
}

impl std::ops::Deref for CheatsCtxt<'_, '_> {
    type Target = EvmContext;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.ecx
    }
}

impl std::ops::DerefMut for CheatsCtxt<'_, '_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ecx
    }
}
