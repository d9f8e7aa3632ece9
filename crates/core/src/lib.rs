//! # tevm-core
//!
//! Simulated chain state for the tevm test VM: accounts and storage with
//! warm/cold access tracking, the mutable block/transaction environment,
//! per-frame gas accounting, call/create frame types and state snapshots.
//!
//! The execution engine itself lives in the host; this crate only models
//! the state that cheatcodes read and mutate.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod backend;
pub mod constants;
mod context;
pub mod env;
pub mod frame;
pub mod gas;

pub use backend::{Account, AccountInfo, Backend, BackendError, StateLoad};
pub use context::EvmContext;
pub use env::{BlockEnv, CfgEnv, Env, TxEnv};
pub use frame::{
    CallInputs, CallOutcome, CallScheme, CreateInputs, CreateOutcome, CreateScheme,
    InstructionResult,
};
pub use gas::Gas;
