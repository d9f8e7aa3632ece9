//! Mutable execution environment: chain configuration, block and
//! transaction registers.
//!
//! Every setter takes effect immediately; executing code observes the new
//! value on its next read. There is no deferred application.

use crate::constants::DEFAULT_SENDER;
use alloy_primitives::{Address, B256, U256};

/// Chain configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CfgEnv {
    /// The chain id, available to executing code via `CHAINID`.
    pub chain_id: u64,
}

impl Default for CfgEnv {
    fn default() -> Self {
        // Default local test chain id.
        Self { chain_id: 31337 }
    }
}

/// The block environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockEnv {
    /// The block height.
    pub number: U256,
    /// The block timestamp, in seconds.
    pub timestamp: U256,
    /// The base fee per gas.
    pub basefee: U256,
    /// The block beneficiary.
    pub coinbase: Address,
    /// The post-merge randomness beacon value.
    pub prevrandao: B256,
    /// The pre-merge difficulty.
    pub difficulty: U256,
    /// The block gas limit.
    pub gas_limit: U256,
    /// The blob base fee (EIP-4844).
    pub blob_base_fee: U256,
}

impl Default for BlockEnv {
    fn default() -> Self {
        Self {
            number: U256::from(1),
            timestamp: U256::from(1),
            basefee: U256::ZERO,
            coinbase: Address::ZERO,
            prevrandao: B256::ZERO,
            difficulty: U256::ZERO,
            gas_limit: U256::from(30_000_000u64),
            blob_base_fee: U256::ZERO,
        }
    }
}

/// The transaction environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxEnv {
    /// The transaction origin (`tx.origin`).
    pub caller: Address,
    /// The gas price.
    pub gas_price: U256,
    /// The transaction gas limit.
    pub gas_limit: u64,
}

impl Default for TxEnv {
    fn default() -> Self {
        Self { caller: DEFAULT_SENDER, gas_price: U256::ZERO, gas_limit: 30_000_000 }
    }
}

/// The full execution environment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Env {
    /// Chain configuration.
    pub cfg: CfgEnv,
    /// Block registers.
    pub block: BlockEnv,
    /// Transaction registers.
    pub tx: TxEnv,
}
