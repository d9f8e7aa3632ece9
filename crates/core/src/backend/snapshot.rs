//! State snapshot support.

use super::Account;
use crate::env::Env;
use alloy_primitives::{
    B256, U256,
    map::{AddressHashMap, HashMap},
};

/// A full capture of simulated chain state at a point in time.
///
/// Snapshots are opaque to callers; they are addressed purely by the id
/// returned from [`Backend::snapshot_state`](super::Backend::snapshot_state).
#[derive(Clone, Debug)]
pub struct BackendStateSnapshot {
    /// All account state, including storage and warm-slot sets.
    pub accounts: AddressHashMap<Account>,
    /// Historical block hash overrides.
    pub block_hashes: HashMap<U256, B256>,
    /// The execution environment at capture time.
    pub env: Env,
}

/// Allocates monotonically increasing snapshot ids.
#[derive(Clone, Debug, Default)]
pub struct StateSnapshotId(u64);

impl StateSnapshotId {
    /// Returns the next unused id.
    pub fn next(&mut self) -> U256 {
        let id = self.0;
        self.0 += 1;
        U256::from(id)
    }
}
