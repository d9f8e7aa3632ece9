//! The simulated chain state: accounts, storage, block hashes and
//! snapshots.
//!
//! The backend is deliberately journal-free: tests mutate state through
//! cheatcodes and restore it through explicit snapshots, so there is no
//! per-transaction rollback machinery here.

use crate::env::Env;
use alloy_primitives::{
    Address, B256, Bytes, KECCAK256_EMPTY, U256, keccak256,
    map::{AddressHashMap, HashMap, HashSet},
};

mod snapshot;
pub use snapshot::BackendStateSnapshot;
use snapshot::StateSnapshotId;

/// Errors produced by backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// A state snapshot id was not found or was already consumed.
    #[error("state snapshot {0} does not exist or was already reverted")]
    StateSnapshotMissing(U256),
}

/// Basic account information.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountInfo {
    /// The account balance, in wei.
    pub balance: U256,
    /// The account nonce.
    pub nonce: u64,
    /// The account's runtime code.
    pub code: Bytes,
}

impl AccountInfo {
    /// Returns the keccak hash of the account code.
    pub fn code_hash(&self) -> B256 {
        if self.code.is_empty() { KECCAK256_EMPTY } else { keccak256(&self.code) }
    }

    /// Returns `true` if the account is empty per EIP-161.
    pub fn is_empty(&self) -> bool {
        self.balance.is_zero() && self.nonce == 0 && self.code.is_empty()
    }
}

/// Full account state.
#[derive(Clone, Debug, Default)]
pub struct Account {
    /// Balance, nonce and code.
    pub info: AccountInfo,
    /// Storage slots. Absent slots read as zero.
    pub storage: HashMap<U256, U256>,
    /// Slots accessed within the current call scope. Reads of slots in this
    /// set are charged the warm access cost.
    pub warm_slots: HashSet<U256>,
}

/// The result of a state read, carrying the access temperature observed
/// before the read warmed the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateLoad<T> {
    /// The loaded value.
    pub data: T,
    /// Whether the slot was cold prior to this access.
    pub is_cold: bool,
}

/// The in-memory chain state store.
#[derive(Clone, Debug, Default)]
pub struct Backend {
    /// All known accounts.
    accounts: AddressHashMap<Account>,
    /// Explicit historical block hash overrides, keyed by height.
    block_hashes: HashMap<U256, B256>,
    /// Live state snapshots.
    state_snapshots: HashMap<U256, BackendStateSnapshot>,
    /// Snapshot id allocator.
    next_state_snapshot: StateSnapshotId,
}

impl Backend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a mutable reference to the account at `address`, creating an
    /// empty account if none exists.
    pub fn account_mut(&mut self, address: Address) -> &mut Account {
        self.accounts.entry(address).or_default()
    }

    /// Returns the account at `address`, if it exists.
    pub fn account(&self, address: Address) -> Option<&Account> {
        self.accounts.get(&address)
    }

    /// Returns the balance of `address`. Missing accounts read as zero.
    pub fn balance(&self, address: Address) -> U256 {
        self.accounts.get(&address).map(|acc| acc.info.balance).unwrap_or_default()
    }

    /// Returns the nonce of `address`. Missing accounts read as zero.
    pub fn nonce(&self, address: Address) -> u64 {
        self.accounts.get(&address).map(|acc| acc.info.nonce).unwrap_or_default()
    }

    /// Returns the code of `address`. Missing accounts read as empty.
    pub fn code(&self, address: Address) -> Bytes {
        self.accounts.get(&address).map(|acc| acc.info.code.clone()).unwrap_or_default()
    }

    /// Sets the balance of `address`.
    pub fn set_balance(&mut self, address: Address, balance: U256) -> U256 {
        std::mem::replace(&mut self.account_mut(address).info.balance, balance)
    }

    /// Sets the nonce of `address` without any monotonicity check.
    ///
    /// The safe, monotonic variant lives at the cheatcode layer; the store
    /// itself accepts any value.
    pub fn set_nonce(&mut self, address: Address, nonce: u64) {
        self.account_mut(address).info.nonce = nonce;
    }

    /// Replaces the runtime code of `address`.
    pub fn set_code(&mut self, address: Address, code: Bytes) {
        self.account_mut(address).info.code = code;
    }

    /// Reads a storage slot, warming it and reporting the prior temperature.
    pub fn sload(&mut self, address: Address, slot: U256) -> StateLoad<U256> {
        let account = self.account_mut(address);
        let is_cold = account.warm_slots.insert(slot);
        let data = account.storage.get(&slot).copied().unwrap_or_default();
        StateLoad { data, is_cold }
    }

    /// Writes a storage slot, warming it. Returns the previous value and the
    /// prior temperature.
    pub fn sstore(&mut self, address: Address, slot: U256, value: U256) -> StateLoad<U256> {
        let account = self.account_mut(address);
        let is_cold = account.warm_slots.insert(slot);
        let data = account.storage.insert(slot, value).unwrap_or_default();
        StateLoad { data, is_cold }
    }

    /// Marks a storage slot warm. The next read is charged the warm cost.
    pub fn mark_warm(&mut self, address: Address, slot: U256) {
        self.account_mut(address).warm_slots.insert(slot);
    }

    /// Marks a storage slot cold. The next read is charged the cold cost.
    pub fn mark_cold(&mut self, address: Address, slot: U256) {
        self.account_mut(address).warm_slots.remove(&slot);
    }

    /// Copies balance, code and all storage from `source` onto `target`.
    ///
    /// The target's nonce is left untouched. The copied slots inherit the
    /// source's warm set.
    pub fn clone_account(&mut self, source: Address, target: Address) {
        let Some(source) = self.accounts.get(&source).cloned() else {
            // Cloning a missing account clears the target's value state.
            let target = self.account_mut(target);
            target.info.balance = U256::ZERO;
            target.info.code = Bytes::new();
            target.storage.clear();
            target.warm_slots.clear();
            return;
        };
        let target = self.account_mut(target);
        target.info.balance = source.info.balance;
        target.info.code = source.info.code;
        target.storage = source.storage;
        target.warm_slots = source.warm_slots;
    }

    /// Overrides the historical hash for block `number`.
    pub fn set_block_hash(&mut self, number: U256, hash: B256) {
        self.block_hashes.insert(number, hash);
    }

    /// Returns the hash of block `number` as seen from `current` height.
    ///
    /// Explicit overrides win. Otherwise the current block and all future
    /// blocks hash to zero, while strictly past blocks produce a stable
    /// pseudo-random non-zero hash derived from the height.
    pub fn block_hash(&self, number: U256, current: U256) -> B256 {
        if let Some(hash) = self.block_hashes.get(&number) {
            return *hash;
        }
        if number >= current {
            return B256::ZERO;
        }
        keccak256(number.to_be_bytes::<32>())
    }

    /// Captures the full backend state and environment, returning the
    /// snapshot id.
    pub fn snapshot_state(&mut self, env: &Env) -> U256 {
        let id = self.next_state_snapshot.next();
        let snapshot = BackendStateSnapshot {
            accounts: self.accounts.clone(),
            block_hashes: self.block_hashes.clone(),
            env: env.clone(),
        };
        self.state_snapshots.insert(id, snapshot);
        tracing::trace!(target: "backend", %id, "saved state snapshot");
        id
    }

    /// Reverts to the state captured under `id`, restoring `env` as well.
    ///
    /// The id is consumed, and every snapshot taken after it is discarded:
    /// they describe states that no longer exist. Returns `false` if the id
    /// is unknown or was already consumed.
    pub fn revert_state(&mut self, id: U256, env: &mut Env) -> bool {
        let Some(snapshot) = self.state_snapshots.remove(&id) else {
            return false;
        };
        self.state_snapshots.retain(|other, _| *other < id);
        self.accounts = snapshot.accounts;
        self.block_hashes = snapshot.block_hashes;
        *env = snapshot.env;
        tracing::trace!(target: "backend", %id, "reverted to state snapshot");
        true
    }

    /// Deletes the snapshot under `id` without reverting. Returns `false`
    /// if the id is unknown.
    pub fn delete_state_snapshot(&mut self, id: U256) -> bool {
        self.state_snapshots.remove(&id).is_some()
    }

    /// Deletes all live snapshots.
    pub fn delete_state_snapshots(&mut self) {
        self.state_snapshots.clear();
    }
}
