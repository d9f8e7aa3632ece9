//! The `Vm` cheatcode interface.
//!
//! Every operation is an ABI-encoded call to
//! [`CHEATCODE_ADDRESS`](tevm_core::constants::CHEATCODE_ADDRESS); the
//! generated [`Vm::VmCalls`] enum is the dispatch surface consumed by
//! [`Cheatcodes`](crate::Cheatcodes).

alloy_sol_types::sol! {
#[derive(Debug, PartialEq, Eq)]
#[allow(missing_docs)]
interface Vm {
    /// The active caller-override mode reported by `readCallers`.
    enum CallerMode {
        /// No caller modification is active.
        None,
        /// A one-shot broadcast is active.
        Broadcast,
        /// A recurrent broadcast (`startBroadcast`) is active.
        RecurrentBroadcast,
        /// A one-shot prank is active.
        Prank,
        /// A recurrent prank (`startPrank`) is active.
        RecurrentPrank,
    }

    /// Gas usage of the most recent completed call, returned by `lastCallGas`.
    struct Gas {
        /// The gas limit of the frame.
        uint64 gasLimit;
        /// The total gas used.
        uint64 gasTotalUsed;
        /// The gas used for memory expansion.
        uint64 gasMemoryUsed;
        /// The gas refunded.
        int64 gasRefunded;
        /// The gas remaining at frame completion.
        uint64 gasRemaining;
    }

    // ----- block & environment -----

    /// Sets `block.timestamp`.
    function warp(uint256 newTimestamp) external;
    /// Sets `block.number`.
    function roll(uint256 newHeight) external;
    /// Sets `block.basefee`.
    function fee(uint256 newBasefee) external;
    /// Sets `block.difficulty`.
    function difficulty(uint256 newDifficulty) external;
    /// Sets `block.prevrandao`.
    function prevrandao(bytes32 newPrevrandao) external;
    /// Sets `block.chainid`.
    function chainId(uint256 newChainId) external;
    /// Sets `block.coinbase`.
    function coinbase(address newCoinbase) external;
    /// Sets the blob base fee.
    function blobBaseFee(uint256 newBlobBaseFee) external;
    /// Returns the blob base fee.
    function getBlobBaseFee() external view returns (uint256 blobBaseFee);
    /// Returns the current block height.
    function getBlockNumber() external view returns (uint256 height);
    /// Returns the current block timestamp.
    function getBlockTimestamp() external view returns (uint256 timestamp);
    /// Sets `tx.gasprice`.
    function txGasPrice(uint256 newGasPrice) external;
    /// Overrides the historical hash of block `blockNumber`.
    function setBlockhash(uint256 blockNumber, bytes32 blockHash) external;
    /// Returns the hash of block `blockNumber` as executing code would see it.
    function getBlockhash(uint256 blockNumber) external view returns (bytes32 blockHash);

    // ----- account state -----

    /// Loads a storage slot from an account.
    function load(address target, bytes32 slot) external view returns (bytes32 data);
    /// Stores a value to an account's storage slot.
    function store(address target, bytes32 slot, bytes32 value) external;
    /// Sets an account's balance.
    function deal(address account, uint256 newBalance) external;
    /// Sets an account's runtime code.
    function etch(address target, bytes calldata newRuntimeBytecode) external;
    /// Returns an account's nonce.
    function getNonce(address account) external view returns (uint64 nonce);
    /// Sets an account's nonce. Must not be lower than the current nonce.
    function setNonce(address account, uint64 newNonce) external;
    /// Sets an account's nonce to an arbitrary value, including lower ones.
    function setNonceUnsafe(address account, uint64 newNonce) external;
    /// Resets an account's nonce: 0 for EOAs, 1 for contracts (EIP-161).
    function resetNonce(address account) external;
    /// Copies balance, code and the full storage of `source` onto `target`.
    function cloneAccount(address source, address target) external;
    /// Marks a storage slot warm: the next read costs the warm access fee.
    function markWarm(address target, bytes32 slot) external;
    /// Marks a storage slot cold: the next read costs the cold access fee.
    function markCold(address target, bytes32 slot) external;

    // ----- state snapshots -----

    /// Captures the full chain state and environment, returning an id.
    function snapshotState() external returns (uint256 snapshotId);
    /// Restores the state captured under `snapshotId`, consuming the id and
    /// discarding all snapshots taken after it. Returns `false` if the id is
    /// unknown or already consumed.
    function revertToState(uint256 snapshotId) external returns (bool success);
    /// Deletes a snapshot without reverting to it.
    function deleteStateSnapshot(uint256 snapshotId) external returns (bool success);
    /// Deletes all live snapshots.
    function deleteStateSnapshots() external;
    /// Deprecated alias of `snapshotState`.
    function snapshot() external returns (uint256 snapshotId);
    /// Deprecated alias of `revertToState`.
    function revertTo(uint256 snapshotId) external returns (bool success);

    // ----- gas metering -----

    /// Suspends gas metering: no gas is deducted until resumed.
    function pauseGasMetering() external;
    /// Resumes gas metering.
    function resumeGasMetering() external;
    /// Resets the gas metering state, unpausing and clearing the record.
    function resetGasMetering() external;
    /// Returns the gas usage of the most recent completed call.
    function lastCallGas() external view returns (Gas memory gas);

    // ----- caller overrides -----

    /// Sets `msg.sender` for the next external call only.
    function prank(address msgSender) external;
    /// Sets `msg.sender` and `tx.origin` for the next external call only.
    function prank(address msgSender, address txOrigin) external;
    /// Sets `msg.sender` for all subsequent calls until `stopPrank`.
    function startPrank(address msgSender) external;
    /// Sets `msg.sender` and `tx.origin` for all subsequent calls until
    /// `stopPrank`.
    function startPrank(address msgSender, address txOrigin) external;
    /// Stops an active recurrent prank.
    function stopPrank() external;
    /// Reports the active caller-override mode and the effective
    /// `msg.sender` and `tx.origin`.
    function readCallers() external returns (CallerMode callerMode, address msgSender, address txOrigin);
    /// Marks the next call as broadcast by the default signer.
    function broadcast() external;
    /// Marks the next call as broadcast by `signer`.
    function broadcast(address signer) external;
    /// Marks all subsequent calls as broadcast by the default signer.
    function startBroadcast() external;
    /// Marks all subsequent calls as broadcast by `signer`.
    function startBroadcast(address signer) external;
    /// Stops an active recurrent broadcast.
    function stopBroadcast() external;

    // ----- mocking -----

    /// Mocks all calls to `callee` whose calldata starts with `data`,
    /// returning `returnData` instead of executing.
    function mockCall(address callee, bytes calldata data, bytes calldata returnData) external;
    /// Like `mockCall`, additionally constrained to calls sending `msgValue`.
    function mockCall(address callee, uint256 msgValue, bytes calldata data, bytes calldata returnData) external;
    /// Mocks sequential calls: each element is returned once, and the last
    /// element persists for all further matching calls.
    function mockCalls(address callee, bytes calldata data, bytes[] calldata returnData) external;
    /// Mocks matching calls to revert with `revertData`.
    function mockCallRevert(address callee, bytes calldata data, bytes calldata revertData) external;
    /// Redirects matching calls on `callee` to execute `target`'s code.
    function mockFunction(address callee, address target, bytes calldata data) external;
    /// Removes all registered mocks.
    function clearMockedCalls() external;

    // ----- expectations -----

    /// Expects the next call to revert, with any payload.
    function expectRevert() external;
    /// Expects the next call to revert with a payload whose first four bytes
    /// equal `revertData`.
    function expectRevert(bytes4 revertData) external;
    /// Expects the next call to revert with exactly `revertData`.
    function expectRevert(bytes calldata revertData) external;
    /// Expects a contract creation of `bytecode` by `deployer` before the
    /// test ends.
    function expectCreate(bytes calldata bytecode, address deployer) external;

    // ----- assumptions & test control -----

    /// Discards the current run if `condition` does not hold.
    function assume(bool condition) external pure;
    /// Discards the current run if any subsequent call reverts.
    function assumeNoRevert() external pure;
    /// Discards the current run if a subsequent call reverts with the given
    /// selector.
    function assumeNoRevert(bytes4 revertSelector) external pure;
    /// Discards the current run if `reverter` reverts with the given
    /// selector.
    function assumeNoRevert(bytes4 revertSelector, address reverter) external pure;
    /// Marks the test as skipped.
    function skip(bool skipTest) external;

    // ----- randomness -----

    /// Resets the random source to a deterministic state derived from `seed`.
    function setSeed(uint256 seed) external;
    /// Returns a uniformly random `uint256`.
    function randomUint() external returns (uint256 value);
    /// Returns a random unsigned integer of the given bit width.
    function randomUint(uint256 bits) external returns (uint256 value);
    /// Returns a uniformly random value in `[min, max]`.
    function randomUint(uint256 min, uint256 max) external returns (uint256 value);
    /// Returns a uniformly random `int256`.
    function randomInt() external returns (int256 value);
    /// Returns a random signed integer of the given bit width.
    function randomInt(uint256 bits) external returns (int256 value);
    /// Returns a random address.
    function randomAddress() external returns (address addr);
    /// Returns `len` random bytes.
    function randomBytes(uint256 len) external returns (bytes memory data);
    /// Shuffles the array with a Fisher-Yates pass over the random stream.
    function shuffle(uint256[] calldata array) external returns (uint256[] memory shuffled);

    // ----- labels -----

    /// Labels an address in test output.
    function label(address account, string calldata newLabel) external;
    /// Returns the label of an address, or `unlabeled:<address>`.
    function getLabel(address account) external view returns (string memory currentLabel);
}
}
