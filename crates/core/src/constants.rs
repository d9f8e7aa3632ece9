//! Well-known addresses and protocol constants.

use alloy_primitives::{Address, address};

/// The cheatcode handler address.
///
/// This is the same address as the one used by forge-std's `Vm`:
/// `address(uint160(uint256(keccak256("hevm cheat code"))))`.
pub const CHEATCODE_ADDRESS: Address = address!("7109709ECfa91a80626fF3989D68f67F5b1DD12D");

/// The default test sender.
pub const DEFAULT_SENDER: Address = address!("1804c8AB1F12E6bbf3894d4083f33e07309d1f38");

/// The default test contract address.
pub const TEST_CONTRACT_ADDRESS: Address = address!("b4c79daB8f259C7Aee6E5b2Aa729821864227e84");

/// Magic revert payload returned when an assumption rejects the current input.
///
/// Harnesses treat a revert carrying these bytes as "discard and retry",
/// never as a pass or a fail.
pub const MAGIC_ASSUME: &[u8] = b"TEVM::ASSUME";

/// Magic revert payload returned when a test asks to be skipped.
pub const MAGIC_SKIP: &[u8] = b"TEVM::SKIP";

/// Gas charged for reading a cold storage slot (EIP-2929).
pub const COLD_SLOAD_COST: u64 = 2100;

/// Gas charged for reading a warm storage slot (EIP-2929).
pub const WARM_STORAGE_READ_COST: u64 = 100;

/// Number of precompile addresses reserved at the bottom of the address space.
const PRECOMPILE_COUNT: u8 = 0x0a;

/// Returns `true` if `address` is one of the protocol precompiles.
///
/// Precompile code and storage are immutable; cheatcodes that would mutate
/// them must refuse to.
pub fn is_precompile(address: Address) -> bool {
    let bytes = address.as_slice();
    bytes[..19].iter().all(|b| *b == 0) && (1..=PRECOMPILE_COUNT).contains(&bytes[19])
}
