//! Implementations of EVM-related cheatcodes: environment registers, account
//! state, snapshots and gas metering.

use crate::{Cheatcode, CheatsCtxt, Cheatcodes, Result};
use crate::Vm::*;
use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolValue;
use tevm_core::constants::{COLD_SLOAD_COST, WARM_STORAGE_READ_COST};

mod mock;
pub(crate) use mock::{MockCallDataContext, MockCallQueue};

mod prank;
pub(crate) use prank::Prank;

// ----- block & environment -----

impl Cheatcode for warpCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { newTimestamp } = self;
        ccx.ecx.env.block.timestamp = *newTimestamp;
        Ok(Default::default())
    }
}

impl Cheatcode for rollCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { newHeight } = self;
        ccx.ecx.env.block.number = *newHeight;
        Ok(Default::default())
    }
}

impl Cheatcode for feeCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { newBasefee } = self;
        ccx.ecx.env.block.basefee = *newBasefee;
        Ok(Default::default())
    }
}

impl Cheatcode for difficultyCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { newDifficulty } = self;
        ccx.ecx.env.block.difficulty = *newDifficulty;
        Ok(Default::default())
    }
}

impl Cheatcode for prevrandaoCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { newPrevrandao } = self;
        ccx.ecx.env.block.prevrandao = *newPrevrandao;
        Ok(Default::default())
    }
}

impl Cheatcode for chainIdCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { newChainId } = self;
        ensure!(*newChainId <= U256::from(u64::MAX), "chain ID must be less than 2^64 - 1");
        ccx.ecx.env.cfg.chain_id = newChainId.to();
        Ok(Default::default())
    }
}

impl Cheatcode for coinbaseCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { newCoinbase } = self;
        ccx.ecx.env.block.coinbase = *newCoinbase;
        Ok(Default::default())
    }
}

impl Cheatcode for blobBaseFeeCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { newBlobBaseFee } = self;
        ccx.ecx.env.block.blob_base_fee = *newBlobBaseFee;
        Ok(Default::default())
    }
}

impl Cheatcode for getBlobBaseFeeCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self {} = self;
        Ok(ccx.ecx.env.block.blob_base_fee.abi_encode())
    }
}

impl Cheatcode for getBlockNumberCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self {} = self;
        Ok(ccx.ecx.env.block.number.abi_encode())
    }
}

impl Cheatcode for getBlockTimestampCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self {} = self;
        Ok(ccx.ecx.env.block.timestamp.abi_encode())
    }
}

impl Cheatcode for txGasPriceCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { newGasPrice } = self;
        ccx.ecx.env.tx.gas_price = *newGasPrice;
        Ok(Default::default())
    }
}

impl Cheatcode for setBlockhashCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { blockNumber, blockHash } = self;
        ensure!(
            *blockNumber <= ccx.ecx.env.block.number,
            "block number must be less than or equal to the current block number"
        );
        ccx.ecx.backend.set_block_hash(*blockNumber, *blockHash);
        Ok(Default::default())
    }
}

impl Cheatcode for getBlockhashCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { blockNumber } = self;
        let current = ccx.ecx.env.block.number;
        Ok(ccx.ecx.backend.block_hash(*blockNumber, current).abi_encode())
    }
}

// ----- account state -----

impl Cheatcode for loadCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { target, slot } = *self;
        ensure_not_precompile!("load", &target);
        let value = ccx.ecx.backend.sload(target, slot.into());
        charge_slot_access(ccx, value.is_cold);
        Ok(B256::from(value.data).abi_encode())
    }
}

impl Cheatcode for storeCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { target, slot, value } = *self;
        ensure_not_precompile!("store", &target);
        let prior = ccx.ecx.backend.sstore(target, slot.into(), value.into());
        charge_slot_access(ccx, prior.is_cold);
        Ok(Default::default())
    }
}

impl Cheatcode for dealCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { account, newBalance } = *self;
        let old = ccx.ecx.backend.set_balance(account, newBalance);
        trace!(target: "cheatcodes", %account, %old, new = %newBalance, "deal");
        Ok(Default::default())
    }
}

impl Cheatcode for etchCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { target, newRuntimeBytecode } = self;
        ensure_not_precompile!("etch", target);
        ccx.ecx.backend.set_code(*target, newRuntimeBytecode.clone());
        Ok(Default::default())
    }
}

impl Cheatcode for getNonceCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { account } = *self;
        Ok(ccx.ecx.backend.nonce(account).abi_encode())
    }
}

impl Cheatcode for setNonceCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { account, newNonce } = *self;
        let current = ccx.ecx.backend.nonce(account);
        ensure!(
            newNonce >= current,
            "new nonce ({newNonce}) must be strictly equal to or higher than the \
             account's current nonce ({current})"
        );
        ccx.ecx.backend.set_nonce(account, newNonce);
        Ok(Default::default())
    }
}

impl Cheatcode for setNonceUnsafeCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { account, newNonce } = *self;
        ccx.ecx.backend.set_nonce(account, newNonce);
        Ok(Default::default())
    }
}

impl Cheatcode for resetNonceCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { account } = *self;
        // Contract accounts start at nonce 1 per EIP-161.
        let nonce = if ccx.ecx.backend.code(account).is_empty() { 0 } else { 1 };
        ccx.ecx.backend.set_nonce(account, nonce);
        Ok(Default::default())
    }
}

impl Cheatcode for cloneAccountCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { source, target } = *self;
        ensure_not_precompile!("cloneAccount", &target);
        ccx.ecx.backend.clone_account(source, target);
        Ok(Default::default())
    }
}

impl Cheatcode for markWarmCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { target, slot } = *self;
        ccx.ecx.backend.mark_warm(target, slot.into());
        Ok(Default::default())
    }
}

impl Cheatcode for markColdCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { target, slot } = *self;
        ccx.ecx.backend.mark_cold(target, slot.into());
        Ok(Default::default())
    }
}

// ----- state snapshots -----

impl Cheatcode for snapshotStateCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self {} = self;
        Ok(snapshot_state(ccx))
    }
}

impl Cheatcode for revertToStateCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { snapshotId } = *self;
        Ok(revert_to_state(ccx, snapshotId))
    }
}

impl Cheatcode for deleteStateSnapshotCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { snapshotId } = *self;
        Ok(ccx.ecx.backend.delete_state_snapshot(snapshotId).abi_encode())
    }
}

impl Cheatcode for deleteStateSnapshotsCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self {} = self;
        ccx.ecx.backend.delete_state_snapshots();
        Ok(Default::default())
    }
}

impl Cheatcode for snapshotCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self {} = self;
        Ok(snapshot_state(ccx))
    }
}

impl Cheatcode for revertToCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { snapshotId } = *self;
        Ok(revert_to_state(ccx, snapshotId))
    }
}

fn snapshot_state(ccx: &mut CheatsCtxt<'_, '_>) -> Vec<u8> {
    let env = ccx.ecx.env.clone();
    ccx.ecx.backend.snapshot_state(&env).abi_encode()
}

fn revert_to_state(ccx: &mut CheatsCtxt<'_, '_>, id: U256) -> Vec<u8> {
    let tevm_core::EvmContext { env, backend, .. } = &mut *ccx.ecx;
    backend.revert_state(id, env).abi_encode()
}

// ----- gas metering -----

impl Cheatcode for pauseGasMeteringCall {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self {} = self;
        state.gas_metering.paused = true;
        Ok(Default::default())
    }
}

impl Cheatcode for resumeGasMeteringCall {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self {} = self;
        state.gas_metering.paused = false;
        Ok(Default::default())
    }
}

impl Cheatcode for resetGasMeteringCall {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self {} = self;
        state.gas_metering.reset();
        Ok(Default::default())
    }
}

impl Cheatcode for lastCallGasCall {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self {} = self;
        let Some(last_call_gas) = &state.gas_metering.last_call_gas else {
            bail!("no external call was made yet");
        };
        Ok(last_call_gas.abi_encode())
    }
}

// ----- callers & labels -----

impl Cheatcode for readCallersCall {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self {} = self;
        Ok(read_callers(ccx.state, &ccx.ecx.env.tx.caller))
    }
}

impl Cheatcode for labelCall {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self { account, newLabel } = self;
        state.labels.insert(*account, newLabel.clone());
        Ok(Default::default())
    }
}

impl Cheatcode for getLabelCall {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self { account } = self;
        Ok(match state.labels.get(account) {
            Some(label) => label.abi_encode(),
            None => format!("unlabeled:{account}").abi_encode(),
        })
    }
}

fn read_callers(state: &Cheatcodes, default_sender: &Address) -> Vec<u8> {
    let mut mode = CallerMode::None;
    let mut new_caller = *default_sender;
    let mut new_origin = *default_sender;
    if let Some(prank) = &state.prank {
        mode = if prank.single_call { CallerMode::Prank } else { CallerMode::RecurrentPrank };
        new_caller = prank.new_caller;
        if let Some(new) = prank.new_origin {
            new_origin = new;
        }
    } else if let Some(broadcast) = &state.broadcast {
        mode = if broadcast.single_call {
            CallerMode::Broadcast
        } else {
            CallerMode::RecurrentBroadcast
        };
        new_caller = broadcast.new_origin;
        new_origin = broadcast.new_origin;
    }
    (mode, new_caller, new_origin).abi_encode_params()
}

/// Charges the warm or cold storage access fee on the cheatcode frame so it
/// shows up in the frame's reported gas usage. Paused metering skips the
/// charge.
fn charge_slot_access(ccx: &mut CheatsCtxt<'_, '_>, is_cold: bool) {
    if ccx.state.gas_metering.paused {
        return;
    }
    let cost = if is_cold { COLD_SLOAD_COST } else { WARM_STORAGE_READ_COST };
    if !ccx.gas.record_cost(cost) {
        ccx.gas.spend_all();
    }
}
