//! Broadcast cheatcodes.
//!
//! Broadcasts only mark calls as sent by an external signer; there is no
//! transaction collection or signing here, only the caller-mode bookkeeping
//! that `readCallers` and the call hooks observe.

use crate::{Cheatcode, CheatsCtxt, Cheatcodes, Result, Vm::*};
use alloy_primitives::Address;
use tevm_core::constants::DEFAULT_SENDER;

/// An active broadcast.
#[derive(Clone, Copy, Debug)]
pub struct Broadcast {
    /// The signer imposed as `msg.sender` and `tx.origin`.
    pub new_origin: Address,
    /// The address that initiated the broadcast.
    pub original_caller: Address,
    /// The `tx.origin` at the time the broadcast was initiated.
    pub original_origin: Address,
    /// The call depth at which the broadcast was initiated.
    pub depth: u64,
    /// Whether the broadcast expires after the next call.
    pub single_call: bool,
}

impl Cheatcode for broadcast_0Call {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self {} = self;
        broadcast(ccx, None, true)
    }
}

impl Cheatcode for broadcast_1Call {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { signer } = self;
        broadcast(ccx, Some(signer), true)
    }
}

impl Cheatcode for startBroadcast_0Call {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self {} = self;
        broadcast(ccx, None, false)
    }
}

impl Cheatcode for startBroadcast_1Call {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { signer } = self;
        broadcast(ccx, Some(signer), false)
    }
}

impl Cheatcode for stopBroadcastCall {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self {} = self;
        ensure!(state.broadcast.is_some(), "no broadcast in progress to stop");
        state.broadcast = None;
        Ok(Default::default())
    }
}

fn broadcast(ccx: &mut CheatsCtxt<'_, '_>, signer: Option<&Address>, single_call: bool) -> Result {
    ensure!(
        ccx.state.prank.is_none(),
        "you have an active prank; broadcasting and pranks are not compatible"
    );
    ensure!(
        ccx.state.broadcast.is_none(),
        "a broadcast is active; stop it with `stopBroadcast` before starting a new one"
    );

    let broadcast = Broadcast {
        new_origin: signer.copied().unwrap_or(DEFAULT_SENDER),
        original_caller: ccx.caller,
        original_origin: ccx.ecx.env.tx.caller,
        depth: ccx.ecx.depth(),
        single_call,
    };
    debug!(target: "cheatcodes", ?broadcast, "started");
    ccx.state.broadcast = Some(broadcast);
    Ok(Default::default())
}
