//! Caller override (`prank`) cheatcodes.

use crate::{Cheatcode, CheatsCtxt, Cheatcodes, Result, Vm::*};
use alloy_primitives::Address;

/// An active caller override.
#[derive(Clone, Copy, Debug)]
pub struct Prank {
    /// The address that initiated the prank.
    pub prank_caller: Address,
    /// The `tx.origin` at the time the prank was initiated.
    pub prank_origin: Address,
    /// The `msg.sender` to impose.
    pub new_caller: Address,
    /// The `tx.origin` to impose, if any.
    pub new_origin: Option<Address>,
    /// The call depth at which the prank was initiated.
    pub depth: u64,
    /// Whether the prank expires after the next call.
    pub single_call: bool,
    /// Whether the prank has been applied to a call yet.
    pub used: bool,
}

impl Prank {
    /// Creates a new prank, not yet applied.
    pub fn new(
        prank_caller: Address,
        prank_origin: Address,
        new_caller: Address,
        new_origin: Option<Address>,
        depth: u64,
        single_call: bool,
    ) -> Self {
        Self { prank_caller, prank_origin, new_caller, new_origin, depth, single_call, used: false }
    }

    /// Returns the used prank on its first application, `None` afterwards.
    pub fn first_time_applied(&self) -> Option<Self> {
        if self.used { None } else { Some(Self { used: true, ..*self }) }
    }
}

impl Cheatcode for prank_0Call {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { msgSender } = self;
        prank(ccx, msgSender, None, true)
    }
}

impl Cheatcode for prank_1Call {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { msgSender, txOrigin } = self;
        prank(ccx, msgSender, Some(txOrigin), true)
    }
}

impl Cheatcode for startPrank_0Call {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { msgSender } = self;
        prank(ccx, msgSender, None, false)
    }
}

impl Cheatcode for startPrank_1Call {
    fn apply_stateful(&self, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
        let Self { msgSender, txOrigin } = self;
        prank(ccx, msgSender, Some(txOrigin), false)
    }
}

impl Cheatcode for stopPrankCall {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self {} = self;
        state.prank = None;
        Ok(Default::default())
    }
}

fn prank(
    ccx: &mut CheatsCtxt<'_, '_>,
    new_caller: &Address,
    new_origin: Option<&Address>,
    single_call: bool,
) -> Result {
    ensure!(
        ccx.state.broadcast.is_none(),
        "you have an active broadcast; broadcasting and pranks are not compatible"
    );

    let prank = Prank::new(
        ccx.caller,
        ccx.ecx.env.tx.caller,
        *new_caller,
        new_origin.copied(),
        ccx.ecx.depth(),
        single_call,
    );

    if let Some(Prank { used, single_call: current_single_call, .. }) = ccx.state.prank {
        ensure!(
            used,
            "cannot override an ongoing prank with a single vm.prank; \
             use vm.startPrank to override the current prank"
        );
        ensure!(
            !single_call || current_single_call,
            "cannot override a recurrent prank with vm.prank; stop it with vm.stopPrank first"
        );
    }

    ccx.state.prank = Some(prank);
    Ok(Default::default())
}
