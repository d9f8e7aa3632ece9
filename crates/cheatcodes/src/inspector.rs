//! The cheatcode controller.
//!
//! [`Cheatcodes`] holds all cheatcode state for a single test and exposes
//! the hooks the host executor drives: [`call`](Cheatcodes::call) and
//! [`create`](Cheatcodes::create) before a frame runs,
//! [`call_end`](Cheatcodes::call_end) and
//! [`create_end`](Cheatcodes::create_end) after it completes, and
//! [`finish`](Cheatcodes::finish) when the test function returns.

use crate::{
    CheatsCtxt, Error, Result, Vm,
    evm::{MockCallDataContext, MockCallQueue, Prank},
    script::Broadcast,
    test::{AssumeNoRevert, ExpectedCreate, ExpectedRevert, handle_expect_revert},
};
use alloy_primitives::{
    Address, Bytes, U256,
    map::AddressHashMap,
};
use alloy_sol_types::SolInterface;
use rand::rngs::StdRng;
use std::collections::BTreeMap;
use tevm_core::{
    CallInputs, CallOutcome, CreateInputs, CreateOutcome, EvmContext, Gas, InstructionResult,
    constants::{CHEATCODE_ADDRESS, MAGIC_ASSUME},
};

/// Lists every cheatcode of the [`Vm`] interface.
macro_rules! vm_calls {
    ($mac:ident) => {
        $mac!(
            warp, roll, fee, difficulty, prevrandao, chainId, coinbase, blobBaseFee,
            getBlobBaseFee, getBlockNumber, getBlockTimestamp, txGasPrice, setBlockhash,
            getBlockhash, load, store, deal, etch, getNonce, setNonce, setNonceUnsafe,
            resetNonce, cloneAccount, markWarm, markCold, snapshotState, revertToState,
            deleteStateSnapshot, deleteStateSnapshots, snapshot, revertTo, pauseGasMetering,
            resumeGasMetering, resetGasMetering, lastCallGas, prank_0, prank_1, startPrank_0,
            startPrank_1, stopPrank, readCallers, broadcast_0, broadcast_1, startBroadcast_0,
            startBroadcast_1, stopBroadcast, mockCall_0, mockCall_1, mockCalls, mockCallRevert,
            mockFunction, clearMockedCalls, expectRevert_0, expectRevert_1, expectRevert_2,
            expectCreate, assume, assumeNoRevert_0, assumeNoRevert_1, assumeNoRevert_2, skip,
            setSeed, randomUint_0, randomUint_1, randomUint_2, randomInt_0, randomInt_1,
            randomAddress, randomBytes, shuffle, label, getLabel
        )
    };
}

fn apply_dispatch(calls: &Vm::VmCalls, ccx: &mut CheatsCtxt<'_, '_>) -> Result {
    macro_rules! dispatch {
        ($($variant:ident),* $(,)?) => {
            match calls {
                $(
                    Vm::VmCalls::$variant(cheat) => {
                        trace!(target: "cheatcodes", cheatcode = stringify!($variant), "applying");
                        crate::Cheatcode::apply_stateful(cheat, ccx)
                    }
                )*
            }
        };
    }
    vm_calls!(dispatch)
}

/// Gas metering state.
#[derive(Clone, Debug, Default)]
pub struct GasMetering {
    /// Whether metering is paused. While paused, completed frames report
    /// zero gas usage.
    pub paused: bool,
    /// The gas usage of the most recent completed call.
    pub last_call_gas: Option<Vm::Gas>,
}

impl GasMetering {
    /// Unpauses metering and clears the call record.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Cheatcode state and host hooks for a single test.
///
/// Interception state (pranks, mocks, expectations) is cleared by
/// [`finish`](Self::finish); labels and the random source persist for the
/// lifetime of the controller.
#[derive(Clone, Debug, Default)]
pub struct Cheatcodes {
    /// Address labels for test output.
    pub labels: AddressHashMap<String>,
    /// The active caller override, if any.
    pub prank: Option<Prank>,
    /// The active broadcast, if any.
    pub broadcast: Option<Broadcast>,
    /// The armed revert expectation, if any.
    pub expected_revert: Option<ExpectedRevert>,
    /// Contract creations that must happen before the test ends.
    pub expected_creates: Vec<ExpectedCreate>,
    /// The armed revert assumption, if any.
    pub assume_no_revert: Option<AssumeNoRevert>,
    /// Registered call mocks, most specific calldata first.
    pub mocked_calls: AddressHashMap<BTreeMap<MockCallDataContext, MockCallQueue>>,
    /// Registered function redirects, keyed by callee then calldata.
    pub mocked_functions: AddressHashMap<BTreeMap<Bytes, Address>>,
    /// Gas metering state.
    pub gas_metering: GasMetering,
    /// The seed of the random source, if one was set.
    pub seed: Option<U256>,
    /// The random source, created lazily on first use.
    pub rng: Option<StdRng>,
}

impl Cheatcodes {
    /// Creates a fresh, unseeded controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a controller whose random source is seeded with `seed`.
    pub fn with_seed(seed: U256) -> Self {
        Self { seed: Some(seed), ..Default::default() }
    }

    /// Decodes and applies a cheatcode call.
    fn apply_cheatcode(
        &mut self,
        ecx: &mut EvmContext,
        call: &CallInputs,
        gas: &mut Gas,
    ) -> Result {
        let decoded = Vm::VmCalls::abi_decode(&call.input)?;
        let ccx = &mut CheatsCtxt { state: self, ecx, gas, caller: call.caller };
        apply_dispatch(&decoded, ccx)
    }

    /// Hook invoked before the host executes an outgoing call.
    ///
    /// Returning an outcome short-circuits execution: the host must treat it
    /// as the result of the call and still invoke
    /// [`call_end`](Self::call_end) with it.
    pub fn call(&mut self, ecx: &mut EvmContext, call: &mut CallInputs) -> Option<CallOutcome> {
        let mut gas = Gas::new(call.gas_limit);

        if call.target_address == CHEATCODE_ADDRESS {
            return Some(match self.apply_cheatcode(ecx, call, &mut gas) {
                Ok(retdata) => CallOutcome::new_return(retdata, gas),
                Err(err) => CallOutcome::new_revert(err.abi_encode(), gas),
            });
        }

        // Redirect mocked functions to the code of their target. An exact
        // calldata match wins over the longest matching prefix.
        if let Some(targets) = self.mocked_functions.get(&call.bytecode_address) {
            let target = targets.get(&call.input).or_else(|| {
                targets
                    .iter()
                    .filter(|(calldata, _)| call.input.starts_with(calldata))
                    .max_by_key(|(calldata, _)| calldata.len())
                    .map(|(_, target)| target)
            });
            if let Some(target) = target {
                call.bytecode_address = *target;
            }
        }

        // Mocked calls short-circuit execution entirely.
        if let Some(mocks) = self.mocked_calls.get_mut(&call.target_address) {
            let exact =
                MockCallDataContext { calldata: call.input.clone(), value: Some(call.value) };
            let mock = if mocks.contains_key(&exact) {
                Some(exact)
            } else {
                // The map orders more specific mocks first, so the first
                // prefix hit is the tightest match.
                mocks
                    .keys()
                    .find(|mock| {
                        call.input.starts_with(&mock.calldata)
                            && mock.value.is_none_or(|value| value == call.value)
                    })
                    .cloned()
            };
            if let Some(ret) = mock.and_then(|mock| mocks.get_mut(&mock)).and_then(|q| q.next()) {
                return Some(CallOutcome { result: ret.ret_type, output: ret.data, gas });
            }
        }

        // Apply an active prank at the depth it was initiated.
        if let Some(prank) = &self.prank {
            if ecx.depth() >= prank.depth && call.caller == prank.prank_caller {
                let mut applied = false;
                if ecx.depth() == prank.depth {
                    call.caller = prank.new_caller;
                    applied = true;
                }
                if let Some(new_origin) = prank.new_origin {
                    ecx.env.tx.caller = new_origin;
                    applied = true;
                }
                if applied {
                    if let Some(used) = prank.first_time_applied() {
                        self.prank = Some(used);
                    }
                }
            }
        }

        // Apply an active broadcast at the depth it was initiated.
        if let Some(broadcast) = &self.broadcast {
            if ecx.depth() == broadcast.depth && call.caller == broadcast.original_caller {
                if call.is_static {
                    return Some(CallOutcome::new_revert(
                        Error::encode(
                            "staticcalls are not allowed after `broadcast`; \
                             use `startBroadcast` instead",
                        ),
                        gas,
                    ));
                }
                ecx.env.tx.caller = broadcast.new_origin;
                call.caller = broadcast.new_origin;
            }
        }

        None
    }

    /// Hook invoked after the host finishes an outgoing call, including
    /// calls short-circuited by [`call`](Self::call).
    pub fn call_end(
        &mut self,
        ecx: &mut EvmContext,
        call: &CallInputs,
        mut outcome: CallOutcome,
    ) -> CallOutcome {
        if call.target_address == CHEATCODE_ADDRESS {
            return outcome;
        }

        // Expire single-shot pranks and restore the origin.
        if let Some(prank) = &self.prank {
            if ecx.depth() == prank.depth {
                if prank.new_origin.is_some() {
                    ecx.env.tx.caller = prank.prank_origin;
                }
                if prank.single_call {
                    self.prank = None;
                }
            }
        }

        // Likewise for broadcasts.
        if let Some(broadcast) = &self.broadcast {
            if ecx.depth() == broadcast.depth {
                ecx.env.tx.caller = broadcast.original_origin;
                if broadcast.single_call {
                    self.broadcast = None;
                }
            }
        }

        // An armed assumption converts an accepted revert into an input
        // rejection; any other outcome just disarms it.
        if let Some(assume) = self.assume_no_revert.take_if(|a| ecx.depth() <= a.depth) {
            if outcome.result.is_revert() && assume.matches(&outcome.output, call.target_address)
            {
                outcome.output = Bytes::from_static(MAGIC_ASSUME);
            }
        }

        // An armed expectation inverts the frame result.
        if let Some(expected) = self.expected_revert.take_if(|e| ecx.depth() <= e.depth) {
            match handle_expect_revert(
                false,
                expected.reason.as_deref().map(|v| &**v),
                outcome.result,
                &outcome.output,
            ) {
                Ok((_, retdata)) => {
                    outcome.result = InstructionResult::Return;
                    outcome.output = retdata;
                }
                Err(err) => {
                    outcome.result = InstructionResult::Revert;
                    outcome.output = err.abi_encode().into();
                }
            }
        }

        if self.gas_metering.paused {
            outcome.gas.reset();
        }
        self.gas_metering.last_call_gas = Some(Vm::Gas {
            gasLimit: outcome.gas.limit(),
            gasTotalUsed: outcome.gas.spent(),
            gasMemoryUsed: outcome.gas.memory(),
            gasRefunded: outcome.gas.refunded(),
            gasRemaining: outcome.gas.remaining(),
        });

        outcome
    }

    /// Hook invoked before the host executes a contract creation.
    pub fn create(
        &mut self,
        ecx: &mut EvmContext,
        call: &mut CreateInputs,
    ) -> Option<CreateOutcome> {
        if let Some(prank) = &self.prank {
            if ecx.depth() >= prank.depth && call.caller == prank.prank_caller {
                let mut applied = false;
                if ecx.depth() == prank.depth {
                    call.caller = prank.new_caller;
                    applied = true;
                }
                if let Some(new_origin) = prank.new_origin {
                    ecx.env.tx.caller = new_origin;
                    applied = true;
                }
                if applied {
                    if let Some(used) = prank.first_time_applied() {
                        self.prank = Some(used);
                    }
                }
            }
        }

        if let Some(broadcast) = &self.broadcast {
            if ecx.depth() == broadcast.depth && call.caller == broadcast.original_caller {
                ecx.env.tx.caller = broadcast.new_origin;
                call.caller = broadcast.new_origin;
            }
        }

        None
    }

    /// Hook invoked after the host finishes a contract creation.
    pub fn create_end(
        &mut self,
        ecx: &mut EvmContext,
        call: &CreateInputs,
        mut outcome: CreateOutcome,
    ) -> CreateOutcome {
        if let Some(prank) = &self.prank {
            if ecx.depth() == prank.depth {
                if prank.new_origin.is_some() {
                    ecx.env.tx.caller = prank.prank_origin;
                }
                if prank.single_call {
                    self.prank = None;
                }
            }
        }

        if let Some(broadcast) = &self.broadcast {
            if ecx.depth() == broadcast.depth {
                ecx.env.tx.caller = broadcast.original_origin;
                if broadcast.single_call {
                    self.broadcast = None;
                }
            }
        }

        if let Some(expected) = self.expected_revert.take_if(|e| ecx.depth() <= e.depth) {
            match handle_expect_revert(
                true,
                expected.reason.as_deref().map(|v| &**v),
                outcome.result,
                &outcome.output,
            ) {
                Ok((address, retdata)) => {
                    outcome.result = InstructionResult::Return;
                    outcome.address = address;
                    outcome.output = retdata;
                }
                Err(err) => {
                    outcome.result = InstructionResult::Revert;
                    outcome.output = err.abi_encode().into();
                }
            }
        }

        // Tick off expected creations.
        if outcome.result.is_ok() {
            if let Some(index) = self.expected_creates.iter().position(|expected| {
                expected.deployer == call.caller && expected.bytecode == call.init_code
            }) {
                self.expected_creates.swap_remove(index);
            }
        }

        if self.gas_metering.paused {
            outcome.gas.reset();
        }

        outcome
    }

    /// Invoked by the host when the test function returns.
    ///
    /// Reports expectations that were never satisfied and clears all
    /// interception state; labels and the random source survive.
    pub fn finish(&mut self) -> Result<(), Error> {
        let result = self.deferred_failure();
        self.prank = None;
        self.broadcast = None;
        self.expected_revert = None;
        self.expected_creates.clear();
        self.assume_no_revert = None;
        self.mocked_calls.clear();
        self.mocked_functions.clear();
        self.gas_metering.reset();
        result
    }

    fn deferred_failure(&self) -> Result<(), Error> {
        if self.expected_revert.is_some() {
            bail!("expected a revert, but no call reverted before the test ended");
        }
        if let Some(expected) = self.expected_creates.first() {
            bail!(
                "expected contract creation by {} with the given init code, but none occurred",
                expected.deployer
            );
        }
        Ok(())
    }
}
