//! A minimal host executor driving the controller through its hook surface.

#![allow(dead_code)]

use alloy_primitives::{Address, Bytes, U256, address};
use alloy_sol_types::{Revert, SolCall, SolError};
use tevm_cheatcodes::Cheatcodes;
use tevm_core::{
    CallInputs, CallOutcome, CallScheme, CreateInputs, CreateOutcome, CreateScheme, EvmContext,
    Gas, InstructionResult,
    constants::{CHEATCODE_ADDRESS, TEST_CONTRACT_ADDRESS},
};

/// An arbitrary non-precompile target account.
pub const TARGET: Address = address!("00000000000000000000000000000000000000aa");

/// Gas the simulated host charges for every executed call.
pub const SIMULATED_CALL_COST: u64 = 21_000;

pub struct TestHost {
    pub cheats: Cheatcodes,
    pub ecx: EvmContext,
}

impl TestHost {
    pub fn new() -> Self {
        Self { cheats: Cheatcodes::new(), ecx: EvmContext::new() }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { cheats: Cheatcodes::with_seed(U256::from(seed)), ecx: EvmContext::new() }
    }

    /// Performs a cheatcode call as the test contract.
    pub fn cheat_raw(&mut self, call: impl SolCall) -> CallOutcome {
        let mut inputs = CallInputs {
            input: call.abi_encode().into(),
            gas_limit: 1_000_000,
            target_address: CHEATCODE_ADDRESS,
            bytecode_address: CHEATCODE_ADDRESS,
            caller: TEST_CONTRACT_ADDRESS,
            value: U256::ZERO,
            scheme: CallScheme::Call,
            is_static: false,
        };
        let outcome = self
            .cheats
            .call(&mut self.ecx, &mut inputs)
            .expect("cheatcode calls always produce an outcome");
        self.cheats.call_end(&mut self.ecx, &inputs, outcome)
    }

    /// Performs a cheatcode call and decodes its return value, panicking on
    /// revert.
    pub fn cheat<C: SolCall>(&mut self, call: C) -> C::Return {
        let outcome = self.cheat_raw(call);
        assert!(
            !outcome.is_revert(),
            "cheatcode {} reverted: {}",
            C::SIGNATURE,
            revert_reason(&outcome.output)
        );
        C::abi_decode_returns(&outcome.output).expect("return data decodes")
    }

    /// Performs a cheatcode call that must revert, returning the reason.
    pub fn cheat_err(&mut self, call: impl SolCall) -> String {
        let outcome = self.cheat_raw(call);
        assert!(outcome.is_revert(), "expected cheatcode to revert");
        revert_reason(&outcome.output)
    }

    /// Runs an external call through both hooks, simulating execution with
    /// the given result unless the controller short-circuits it.
    pub fn run_call(
        &mut self,
        inputs: &mut CallInputs,
        result: InstructionResult,
        output: Bytes,
    ) -> CallOutcome {
        if let Some(outcome) = self.cheats.call(&mut self.ecx, inputs) {
            return self.cheats.call_end(&mut self.ecx, inputs, outcome);
        }
        let mut gas = Gas::new(inputs.gas_limit);
        let _ = gas.record_cost(SIMULATED_CALL_COST);
        let outcome = CallOutcome { result, output, gas };
        self.cheats.call_end(&mut self.ecx, inputs, outcome)
    }

    /// Shorthand for a successful empty-result call.
    pub fn run_ok(&mut self, inputs: &mut CallInputs) -> CallOutcome {
        self.run_call(inputs, InstructionResult::Return, Bytes::new())
    }

    /// Runs a contract creation through both hooks.
    pub fn run_create(
        &mut self,
        inputs: &mut CreateInputs,
        result: InstructionResult,
    ) -> CreateOutcome {
        if let Some(outcome) = self.cheats.create(&mut self.ecx, inputs) {
            return self.cheats.create_end(&mut self.ecx, inputs, outcome);
        }
        let address = result.is_ok().then(|| address!("00000000000000000000000000000000000000cc"));
        let gas = Gas::new(inputs.gas_limit);
        let outcome = CreateOutcome { result, address, output: Bytes::new(), gas };
        self.cheats.create_end(&mut self.ecx, inputs, outcome)
    }
}

/// A plain call from the test contract to `target`.
pub fn call_to(target: Address) -> CallInputs {
    CallInputs {
        input: Bytes::from_static(&[0xaa, 0xbb, 0xcc, 0xdd]),
        gas_limit: 100_000,
        target_address: target,
        bytecode_address: target,
        caller: TEST_CONTRACT_ADDRESS,
        value: U256::ZERO,
        scheme: CallScheme::Call,
        is_static: false,
    }
}

/// A plain creation by the test contract.
pub fn create_with(init_code: Bytes) -> CreateInputs {
    CreateInputs {
        caller: TEST_CONTRACT_ADDRESS,
        scheme: CreateScheme::Create,
        value: U256::ZERO,
        init_code,
        gas_limit: 100_000,
    }
}

/// Decodes an `Error(string)` revert payload, falling back to hex.
pub fn revert_reason(output: &Bytes) -> String {
    Revert::abi_decode(output).map(|r| r.reason).unwrap_or_else(|_| output.to_string())
}
