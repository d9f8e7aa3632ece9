//! Deterministic randomness cheatcodes.
//!
//! All draws come from a single [`StdRng`] owned by the controller. Seeding
//! it, either up front or with `setSeed`, makes every subsequent draw
//! reproducible; an unseeded controller draws from OS entropy on first use.

use crate::{Cheatcode, Cheatcodes, Result};
use crate::Vm::*;
use alloy_primitives::{Address, I256, U256};
use alloy_sol_types::SolValue;
use rand::{Rng, RngCore, SeedableRng, rngs::StdRng, seq::SliceRandom};

impl Cheatcodes {
    /// Returns the controller's random source, creating it on first use.
    pub(crate) fn rng(&mut self) -> &mut StdRng {
        let seed = self.seed;
        self.rng.get_or_insert_with(|| match seed {
            Some(seed) => rng_from_seed(seed),
            None => StdRng::from_os_rng(),
        })
    }
}

fn rng_from_seed(seed: U256) -> StdRng {
    StdRng::from_seed(seed.to_be_bytes::<32>())
}

impl Cheatcode for setSeedCall {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self { seed } = self;
        state.seed = Some(*seed);
        state.rng = Some(rng_from_seed(*seed));
        Ok(Default::default())
    }
}

impl Cheatcode for randomUint_0Call {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self {} = self;
        random_uint(state, None, None)
    }
}

impl Cheatcode for randomUint_1Call {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self { bits } = self;
        random_uint(state, Some(*bits), None)
    }
}

impl Cheatcode for randomUint_2Call {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self { min, max } = self;
        random_uint(state, None, Some((*min, *max)))
    }
}

impl Cheatcode for randomInt_0Call {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self {} = self;
        random_int(state, None)
    }
}

impl Cheatcode for randomInt_1Call {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self { bits } = self;
        random_int(state, Some(*bits))
    }
}

impl Cheatcode for randomAddressCall {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self {} = self;
        Ok(Address::random_with(state.rng()).abi_encode())
    }
}

impl Cheatcode for randomBytesCall {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self { len } = self;
        ensure!(
            *len <= U256::from(usize::MAX),
            "number of bytes cannot exceed {}",
            usize::MAX
        );
        let mut bytes = vec![0u8; len.to::<usize>()];
        state.rng().fill_bytes(&mut bytes);
        Ok(bytes.abi_encode())
    }
}

impl Cheatcode for shuffleCall {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self { array } = self;
        let mut shuffled = array.clone();
        shuffled.shuffle(state.rng());
        Ok(shuffled.abi_encode())
    }
}

fn random_uint(
    state: &mut Cheatcodes,
    bits: Option<U256>,
    range: Option<(U256, U256)>,
) -> Result {
    if let Some((min, max)) = range {
        ensure!(min <= max, "min must be less than or equal to max");
        let mut value: U256 = state.rng().random();
        // Map onto [min, max] unless the range already covers every value.
        let exclusive_modulo = max - min;
        if exclusive_modulo != U256::MAX {
            value %= exclusive_modulo + U256::from(1);
        }
        value += min;
        return Ok(value.abi_encode());
    }

    let mut value: U256 = state.rng().random();
    if let Some(bits) = bits {
        ensure!(bits <= U256::from(256), "number of bits cannot exceed 256");
        let bits = bits.to::<usize>();
        if bits < 256 {
            value >>= 256 - bits;
        }
    }
    Ok(value.abi_encode())
}

fn random_int(state: &mut Cheatcodes, bits: Option<U256>) -> Result {
    let raw: U256 = state.rng().random();
    let value = match bits {
        Some(bits) => {
            ensure!(bits <= U256::from(256), "number of bits cannot exceed 256");
            let bits = bits.to::<usize>();
            if bits == 0 {
                I256::ZERO
            } else {
                // Shift left then arithmetically back to sign-extend the low
                // `bits` bits.
                let shift = 256 - bits;
                I256::from_raw(raw << shift) >> shift
            }
        }
        None => I256::from_raw(raw),
    };
    Ok(value.abi_encode())
}
