//! The per-test execution context handed to every cheatcode.

use crate::{backend::Backend, env::Env};

/// Mutable EVM execution context for a single test.
///
/// Each test owns exactly one `EvmContext`; nothing in it is shared across
/// concurrently running tests. The host executor is responsible for keeping
/// [`depth`](Self::depth) in sync with its call stack: hooks and cheatcodes
/// observe the depth of the frame that initiated the current call.
#[derive(Clone, Debug, Default)]
pub struct EvmContext {
    /// The execution environment registers.
    pub env: Env,
    /// The chain state store.
    pub backend: Backend,
    /// The current call depth. The test function body runs at depth 1.
    pub depth: u64,
}

impl EvmContext {
    /// Creates a fresh context at test level.
    pub fn new() -> Self {
        Self { depth: 1, ..Default::default() }
    }

    /// Returns the current call depth.
    #[inline]
    pub fn depth(&self) -> u64 {
        self.depth
    }
}
