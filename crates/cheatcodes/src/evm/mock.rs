//! Call mocking cheatcodes.

use crate::{Cheatcode, Cheatcodes, Result, Vm::*};
use alloy_primitives::{Address, Bytes, U256};
use std::cmp::Ordering;
use tevm_core::InstructionResult;

/// Matches an incoming call against a registered mock.
///
/// A mock with longer calldata is more specific and is tried first when
/// scanning for a prefix match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockCallDataContext {
    /// The calldata prefix to match. A full calldata payload matches
    /// exactly; a four byte payload matches any call with that selector.
    pub calldata: Bytes,
    /// The call value to match, if constrained.
    pub value: Option<U256>,
}

impl PartialOrd for MockCallDataContext {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MockCallDataContext {
    fn cmp(&self, other: &Self) -> Ordering {
        // Longer calldata sorts first so that prefix scans over the map hit
        // the most specific mock before any selector-level one.
        other
            .calldata
            .len()
            .cmp(&self.calldata.len())
            .then_with(|| self.calldata.cmp(&other.calldata))
            .then_with(|| self.value.cmp(&other.value))
    }
}

/// The response of a mocked call.
#[derive(Clone, Debug)]
pub struct MockCallReturnData {
    /// The frame result to report.
    pub ret_type: InstructionResult,
    /// The raw return or revert data.
    pub data: Bytes,
}

/// A sequence of mock responses.
///
/// Responses are handed out in registration order; the final response
/// persists for all further matching calls.
#[derive(Clone, Debug, Default)]
pub struct MockCallQueue {
    returns: Vec<MockCallReturnData>,
    cursor: usize,
}

impl MockCallQueue {
    /// Creates a queue over the given responses.
    pub fn new(returns: Vec<MockCallReturnData>) -> Self {
        Self { returns, cursor: 0 }
    }

    /// Returns the next response, or `None` if the queue is empty.
    pub fn next(&mut self) -> Option<MockCallReturnData> {
        let data = self.returns.get(self.cursor).cloned()?;
        if self.cursor + 1 < self.returns.len() {
            self.cursor += 1;
        }
        Some(data)
    }
}

impl Cheatcode for mockCall_0Call {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self { callee, data, returnData } = self;
        mock_call(state, callee, data, None, returnData, InstructionResult::Return);
        Ok(Default::default())
    }
}

impl Cheatcode for mockCall_1Call {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self { callee, msgValue, data, returnData } = self;
        mock_call(state, callee, data, Some(msgValue), returnData, InstructionResult::Return);
        Ok(Default::default())
    }
}

impl Cheatcode for mockCallsCall {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self { callee, data, returnData } = self;
        ensure!(!returnData.is_empty(), "mockCalls requires at least one return value");
        mock_calls(state, callee, data, None, returnData, InstructionResult::Return);
        Ok(Default::default())
    }
}

impl Cheatcode for mockCallRevertCall {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self { callee, data, revertData } = self;
        mock_call(state, callee, data, None, revertData, InstructionResult::Revert);
        Ok(Default::default())
    }
}

impl Cheatcode for mockFunctionCall {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self { callee, target, data } = self;
        state.mocked_functions.entry(*callee).or_default().insert(data.clone(), *target);
        Ok(Default::default())
    }
}

impl Cheatcode for clearMockedCallsCall {
    fn apply(&self, state: &mut Cheatcodes) -> Result {
        let Self {} = self;
        state.mocked_calls.clear();
        state.mocked_functions.clear();
        Ok(Default::default())
    }
}

fn mock_call(
    state: &mut Cheatcodes,
    callee: &Address,
    cdata: &Bytes,
    value: Option<&U256>,
    rdata: &Bytes,
    ret_type: InstructionResult,
) {
    mock_calls(state, callee, cdata, value, std::slice::from_ref(rdata), ret_type)
}

fn mock_calls(
    state: &mut Cheatcodes,
    callee: &Address,
    cdata: &Bytes,
    value: Option<&U256>,
    rdata_vec: &[Bytes],
    ret_type: InstructionResult,
) {
    state.mocked_calls.entry(*callee).or_default().insert(
        MockCallDataContext { calldata: cdata.clone(), value: value.copied() },
        MockCallQueue::new(
            rdata_vec
                .iter()
                .map(|rdata| MockCallReturnData { ret_type, data: rdata.clone() })
                .collect(),
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::bytes;

    #[test]
    fn more_specific_mocks_sort_first() {
        let selector = MockCallDataContext { calldata: bytes!("aabbccdd"), value: None };
        let full = MockCallDataContext {
            calldata: bytes!("aabbccdd00000000000000000000000000000000"),
            value: None,
        };
        assert_eq!(full.cmp(&selector), Ordering::Less);

        let mut map = std::collections::BTreeMap::new();
        map.insert(selector.clone(), 0);
        map.insert(full.clone(), 1);
        assert_eq!(map.keys().next(), Some(&full));
    }

    #[test]
    fn queue_sticks_on_last_response() {
        let mk = |b: u8| MockCallReturnData {
            ret_type: InstructionResult::Return,
            data: Bytes::from(vec![b]),
        };
        let mut queue = MockCallQueue::new(vec![mk(1), mk(2)]);
        assert_eq!(queue.next().unwrap().data, Bytes::from(vec![1]));
        assert_eq!(queue.next().unwrap().data, Bytes::from(vec![2]));
        assert_eq!(queue.next().unwrap().data, Bytes::from(vec![2]));
    }

    #[test]
    fn empty_queue_yields_nothing() {
        let mut queue = MockCallQueue::default();
        assert!(queue.next().is_none());
    }
}
