//! Cheatcode errors.
//!
//! Error messages are part of the observable contract: fixtures assert on
//! exact text, so changing the wording of any message here is a breaking
//! change.

use alloy_primitives::{Address, Bytes, hex};
use alloy_sol_types::{Revert, SolError};
use std::{borrow::Cow, fmt};

/// Cheatcode result type. `Ok` carries the ABI-encoded return data.
pub type Result<T = Vec<u8>, E = Error> = std::result::Result<T, E>;

/// Formats an [`Error`] from format arguments.
macro_rules! fmt_err {
    ($($t:tt)*) => {
        $crate::Error::from(::std::format!($($t)*))
    };
}

/// Returns early with a formatted [`Error`].
macro_rules! bail {
    ($($t:tt)*) => {
        return ::std::result::Result::Err(fmt_err!($($t)*))
    };
}

/// Returns early with a formatted [`Error`] if the condition does not hold.
macro_rules! ensure {
    ($cond:expr, $($t:tt)*) => {
        if !$cond {
            bail!($($t)*);
        }
    };
}

/// Refuses to operate on a precompile address.
///
/// The message is prefixed with the cheatcode name per the error contract.
macro_rules! ensure_not_precompile {
    ($op:literal, $address:expr) => {
        if ::tevm_core::constants::is_precompile(*$address) {
            return ::std::result::Result::Err($crate::error::precompile_error($op, $address));
        }
    };
}

pub(crate) fn precompile_error(op: &str, address: &Address) -> Error {
    fmt_err!("{op}: cannot modify precompile {address}")
}

/// An error thrown by a cheatcode: either a human-readable message, encoded
/// on the wire as an `Error(string)` revert, or raw revert bytes passed
/// through verbatim (used for the assume/skip magic payloads).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error(ErrorRepr);

#[derive(Clone, Debug, PartialEq, Eq)]
enum ErrorRepr {
    Str(Cow<'static, str>),
    Bytes(Cow<'static, [u8]>),
}

impl Error {
    /// Creates an error from raw revert bytes, passed through unencoded.
    pub fn from_bytes(bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        Self(ErrorRepr::Bytes(bytes.into()))
    }

    /// Returns `true` if this error carries a human-readable message.
    pub fn is_str(&self) -> bool {
        matches!(self.0, ErrorRepr::Str(_))
    }

    /// Returns the raw error payload, before ABI encoding.
    pub fn data(&self) -> &[u8] {
        match &self.0 {
            ErrorRepr::Str(s) => s.as_bytes(),
            ErrorRepr::Bytes(b) => b,
        }
    }

    /// ABI-encodes this error as a revert payload.
    pub fn abi_encode(&self) -> Vec<u8> {
        match &self.0 {
            ErrorRepr::Str(s) => Revert::from(s.as_ref()).abi_encode(),
            ErrorRepr::Bytes(b) => b.to_vec(),
        }
    }

    /// Shorthand for encoding a displayable message as a revert payload.
    pub fn encode(msg: impl fmt::Display) -> Bytes {
        Self::from(msg.to_string()).abi_encode().into()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            ErrorRepr::Str(s) => f.write_str(s),
            ErrorRepr::Bytes(b) => f.write_str(&hex::encode_prefixed(b)),
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Self(ErrorRepr::Str(value.into()))
    }
}

impl From<&'static str> for Error {
    fn from(value: &'static str) -> Self {
        Self(ErrorRepr::Str(value.into()))
    }
}

impl From<&'static [u8]> for Error {
    fn from(value: &'static [u8]) -> Self {
        Self(ErrorRepr::Bytes(value.into()))
    }
}

impl From<Vec<u8>> for Error {
    fn from(value: Vec<u8>) -> Self {
        Self(ErrorRepr::Bytes(value.into()))
    }
}

impl From<alloy_sol_types::Error> for Error {
    fn from(value: alloy_sol_types::Error) -> Self {
        Self(ErrorRepr::Str(value.to_string().into()))
    }
}

impl From<tevm_core::BackendError> for Error {
    fn from(value: tevm_core::BackendError) -> Self {
        Self(ErrorRepr::Str(value.to_string().into()))
    }
}
