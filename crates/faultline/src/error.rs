// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::FaultKey;

/// A malformed token encountered while reading fault headers.
///
/// Parse errors never fail a call. They are collected while parsing, reported through logs,
/// and the affected directive is ignored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A pair did not contain `=`.
    #[error("invalid key-value pair: {pair:?}")]
    MalformedPair {
        /// The offending pair.
        pair: String,
    },

    /// A pair used a key outside the wire key table.
    #[error("unknown key: {key:?}")]
    UnknownKey {
        /// The offending key.
        key: String,
    },

    /// A numeric field could not be parsed as an integer of the expected kind.
    #[error("provided {key} {value:?} is not a valid integer")]
    InvalidInteger {
        /// The field that carried the value.
        key: FaultKey,
        /// The offending value.
        value: String,
    },

    /// A percentage was outside of `[0, 100]`.
    #[error("provided {key} {value} is outside the valid range of [0-100]")]
    PercentageOutOfRange {
        /// The field that carried the value.
        key: FaultKey,
        /// The parsed value.
        value: i64,
    },

    /// An abort code was outside of the range accepted by the transport.
    #[error("provided abort code {code} is outside the valid range of [{min}-{max}]")]
    AbortCodeOutOfRange {
        /// The parsed code.
        code: i32,
        /// Smallest code accepted by the transport.
        min: i32,
        /// Largest code accepted by the transport.
        max: i32,
    },
}
