// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

/// Identity of the call a fault decision is made for.
///
/// On the server side the address is the service's own address and the method is the
/// endpoint being served. On the client side the address is the server being called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallTarget<'a> {
    address: &'a str,
    method: &'a str,
}

impl<'a> CallTarget<'a> {
    /// Creates a call target. The address may carry the cluster-local DNS suffix.
    #[must_use]
    pub fn new(address: &'a str, method: &'a str) -> Self {
        Self { address, method }
    }

    /// Returns the address of the target as given.
    #[must_use]
    pub fn address(&self) -> &'a str {
        self.address
    }

    /// Returns the method being called.
    #[must_use]
    pub fn method(&self) -> &'a str {
        self.method
    }
}

/// A synthesized error requested by a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abort {
    /// Status code handed to the transport.
    pub code: i32,
    /// Message handed to the transport.
    pub message: String,
}

/// Outcome of a fault decision.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Decision {
    /// Run the call unmodified.
    Resume,
    /// Wait, then run the call.
    Delay(Duration),
    /// Skip the call and return a synthesized error.
    Abort(Abort),
    /// Wait, then return a synthesized error without running the call.
    DelayThenAbort(Duration, Abort),
}

impl Decision {
    /// Returns the delay to inject, if any.
    #[must_use]
    pub fn delay(&self) -> Option<Duration> {
        match self {
            Self::Delay(delay) | Self::DelayThenAbort(delay, _) => Some(*delay),
            Self::Resume | Self::Abort(_) => None,
        }
    }

    /// Returns the abort to inject, if any.
    #[must_use]
    pub fn abort(&self) -> Option<&Abort> {
        match self {
            Self::Abort(abort) | Self::DelayThenAbort(_, abort) => Some(abort),
            Self::Resume | Self::Delay(_) => None,
        }
    }

    pub(super) fn from_parts(delay: Option<Duration>, abort: Option<Abort>) -> Self {
        match (delay, abort) {
            (None, None) => Self::Resume,
            (Some(delay), None) => Self::Delay(delay),
            (None, Some(abort)) => Self::Abort(abort),
            (Some(delay), Some(abort)) => Self::DelayThenAbort(delay, abort),
        }
    }
}
