// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Display};
use std::time::Duration;

/// Value reported by [`FaultDirective::abort_code_or_sentinel`] when no abort was requested.
pub const NO_ABORT: i32 = -1;

/// A single fault configuration parsed from the `x-bp-fault` header.
///
/// A directive names the server (and optionally the method) it targets, plus an optional
/// delay and an optional synthesized error. Each fault carries its own probability; both
/// probabilities default to 100%.
///
/// Directives are created by [`parse`][crate::parse] and selected by
/// [`match_directive`][crate::match_directive]. They live only for the duration of a single
/// call.
///
/// # Examples
///
/// ```
/// use faultline::FaultDirective;
///
/// let directive = FaultDirective::new("foo.default").with_abort(503, "unavailable");
///
/// assert_eq!(directive.abort_code_or_sentinel(), 503);
/// assert_eq!(directive.delay_percentage, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultDirective {
    /// Canonical address of the server the directive targets.
    pub server_address: String,
    /// Method the directive targets. Empty matches any method.
    pub server_method: String,
    /// Milliseconds to delay the call by. `None` when no delay was requested.
    pub delay_ms: Option<u64>,
    /// Probability, in percent, that the delay is applied.
    pub delay_percentage: u8,
    /// Status code of the synthesized error. `None` when no abort was requested.
    pub abort_code: Option<i32>,
    /// Message attached to the synthesized error.
    pub abort_message: String,
    /// Probability, in percent, that the abort is applied.
    pub abort_percentage: u8,
}

impl FaultDirective {
    /// Creates a directive that targets `server_address` with no faults configured.
    #[must_use]
    pub fn new(server_address: impl Into<String>) -> Self {
        Self {
            server_address: server_address.into(),
            server_method: String::new(),
            delay_ms: None,
            delay_percentage: 100,
            abort_code: None,
            abort_message: String::new(),
            abort_percentage: 100,
        }
    }

    /// Restricts the directive to a single method.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.server_method = method.into();
        self
    }

    /// Requests a delay of `delay_ms` milliseconds.
    #[must_use]
    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }

    /// Requests a synthesized error with the given code and message.
    #[must_use]
    pub fn with_abort(mut self, code: i32, message: impl Into<String>) -> Self {
        self.abort_code = Some(code);
        self.abort_message = message.into();
        self
    }

    /// Returns the requested delay, or [`Duration::ZERO`] when no delay was requested.
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms.unwrap_or_default())
    }

    /// Returns the abort code, or [`NO_ABORT`] when no abort was requested.
    #[must_use]
    pub fn abort_code_or_sentinel(&self) -> i32 {
        self.abort_code.unwrap_or(NO_ABORT)
    }

    /// Returns `true` if the directive applies to the given server and method.
    #[must_use]
    pub fn targets(&self, canonical_address: &str, method: &str) -> bool {
        !self.server_address.is_empty()
            && self.server_address == canonical_address
            && (self.server_method.is_empty() || self.server_method == method)
    }
}

/// Keys recognized in the wire encoding of a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FaultKey {
    /// `a`: the target server address.
    Address,
    /// `m`: the target method.
    Method,
    /// `d`: the delay in milliseconds.
    DelayMs,
    /// `D`: the delay probability.
    DelayPercentage,
    /// `f`: the abort code.
    AbortCode,
    /// `b`: the abort message.
    AbortMessage,
    /// `F`: the abort probability.
    AbortPercentage,
}

impl FaultKey {
    /// Looks up the key for its wire code. Codes are case sensitive.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "a" => Some(Self::Address),
            "m" => Some(Self::Method),
            "d" => Some(Self::DelayMs),
            "D" => Some(Self::DelayPercentage),
            "f" => Some(Self::AbortCode),
            "b" => Some(Self::AbortMessage),
            "F" => Some(Self::AbortPercentage),
            _ => None,
        }
    }

    /// Returns the wire code of the key.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Address => "a",
            Self::Method => "m",
            Self::DelayMs => "d",
            Self::DelayPercentage => "D",
            Self::AbortCode => "f",
            Self::AbortMessage => "b",
            Self::AbortPercentage => "F",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Method => "method",
            Self::DelayMs => "delay",
            Self::DelayPercentage => "delay percentage",
            Self::AbortCode => "abort code",
            Self::AbortMessage => "abort message",
            Self::AbortPercentage => "abort percentage",
        }
    }
}

impl Display for FaultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_defaults() {
        let directive = FaultDirective::new("foo");

        assert_eq!(directive.server_address, "foo");
        assert!(directive.server_method.is_empty());
        assert_eq!(directive.delay_ms, None);
        assert_eq!(directive.delay_percentage, 100);
        assert_eq!(directive.abort_code, None);
        assert_eq!(directive.abort_code_or_sentinel(), NO_ABORT);
        assert_eq!(directive.abort_percentage, 100);
        assert_eq!(directive.delay(), Duration::ZERO);
    }

    #[test]
    fn targets_wildcard_method() {
        let directive = FaultDirective::new("foo");

        assert!(directive.targets("foo", "any"));
        assert!(directive.targets("foo", ""));
        assert!(!directive.targets("bar", "any"));
    }

    #[test]
    fn targets_exact_method() {
        let directive = FaultDirective::new("foo").with_method("get");

        assert!(directive.targets("foo", "get"));
        assert!(!directive.targets("foo", "put"));
    }

    #[test]
    fn empty_address_never_targets() {
        let directive = FaultDirective::new("");

        assert!(!directive.targets("", "get"));
    }

    #[test]
    fn key_codes_are_consistent() {
        let keys = [
            FaultKey::Address,
            FaultKey::Method,
            FaultKey::DelayMs,
            FaultKey::DelayPercentage,
            FaultKey::AbortCode,
            FaultKey::AbortMessage,
            FaultKey::AbortPercentage,
        ];

        for key in keys {
            assert_eq!(FaultKey::from_code(key.code()), Some(key));
        }

        assert_eq!(FaultKey::from_code("A"), None);
        assert_eq!(FaultKey::from_code("delay"), None);
    }
}
