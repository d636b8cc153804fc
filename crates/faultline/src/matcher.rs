// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::ops::RangeInclusive;

use crate::{FaultDirective, ParseError, parse};

/// DNS suffix appended to service names inside a Kubernetes cluster.
pub const CLUSTER_LOCAL_SUFFIX: &str = ".svc.cluster.local";

/// Abort codes accepted by HTTP transports.
pub const HTTP_ABORT_CODES: RangeInclusive<i32> = 400..=599;

/// Abort codes accepted by Thrift transports: the `TTransportException` type ids.
pub const THRIFT_ABORT_CODES: RangeInclusive<i32> = 0..=4;

/// Returns the form of `address` that directives are matched against.
///
/// # Examples
///
/// ```
/// assert_eq!(faultline::canonical_address("users.prod.svc.cluster.local"), "users.prod");
/// assert_eq!(faultline::canonical_address("users.prod"), "users.prod");
/// ```
#[must_use]
pub fn canonical_address(address: &str) -> &str {
    address.strip_suffix(CLUSTER_LOCAL_SUFFIX).unwrap_or(address)
}

/// Selects the directive that applies to a call.
///
/// `raw_values` holds every instance of the `x-bp-fault` header in the order they were
/// received. The first directive, across all values and in encoding order, that targets
/// `canonical_address` and either names no method or names `requested_method` wins.
///
/// A candidate whose abort code lies outside `abort_codes` is reported as
/// [`ParseError::AbortCodeOutOfRange`] and skipped. Parsing carries on after a match so
/// that every malformed token in the header set is reported.
///
/// # Examples
///
/// ```
/// let (matched, errors) = faultline::match_directive(
///     ["a=bar", "a=baz, a=foo;d=10"],
///     "foo",
///     "get_user",
///     faultline::HTTP_ABORT_CODES,
/// );
///
/// assert_eq!(matched.map(|d| d.delay_ms), Some(Some(10)));
/// assert!(errors.is_empty());
/// ```
pub fn match_directive<'a>(
    raw_values: impl IntoIterator<Item = &'a str>,
    canonical_address: &str,
    requested_method: &str,
    abort_codes: RangeInclusive<i32>,
) -> (Option<FaultDirective>, Vec<ParseError>) {
    let mut matched = None;
    let mut errors = Vec::new();

    for raw in raw_values {
        let (directives, parse_errors) = parse(raw);
        errors.extend(parse_errors);

        for directive in directives {
            if !directive.targets(canonical_address, requested_method) {
                continue;
            }

            match directive.abort_code {
                Some(code) if !abort_codes.contains(&code) => errors.push(ParseError::AbortCodeOutOfRange {
                    code,
                    min: *abort_codes.start(),
                    max: *abort_codes.end(),
                }),
                _ if matched.is_none() => matched = Some(directive),
                _ => {}
            }
        }
    }

    (matched, errors)
}
