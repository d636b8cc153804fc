// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::{FaultDirective, FaultKey, ParseError};

pub(crate) const DIRECTIVE_SEPARATOR: char = ',';
pub(crate) const PAIR_SEPARATOR: char = ';';
pub(crate) const KEY_VALUE_SEPARATOR: char = '=';

/// Parses a single raw value of the `x-bp-fault` header.
///
/// The value is a comma-separated list of directives, each directive a semicolon-separated
/// list of `key=value` pairs:
///
/// | Key | Field |
/// |-----|-------|
/// | `a` | [`server_address`][FaultDirective::server_address] |
/// | `m` | [`server_method`][FaultDirective::server_method] |
/// | `d` | [`delay_ms`][FaultDirective::delay_ms] |
/// | `D` | [`delay_percentage`][FaultDirective::delay_percentage] |
/// | `f` | [`abort_code`][FaultDirective::abort_code] |
/// | `b` | [`abort_message`][FaultDirective::abort_message] |
/// | `F` | [`abort_percentage`][FaultDirective::abort_percentage] |
///
/// Every malformed token yields one [`ParseError`] and parsing carries on with the rest of
/// the value. A directive that produced an error is left out of the returned directives.
/// A directive without an address is dropped silently: it does not apply to anyone.
/// Whitespace around keys and values is ignored.
///
/// # Examples
///
/// ```
/// let (directives, errors) = faultline::parse("a=foo;d=100;D=50, bogus");
///
/// assert_eq!(directives.len(), 1);
/// assert_eq!(directives[0].delay_ms, Some(100));
/// assert_eq!(directives[0].delay_percentage, 50);
/// assert_eq!(errors.len(), 1);
/// ```
#[must_use]
pub fn parse(raw: &str) -> (Vec<FaultDirective>, Vec<ParseError>) {
    let mut directives = Vec::new();
    let mut errors = Vec::new();

    for text in raw.split(DIRECTIVE_SEPARATOR).map(str::trim).filter(|text| !text.is_empty()) {
        let known_errors = errors.len();
        let directive = parse_directive(text, &mut errors);

        if errors.len() == known_errors && !directive.server_address.is_empty() {
            directives.push(directive);
        }
    }

    (directives, errors)
}

fn parse_directive(text: &str, errors: &mut Vec<ParseError>) -> FaultDirective {
    let mut directive = FaultDirective::new(String::new());

    for pair in text.split(PAIR_SEPARATOR).filter(|pair| !pair.trim().is_empty()) {
        let Some((code, value)) = pair.split_once(KEY_VALUE_SEPARATOR) else {
            errors.push(ParseError::MalformedPair { pair: pair.to_string() });
            continue;
        };

        let (code, value) = (code.trim(), value.trim());

        let Some(key) = FaultKey::from_code(code) else {
            errors.push(ParseError::UnknownKey { key: code.to_string() });
            continue;
        };

        if let Err(error) = apply(&mut directive, key, value) {
            errors.push(error);
        }
    }

    directive
}

fn apply(directive: &mut FaultDirective, key: FaultKey, value: &str) -> Result<(), ParseError> {
    match key {
        FaultKey::Address => directive.server_address = value.to_string(),
        FaultKey::Method => directive.server_method = value.to_string(),
        FaultKey::DelayMs => directive.delay_ms = Some(parse_delay_ms(value)?),
        FaultKey::DelayPercentage => directive.delay_percentage = parse_percentage(key, value)?,
        FaultKey::AbortCode => directive.abort_code = Some(parse_abort_code(value)?),
        FaultKey::AbortMessage => directive.abort_message = value.to_string(),
        FaultKey::AbortPercentage => directive.abort_percentage = parse_percentage(key, value)?,
    }

    Ok(())
}

/// Parses a probability in percent. An empty value means "always".
pub(crate) fn parse_percentage(key: FaultKey, value: &str) -> Result<u8, ParseError> {
    if value.is_empty() {
        return Ok(100);
    }

    let percentage = value
        .trim()
        .parse::<i64>()
        .ok()
        .ok_or_else(|| invalid_integer(key, value))?;

    u8::try_from(percentage)
        .ok()
        .filter(|percentage| *percentage <= 100)
        .ok_or(ParseError::PercentageOutOfRange { key, value: percentage })
}

pub(crate) fn parse_delay_ms(value: &str) -> Result<u64, ParseError> {
    value.trim().parse().ok().ok_or_else(|| invalid_integer(FaultKey::DelayMs, value))
}

pub(crate) fn parse_abort_code(value: &str) -> Result<i32, ParseError> {
    value.trim().parse().ok().ok_or_else(|| invalid_integer(FaultKey::AbortCode, value))
}

fn invalid_integer(key: FaultKey, value: &str) -> ParseError {
    ParseError::InvalidInteger {
        key,
        value: value.to_string(),
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn empty_value() {
        let (directives, errors) = parse("");

        assert!(directives.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn address_only_uses_defaults() {
        let (directives, errors) = parse("a=foo");

        assert!(errors.is_empty());
        assert_eq!(directives, vec![FaultDirective::new("foo")]);
    }

    #[test]
    fn all_fields() {
        let (directives, errors) = parse("a=foo;m=bar;d=100;D=50;f=500;b=Fault injected!;F=75");

        assert!(errors.is_empty());
        assert_eq!(
            directives,
            vec![FaultDirective {
                server_address: "foo".to_string(),
                server_method: "bar".to_string(),
                delay_ms: Some(100),
                delay_percentage: 50,
                abort_code: Some(500),
                abort_message: "Fault injected!".to_string(),
                abort_percentage: 75,
            }]
        );
    }

    #[test]
    fn multiple_directives_keep_encoding_order() {
        let (directives, errors) = parse("a=foo;d=1,  a=bar;d=2 ,a=baz");

        assert!(errors.is_empty());
        let addresses: Vec<_> = directives.iter().map(|d| d.server_address.as_str()).collect();
        assert_eq!(addresses, ["foo", "bar", "baz"]);
        assert_eq!(directives[1].delay_ms, Some(2));
    }

    #[test]
    fn missing_address_is_silent() {
        let (directives, errors) = parse("m=bar;d=10;f=500");

        assert!(directives.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn empty_address_is_silent() {
        let (directives, errors) = parse("a=;d=10");

        assert!(directives.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn message_may_contain_separator() {
        let (directives, _) = parse("a=foo;f=500;b=x=y");

        assert_eq!(directives[0].abort_message, "x=y");
    }

    #[test]
    fn trailing_separators_are_ignored() {
        let (directives, errors) = parse("a=foo;d=5;,");

        assert!(errors.is_empty());
        assert_eq!(directives.len(), 1);
    }

    #[test]
    fn whitespace_around_keys_and_values_is_ignored() {
        let (directives, errors) = parse("a=foo ; m= bar ;d = 10;b= boom ");

        assert!(errors.is_empty());
        assert_eq!(directives[0].server_address, "foo");
        assert_eq!(directives[0].server_method, "bar");
        assert_eq!(directives[0].delay_ms, Some(10));
        assert_eq!(directives[0].abort_message, "boom");
    }

    #[test]
    fn unknown_key_is_reported_trimmed() {
        let (_, errors) = parse("a=foo; x =1");

        assert_eq!(errors, vec![ParseError::UnknownKey { key: "x".to_string() }]);
    }

    #[test]
    fn repeated_key_last_wins() {
        let (directives, _) = parse("a=foo;d=5;d=7");

        assert_eq!(directives[0].delay_ms, Some(7));
    }

    #[test]
    fn errors_do_not_stop_sibling_directives() {
        let (directives, errors) = parse("foo, a=bar, baz");

        assert_eq!(directives, vec![FaultDirective::new("bar")]);
        assert_eq!(
            errors,
            vec![
                ParseError::MalformedPair { pair: "foo".to_string() },
                ParseError::MalformedPair { pair: "baz".to_string() },
            ]
        );
    }

    #[test]
    fn every_bad_pair_is_reported() {
        let (directives, errors) = parse("a=foo;x=1;d=NaN;F=101");

        assert!(directives.is_empty());
        assert_eq!(
            errors,
            vec![
                ParseError::UnknownKey { key: "x".to_string() },
                ParseError::InvalidInteger {
                    key: FaultKey::DelayMs,
                    value: "NaN".to_string(),
                },
                ParseError::PercentageOutOfRange {
                    key: FaultKey::AbortPercentage,
                    value: 101,
                },
            ]
        );
    }

    #[rstest]
    #[case::malformed_pair("foo", ParseError::MalformedPair { pair: "foo".to_string() })]
    #[case::unknown_key("foo=bar", ParseError::UnknownKey { key: "foo".to_string() })]
    #[case::invalid_delay("a=foo;d=NaN", invalid_integer(FaultKey::DelayMs, "NaN"))]
    #[case::negative_delay("a=foo;d=-5", invalid_integer(FaultKey::DelayMs, "-5"))]
    #[case::invalid_delay_percentage("a=foo;D=NaN", invalid_integer(FaultKey::DelayPercentage, "NaN"))]
    #[case::negative_delay_percentage(
        "a=foo;D=-1",
        ParseError::PercentageOutOfRange { key: FaultKey::DelayPercentage, value: -1 }
    )]
    #[case::delay_percentage_over_100(
        "a=foo;D=101",
        ParseError::PercentageOutOfRange { key: FaultKey::DelayPercentage, value: 101 }
    )]
    #[case::invalid_abort_code("a=foo;f=NaN", invalid_integer(FaultKey::AbortCode, "NaN"))]
    #[case::invalid_abort_percentage("a=foo;F=NaN", invalid_integer(FaultKey::AbortPercentage, "NaN"))]
    #[case::negative_abort_percentage(
        "a=foo;F=-1",
        ParseError::PercentageOutOfRange { key: FaultKey::AbortPercentage, value: -1 }
    )]
    #[case::abort_percentage_over_100(
        "a=foo;F=101",
        ParseError::PercentageOutOfRange { key: FaultKey::AbortPercentage, value: 101 }
    )]
    fn single_error(#[case] raw: &str, #[case] expected: ParseError) {
        let (directives, errors) = parse(raw);

        assert!(directives.is_empty());
        assert_eq!(errors, vec![expected]);
    }

    #[rstest]
    #[case::empty("", Ok(100))]
    #[case::valid("50", Ok(50))]
    #[case::zero("0", Ok(0))]
    #[case::hundred("100", Ok(100))]
    #[case::not_a_number("NaN", Err(invalid_integer(FaultKey::DelayPercentage, "NaN")))]
    #[case::under_min("-1", Err(ParseError::PercentageOutOfRange { key: FaultKey::DelayPercentage, value: -1 }))]
    #[case::over_max("101", Err(ParseError::PercentageOutOfRange { key: FaultKey::DelayPercentage, value: 101 }))]
    fn percentage(#[case] value: &str, #[case] expected: Result<u8, ParseError>) {
        assert_eq!(parse_percentage(FaultKey::DelayPercentage, value), expected);
    }
}
