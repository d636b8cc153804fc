// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::ops::RangeInclusive;
use std::time::Duration;

use crate::headers::*;
use crate::injector::{Abort, CallTarget, Decision};
use crate::parser::{parse_abort_code, parse_delay_ms, parse_percentage};
use crate::telemetry::TelemetryHelper;
use crate::{Draw, FaultDirective, FaultKey, HeaderLookup, ParseError, Respond, Resume, Sleep, canonical_address, match_directive};

/// Decides, per call, whether to inject a fault and runs the outcome.
///
/// The injector is generic over `Out`, the output type of the transport that embeds it.
/// It never fails on its own: malformed fault headers are logged and the call runs as if
/// no fault had been requested.
///
/// Each decision takes a single draw from the configured [`Draw`] source, shared by the
/// delay and abort checks, and no state is shared between decisions.
///
/// For a walkthrough, see the [injector module][crate::injector] documentation.
pub struct FaultInjector<Out> {
    abort_codes: RangeInclusive<i32>,
    draw: Draw,
    telemetry: TelemetryHelper,
    _out: PhantomData<fn() -> Out>,
}

impl<Out> Debug for FaultInjector<Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultInjector")
            .field("caller_name", &self.telemetry.caller_name)
            .field("abort_codes", &self.abort_codes)
            .field("draw", &self.draw)
            .finish_non_exhaustive()
    }
}

impl<Out> Clone for FaultInjector<Out> {
    fn clone(&self) -> Self {
        Self {
            abort_codes: self.abort_codes.clone(),
            draw: self.draw.clone(),
            telemetry: self.telemetry.clone(),
            _out: PhantomData,
        }
    }
}

impl<Out> FaultInjector<Out> {
    /// Creates an injector.
    ///
    /// `caller_name` identifies the embedding middleware in logs. `abort_codes` is the range
    /// of status codes the transport can synthesize, e.g. [`HTTP_ABORT_CODES`][crate::HTTP_ABORT_CODES].
    #[must_use]
    pub fn new(caller_name: impl Into<Cow<'static, str>>, abort_codes: RangeInclusive<i32>) -> Self {
        Self {
            abort_codes,
            draw: Draw::default(),
            telemetry: TelemetryHelper::new(caller_name.into()),
            _out: PhantomData,
        }
    }

    /// Replaces the source of the per-decision draw.
    ///
    /// **Default**: [`Draw::Random`]
    #[must_use]
    pub fn draw(mut self, draw: Draw) -> Self {
        self.draw = draw;
        self
    }

    /// Stops the injector from emitting log events.
    #[must_use]
    pub fn disable_logs(mut self) -> Self {
        self.telemetry.logs_enabled = false;
        self
    }

    /// Returns the name used to identify the injector in logs.
    #[must_use]
    pub fn caller_name(&self) -> &str {
        &self.telemetry.caller_name
    }

    /// Returns the range of abort codes the injector synthesizes.
    #[must_use]
    pub fn abort_codes(&self) -> &RangeInclusive<i32> {
        &self.abort_codes
    }

    /// Decides which fault, if any, applies to a call.
    ///
    /// This runs every check of [`inject`][Self::inject] without performing the call, the
    /// delay or the abort. Both percentage checks are resolved up front against the same draw.
    pub fn decide<H>(&self, call: &CallTarget<'_>, headers: &H) -> Decision
    where
        H: HeaderLookup + ?Sized,
    {
        let address = canonical_address(call.address());

        let target_address = non_empty(headers, SERVER_ADDRESS_HEADER);
        if target_address.is_some_and(|target| canonical_address(target) != address) {
            return Decision::Resume;
        }

        if non_empty(headers, SERVER_METHOD_HEADER).is_some_and(|method| method != call.method()) {
            return Decision::Resume;
        }

        let raw_values = headers.get_all(FAULT_HEADER);
        let directive = if raw_values.is_empty() {
            if target_address.is_none() {
                return Decision::Resume;
            }

            match legacy_directive(address, headers) {
                Ok(directive) => directive,
                Err(error) => {
                    self.telemetry.parse_error(&error);
                    return Decision::Resume;
                }
            }
        } else {
            let (matched, errors) = match_directive(raw_values, address, call.method(), self.abort_codes.clone());
            errors.iter().for_each(|error| self.telemetry.parse_error(error));

            match matched {
                Some(directive) => directive,
                None => return Decision::Resume,
            }
        };

        self.plan(directive)
    }

    /// Injects the fault requested by `headers`, if any, around a call.
    ///
    /// - With no applicable directive, returns the output of `resume`.
    /// - With a delay, awaits `sleep` first. Dropping the returned future abandons the delay.
    /// - With an abort, returns the output of `respond` and never invokes `resume`.
    pub async fn inject<H, R, P, S>(&self, call: &CallTarget<'_>, headers: &H, resume: R, respond: P, sleep: &S) -> Out
    where
        H: HeaderLookup + ?Sized,
        R: Resume<Out>,
        P: Respond<Out>,
        S: Sleep + ?Sized,
    {
        let decision = self.decide(call, headers);

        if let Some(delay) = decision.delay() {
            self.telemetry.delay(call.address(), call.method(), duration_ms(delay));
            sleep.sleep(delay).await;
        }

        match decision.abort() {
            Some(abort) => {
                self.telemetry.abort(call.address(), call.method(), abort.code);
                respond.respond(abort.code, &abort.message)
            }
            None => resume.resume().await,
        }
    }

    fn plan(&self, directive: FaultDirective) -> Decision {
        let sampler = self.draw.sampler();

        let delay = match directive.delay_ms {
            Some(_) if !sampler.selected(directive.delay_percentage) => return Decision::Resume,
            Some(delay_ms) => Some(Duration::from_millis(delay_ms)),
            None => None,
        };

        let abort = match directive.abort_code {
            Some(_) if !sampler.selected(directive.abort_percentage) => None,
            Some(code) if !self.abort_codes.contains(&code) => {
                self.telemetry.parse_error(&ParseError::AbortCodeOutOfRange {
                    code,
                    min: *self.abort_codes.start(),
                    max: *self.abort_codes.end(),
                });
                None
            }
            Some(code) => Some(Abort {
                code,
                message: directive.abort_message,
            }),
            None => None,
        };

        Decision::from_parts(delay, abort)
    }
}

/// Builds a directive from the per-field headers that predate `x-bp-fault`.
fn legacy_directive<H>(address: &str, headers: &H) -> Result<FaultDirective, ParseError>
where
    H: HeaderLookup + ?Sized,
{
    let mut directive = FaultDirective::new(address);

    if let Some(delay_ms) = non_empty(headers, DELAY_MS_HEADER) {
        directive.delay_ms = Some(parse_delay_ms(delay_ms)?);
        directive.delay_percentage = parse_percentage(
            FaultKey::DelayPercentage,
            non_empty(headers, DELAY_PERCENTAGE_HEADER).unwrap_or_default(),
        )?;
    }

    if let Some(abort_code) = non_empty(headers, ABORT_CODE_HEADER) {
        directive.abort_code = Some(parse_abort_code(abort_code)?);
        directive.abort_message = non_empty(headers, ABORT_MESSAGE_HEADER).unwrap_or_default().to_string();
        directive.abort_percentage = parse_percentage(
            FaultKey::AbortPercentage,
            non_empty(headers, ABORT_PERCENTAGE_HEADER).unwrap_or_default(),
        )?;
    }

    Ok(directive)
}

fn non_empty<'h, H>(headers: &'h H, key: &str) -> Option<&'h str>
where
    H: HeaderLookup + ?Sized,
{
    headers.get(key).filter(|value| !value.is_empty())
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
