// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;

use crate::ParseError;

#[derive(Debug, Clone)]
pub(crate) struct TelemetryHelper {
    pub(crate) caller_name: Cow<'static, str>,
    #[cfg_attr(not(any(feature = "logs", test)), expect(dead_code, reason = "only read when logs are emitted"))]
    pub(crate) logs_enabled: bool,
}

#[cfg_attr(
    not(any(feature = "logs", test)),
    expect(unused_variables, clippy::unused_self, reason = "unused when logs feature not used")
)]
impl TelemetryHelper {
    pub(crate) fn new(caller_name: Cow<'static, str>) -> Self {
        Self {
            caller_name,
            logs_enabled: true,
        }
    }

    pub(crate) fn parse_error(&self, error: &ParseError) {
        #[cfg(any(feature = "logs", test))]
        if self.logs_enabled {
            tracing::event!(
                name: "faultline.parse_error",
                tracing::Level::WARN,
                caller.name = %self.caller_name,
                error = %error,
                "{}: {error}",
                self.caller_name
            );
        }
    }

    pub(crate) fn delay(&self, address: &str, method: &str, delay_ms: u64) {
        #[cfg(any(feature = "logs", test))]
        if self.logs_enabled {
            tracing::event!(
                name: "faultline.delay",
                tracing::Level::INFO,
                caller.name = %self.caller_name,
                fault.address = address,
                fault.method = method,
                fault.delay_ms = delay_ms,
                "{}: injecting {delay_ms}ms delay",
                self.caller_name
            );
        }
    }

    pub(crate) fn abort(&self, address: &str, method: &str, code: i32) {
        #[cfg(any(feature = "logs", test))]
        if self.logs_enabled {
            tracing::event!(
                name: "faultline.abort",
                tracing::Level::INFO,
                caller.name = %self.caller_name,
                fault.address = address,
                fault.method = method,
                fault.abort_code = code,
                "{}: injecting abort with code {code}",
                self.caller_name
            );
        }
    }
}
