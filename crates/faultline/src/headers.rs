// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::HashMap;
use std::hash::BuildHasher;

/// Header carrying fault directives. May be repeated.
pub const FAULT_HEADER: &str = "x-bp-fault";

/// Side-band header naming the server a fault targets.
pub const SERVER_ADDRESS_HEADER: &str = "x-bp-fault-server-address";

/// Side-band header naming the method a fault targets.
pub const SERVER_METHOD_HEADER: &str = "x-bp-fault-server-method";

/// Per-field header with the delay in milliseconds.
pub const DELAY_MS_HEADER: &str = "x-bp-fault-delay-ms";

/// Per-field header with the delay probability.
pub const DELAY_PERCENTAGE_HEADER: &str = "x-bp-fault-delay-percentage";

/// Per-field header with the abort code.
pub const ABORT_CODE_HEADER: &str = "x-bp-fault-abort-code";

/// Per-field header with the abort message.
pub const ABORT_MESSAGE_HEADER: &str = "x-bp-fault-abort-message";

/// Per-field header with the abort probability.
pub const ABORT_PERCENTAGE_HEADER: &str = "x-bp-fault-abort-percentage";

/// Read access to the headers of a call.
///
/// Transports implement this for their header representation. Values that are missing or
/// not valid text are reported as absent.
///
/// # Examples
///
/// ```
/// use faultline::HeaderLookup;
///
/// struct Pairs(Vec<(String, String)>);
///
/// impl HeaderLookup for Pairs {
///     fn get(&self, key: &str) -> Option<&str> {
///         self.get_all(key).into_iter().next()
///     }
///
///     fn get_all(&self, key: &str) -> Vec<&str> {
///         self.0
///             .iter()
///             .filter(|(name, _)| name.eq_ignore_ascii_case(key))
///             .map(|(_, value)| value.as_str())
///             .collect()
///     }
/// }
/// ```
pub trait HeaderLookup {
    /// Returns the first value of the header `key`.
    fn get(&self, key: &str) -> Option<&str>;

    /// Returns every value of the header `key` in the order they were received.
    fn get_all(&self, key: &str) -> Vec<&str> {
        self.get(key).into_iter().collect()
    }
}

impl<T: HeaderLookup + ?Sized> HeaderLookup for &T {
    fn get(&self, key: &str) -> Option<&str> {
        (**self).get(key)
    }

    fn get_all(&self, key: &str) -> Vec<&str> {
        (**self).get_all(key)
    }
}

/// Header names are compared ASCII case-insensitively, like `http::HeaderMap` does. An exact
/// match is preferred when several spellings of the same name are present.
impl<S: BuildHasher> HeaderLookup for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<&str> {
        Self::get(self, key)
            .or_else(|| {
                self.iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(key))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }
}

#[cfg(any(feature = "http", test))]
impl HeaderLookup for http::HeaderMap {
    fn get(&self, key: &str) -> Option<&str> {
        Self::get(self, key).and_then(|value| value.to_str().ok())
    }

    fn get_all(&self, key: &str) -> Vec<&str> {
        Self::get_all(self, key).iter().filter_map(|value| value.to_str().ok()).collect()
    }
}
