// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Capabilities the injector borrows from the transport that embeds it.

use std::time::Duration;

use tick::Clock;

/// Performs the original call.
///
/// Implemented for every `FnOnce() -> impl Future<Output = Out>`.
pub trait Resume<Out> {
    /// Runs the call and returns its output unchanged.
    fn resume(self) -> impl Future<Output = Out> + Send;
}

impl<F, Fut, Out> Resume<Out> for F
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Out> + Send,
{
    fn resume(self) -> impl Future<Output = Out> + Send {
        self()
    }
}

/// Builds the transport's error output for an injected abort.
///
/// Implemented for every `FnOnce(i32, &str) -> Out`.
pub trait Respond<Out> {
    /// Synthesizes an output carrying `code` and `message`.
    fn respond(self, code: i32, message: &str) -> Out;
}

impl<F, Out> Respond<Out> for F
where
    F: FnOnce(i32, &str) -> Out,
{
    fn respond(self, code: i32, message: &str) -> Out {
        self(code, message)
    }
}

/// Waits out an injected delay.
///
/// The delay is an ordinary future: dropping the call that awaits it abandons the delay.
pub trait Sleep {
    /// Completes once `duration` has elapsed.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

impl Sleep for Clock {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.delay(duration)
    }
}

impl<T: Sleep + ?Sized> Sleep for &T {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        (**self).sleep(duration)
    }
}
