// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Per-call fault decisions driven by request headers.
//!
//! The primary type is [`FaultInjector`]. A transport middleware creates one injector and,
//! for every call, hands it the call's headers together with three capabilities:
//!
//! - [`Resume`][crate::Resume]: performs the real call,
//! - [`Respond`][crate::Respond]: builds the transport's error output for an abort,
//! - [`Sleep`][crate::Sleep]: waits out an injected delay, e.g. a [`tick::Clock`].
//!
//! # Decision
//!
//! 1. When `x-bp-fault-server-address` is present and names another server, the call resumes.
//! 2. When `x-bp-fault-server-method` is present and names another method, the call resumes.
//! 3. Every instance of `x-bp-fault` is parsed and the first directive targeting this
//!    call is selected. Malformed tokens are logged and otherwise ignored. Without an
//!    `x-bp-fault` header, the per-field `x-bp-fault-*` headers are read instead, provided
//!    the side-band address header is present.
//! 4. If the directive requests a delay, the delay percentage is sampled. Not selected means
//!    the call resumes right away; selected means the delay is awaited first.
//! 5. If the directive requests an abort, the abort percentage is sampled with the same draw.
//!    When selected and the code is within the transport's range, the abort output is
//!    returned and the call never runs.
//!
//! # Defaults
//!
//! | Parameter | Default Value | Configured By |
//! |-----------|---------------|---------------|
//! | Draw source | [`Draw::Random`][crate::Draw::Random] | [`draw`][FaultInjector::draw] |
//! | Logs | Enabled (with the `logs` feature) | [`disable_logs`][FaultInjector::disable_logs] |
//!
//! # Logs
//!
//! With the `logs` feature, the injector emits `tracing` events:
//!
//! - `faultline.parse_error` (`WARN`): a malformed token or an out-of-range abort code.
//! - `faultline.delay` (`INFO`): a delay is being injected.
//! - `faultline.abort` (`INFO`): an abort is being injected.
//!
//! # Examples
//!
//! ```rust
//! # use std::collections::HashMap;
//! # use tick::Clock;
//! use faultline::{CallTarget, FaultInjector, HTTP_ABORT_CODES};
//!
//! # async fn example(clock: Clock, headers: HashMap<String, String>) {
//! let injector = FaultInjector::new("http_server", HTTP_ABORT_CODES);
//!
//! let output: Result<String, (i32, String)> = injector
//!     .inject(
//!         &CallTarget::new("users.prod.svc.cluster.local", "get_user"),
//!         &headers,
//!         || async { Ok("user".to_string()) },
//!         |code: i32, message: &str| Err((code, message.to_string())),
//!         &clock,
//!     )
//!     .await;
//! # let _output = output;
//! # }
//! ```

mod decision;
mod engine;

pub use decision::{Abort, CallTarget, Decision};
pub use engine::FaultInjector;
