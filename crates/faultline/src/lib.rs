// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Header-driven fault injection for resilience testing.
//!
//! Operators add a header to a request and the services on its path delay the call or
//! answer it with a synthesized error, without redeploying anything. This crate holds the
//! transport-independent part of that protocol: the directive grammar, the matcher that
//! picks the directive for a call, the percentage sampler and the decision engine. HTTP and
//! RPC middleware embed the engine and supply their own header access and error outputs.
//!
//! # Wire Format
//!
//! Directives travel in the `x-bp-fault` header, which may be repeated:
//!
//! ```text
//! x-bp-fault: a=users.prod;m=get_user;d=100;D=50;f=503;b=Fault injected!;F=75
//! ```
//!
//! The value is a comma-separated list of directives. Each directive is a semicolon-separated
//! list of `key=value` pairs. See [`parse`] for the key table.
//!
//! # Fail Open
//!
//! Fault headers never break real traffic. Malformed directives, unknown keys, invalid
//! numbers and abort codes outside of the transport's range are reported as [`ParseError`]s
//! through logs and the call proceeds unmodified.
//!
//! # Quick Start
//!
//! ```rust
//! use faultline::{CallTarget, Decision, FaultInjector, HTTP_ABORT_CODES};
//! use std::collections::HashMap;
//!
//! let injector = FaultInjector::<Result<String, u16>>::new("users_server", HTTP_ABORT_CODES);
//! let headers = HashMap::from([("x-bp-fault".to_string(), "a=users.prod;f=503;b=unavailable".to_string())]);
//!
//! let decision = injector.decide(&CallTarget::new("users.prod", "get_user"), &headers);
//!
//! assert_eq!(decision.abort().map(|abort| abort.code), Some(503));
//! ```
//!
//! See the [`injector`] module for the full decision procedure.
//!
//! ## Features
//!
//! - `logs`: Emits `tracing` events for rejected directives and injected faults.
//! - `http`: Implements [`HeaderLookup`] for `http::HeaderMap`.
//! - `test-util`: Enables deterministic [`Draw`] sources for tests of code that embeds the
//!   injector.

mod collaborators;
mod directive;
mod error;
mod headers;
pub mod injector;
mod matcher;
mod parser;
mod sampler;
mod telemetry;

pub use collaborators::{Respond, Resume, Sleep};
pub use directive::{FaultDirective, FaultKey, NO_ABORT};
pub use error::ParseError;
pub use headers::{
    ABORT_CODE_HEADER, ABORT_MESSAGE_HEADER, ABORT_PERCENTAGE_HEADER, DELAY_MS_HEADER, DELAY_PERCENTAGE_HEADER, FAULT_HEADER,
    HeaderLookup, SERVER_ADDRESS_HEADER, SERVER_METHOD_HEADER,
};
#[doc(inline)]
pub use injector::{Abort, CallTarget, Decision, FaultInjector};
pub use matcher::{CLUSTER_LOCAL_SUFFIX, HTTP_ABORT_CODES, THRIFT_ABORT_CODES, canonical_address, match_directive};
pub use parser::parse;
pub use sampler::{DRAW_RANGE, Draw, Sampler};
