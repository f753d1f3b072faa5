/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! # Environment-driven logging bootstrap with optional Graylog forwarding.
//!
//! Builds a ready-to-use [`slog::Logger`] from a [`Config`] declaring the
//! deployment environment:
//!
//! * production and staging: records go to stderr and, as GELF messages, to
//!   the configured Graylog collector. Failing to connect fails
//!   initialization.
//! * development: records go to the terminal only.
//! * test: records go to the test harness stdout capture; with no environment
//!   declared at all, initialization falls back to this behavior when the
//!   process is running tests and fails otherwise.
//!
//! Initialize once, early, then grab clones of the process-wide logger
//! wherever records are emitted:
//!
//! ```
//! use slog::info;
//!
//! let config = logenv::Config::new_default_test();
//! logenv::init(&config).expect("failed to initialize logging");
//!
//! let log = logenv::logger();
//! info!(log, "logger ready"; "attempt" => 1);
//! logenv::flush().expect("failed to flush");
//! ```
//!
//! The connection to Graylog is established through the
//! [`SinkConnector`] capability; tests inject
//! [`gelf_client::mock::MockConnector`] instead of the production
//! [`TcpConnector`] via [`init_with_connector`] (or a scoped [`LogContext`]).

#![deny(warnings, missing_docs, clippy::all, rustdoc::broken_intra_doc_links)]

mod config;
mod context;
mod errors;
pub mod kv_defaults;

pub use gelf_client::GraylogConfig;
pub use gelf_client::SinkConnector;
pub use gelf_client::TcpConnector;

pub use crate::config::Config;
pub use crate::config::Env;
pub use crate::context::LogContext;
pub use crate::context::flush;
pub use crate::context::global;
pub use crate::context::init;
pub use crate::context::init_with_connector;
pub use crate::context::logger;
pub use crate::errors::InitError;
