/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! # Minimal GELF client for Graylog.
//!
//! Provides just enough of the [GELF](https://go2docs.graylog.org/current/getting_in_log_data/gelf.html)
//! protocol to forward structured log records to a Graylog collector:
//! the [`GelfMessage`] payload type, the [`Graylog`] session capability with a
//! production TCP/TLS transport behind [`TcpConnector`], and in-memory test
//! doubles in the [`mock`] module.
//!
//! Connection establishment is a single attempt bounded by the configured
//! timeout; there is no buffering, retry, or reconnection here. Callers that
//! need those behaviors own them.
//!
//! ```
//! use gelf_client::GelfMessage;
//! use gelf_client::Graylog;
//! use gelf_client::mock::MockGraylog;
//!
//! let mut session = MockGraylog::new();
//! let mut message = GelfMessage::new("", "example-host", "hello graylog", 6);
//! message.add_field("request_id", 7.into());
//! session.send(&message).unwrap();
//! assert_eq!(session.sent().len(), 1);
//! ```

#![deny(warnings, missing_docs, clippy::all, rustdoc::broken_intra_doc_links)]

mod message;
pub mod mock;
mod tcp;
mod transport;

pub use crate::message::DEFAULT_PROTOCOL_VERSION;
pub use crate::message::GelfMessage;
pub use crate::tcp::TcpConnector;
pub use crate::transport::Graylog;
pub use crate::transport::GraylogConfig;
pub use crate::transport::SharedGraylog;
pub use crate::transport::SinkConnector;
