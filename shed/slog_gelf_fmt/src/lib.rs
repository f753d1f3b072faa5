/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! # A slog `Drain` forwarding records to Graylog as GELF messages.
//!
//! Wrap a connected [`gelf_client::SharedGraylog`] handle in a [`GelfFormat`]
//! and combine it with local drains in the usual way. Every KV value attached
//! to the logger or the record becomes a GELF additional field; the slog
//! level maps to the corresponding syslog severity.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::Mutex;
//!
//! use gelf_client::SharedGraylog;
//! use gelf_client::mock::MockGraylog;
//! use slog::Drain;
//! use slog::Logger;
//! use slog::info;
//! use slog::o;
//!
//! let sink: SharedGraylog = Arc::new(Mutex::new(Box::new(MockGraylog::new())));
//! let drain = slog_gelf_fmt::GelfFormat::new(sink, "example-host", "").fuse();
//! let log = Logger::root(drain, o!());
//! info!(log, "forwarded to Graylog");
//! ```

#![deny(warnings, missing_docs, clippy::all, rustdoc::broken_intra_doc_links)]

pub mod collector_serializer;
mod gelf_format;

pub use crate::collector_serializer::CollectorSerializer;
pub use crate::gelf_format::GelfFormat;
