/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Session capabilities for the Graylog collector

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;

use crate::message::GelfMessage;

/// Parameters for establishing a session with a Graylog collector.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GraylogConfig {
    /// Collector hostname or address.
    pub address: String,
    /// Collector port.
    pub port: u16,
    /// GELF protocol version tag; empty selects the default.
    pub protocol_version: String,
    /// Wrap the session in TLS.
    pub use_tls: bool,
    /// Skip certificate and hostname verification. TLS only.
    pub insecure_skip_verify: bool,
    /// Upper bound on connection establishment; zero means no explicit bound.
    pub connection_timeout: Duration,
}

/// A connected, write-only session with a Graylog collector.
pub trait Graylog: Send {
    /// Forward a single message.
    fn send(&mut self, message: &GelfMessage) -> Result<()>;
    /// Flush any output buffered by the session.
    fn flush(&mut self) -> Result<()>;
    /// Tear the session down. Sends after closing fail.
    fn close(&mut self) -> Result<()>;
}

impl std::fmt::Debug for dyn Graylog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Graylog")
    }
}

/// Capability of establishing Graylog sessions.
///
/// The production implementation is [`crate::TcpConnector`]; tests inject
/// [`crate::mock::MockConnector`] to stay off the network. Whatever the
/// implementation, a connector makes exactly one attempt per call and reports
/// failures without retrying.
pub trait SinkConnector {
    /// Open a session using the given parameters.
    fn connect(&self, config: &GraylogConfig) -> Result<Box<dyn Graylog>>;
}

/// A session handle shared between the emitting drain and whoever manages the
/// logger lifecycle, so that flush-on-exit and close-on-reinitialization can
/// reach a session the drain is still using.
pub type SharedGraylog = Arc<Mutex<Box<dyn Graylog>>>;
