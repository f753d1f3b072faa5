/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! In-memory test doubles for the connector capability, so initialization
//! logic can be exercised deterministically without a network.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use anyhow::Result;
use anyhow::anyhow;
use anyhow::bail;

use crate::message::GelfMessage;
use crate::transport::Graylog;
use crate::transport::GraylogConfig;
use crate::transport::SinkConnector;

/// A Graylog session that records everything sent through it. Clones share
/// state, so tests can keep one handle for inspection while the logger owns
/// another.
#[derive(Clone, Default)]
pub struct MockGraylog {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    sent: Vec<GelfMessage>,
    flushes: usize,
    closed: bool,
}

impl MockGraylog {
    /// Create an empty session.
    pub fn new() -> MockGraylog {
        MockGraylog::default()
    }

    /// Messages sent so far, in order.
    pub fn sent(&self) -> Vec<GelfMessage> {
        self.lock().sent.clone()
    }

    /// Number of flushes observed.
    pub fn flushes(&self) -> usize {
        self.lock().flushes
    }

    /// True once the session was closed.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Graylog for MockGraylog {
    fn send(&mut self, message: &GelfMessage) -> Result<()> {
        let mut state = self.lock();
        if state.closed {
            bail!("session is closed");
        }
        state.sent.push(message.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.lock().flushes += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.lock().closed = true;
        Ok(())
    }
}

/// A connector with a preset outcome: either hands out clones of a
/// [`MockGraylog`] or fails with exactly the configured message. Counts
/// connection attempts so tests can assert that no connection was made.
pub struct MockConnector {
    graylog: MockGraylog,
    error: Option<String>,
    attempts: AtomicUsize,
}

impl MockConnector {
    /// A connector that hands out clones of the given session.
    pub fn succeeding(graylog: MockGraylog) -> MockConnector {
        MockConnector {
            graylog,
            error: None,
            attempts: AtomicUsize::new(0),
        }
    }

    /// A connector that fails with exactly the given message.
    pub fn failing(message: impl Into<String>) -> MockConnector {
        MockConnector {
            graylog: MockGraylog::new(),
            error: Some(message.into()),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Number of connection attempts made through this connector.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }
}

impl SinkConnector for MockConnector {
    fn connect(&self, _config: &GraylogConfig) -> Result<Box<dyn Graylog>> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        match &self.error {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok(Box::new(self.graylog.clone())),
        }
    }
}
