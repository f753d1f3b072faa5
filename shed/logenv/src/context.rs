/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Logger construction and the process-wide logging context

use std::io;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
use gelf_client::SharedGraylog;
use gelf_client::SinkConnector;
use gelf_client::TcpConnector;
use slog::Discard;
use slog::Drain;
use slog::Duplicate;
use slog::Logger;
use slog::o;
use slog_gelf_fmt::GelfFormat;
use slog_term::FullFormat;
use slog_term::PlainSyncDecorator;
use slog_term::TermDecorator;
use slog_term::TestStdoutWriter;

use crate::config::Config;
use crate::config::Env;
use crate::errors::InitError;
use crate::kv_defaults::CommonKV;

/// Owner of the logging state for a process (or for a scope, in tests).
///
/// Initialize once, early, before spawning workers; the installed logger is a
/// [`slog::Logger`] and is safe to clone and share across threads.
/// Re-initializing replaces the logger and closes the previous Graylog
/// session, but is not safe to do concurrently with active logging.
#[derive(Default)]
pub struct LogContext {
    active: RwLock<Option<Active>>,
}

struct Active {
    logger: Logger,
    sink: Option<SharedGraylog>,
}

impl LogContext {
    /// Create a context with no logger installed.
    pub const fn new() -> LogContext {
        LogContext {
            active: RwLock::new(None),
        }
    }

    /// Initialize logging from the given configuration, connecting to
    /// Graylog with the production TCP connector where the environment
    /// requires it.
    pub fn init(&self, config: &Config) -> Result<(), InitError> {
        self.init_with_connector(config, &TcpConnector)
    }

    /// Initialize logging, establishing Graylog sessions through the given
    /// connector. This is the seam tests use to stay off the network.
    pub fn init_with_connector(
        &self,
        config: &Config,
        connector: &dyn SinkConnector,
    ) -> Result<(), InitError> {
        self.init_impl(config, connector, running_tests())
    }

    fn init_impl(
        &self,
        config: &Config,
        connector: &dyn SinkConnector,
        running_tests: bool,
    ) -> Result<(), InitError> {
        let env = config.environment(running_tests)?;

        let hostname = if config.hostname.is_empty() {
            hostname::get()
                .context("failed to get hostname")?
                .to_string_lossy()
                .into_owned()
        } else {
            config.hostname.clone()
        };
        // slog keys are 'static; the logger lives for the rest of the
        // process, so the env key may as well.
        let env_key: &'static str = match config.log_env_name.as_str() {
            "" => "env",
            name => Box::leak(name.to_owned().into_boxed_str()),
        };
        let common = CommonKV::new(hostname.clone(), config.app_name.clone(), env_key, env);

        let (logger, sink) = match env {
            Env::Prod | Env::Staging => {
                let session = connector
                    .connect(&config.graylog)
                    .map_err(InitError::Connection)?;
                let sink: SharedGraylog = Arc::new(Mutex::new(session));
                let gelf = GelfFormat::new(
                    Arc::clone(&sink),
                    hostname,
                    config.graylog.protocol_version.as_str(),
                );
                let local = FullFormat::new(PlainSyncDecorator::new(io::stderr())).build();
                let drain = Duplicate::new(local, gelf).ignore_res();
                (Logger::root(drain, o!(common)), Some(sink))
            }
            Env::Dev => {
                let decorator = TermDecorator::new().build();
                let drain = Mutex::new(FullFormat::new(decorator).build()).ignore_res();
                (Logger::root(drain, o!(common)), None)
            }
            Env::Test => {
                let decorator = PlainSyncDecorator::new(TestStdoutWriter);
                let drain = FullFormat::new(decorator).build().ignore_res();
                (Logger::root(drain, o!(common)), None)
            }
        };

        self.install(logger, sink);
        Ok(())
    }

    /// Clone of the installed logger, or a discarding logger when nothing
    /// has been initialized yet.
    pub fn logger(&self) -> Logger {
        let guard = self.read();
        match guard.as_ref() {
            Some(active) => active.logger.clone(),
            None => Logger::root(Discard, o!()),
        }
    }

    /// Flush the remote session, if any. Call before process exit to make
    /// buffered records durable.
    pub fn flush(&self) -> Result<()> {
        let guard = self.read();
        if let Some(sink) = guard.as_ref().and_then(|active| active.sink.as_ref()) {
            let mut session = sink
                .lock()
                .map_err(|_| anyhow!("graylog session mutex poisoned"))?;
            session.flush()?;
        }
        Ok(())
    }

    fn install(&self, logger: Logger, sink: Option<SharedGraylog>) {
        let previous = self.write().replace(Active { logger, sink });
        // Overwriting the active logger must not leak the previous session.
        if let Some(sink) = previous.and_then(|active| active.sink) {
            let mut session = sink.lock().unwrap_or_else(PoisonError::into_inner);
            let _ = session.close();
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Active>> {
        self.active.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Active>> {
        self.active.write().unwrap_or_else(PoisonError::into_inner)
    }
}

static GLOBAL: LogContext = LogContext::new();

/// The process-wide logging context.
pub fn global() -> &'static LogContext {
    &GLOBAL
}

/// Initialize the process-wide logger. Call once, early; see
/// [`LogContext::init`].
pub fn init(config: &Config) -> Result<(), InitError> {
    GLOBAL.init(config)
}

/// Initialize the process-wide logger with an injected connector; see
/// [`LogContext::init_with_connector`].
pub fn init_with_connector(
    config: &Config,
    connector: &dyn SinkConnector,
) -> Result<(), InitError> {
    GLOBAL.init_with_connector(config, connector)
}

/// Clone of the process-wide logger.
pub fn logger() -> Logger {
    GLOBAL.logger()
}

/// Flush the process-wide logger's remote session, if any.
pub fn flush() -> Result<()> {
    GLOBAL.flush()
}

fn running_tests() -> bool {
    // cfg!(test) covers this crate's own tests; the variable covers
    // harnesses that export the standard test-runner setting.
    cfg!(test) || std::env::var_os("RUST_TEST_THREADS").is_some()
}
