/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use std::io;

use gelf_client::GelfMessage;
use gelf_client::SharedGraylog;
use slog::Drain;
use slog::KV;
use slog::Level;
use slog::OwnedKVList;
use slog::Record;

use crate::collector_serializer::CollectorSerializer;

/// A slog `Drain` that renders each record as a GELF message and forwards it
/// through a shared Graylog session.
///
/// Logger-context and per-record KV values become additional fields. The
/// `hostname` key is suppressed, since the source host is already a top-level
/// GELF field.
pub struct GelfFormat {
    sink: SharedGraylog,
    host: String,
    version: String,
}

impl GelfFormat {
    /// Create a drain emitting through the given session, stamping messages
    /// with the given source host and GELF protocol version (empty for the
    /// default).
    pub fn new(
        sink: SharedGraylog,
        host: impl Into<String>,
        version: impl Into<String>,
    ) -> GelfFormat {
        GelfFormat {
            sink,
            host: host.into(),
            version: version.into(),
        }
    }
}

// GELF levels are syslog severities.
fn syslog_level(level: Level) -> u8 {
    match level {
        Level::Critical => 2,
        Level::Error => 3,
        Level::Warning => 4,
        Level::Info => 6,
        Level::Debug | Level::Trace => 7,
    }
}

impl Drain for GelfFormat {
    type Ok = ();
    type Err = io::Error;

    fn log(&self, record: &Record<'_>, values: &OwnedKVList) -> io::Result<Self::Ok> {
        let mut serializer = CollectorSerializer::new();
        values
            .serialize(record, &mut serializer)
            .map_err(|err| io::Error::other(format!("failed to serialize logger values: {err}")))?;
        record
            .kv()
            .serialize(record, &mut serializer)
            .map_err(|err| io::Error::other(format!("failed to serialize record values: {err}")))?;

        let mut message = GelfMessage::new(
            &self.version,
            &self.host,
            &record.msg().to_string(),
            syslog_level(record.level()),
        );
        message.add_field("file", record.file().into());
        message.add_field("line", record.line().into());
        message.add_field("module", record.module().into());
        for (key, value) in serializer.into_inner() {
            // The source host is already a top-level GELF field.
            if key == "hostname" {
                continue;
            }
            message.add_field(key, value.into());
        }

        let mut sink = self
            .sink
            .lock()
            .map_err(|_| io::Error::other("graylog session mutex poisoned"))?;
        sink.send(&message).map_err(io::Error::other)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use gelf_client::mock::MockGraylog;
    use serde_json::json;
    use slog::Logger;
    use slog::error;
    use slog::info;
    use slog::o;

    use super::*;

    fn gelf_logger(mock: &MockGraylog) -> Logger {
        let sink: SharedGraylog = Arc::new(Mutex::new(Box::new(mock.clone())));
        let drain = GelfFormat::new(sink, "testhost", "").fuse();
        Logger::root(drain, o!("hostname" => "testhost", "env" => "test"))
    }

    #[test]
    fn test_record_becomes_gelf_message() {
        let mock = MockGraylog::new();
        let log = gelf_logger(&mock);
        info!(log, "Test log {}", 1; "answer" => 42);

        let sent = mock.sent();
        assert_eq!(sent.len(), 1);
        let message = &sent[0];
        assert_eq!(message.short_message, "Test log 1");
        assert_eq!(message.host, "testhost");
        assert_eq!(message.version, "1.1");
        assert_eq!(message.level, 6);
        assert!(message.timestamp > 0.0);
        assert_eq!(message.field("_answer"), Some(&json!("42")));
        assert_eq!(message.field("_env"), Some(&json!("test")));
        assert_eq!(message.field("_file"), Some(&json!(file!())));
        assert!(message.field("_line").is_some());
    }

    #[test]
    fn test_hostname_key_suppressed() {
        let mock = MockGraylog::new();
        let log = gelf_logger(&mock);
        info!(log, "no duplicate host field");
        assert!(mock.sent()[0].field("_hostname").is_none());
    }

    #[test]
    fn test_level_mapping() {
        let mock = MockGraylog::new();
        let log = gelf_logger(&mock);
        info!(log, "info");
        error!(log, "error");

        let sent = mock.sent();
        assert_eq!(sent[0].level, 6);
        assert_eq!(sent[1].level, 3);

        assert_eq!(syslog_level(Level::Critical), 2);
        assert_eq!(syslog_level(Level::Warning), 4);
        assert_eq!(syslog_level(Level::Debug), 7);
        assert_eq!(syslog_level(Level::Trace), 7);
    }

    #[test]
    fn test_multiline_message_keeps_full_text() {
        let mock = MockGraylog::new();
        let log = gelf_logger(&mock);
        info!(log, "first line\nsecond line");

        let sent = mock.sent();
        assert_eq!(sent[0].short_message, "first line");
        assert_eq!(
            sent[0].full_message.as_deref(),
            Some("first line\nsecond line")
        );
    }
}
