/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! GELF message payloads

use std::collections::BTreeMap;

use anyhow::Context;
use anyhow::Result;
use serde::Serialize;

/// Protocol version stamped on messages when the configuration leaves the
/// version unset.
pub const DEFAULT_PROTOCOL_VERSION: &str = "1.1";

/// A single GELF payload.
///
/// The mandatory fields are carried as struct members; everything else goes
/// through [`GelfMessage::add_field`], which applies the `_` prefix GELF
/// requires for additional fields.
#[derive(Clone, Debug, Serialize)]
pub struct GelfMessage {
    /// GELF protocol version.
    pub version: String,
    /// Host that emitted the record.
    pub host: String,
    /// First line of the record message.
    pub short_message: String,
    /// Whole record message, present only when it spans multiple lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_message: Option<String>,
    /// Unix seconds with sub-second precision.
    pub timestamp: f64,
    /// Syslog severity.
    pub level: u8,
    #[serde(flatten)]
    additional: BTreeMap<String, serde_json::Value>,
}

impl GelfMessage {
    /// Create a message stamped with the current time. An empty `version`
    /// selects [`DEFAULT_PROTOCOL_VERSION`].
    pub fn new(version: &str, host: &str, message: &str, level: u8) -> GelfMessage {
        let version = if version.is_empty() {
            DEFAULT_PROTOCOL_VERSION
        } else {
            version
        };
        let short_message = message.lines().next().unwrap_or("").to_owned();
        let full_message = if short_message.len() < message.len() {
            Some(message.to_owned())
        } else {
            None
        };
        GelfMessage {
            version: version.to_owned(),
            host: host.to_owned(),
            short_message,
            full_message,
            timestamp: chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0,
            level,
            additional: BTreeMap::new(),
        }
    }

    /// Attach an additional field, prefixing the key with `_` if the caller
    /// has not already done so. The `_id` key is reserved by Graylog and is
    /// dropped.
    pub fn add_field(&mut self, key: &str, value: serde_json::Value) {
        let key = if key.starts_with('_') {
            key.to_owned()
        } else {
            format!("_{key}")
        };
        if key == "_id" {
            return;
        }
        self.additional.insert(key, value);
    }

    /// Look up an additional field by its stored, `_`-prefixed key.
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.additional.get(key)
    }

    /// Encode this message as a GELF TCP frame: the JSON document followed by
    /// a NUL delimiter. JSON escapes interior NULs, so the delimiter is
    /// unambiguous.
    pub fn to_tcp_frame(&self) -> Result<Vec<u8>> {
        let mut frame = serde_json::to_vec(self).context("failed to encode GELF message")?;
        frame.push(0);
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_mandatory_fields() {
        let message = GelfMessage::new("", "host1", "something happened", 6);
        let encoded: Value =
            serde_json::to_value(&message).expect("failed to serialize message");
        assert_eq!(encoded["version"], "1.1");
        assert_eq!(encoded["host"], "host1");
        assert_eq!(encoded["short_message"], "something happened");
        assert_eq!(encoded["level"], 6);
        assert!(encoded["timestamp"].as_f64().unwrap() > 0.0);
        assert!(encoded.get("full_message").is_none());
    }

    #[test]
    fn test_version_override() {
        let message = GelfMessage::new("1.0", "host1", "m", 6);
        assert_eq!(message.version, "1.0");
    }

    #[test]
    fn test_multiline_message_split() {
        let message = GelfMessage::new("", "host1", "first line\nsecond line", 3);
        assert_eq!(message.short_message, "first line");
        assert_eq!(
            message.full_message.as_deref(),
            Some("first line\nsecond line")
        );
    }

    #[test]
    fn test_additional_field_prefixing() {
        let mut message = GelfMessage::new("", "host1", "m", 6);
        message.add_field("answer", json!(42));
        message.add_field("_already", json!("prefixed"));
        assert_eq!(message.field("_answer"), Some(&json!(42)));
        assert_eq!(message.field("_already"), Some(&json!("prefixed")));
        assert!(message.field("answer").is_none());
    }

    #[test]
    fn test_reserved_id_field_dropped() {
        let mut message = GelfMessage::new("", "host1", "m", 6);
        message.add_field("id", json!("nope"));
        message.add_field("_id", json!("nope"));
        assert!(message.field("_id").is_none());
    }

    #[test]
    fn test_tcp_frame_is_nul_terminated_json() {
        let mut message = GelfMessage::new("", "host1", "framed", 6);
        message.add_field("answer", json!(42));
        let frame = message.to_tcp_frame().expect("failed to encode frame");
        assert_eq!(frame.last(), Some(&0u8));
        let decoded: Value = serde_json::from_slice(&frame[..frame.len() - 1])
            .expect("frame payload is not valid JSON");
        assert_eq!(decoded["short_message"], "framed");
        assert_eq!(decoded["_answer"], 42);
    }
}
