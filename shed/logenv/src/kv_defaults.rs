/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Module defining the KV values attached to every record

use slog::KV;
use slog::Record;
use slog::Result as SlogResult;
use slog::Serializer;

use crate::config::Env;

/// Common KV values stamped onto every record: the reporting hostname, the
/// deployment environment under a configurable key, and the application name.
pub struct CommonKV {
    hostname: String,
    app_name: String,
    env_key: &'static str,
    env_name: &'static str,
}

impl CommonKV {
    /// Create the common values for the given environment. An empty
    /// `app_name` is omitted from records.
    pub fn new(hostname: String, app_name: String, env_key: &'static str, env: Env) -> CommonKV {
        CommonKV {
            hostname,
            app_name,
            env_key,
            env_name: env.name(),
        }
    }
}

impl KV for CommonKV {
    fn serialize(&self, _record: &Record<'_>, serializer: &mut dyn Serializer) -> SlogResult {
        serializer.emit_str("hostname", &self.hostname)?;
        serializer.emit_str(self.env_key, self.env_name)?;
        if !self.app_name.is_empty() {
            serializer.emit_str("app", &self.app_name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use slog::Level;
    use slog::b;
    use slog::record;
    use slog_gelf_fmt::CollectorSerializer;

    use super::*;

    #[test]
    fn test_emitted_pairs() {
        let mut serializer = CollectorSerializer::new();
        CommonKV::new("host1".to_owned(), "app1".to_owned(), "env", Env::Prod)
            .serialize(
                &record!(Level::Info, "test", &format_args!(""), b!()),
                &mut serializer,
            )
            .expect("failed to serialize");
        assert_eq!(
            serializer.into_inner(),
            vec![
                ("hostname", "host1".to_owned()),
                ("env", "production".to_owned()),
                ("app", "app1".to_owned()),
            ]
        );
    }

    #[test]
    fn test_empty_app_name_omitted() {
        let mut serializer = CollectorSerializer::new();
        CommonKV::new("host1".to_owned(), String::new(), "deploy_env", Env::Test)
            .serialize(
                &record!(Level::Info, "test", &format_args!(""), b!()),
                &mut serializer,
            )
            .expect("failed to serialize");
        assert_eq!(
            serializer.into_inner(),
            vec![
                ("hostname", "host1".to_owned()),
                ("deploy_env", "test".to_owned()),
            ]
        );
    }
}
