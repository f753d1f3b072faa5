/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Logging configuration and environment selection

use gelf_client::GraylogConfig;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::InitError;

/// The declared deployment environment, which selects how the logger is
/// built.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Env {
    /// Local stream plus Graylog forwarding.
    Prod,
    /// Local stream plus Graylog forwarding.
    Staging,
    /// Local stream only.
    Dev,
    /// Output suitable for test harnesses, no remote forwarding.
    Test,
}

impl Env {
    /// The value used to tag records with the environment.
    pub fn name(self) -> &'static str {
        match self {
            Env::Prod => "production",
            Env::Staging => "staging",
            Env::Dev => "development",
            Env::Test => "test",
        }
    }
}

/// Everything needed to initialize logging for a process.
///
/// Absent values mean "use the default": an empty `hostname` falls back to
/// the system hostname, an empty `log_env_name` to `"env"`, and a zero
/// connection timeout to an unbounded connection attempt.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Application name attached to every record under the `app` key; empty
    /// to omit.
    pub app_name: String,
    /// Declares the production environment.
    pub is_prod_env: bool,
    /// Declares the staging environment.
    pub is_staging_env: bool,
    /// Declares the development environment.
    pub is_dev_env: bool,
    /// Declares the test environment.
    pub is_test_env: bool,
    /// Connection parameters for the Graylog collector. Only used in
    /// production and staging.
    pub graylog: GraylogConfig,
    /// Overrides the hostname reported in records.
    pub hostname: String,
    /// Field name used to tag records with the environment.
    pub log_env_name: String,
}

impl Config {
    /// Convenience factory for automated tests: a default configuration with
    /// the test environment declared.
    pub fn new_default_test() -> Config {
        Config {
            is_test_env: true,
            ..Config::default()
        }
    }

    /// Determine the effective environment.
    ///
    /// Declaring more than one environment is rejected outright rather than
    /// resolved by precedence. With no environment declared only a test run
    /// may proceed, as a test environment; anything else is an ambiguous
    /// configuration the process should not start with.
    pub fn environment(&self, running_tests: bool) -> Result<Env, InitError> {
        let declared = [
            self.is_prod_env,
            self.is_staging_env,
            self.is_dev_env,
            self.is_test_env,
        ];
        if declared.iter().filter(|&&flag| flag).count() > 1 {
            return Err(InitError::MultipleEnvironments);
        }

        if self.is_prod_env {
            Ok(Env::Prod)
        } else if self.is_staging_env {
            Ok(Env::Staging)
        } else if self.is_dev_env {
            Ok(Env::Dev)
        } else if self.is_test_env || running_tests {
            Ok(Env::Test)
        } else {
            Err(InitError::NoEnvironment)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_environment_selection() {
        let prod = Config {
            is_prod_env: true,
            ..Config::default()
        };
        assert_eq!(prod.environment(false).unwrap(), Env::Prod);

        let staging = Config {
            is_staging_env: true,
            ..Config::default()
        };
        assert_eq!(staging.environment(false).unwrap(), Env::Staging);

        let dev = Config {
            is_dev_env: true,
            ..Config::default()
        };
        assert_eq!(dev.environment(false).unwrap(), Env::Dev);
    }

    #[test]
    fn test_default_test_config() {
        let config = Config::new_default_test();
        assert_eq!(config.environment(false).unwrap(), Env::Test);
        assert!(!config.is_prod_env);
        assert!(!config.is_staging_env);
        assert!(!config.is_dev_env);
    }

    #[test]
    fn test_no_environment_follows_the_test_run() {
        let config = Config::default();
        assert_eq!(config.environment(true).unwrap(), Env::Test);
        assert_eq!(
            config.environment(false).unwrap_err().to_string(),
            "no env was explicity set, and not currently running tests"
        );
    }

    #[test]
    fn test_multiple_environments_rejected() {
        let config = Config {
            is_prod_env: true,
            is_staging_env: true,
            ..Config::default()
        };
        let err = config.environment(false).unwrap_err();
        assert_eq!(err.to_string(), "multiple environments selected");

        // Even a test run does not disambiguate an over-declared config.
        assert!(config.environment(true).is_err());
    }

    #[test]
    fn test_environment_names() {
        assert_eq!(Env::Prod.name(), "production");
        assert_eq!(Env::Staging.name(), "staging");
        assert_eq!(Env::Dev.name(), "development");
        assert_eq!(Env::Test.name(), "test");
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"is_dev_env": true}"#)
            .expect("failed to deserialize");
        assert_eq!(config.environment(false).unwrap(), Env::Dev);
        assert!(config.app_name.is_empty());
        assert!(config.graylog.address.is_empty());
        assert!(config.graylog.connection_timeout.is_zero());
    }
}
