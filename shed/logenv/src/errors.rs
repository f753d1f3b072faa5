/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Errors surfaced by logger initialization

use thiserror::Error;

/// Ways initialization can fail. Every variant is fatal: no logger is
/// installed when an error is returned, and nothing is retried.
#[derive(Debug, Error)]
pub enum InitError {
    /// The connector could not establish a Graylog session. The underlying
    /// message is surfaced unchanged.
    #[error(transparent)]
    Connection(anyhow::Error),
    /// More than one environment was declared.
    #[error("multiple environments selected")]
    MultipleEnvironments,
    /// No environment was declared and the process is not running tests.
    /// The message matches the contract callers already assert on.
    #[error("no env was explicity set, and not currently running tests")]
    NoEnvironment,
    /// Failures outside the connector, such as hostname resolution.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
