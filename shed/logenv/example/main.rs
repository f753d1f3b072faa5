/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

use slog::error;
use slog::info;
use slog::o;

pub fn main() {
    let config = logenv::Config {
        app_name: "logenv_example".to_string(),
        is_dev_env: true,
        ..logenv::Config::default()
    };
    if let Err(err) = logenv::init(&config) {
        panic!("failed to initialize logging: {err}");
    }

    let log = logenv::logger();
    info!(log, "logger initialized");

    {
        let sublog = log.new(o!("component" => "demo"));
        info!(sublog, "structured fields"; "answer" => 42);
        error!(sublog, "example error");
    }

    if let Err(err) = logenv::flush() {
        eprintln!("failed to flush logs: {err}");
    }
}
