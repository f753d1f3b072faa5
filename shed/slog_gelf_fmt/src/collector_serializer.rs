/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! Serializer that collects KV pairs into a vector for later processing

use std::fmt::Arguments;

use slog::Key;
use slog::Result as SlogResult;
use slog::Serializer;

/// A [`Serializer`] that formats every value and collects the resulting
/// `(key, value)` pairs in emission order.
#[derive(Default)]
pub struct CollectorSerializer(Vec<(Key, String)>);

impl CollectorSerializer {
    /// Create an empty collector.
    pub fn new() -> CollectorSerializer {
        CollectorSerializer::default()
    }

    /// Consume the collector, returning the collected pairs.
    pub fn into_inner(self) -> Vec<(Key, String)> {
        self.0
    }
}

impl Serializer for CollectorSerializer {
    fn emit_arguments(&mut self, key: Key, val: &Arguments<'_>) -> SlogResult {
        self.0.push((key, val.to_string()));
        Ok(())
    }
}
