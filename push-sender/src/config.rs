/********************************************************************************
 * Copyright (c) 2025 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Broker-wide settings shared by every sender the provider builds.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SenderConfig {
    #[serde(default)]
    pub http1_client: HttpClientOptions,
    /// Whether a protocol-2 client is created at all; decided once per provider.
    #[serde(default)]
    pub http2_enabled: bool,
    #[serde(default)]
    pub http2_client: HttpClientOptions,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HttpClientOptions {
    #[serde(default = "default_max_idle_connections_per_host")]
    pub max_idle_connections_per_host: usize,
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default)]
    pub follow_redirects: bool,
}

fn default_max_idle_connections_per_host() -> usize {
    100
}

fn default_idle_timeout_ms() -> u64 {
    60_000
}

fn default_connect_timeout_ms() -> u64 {
    3_000
}

impl Default for HttpClientOptions {
    fn default() -> Self {
        Self {
            max_idle_connections_per_host: default_max_idle_connections_per_host(),
            idle_timeout_ms: default_idle_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            follow_redirects: false,
        }
    }
}

impl HttpClientOptions {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl SenderConfig {
    pub fn from_json5_str(contents: &str) -> Result<Self, ConfigError> {
        json5::from_str(contents).map_err(|e| ConfigError::Parse(format!("{e:?}")))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json5_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpClientOptions, SenderConfig};
    use crate::error::ConfigError;

    #[test]
    fn empty_config_uses_defaults() {
        let config = SenderConfig::from_json5_str("{}").expect("empty config parses");

        assert_eq!(config, SenderConfig::default());
        assert!(!config.http2_enabled);
        assert_eq!(config.http1_client.max_idle_connections_per_host, 100);
        assert!(!config.http1_client.follow_redirects);
    }

    #[test]
    fn partial_client_options_keep_other_defaults() {
        let config = SenderConfig::from_json5_str(
            r#"{
                // protocol 2 for subscriptions that ask for it
                http2_enabled: true,
                http2_client: { connect_timeout_ms: 500 },
            }"#,
        )
        .expect("config parses");

        assert!(config.http2_enabled);
        assert_eq!(config.http2_client.connect_timeout_ms, 500);
        assert_eq!(
            config.http2_client.idle_timeout_ms,
            HttpClientOptions::default().idle_timeout_ms
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = SenderConfig::from_json5_str("{ http3_enabled: true }");

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = SenderConfig::from_file("/definitely/not/here.json5");

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
