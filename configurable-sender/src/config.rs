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

use push_sender::{SenderConfig, Subscription};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub(crate) sender: SenderConfig,
    pub(crate) subscriptions: Vec<Subscription>,
}

impl Config {
    pub fn from_json5_str(contents: &str) -> Result<Self, String> {
        let config: Config = json5::from_str(contents)
            .map_err(|e| format!("Unable to parse config file: {e:?}"))?;

        let mut names = HashSet::new();
        for subscription in &config.subscriptions {
            if !names.insert(subscription.name()) {
                return Err(format!(
                    "Duplicate subscription name found: {}",
                    subscription.name()
                ));
            }
        }

        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Unable to read config file {}: {e:?}", path.display()))?;
        Self::from_json5_str(&contents)
    }

    pub fn subscription(&self, name: &str) -> Option<&Subscription> {
        self.subscriptions
            .iter()
            .find(|subscription| subscription.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use push_sender::{AuthorizationSpec, DeliveryMode};
    use std::time::Duration;

    const SAMPLE: &str = r#"{
        sender: { http2_enabled: true },
        subscriptions: [
            {
                name: "audit",
                topic: "orders.created",
                endpoint: "http://audit:8080/ep",
                request_timeout_ms: 2500,
                authorization: { type: "bearer", token: "t0k3n" },
            },
            {
                name: "fanout",
                topic: "orders.created",
                endpoint: "http://{receivers}/ep",
                mode: "BROADCAST",
                endpoint_address_resolver_metadata: { receivers: ["r1", "r2"] },
            },
        ],
    }"#;

    #[test]
    fn parses_sender_settings_and_subscriptions() {
        let config = Config::from_json5_str(SAMPLE).expect("sample config parses");

        assert!(config.sender.http2_enabled);
        assert_eq!(config.subscriptions.len(), 2);

        let audit = config.subscription("audit").expect("audit is configured");
        assert_eq!(audit.request_timeout(), Duration::from_millis(2500));
        assert!(matches!(
            audit.authorization(),
            AuthorizationSpec::Bearer { .. }
        ));

        let fanout = config.subscription("fanout").expect("fanout is configured");
        assert_eq!(fanout.mode(), DeliveryMode::Broadcast);
        assert!(fanout.endpoint().is_templated());
        assert!(config.subscription("missing").is_none());
    }

    #[test]
    fn duplicate_subscription_names_are_rejected() {
        let err = Config::from_json5_str(
            r#"{ subscriptions: [
                { name: "a", topic: "t", endpoint: "http://x/ep" },
                { name: "a", topic: "t", endpoint: "http://y/ep" },
            ] }"#,
        )
        .expect_err("duplicates must fail");

        assert!(err.contains("Duplicate subscription name"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Config::from_json5_str(r#"{ subscriptions: [], retries: 3 }"#).is_err());
    }
}
