/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
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

//! Canonical structured field keys and value-format helpers.

use reqwest::{StatusCode, Url};
use std::collections::HashMap;

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";
pub const SUBSCRIPTION: &str = "subscription";
pub const ENDPOINT: &str = "endpoint";
pub const MODE: &str = "mode";
pub const PROTOCOL: &str = "protocol";
pub const REQUESTED_PROTOCOL: &str = "requested_protocol";

pub const MSG_ID: &str = "msg_id";
pub const TOPIC: &str = "topic";
pub const RETRY_COUNT: &str = "retry_count";
pub const ATTRIBUTES: &str = "attributes";
pub const URI: &str = "uri";
pub const STATUS: &str = "status";
pub const LATENCY_MS: &str = "latency_ms";

pub const LEGS: &str = "legs";
pub const FAILED: &str = "failed";
pub const SKIPPED: &str = "skipped";
pub const REASON: &str = "reason";
pub const ERR: &str = "err";

pub const NONE: &str = "none";
pub const REASON_ALREADY_DELIVERED: &str = "already_delivered";
pub const REASON_HTTP2_DISABLED: &str = "http2_disabled";

pub fn format_optional_uri(uri: Option<&Url>) -> String {
    uri.map(|uri| uri.as_str().to_string())
        .unwrap_or_else(|| NONE.to_string())
}

pub fn format_status(status: Option<StatusCode>) -> String {
    status
        .map(|status| status.as_u16().to_string())
        .unwrap_or_else(|| NONE.to_string())
}

/// Renders message attributes as `k=v` pairs in key order.
pub fn format_attributes(attributes: &HashMap<String, String>) -> String {
    let mut pairs: Vec<_> = attributes.iter().collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn duration_millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::{duration_millis, format_attributes, format_optional_uri, format_status, NONE};
    use reqwest::{StatusCode, Url};
    use std::collections::HashMap;
    use std::time::Duration;

    #[test]
    fn optional_values_fall_back_to_none() {
        assert_eq!(format_optional_uri(None), NONE);
        assert_eq!(format_status(None), NONE);
    }

    #[test]
    fn present_values_are_compact() {
        let uri = Url::parse("http://r1/ep").expect("valid url");

        assert_eq!(format_optional_uri(Some(&uri)), "http://r1/ep");
        assert_eq!(format_status(Some(StatusCode::ACCEPTED)), "202");
        assert_eq!(duration_millis(Duration::from_millis(1500)), 1500);
    }

    #[test]
    fn attributes_render_sorted() {
        let attributes = HashMap::from([
            ("region".to_string(), "eu".to_string()),
            ("tenant".to_string(), "acme".to_string()),
        ]);

        assert_eq!(format_attributes(&attributes), "region=eu,tenant=acme");
        assert_eq!(format_attributes(&HashMap::new()), "");
    }
}
