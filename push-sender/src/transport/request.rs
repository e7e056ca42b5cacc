/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
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

use bytes::Bytes;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Method, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Wire protocol a transport client speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HttpProtocol {
    Http1,
    Http2,
}

impl Display for HttpProtocol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpProtocol::Http1 => f.write_str("http/1.1"),
            HttpProtocol::Http2 => f.write_str("h2"),
        }
    }
}

/// One request, built fresh for each send attempt and never reused.
#[derive(Clone, Debug)]
pub struct OutboundRequest {
    pub uri: Url,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub timeout: Duration,
    pub protocol: HttpProtocol,
}

/// Status and headers of a receiver's answer. The body is drained and dropped.
#[derive(Clone, Debug)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl TransportResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
        }
    }

    /// `Retry-After` in delta-seconds form; HTTP-date values are ignored.
    pub fn retry_after(&self) -> Option<Duration> {
        self.headers
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportFailureKind {
    Timeout,
    Connect,
    ClientStopped,
    Protocol,
    Other,
}

/// Failure before any HTTP status was received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportFailure {
    pub kind: TransportFailureKind,
    pub message: String,
}

impl TransportFailure {
    pub fn new(kind: TransportFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(
            TransportFailureKind::Timeout,
            format!("no response within {}ms", after.as_millis()),
        )
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == TransportFailureKind::Timeout
    }
}

impl Display for TransportFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for TransportFailure {}

#[cfg(test)]
mod tests {
    use super::{TransportFailure, TransportResponse};
    use reqwest::header::{HeaderValue, RETRY_AFTER};
    use reqwest::StatusCode;
    use std::time::Duration;

    #[test]
    fn retry_after_reads_delta_seconds() {
        let mut response = TransportResponse::new(StatusCode::SERVICE_UNAVAILABLE);
        response
            .headers
            .insert(RETRY_AFTER, HeaderValue::from_static("12"));

        assert_eq!(response.retry_after(), Some(Duration::from_secs(12)));
    }

    #[test]
    fn retry_after_ignores_http_dates() {
        let mut response = TransportResponse::new(StatusCode::TOO_MANY_REQUESTS);
        response.headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );

        assert_eq!(response.retry_after(), None);
    }

    #[test]
    fn timeout_failure_mentions_deadline() {
        let failure = TransportFailure::timeout(Duration::from_millis(1000));

        assert!(failure.is_timeout());
        assert!(failure.to_string().contains("1000ms"));
    }
}
