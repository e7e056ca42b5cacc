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

//! Per-receiver results and their aggregate.
//!
//! Every delivery problem ends up here instead of being raised, so the upstream
//! pipeline can inspect unicast and broadcast attempts the same way.

use crate::endpoint::resolver::ResolutionError;
use crate::request_factory::RequestBuildError;
use crate::subscription::DeliveryMode;
use crate::transport::{TransportFailure, TransportResponse};
use reqwest::{StatusCode, Url};
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Why one leg did not succeed.
#[derive(Debug)]
pub enum DeliveryFailure {
    Resolution(ResolutionError),
    RequestBuild(RequestBuildError),
    Transport(TransportFailure),
    /// The receiver answered with a non-2xx status.
    Rejected { status: StatusCode },
}

impl Display for DeliveryFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryFailure::Resolution(err) => write!(f, "endpoint resolution failed: {err}"),
            DeliveryFailure::RequestBuild(err) => write!(f, "request build failed: {err}"),
            DeliveryFailure::Transport(err) => write!(f, "transport failure: {err}"),
            DeliveryFailure::Rejected { status } => write!(f, "receiver rejected with {status}"),
        }
    }
}

/// Result of delivering to one receiver.
#[derive(Debug)]
pub struct DeliveryResult {
    pub uri: Option<Url>,
    pub status: Option<StatusCode>,
    pub failure: Option<DeliveryFailure>,
    pub latency: Duration,
    pub retry_after: Option<Duration>,
}

impl DeliveryResult {
    pub fn from_response(uri: Url, response: &TransportResponse, latency: Duration) -> Self {
        let status = response.status;
        let failure = (!status.is_success()).then_some(DeliveryFailure::Rejected { status });
        let retry_after = match status {
            StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE => {
                response.retry_after()
            }
            _ => None,
        };

        Self {
            uri: Some(uri),
            status: Some(status),
            failure,
            latency,
            retry_after,
        }
    }

    pub fn from_transport_failure(uri: Url, failure: TransportFailure, latency: Duration) -> Self {
        Self {
            uri: Some(uri),
            status: None,
            failure: Some(DeliveryFailure::Transport(failure)),
            latency,
            retry_after: None,
        }
    }

    pub fn resolution_failed(err: ResolutionError) -> Self {
        Self {
            uri: None,
            status: None,
            failure: Some(DeliveryFailure::Resolution(err)),
            latency: Duration::ZERO,
            retry_after: None,
        }
    }

    pub fn build_failed(uri: Url, err: RequestBuildError) -> Self {
        Self {
            uri: Some(uri),
            status: None,
            failure: Some(DeliveryFailure::RequestBuild(err)),
            latency: Duration::ZERO,
            retry_after: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Transport failures, 5xx, 408 and 429 may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match &self.failure {
            None => false,
            Some(DeliveryFailure::Transport(_)) => true,
            Some(DeliveryFailure::Rejected { status }) => {
                status.is_server_error()
                    || *status == StatusCode::REQUEST_TIMEOUT
                    || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Some(DeliveryFailure::Resolution(_)) | Some(DeliveryFailure::RequestBuild(_)) => false,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(&self.failure, Some(DeliveryFailure::Transport(failure)) if failure.is_timeout())
    }

    pub fn is_client_error(&self) -> bool {
        self.status.is_some_and(|status| status.is_client_error())
    }
}

///
/// [`DeliveryOutcome`] aggregates the legs of one `send` call.
///
/// A unicast outcome has at most one leg. A broadcast outcome has one leg per
/// receiver attempted and succeeds only if every leg succeeded; a broadcast with
/// nothing left to attempt has zero legs and counts as success.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use push_sender::{DeliveryMode, DeliveryOutcome, DeliveryResult, StatusCode, TransportResponse, Url};
///
/// let ok = DeliveryResult::from_response(
///     Url::parse("http://r1/ep").unwrap(),
///     &TransportResponse::new(StatusCode::OK),
///     Duration::from_millis(20),
/// );
/// let busy = DeliveryResult::from_response(
///     Url::parse("http://r2/ep").unwrap(),
///     &TransportResponse::new(StatusCode::SERVICE_UNAVAILABLE),
///     Duration::from_millis(45),
/// );
///
/// let outcome = DeliveryOutcome::new(DeliveryMode::Broadcast, vec![ok, busy]);
///
/// assert!(!outcome.succeeded());
/// assert!(outcome.is_retryable());
/// assert_eq!(outcome.latency(), Duration::from_millis(45));
/// assert_eq!(outcome.succeeded_uris(), vec!["http://r1/ep"]);
/// ```
#[derive(Debug)]
pub struct DeliveryOutcome {
    mode: DeliveryMode,
    legs: Vec<DeliveryResult>,
}

impl DeliveryOutcome {
    pub fn new(mode: DeliveryMode, legs: Vec<DeliveryResult>) -> Self {
        Self { mode, legs }
    }

    pub fn unicast(result: DeliveryResult) -> Self {
        Self::new(DeliveryMode::Unicast, vec![result])
    }

    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    pub fn legs(&self) -> &[DeliveryResult] {
        &self.legs
    }

    pub fn succeeded(&self) -> bool {
        self.legs.iter().all(DeliveryResult::is_success)
    }

    /// Status of the first failed leg, or of the first leg when all succeeded.
    pub fn status_code(&self) -> Option<StatusCode> {
        self.failures()
            .next()
            .or_else(|| self.legs.first())
            .and_then(|leg| leg.status)
    }

    /// The slowest leg; legs run concurrently so this bounds the whole call.
    pub fn latency(&self) -> Duration {
        self.legs
            .iter()
            .map(|leg| leg.latency)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    pub fn succeeded_uris(&self) -> Vec<&str> {
        self.legs
            .iter()
            .filter(|leg| leg.is_success())
            .filter_map(|leg| leg.uri.as_ref().map(Url::as_str))
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeliveryResult> {
        self.legs.iter().filter(|leg| !leg.is_success())
    }

    /// Whether retrying can help: some failed leg failed for a transient reason.
    pub fn is_retryable(&self) -> bool {
        self.failures().any(DeliveryResult::is_retryable)
    }

    /// Longest `Retry-After` announced by a failed leg.
    pub fn retry_after(&self) -> Option<Duration> {
        self.failures().filter_map(|leg| leg.retry_after).max()
    }

    pub fn is_timeout(&self) -> bool {
        self.failures().any(DeliveryResult::is_timeout)
    }

    /// Every failed leg was answered with 4xx.
    pub fn is_client_error(&self) -> bool {
        let mut failures = self.failures().peekable();
        failures.peek().is_some() && failures.all(DeliveryResult::is_client_error)
    }
}

impl Display for DeliveryOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let failed = self.failures().count();
        write!(
            f,
            "{} delivery {}: {} of {} legs succeeded in {}ms",
            self.mode,
            if self.succeeded() { "succeeded" } else { "failed" },
            self.legs.len() - failed,
            self.legs.len(),
            self.latency().as_millis()
        )
    }
}
