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

//! Sender layer.
//!
//! A sender is assembled once per subscription by the provider and then driven
//! concurrently by the delivery pipeline. All per-sender state is immutable.

pub(crate) mod broadcast;
pub(crate) mod unicast;

pub use broadcast::HttpBroadcastMessageSender;
pub use unicast::HttpMessageSender;

use crate::message::Message;
use crate::observability::{events, fields};
use crate::outcome::{DeliveryOutcome, DeliveryResult};
use crate::request_factory::HttpRequestFactory;
use crate::subscription::DeliveryMode;
use crate::transport::{HttpProtocol, TransportFailure};
use async_trait::async_trait;
use reqwest::Url;
use tokio::time::Instant;
use tracing::{debug, error, warn, Level};

const COMPONENT: &str = "message_sender";

///
/// [`MessageSender`] pushes messages of one subscription to its receivers.
///
/// `send` never fails: every delivery problem, including an unresolvable
/// endpoint or a misconfigured credential, is reported in the returned
/// [`DeliveryOutcome`]. The delivery mode and protocol are fixed when the sender
/// is built.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, message: &Message) -> DeliveryOutcome;

    fn mode(&self) -> DeliveryMode;

    /// Protocol actually used, which is protocol 1 after a fallback.
    fn protocol(&self) -> HttpProtocol;
}

/// Builds and dispatches one leg, bounded by the request timeout.
pub(crate) async fn deliver(
    request_factory: &HttpRequestFactory,
    subscription: &str,
    uri: Url,
    message: &Message,
) -> DeliveryResult {
    let request = match request_factory.build(uri.clone(), message) {
        Ok(request) => request,
        Err(err) => {
            error!(
                event = events::REQUEST_BUILD_FAILED,
                component = COMPONENT,
                subscription,
                msg_id = message.id(),
                uri = uri.as_str(),
                err = %err,
                "unable to build request; subscription is misconfigured"
            );
            return DeliveryResult::build_failed(uri, err);
        }
    };

    if tracing::enabled!(Level::DEBUG) {
        debug!(
            event = events::DELIVERY_ATTEMPT,
            component = COMPONENT,
            subscription,
            msg_id = message.id(),
            topic = message.topic(),
            attributes = fields::format_attributes(message.attributes()),
            uri = uri.as_str(),
            protocol = %request.protocol,
            "attempting delivery"
        );
    }

    let timeout = request.timeout;
    let started = Instant::now();
    let dispatched =
        tokio::time::timeout(timeout, request_factory.client().dispatch(request)).await;
    let latency = started.elapsed();

    let result = match dispatched {
        Ok(Ok(response)) => DeliveryResult::from_response(uri, &response, latency),
        Ok(Err(failure)) => DeliveryResult::from_transport_failure(uri, failure, latency),
        Err(_elapsed) => {
            DeliveryResult::from_transport_failure(uri, TransportFailure::timeout(timeout), latency)
        }
    };

    match &result.failure {
        None => debug!(
            event = events::DELIVERY_OK,
            component = COMPONENT,
            subscription,
            msg_id = message.id(),
            uri = fields::format_optional_uri(result.uri.as_ref()),
            status = fields::format_status(result.status),
            latency_ms = fields::duration_millis(result.latency),
            "delivery succeeded"
        ),
        Some(failure) => warn!(
            event = events::DELIVERY_FAILED,
            component = COMPONENT,
            subscription,
            msg_id = message.id(),
            retry_count = message.retry_count(),
            uri = fields::format_optional_uri(result.uri.as_ref()),
            status = fields::format_status(result.status),
            latency_ms = fields::duration_millis(result.latency),
            retryable = result.is_retryable(),
            err = %failure,
            "delivery failed"
        ),
    }

    result
}


#[cfg(test)]
mod tests {
    use super::deliver;
    use super::test_support::{request_factory, CountingTransport};
    use crate::message::Message;
    use crate::outcome::DeliveryFailure;
    use reqwest::{StatusCode, Url};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn deliver_times_out_at_the_request_timeout() {
        let transport = Arc::new(CountingTransport::default());
        let factory = request_factory(transport.clone(), Duration::from_millis(1000));

        let result = deliver(
            &factory,
            "audit",
            Url::parse("http://silent/ep").expect("valid url"),
            &Message::new("t", "{}"),
        )
        .await;

        assert!(result.is_timeout());
        assert!(result.latency >= Duration::from_millis(1000));
        assert!(result.latency < Duration::from_millis(1100));
        assert_eq!(transport.dispatch_count(), 1);
    }

    #[tokio::test]
    async fn deliver_maps_non_2xx_to_rejected() {
        let transport = Arc::new(CountingTransport::answering(&[(
            "busy",
            StatusCode::SERVICE_UNAVAILABLE,
        )]));
        let factory = request_factory(transport, Duration::from_millis(1000));

        let result = deliver(
            &factory,
            "audit",
            Url::parse("http://busy/ep").expect("valid url"),
            &Message::new("t", "{}"),
        )
        .await;

        assert!(matches!(
            result.failure,
            Some(DeliveryFailure::Rejected { status }) if status == StatusCode::SERVICE_UNAVAILABLE
        ));
        assert!(result.is_retryable());
    }
}
