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

use crate::endpoint::resolvable::ResolvableEndpointAddress;
use crate::message::Message;
use crate::observability::events;
use crate::outcome::{DeliveryOutcome, DeliveryResult};
use crate::request_factory::HttpRequestFactory;
use crate::sender::{deliver, MessageSender};
use crate::subscription::DeliveryMode;
use crate::transport::HttpProtocol;
use async_trait::async_trait;
use tracing::warn;

const COMPONENT: &str = "unicast_sender";

/// Delivers each message to the single receiver its endpoint resolves to.
pub struct HttpMessageSender {
    subscription: String,
    endpoint: ResolvableEndpointAddress,
    request_factory: HttpRequestFactory,
}

impl HttpMessageSender {
    pub fn new(
        subscription: impl Into<String>,
        endpoint: ResolvableEndpointAddress,
        request_factory: HttpRequestFactory,
    ) -> Self {
        Self {
            subscription: subscription.into(),
            endpoint,
            request_factory,
        }
    }
}

#[async_trait]
impl MessageSender for HttpMessageSender {
    async fn send(&self, message: &Message) -> DeliveryOutcome {
        let uri = match self.endpoint.address_for(message) {
            Ok(uri) => uri,
            Err(err) => {
                warn!(
                    event = events::RESOLUTION_FAILED,
                    component = COMPONENT,
                    subscription = self.subscription.as_str(),
                    msg_id = message.id(),
                    endpoint = %self.endpoint.address(),
                    err = %err,
                    "unable to resolve endpoint for message"
                );
                return DeliveryOutcome::unicast(DeliveryResult::resolution_failed(err));
            }
        };

        DeliveryOutcome::unicast(
            deliver(&self.request_factory, &self.subscription, uri, message).await,
        )
    }

    fn mode(&self) -> DeliveryMode {
        DeliveryMode::Unicast
    }

    fn protocol(&self) -> HttpProtocol {
        self.request_factory.client().protocol()
    }
}

#[cfg(test)]
mod tests {
    use super::HttpMessageSender;
    use crate::endpoint::address::EndpointAddress;
    use crate::endpoint::resolvable::ResolvableEndpointAddress;
    use crate::endpoint::resolver::{
        EndpointAddressResolverMetadata, InterpolatingEndpointAddressResolver,
    };
    use crate::message::Message;
    use crate::outcome::DeliveryFailure;
    use crate::sender::test_support::{request_factory, CountingTransport};
    use crate::sender::MessageSender;
    use reqwest::StatusCode;
    use std::sync::Arc;
    use std::time::Duration;

    fn sender(endpoint: &str, transport: Arc<CountingTransport>) -> HttpMessageSender {
        let endpoint = ResolvableEndpointAddress::new(
            EndpointAddress::new(endpoint),
            Arc::new(InterpolatingEndpointAddressResolver::new()),
            EndpointAddressResolverMetadata::new(),
        )
        .expect("valid endpoint");

        HttpMessageSender::new(
            "audit",
            endpoint,
            request_factory(transport, Duration::from_millis(1000)),
        )
    }

    #[tokio::test]
    async fn templated_endpoint_follows_each_message() {
        let transport = Arc::new(CountingTransport::answering(&[
            ("svca", StatusCode::OK),
            ("svcb", StatusCode::OK),
        ]));
        let sender = sender("http://{host-field}/ep", transport.clone());

        let first = sender
            .send(&Message::new("t", "{}").with_attribute("host-field", "svcA"))
            .await;
        let second = sender
            .send(&Message::new("t", "{}").with_attribute("host-field", "svcB"))
            .await;

        assert!(first.succeeded());
        assert!(second.succeeded());
        assert_eq!(first.succeeded_uris(), vec!["http://svca/ep"]);
        assert_eq!(second.succeeded_uris(), vec!["http://svcb/ep"]);
        assert_eq!(transport.dispatch_count(), 2);
    }

    #[tokio::test]
    async fn unresolvable_message_is_a_failed_outcome_without_dispatch() {
        let transport = Arc::new(CountingTransport::default());
        let sender = sender("http://{host-field}/ep", transport.clone());

        let outcome = sender.send(&Message::new("t", "{}")).await;

        assert!(!outcome.succeeded());
        assert!(!outcome.is_retryable());
        assert!(matches!(
            outcome.legs()[0].failure,
            Some(DeliveryFailure::Resolution(_))
        ));
        assert_eq!(transport.dispatch_count(), 0);
    }
}
