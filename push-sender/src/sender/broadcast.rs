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
use crate::observability::{events, fields};
use crate::outcome::{DeliveryOutcome, DeliveryResult};
use crate::request_factory::HttpRequestFactory;
use crate::sender::{deliver, MessageSender};
use crate::subscription::DeliveryMode;
use crate::transport::HttpProtocol;
use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, warn};

const COMPONENT: &str = "broadcast_sender";

///
/// [`HttpBroadcastMessageSender`] delivers each message to every receiver its
/// endpoint resolves to.
///
/// All legs are dispatched concurrently and every leg runs to completion or to
/// its own timeout; a failing leg never cancels its siblings. Receivers already
/// listed in [`Message::succeeded_uris`] are not contacted again.
pub struct HttpBroadcastMessageSender {
    subscription: String,
    endpoint: ResolvableEndpointAddress,
    request_factory: HttpRequestFactory,
}

impl HttpBroadcastMessageSender {
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
impl MessageSender for HttpBroadcastMessageSender {
    async fn send(&self, message: &Message) -> DeliveryOutcome {
        let receivers = match self.endpoint.addresses_for(message) {
            Ok(receivers) => receivers,
            Err(err) => {
                warn!(
                    event = events::RESOLUTION_FAILED,
                    component = COMPONENT,
                    subscription = self.subscription.as_str(),
                    msg_id = message.id(),
                    endpoint = %self.endpoint.address(),
                    err = %err,
                    "unable to resolve broadcast receivers for message"
                );
                return DeliveryOutcome::new(
                    DeliveryMode::Broadcast,
                    vec![DeliveryResult::resolution_failed(err)],
                );
            }
        };

        let (skipped, pending): (Vec<_>, Vec<_>) = receivers
            .into_iter()
            .partition(|uri| message.has_succeeded_for(uri.as_str()));

        for uri in &skipped {
            debug!(
                event = events::DELIVERY_SKIPPED,
                component = COMPONENT,
                subscription = self.subscription.as_str(),
                msg_id = message.id(),
                uri = uri.as_str(),
                reason = fields::REASON_ALREADY_DELIVERED,
                "receiver already reached by an earlier attempt"
            );
        }

        let legs = join_all(
            pending
                .into_iter()
                .map(|uri| deliver(&self.request_factory, &self.subscription, uri, message)),
        )
        .await;

        let outcome = DeliveryOutcome::new(DeliveryMode::Broadcast, legs);
        debug!(
            event = events::BROADCAST_SUMMARY,
            component = COMPONENT,
            subscription = self.subscription.as_str(),
            msg_id = message.id(),
            legs = outcome.legs().len(),
            failed = outcome.failures().count(),
            skipped = skipped.len(),
            latency_ms = fields::duration_millis(outcome.latency()),
            "broadcast finished"
        );
        outcome
    }

    fn mode(&self) -> DeliveryMode {
        DeliveryMode::Broadcast
    }

    fn protocol(&self) -> HttpProtocol {
        self.request_factory.client().protocol()
    }
}
