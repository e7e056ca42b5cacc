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

//! Sender assembly and shared client lifecycle.

use crate::auth::{DefaultAuthorizationProviderFactory, HttpAuthorizationProviderFactory};
use crate::config::SenderConfig;
use crate::endpoint::resolvable::ResolvableEndpointAddress;
use crate::endpoint::resolver::{EndpointAddressResolver, InterpolatingEndpointAddressResolver};
use crate::error::{LifecycleError, SenderCreationError};
use crate::metadata::{MetadataAppender, TraceMetadataAppender};
use crate::observability::{events, fields};
use crate::request_factory::HttpRequestFactory;
use crate::sender::{HttpBroadcastMessageSender, HttpMessageSender, MessageSender};
use crate::subscription::{DeliveryMode, Subscription};
use crate::transport::{HttpClientFactory, HttpProtocol, HttpTransport, ReqwestClientFactory};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

const COMPONENT: &str = "sender_provider";
const SUPPORTED_PROTOCOLS: [&str; 2] = ["http", "https"];

///
/// [`MessageSenderProvider`] is the delivery pipeline's entry point.
///
/// `start` and `stop` are the broker lifecycle hooks; `create` is called
/// whenever a subscription becomes active or changes, and performs no I/O.
/// Calling `create` after `stop` is not supported.
#[async_trait]
pub trait MessageSenderProvider: Send + Sync {
    async fn start(&self) -> Result<(), LifecycleError>;

    async fn stop(&self) -> Result<(), LifecycleError>;

    fn create(
        &self,
        subscription: &Subscription,
    ) -> Result<Arc<dyn MessageSender>, SenderCreationError>;

    /// Endpoint schemes this provider can deliver to.
    fn supported_protocols(&self) -> &[&'static str];
}

///
/// [`HttpMessageSenderProvider`] owns the shared transport clients and builds
/// one sender per subscription.
///
/// The protocol-1 client always exists. The protocol-2 client exists only when
/// [`SenderConfig::http2_enabled`] is set; that decision is made once here.
/// Subscriptions asking for protocol 2 without it are bound to protocol 1.
///
/// # Examples
///
/// ```no_run
/// use push_sender::{
///     HttpMessageSenderProvider, Message, MessageSender, MessageSenderProvider, SenderConfig,
///     Subscription,
/// };
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = HttpMessageSenderProvider::with_defaults(&SenderConfig::default());
/// provider.start().await?;
///
/// let subscription = Subscription::new("orders-audit", "orders.created", "http://audit:8080/ep");
/// let sender = provider.create(&subscription)?;
///
/// let outcome = sender.send(&Message::new("orders.created", r#"{"id":7}"#)).await;
/// println!("{outcome}");
///
/// provider.stop().await?;
/// # Ok(())
/// # }
/// ```
pub struct HttpMessageSenderProvider {
    http1_client: Arc<dyn HttpTransport>,
    http2_client: Option<Arc<dyn HttpTransport>>,
    resolver: Arc<dyn EndpointAddressResolver>,
    metadata_appender: Arc<dyn MetadataAppender>,
    authorization: Arc<dyn HttpAuthorizationProviderFactory>,
    lifecycle: Mutex<()>,
    protocol_fallbacks: AtomicU64,
}

impl HttpMessageSenderProvider {
    pub fn new(
        config: &SenderConfig,
        client_factory: &dyn HttpClientFactory,
        resolver: Arc<dyn EndpointAddressResolver>,
        metadata_appender: Arc<dyn MetadataAppender>,
        authorization: Arc<dyn HttpAuthorizationProviderFactory>,
    ) -> Self {
        let http2_client = config
            .http2_enabled
            .then(|| client_factory.create_client_for_http2());

        Self {
            http1_client: client_factory.provide(),
            http2_client,
            resolver,
            metadata_appender,
            authorization,
            lifecycle: Mutex::new(()),
            protocol_fallbacks: AtomicU64::new(0),
        }
    }

    /// Provider backed by `reqwest` clients, interpolating endpoint resolution,
    /// trace header propagation and the built-in authorization schemes.
    pub fn with_defaults(config: &SenderConfig) -> Self {
        Self::new(
            config,
            &ReqwestClientFactory::new(config.clone()),
            Arc::new(InterpolatingEndpointAddressResolver::new()),
            Arc::new(TraceMetadataAppender::new()),
            Arc::new(DefaultAuthorizationProviderFactory::new()),
        )
    }

    pub fn is_http2_available(&self) -> bool {
        self.http2_client.is_some()
    }

    /// Number of senders built on protocol 1 although protocol 2 was requested.
    pub fn protocol_fallback_count(&self) -> u64 {
        self.protocol_fallbacks.load(Ordering::Relaxed)
    }

    fn clients(&self) -> impl Iterator<Item = &Arc<dyn HttpTransport>> {
        std::iter::once(&self.http1_client).chain(self.http2_client.as_ref())
    }

    fn select_client(&self, subscription: &Subscription) -> Arc<dyn HttpTransport> {
        if !subscription.is_http2_enabled() {
            return self.http1_client.clone();
        }

        match &self.http2_client {
            Some(client) => client.clone(),
            None => {
                self.protocol_fallbacks.fetch_add(1, Ordering::Relaxed);
                info!(
                    event = events::PROTOCOL_FALLBACK,
                    component = COMPONENT,
                    subscription = subscription.name(),
                    requested_protocol = %HttpProtocol::Http2,
                    protocol = %HttpProtocol::Http1,
                    reason = fields::REASON_HTTP2_DISABLED,
                    "protocol 2 requested but not enabled; using protocol 1"
                );
                self.http1_client.clone()
            }
        }
    }

    fn assemble(
        &self,
        subscription: &Subscription,
    ) -> Result<Arc<dyn MessageSender>, SenderCreationError> {
        if subscription.request_timeout().is_zero() {
            return Err(SenderCreationError::ZeroRequestTimeout {
                subscription: subscription.name().to_string(),
            });
        }

        let credentials = self.authorization.create(subscription).map_err(|source| {
            SenderCreationError::Authorization {
                subscription: subscription.name().to_string(),
                source,
            }
        })?;

        let endpoint = ResolvableEndpointAddress::new(
            subscription.endpoint().clone(),
            self.resolver.clone(),
            subscription.endpoint_address_resolver_metadata().clone(),
        )
        .map_err(|source| SenderCreationError::InvalidEndpoint {
            subscription: subscription.name().to_string(),
            source,
        })?;

        let request_factory = HttpRequestFactory::new(
            self.select_client(subscription),
            subscription.request_timeout(),
            self.metadata_appender.clone(),
            credentials,
            subscription.name(),
        );

        let sender: Arc<dyn MessageSender> = match subscription.mode() {
            DeliveryMode::Unicast => Arc::new(HttpMessageSender::new(
                subscription.name(),
                endpoint,
                request_factory,
            )),
            DeliveryMode::Broadcast => Arc::new(HttpBroadcastMessageSender::new(
                subscription.name(),
                endpoint,
                request_factory,
            )),
        };
        Ok(sender)
    }
}

#[async_trait]
impl MessageSenderProvider for HttpMessageSenderProvider {
    async fn start(&self) -> Result<(), LifecycleError> {
        let _guard = self.lifecycle.lock().await;

        for client in self.clients() {
            if !client.is_running().await {
                client.start().await?;
            }
        }

        info!(
            event = events::PROVIDER_START,
            component = COMPONENT,
            http2_available = self.is_http2_available(),
            "sender provider started"
        );
        Ok(())
    }

    async fn stop(&self) -> Result<(), LifecycleError> {
        let _guard = self.lifecycle.lock().await;

        for client in self.clients() {
            if client.is_running().await {
                client.stop().await?;
            }
        }

        info!(
            event = events::PROVIDER_STOP,
            component = COMPONENT,
            "sender provider stopped"
        );
        Ok(())
    }

    fn create(
        &self,
        subscription: &Subscription,
    ) -> Result<Arc<dyn MessageSender>, SenderCreationError> {
        match self.assemble(subscription) {
            Ok(sender) => {
                info!(
                    event = events::SENDER_CREATE,
                    component = COMPONENT,
                    subscription = subscription.name(),
                    endpoint = %subscription.endpoint(),
                    mode = %sender.mode(),
                    protocol = %sender.protocol(),
                    "message sender created"
                );
                Ok(sender)
            }
            Err(err) => {
                warn!(
                    event = events::SENDER_CREATE_FAILED,
                    component = COMPONENT,
                    subscription = subscription.name(),
                    endpoint = %subscription.endpoint(),
                    err = %err,
                    "unable to create message sender"
                );
                Err(err)
            }
        }
    }

    fn supported_protocols(&self) -> &[&'static str] {
        &SUPPORTED_PROTOCOLS
    }
}
