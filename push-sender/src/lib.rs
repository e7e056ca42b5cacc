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

//! # push-sender
//!
//! `push-sender` is the outbound delivery layer of a publish/subscribe broker: it
//! turns a subscription's declarative delivery settings into a live sender that
//! pushes messages to consumer-owned HTTP endpoints.
//!
//! Typical usage is API-first and centered on [`HttpMessageSenderProvider`],
//! [`Subscription`] and [`MessageSender`].
//!
//! ## Quick start
//!
//! ```
//! use std::sync::Arc;
//! use push_sender::{
//!     AuthorizationSpec, DefaultAuthorizationProviderFactory, HttpMessageSenderProvider,
//!     InterpolatingEndpointAddressResolver, Message, MessageSender, MessageSenderProvider,
//!     SenderConfig, Subscription, TraceMetadataAppender,
//! };
//!
//! # pub mod mock_transport {
//! #     use std::sync::Arc;
//! #     use async_trait::async_trait;
//! #     use push_sender::{
//! #         HttpClientFactory, HttpProtocol, HttpTransport, LifecycleError, OutboundRequest,
//! #         StatusCode, TransportFailure, TransportResponse,
//! #     };
//! #
//! #     pub struct MockTransport(pub HttpProtocol);
//! #
//! #     #[async_trait]
//! #     impl HttpTransport for MockTransport {
//! #         fn protocol(&self) -> HttpProtocol { self.0 }
//! #         async fn is_running(&self) -> bool { true }
//! #         async fn start(&self) -> Result<(), LifecycleError> { Ok(()) }
//! #         async fn stop(&self) -> Result<(), LifecycleError> { Ok(()) }
//! #         async fn dispatch(
//! #             &self,
//! #             _request: OutboundRequest,
//! #         ) -> Result<TransportResponse, TransportFailure> {
//! #             Ok(TransportResponse::new(StatusCode::OK))
//! #         }
//! #     }
//! #
//! #     pub struct MockClientFactory;
//! #
//! #     impl HttpClientFactory for MockClientFactory {
//! #         fn provide(&self) -> Arc<dyn HttpTransport> {
//! #             Arc::new(MockTransport(HttpProtocol::Http1))
//! #         }
//! #         fn create_client_for_http2(&self) -> Arc<dyn HttpTransport> {
//! #             Arc::new(MockTransport(HttpProtocol::Http2))
//! #         }
//! #     }
//! # }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let provider = HttpMessageSenderProvider::new(
//!     &SenderConfig::default(),
//!     &mock_transport::MockClientFactory,
//!     Arc::new(InterpolatingEndpointAddressResolver::new()),
//!     Arc::new(TraceMetadataAppender::new()),
//!     Arc::new(DefaultAuthorizationProviderFactory::new()),
//! );
//! provider.start().await.unwrap();
//!
//! let subscription = Subscription::new("orders-audit", "orders.created", "http://{region}.audit/ep")
//!     .with_authorization(AuthorizationSpec::Bearer { token: "t0k3n".to_string() });
//! let sender = provider.create(&subscription).unwrap();
//!
//! let message = Message::new("orders.created", r#"{"id":7}"#).with_attribute("region", "eu");
//! let outcome = sender.send(&message).await;
//!
//! assert!(outcome.succeeded());
//! assert_eq!(outcome.succeeded_uris(), vec!["http://eu.audit/ep"]);
//!
//! provider.stop().await.unwrap();
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - Endpoint: address parsing, templates and per-message resolution
//! - Request factory: method, body, timeout, authorization and metadata headers
//! - Senders: unicast and broadcast delivery over a shared dispatch path
//! - Provider: protocol selection, sender assembly and client lifecycle
//! - Transport: pooled protocol-1 and protocol-2 clients
//!
//! ## Observability model
//!
//! The workspace uses `tracing` for logs/events.
//! Library code emits events and does not initialize a global subscriber.
//! Binaries and tests are responsible for one-time `tracing_subscriber`
//! initialization at process boundaries.
//!
//! Every event carries `event` and `component` fields; names are listed in
//! [`observability::events`]. Successful deliveries log at `debug`, failed
//! deliveries at `warn`, request build failures at `error`.

pub(crate) mod auth;
pub(crate) mod config;
pub(crate) mod endpoint;
pub(crate) mod error;
pub(crate) mod message;
pub(crate) mod metadata;
pub(crate) mod outcome;
pub(crate) mod provider;
pub(crate) mod request_factory;
pub(crate) mod sender;
pub(crate) mod subscription;
pub(crate) mod transport;

#[doc(hidden)]
pub mod observability;

pub use auth::{
    AuthorizationError, CredentialSource, DefaultAuthorizationProviderFactory,
    HttpAuthorizationProviderFactory, StaticCredential, TokenFileCredential,
};
pub use config::{HttpClientOptions, SenderConfig};
pub use endpoint::address::{EndpointAddress, EndpointCredentials};
pub use endpoint::resolvable::ResolvableEndpointAddress;
pub use endpoint::resolver::{
    EndpointAddressResolver, EndpointAddressResolverMetadata,
    InterpolatingEndpointAddressResolver, ResolutionError, MAX_BROADCAST_RECEIVERS,
};
pub use error::{ConfigError, LifecycleError, SenderCreationError};
pub use message::{Message, DEFAULT_CONTENT_TYPE};
pub use metadata::{MetadataAppender, NoopMetadataAppender, TraceMetadataAppender, TRACE_HEADERS};
pub use outcome::{DeliveryFailure, DeliveryOutcome, DeliveryResult};
pub use provider::{HttpMessageSenderProvider, MessageSenderProvider};
pub use request_factory::{
    HttpRequestFactory, RequestBuildError, MESSAGE_ID_HEADER, RETRY_COUNT_HEADER,
    SUBSCRIPTION_NAME_HEADER, TOPIC_NAME_HEADER,
};
pub use sender::{HttpBroadcastMessageSender, HttpMessageSender, MessageSender};
pub use subscription::{AuthorizationSpec, DeliveryMode, Subscription, DEFAULT_REQUEST_TIMEOUT_MS};
pub use transport::{
    HttpClientFactory, HttpProtocol, HttpTransport, OutboundRequest, ReqwestClientFactory,
    ReqwestHttpClient, TransportFailure, TransportFailureKind, TransportResponse,
};

pub use reqwest::header;
pub use reqwest::{Method, StatusCode, Url, Version};
