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

use crate::endpoint::address::EndpointAddress;
use crate::endpoint::resolver::EndpointAddressResolverMetadata;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 1000;

/// How a message fans out to the receivers implied by the endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryMode {
    #[default]
    Unicast,
    Broadcast,
}

impl Display for DeliveryMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryMode::Unicast => f.write_str("UNICAST"),
            DeliveryMode::Broadcast => f.write_str("BROADCAST"),
        }
    }
}

/// Credentials a subscription requires on every outbound request.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum AuthorizationSpec {
    /// No explicit authorization; credentials embedded in the endpoint still apply.
    #[default]
    None,
    Basic {
        username: String,
        password: String,
    },
    Bearer {
        token: String,
    },
    /// Bearer token re-read from a file on every request, for rotated secrets.
    BearerTokenFile {
        path: PathBuf,
    },
    ApiKey {
        header: String,
        value: String,
    },
}

impl Debug for AuthorizationSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthorizationSpec::None => f.write_str("None"),
            AuthorizationSpec::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            AuthorizationSpec::Bearer { .. } => f.debug_struct("Bearer").finish_non_exhaustive(),
            AuthorizationSpec::BearerTokenFile { path } => f
                .debug_struct("BearerTokenFile")
                .field("path", path)
                .finish(),
            AuthorizationSpec::ApiKey { header, .. } => f
                .debug_struct("ApiKey")
                .field("header", header)
                .finish_non_exhaustive(),
        }
    }
}

///
/// [`Subscription`] is the read-only delivery configuration of one consumer.
///
/// Subscriptions are owned by the metadata store; a [`MessageSender`][crate::MessageSender]
/// captures the values it needs when built and never observes later edits.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use push_sender::{AuthorizationSpec, DeliveryMode, Subscription};
///
/// let subscription = Subscription::new("orders-audit", "orders.created", "http://audit/ep")
///     .with_mode(DeliveryMode::Broadcast)
///     .with_http2(true)
///     .with_request_timeout(Duration::from_millis(2500))
///     .with_authorization(AuthorizationSpec::Bearer { token: "t0k3n".to_string() });
///
/// assert_eq!(subscription.mode(), DeliveryMode::Broadcast);
/// assert!(subscription.is_http2_enabled());
/// assert_eq!(subscription.request_timeout(), Duration::from_millis(2500));
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Subscription {
    name: String,
    topic: String,
    endpoint: EndpointAddress,
    #[serde(default)]
    mode: DeliveryMode,
    #[serde(default)]
    http2_enabled: bool,
    #[serde(default = "default_request_timeout_ms")]
    request_timeout_ms: u64,
    #[serde(default)]
    authorization: AuthorizationSpec,
    #[serde(default)]
    endpoint_address_resolver_metadata: EndpointAddressResolverMetadata,
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

impl Subscription {
    pub fn new(
        name: impl Into<String>,
        topic: impl Into<String>,
        endpoint: impl Into<EndpointAddress>,
    ) -> Self {
        Self {
            name: name.into(),
            topic: topic.into(),
            endpoint: endpoint.into(),
            mode: DeliveryMode::default(),
            http2_enabled: false,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            authorization: AuthorizationSpec::default(),
            endpoint_address_resolver_metadata: EndpointAddressResolverMetadata::default(),
        }
    }

    pub fn with_mode(mut self, mode: DeliveryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_http2(mut self, enabled: bool) -> Self {
        self.http2_enabled = enabled;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_authorization(mut self, authorization: AuthorizationSpec) -> Self {
        self.authorization = authorization;
        self
    }

    pub fn with_endpoint_address_resolver_metadata(
        mut self,
        metadata: EndpointAddressResolverMetadata,
    ) -> Self {
        self.endpoint_address_resolver_metadata = metadata;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn endpoint(&self) -> &EndpointAddress {
        &self.endpoint
    }

    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    pub fn is_http2_enabled(&self) -> bool {
        self.http2_enabled
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn authorization(&self) -> &AuthorizationSpec {
        &self.authorization
    }

    pub fn endpoint_address_resolver_metadata(&self) -> &EndpointAddressResolverMetadata {
        &self.endpoint_address_resolver_metadata
    }
}
