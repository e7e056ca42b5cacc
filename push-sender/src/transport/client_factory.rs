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

use crate::config::SenderConfig;
use crate::transport::http_client::ReqwestHttpClient;
use crate::transport::request::HttpProtocol;
use crate::transport::HttpTransport;
use std::sync::Arc;

/// [`HttpClientFactory`] creates the transport clients a provider will own.
///
/// The provider asks for the protocol-1 client unconditionally and for the
/// protocol-2 client only when the broker configuration enables it. Clients are
/// returned stopped; the provider starts them.
///
/// # `impl`ing the [`HttpClientFactory`] trait
///
/// ```
/// use std::sync::Arc;
/// use push_sender::{
///     HttpClientFactory, HttpClientOptions, HttpProtocol, HttpTransport, ReqwestHttpClient,
/// };
///
/// /// Uses one tuned option set for both protocols.
/// pub struct TunedClientFactory {
///     options: HttpClientOptions,
/// }
///
/// impl HttpClientFactory for TunedClientFactory {
///     fn provide(&self) -> Arc<dyn HttpTransport> {
///         Arc::new(ReqwestHttpClient::new(HttpProtocol::Http1, self.options.clone()))
///     }
///
///     fn create_client_for_http2(&self) -> Arc<dyn HttpTransport> {
///         Arc::new(ReqwestHttpClient::new(HttpProtocol::Http2, self.options.clone()))
///     }
/// }
/// ```
pub trait HttpClientFactory: Send + Sync {
    /// Protocol-1 client, always created.
    fn provide(&self) -> Arc<dyn HttpTransport>;

    /// Protocol-2 client, created only when protocol 2 is enabled.
    fn create_client_for_http2(&self) -> Arc<dyn HttpTransport>;
}

/// Default factory building [`ReqwestHttpClient`]s from [`SenderConfig`].
pub struct ReqwestClientFactory {
    config: SenderConfig,
}

impl ReqwestClientFactory {
    pub fn new(config: SenderConfig) -> Self {
        Self { config }
    }
}

impl HttpClientFactory for ReqwestClientFactory {
    fn provide(&self) -> Arc<dyn HttpTransport> {
        Arc::new(ReqwestHttpClient::new(
            HttpProtocol::Http1,
            self.config.http1_client.clone(),
        ))
    }

    fn create_client_for_http2(&self) -> Arc<dyn HttpTransport> {
        Arc::new(ReqwestHttpClient::new(
            HttpProtocol::Http2,
            self.config.http2_client.clone(),
        ))
    }
}
