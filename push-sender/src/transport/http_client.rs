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

//! `reqwest`-backed transport client with an explicit running/stopped state.

use crate::config::HttpClientOptions;
use crate::error::LifecycleError;
use crate::observability::events;
use crate::transport::request::{
    HttpProtocol, OutboundRequest, TransportFailure, TransportFailureKind, TransportResponse,
};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use reqwest::redirect::Policy;
use tokio::sync::RwLock;
use tracing::info;

const COMPONENT: &str = "http_client";
const MAX_REDIRECTS: usize = 5;

/// Pooled HTTP client for one protocol version.
///
/// `start` builds the pooled client and `stop` drops it, which closes every idle
/// connection. Requests dispatched while stopped fail with
/// [`TransportFailureKind::ClientStopped`].
pub struct ReqwestHttpClient {
    protocol: HttpProtocol,
    options: HttpClientOptions,
    client: RwLock<Option<reqwest::Client>>,
}

impl ReqwestHttpClient {
    pub fn new(protocol: HttpProtocol, options: HttpClientOptions) -> Self {
        Self {
            protocol,
            options,
            client: RwLock::new(None),
        }
    }

    fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let redirect = if self.options.follow_redirects {
            Policy::limited(MAX_REDIRECTS)
        } else {
            Policy::none()
        };

        let builder = reqwest::Client::builder()
            .pool_max_idle_per_host(self.options.max_idle_connections_per_host)
            .pool_idle_timeout(self.options.idle_timeout())
            .connect_timeout(self.options.connect_timeout())
            .redirect(redirect);

        match self.protocol {
            HttpProtocol::Http1 => builder.http1_only(),
            HttpProtocol::Http2 => builder.http2_prior_knowledge(),
        }
        .build()
    }
}

fn classify_error(err: reqwest::Error) -> TransportFailure {
    let kind = if err.is_timeout() {
        TransportFailureKind::Timeout
    } else if err.is_connect() {
        TransportFailureKind::Connect
    } else if err.is_request() || err.is_body() || err.is_decode() || err.is_redirect() {
        TransportFailureKind::Protocol
    } else {
        TransportFailureKind::Other
    };

    TransportFailure::new(kind, err.to_string())
}

#[async_trait]
impl HttpTransport for ReqwestHttpClient {
    fn protocol(&self) -> HttpProtocol {
        self.protocol
    }

    async fn is_running(&self) -> bool {
        self.client.read().await.is_some()
    }

    async fn start(&self) -> Result<(), LifecycleError> {
        let mut slot = self.client.write().await;
        if slot.is_some() {
            return Ok(());
        }

        let client = self
            .build_client()
            .map_err(|err| LifecycleError::StartFailed {
                protocol: self.protocol,
                reason: err.to_string(),
            })?;
        *slot = Some(client);

        info!(
            event = events::CLIENT_STARTED,
            component = COMPONENT,
            protocol = %self.protocol,
            "transport client started"
        );
        Ok(())
    }

    async fn stop(&self) -> Result<(), LifecycleError> {
        if self.client.write().await.take().is_some() {
            info!(
                event = events::CLIENT_STOPPED,
                component = COMPONENT,
                protocol = %self.protocol,
                "transport client stopped"
            );
        }
        Ok(())
    }

    async fn dispatch(
        &self,
        request: OutboundRequest,
    ) -> Result<TransportResponse, TransportFailure> {
        let Some(client) = self.client.read().await.clone() else {
            return Err(TransportFailure::new(
                TransportFailureKind::ClientStopped,
                format!("{} client is not running", self.protocol),
            ));
        };

        let response = client
            .request(request.method, request.uri)
            .headers(request.headers)
            .body(request.body)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        // Drain so the connection goes back to the pool.
        response.bytes().await.map_err(classify_error)?;

        Ok(TransportResponse { status, headers })
    }
}

#[cfg(test)]
mod tests {
    use super::ReqwestHttpClient;
    use crate::config::HttpClientOptions;
    use crate::transport::request::{HttpProtocol, OutboundRequest, TransportFailureKind};
    use crate::transport::HttpTransport;
    use bytes::Bytes;
    use reqwest::header::HeaderMap;
    use reqwest::{Method, Url};
    use std::time::Duration;

    fn request() -> OutboundRequest {
        OutboundRequest {
            uri: Url::parse("http://127.0.0.1:9/ep").expect("valid url"),
            method: Method::POST,
            headers: HeaderMap::new(),
            body: Bytes::from_static(b"{}"),
            timeout: Duration::from_millis(100),
            protocol: HttpProtocol::Http1,
        }
    }

    #[tokio::test]
    async fn dispatch_before_start_reports_stopped_client() {
        let client = ReqwestHttpClient::new(HttpProtocol::Http1, HttpClientOptions::default());

        let failure = client
            .dispatch(request())
            .await
            .expect_err("client was never started");

        assert_eq!(failure.kind, TransportFailureKind::ClientStopped);
    }

    #[tokio::test]
    async fn start_and_stop_are_idempotent() {
        let client = ReqwestHttpClient::new(HttpProtocol::Http2, HttpClientOptions::default());

        client.start().await.expect("first start");
        client.start().await.expect("second start is a no-op");
        assert!(client.is_running().await);

        client.stop().await.expect("first stop");
        client.stop().await.expect("second stop is a no-op");
        assert!(!client.is_running().await);
    }
}
