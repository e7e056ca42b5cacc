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

//! Transport layer.
//!
//! Owns the shared, pooled HTTP clients and the request/response types that
//! cross the boundary between senders and the network. Lifecycle transitions
//! (`start`/`stop`) are driven only by the provider; senders only `dispatch`.

pub(crate) mod client_factory;
pub(crate) mod http_client;
pub(crate) mod request;

pub use client_factory::{HttpClientFactory, ReqwestClientFactory};
pub use http_client::ReqwestHttpClient;
pub use request::{
    HttpProtocol, OutboundRequest, TransportFailure, TransportFailureKind, TransportResponse,
};

use crate::error::LifecycleError;
use async_trait::async_trait;

///
/// [`HttpTransport`] is a process-wide client for one protocol version.
///
/// Once started it is safe to `dispatch` from many tasks at once. `start` and
/// `stop` are invoked only by the [`HttpMessageSenderProvider`][crate::HttpMessageSenderProvider],
/// which serializes them.
///
/// # `impl`ing the [`HttpTransport`] trait
///
/// ```
/// use async_trait::async_trait;
/// use push_sender::{
///     HttpProtocol, HttpTransport, LifecycleError, OutboundRequest, TransportFailure,
///     TransportResponse,
/// };
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// /// Accepts everything without touching the network.
/// #[derive(Default)]
/// pub struct AcceptAllTransport {
///     running: AtomicBool,
/// }
///
/// #[async_trait]
/// impl HttpTransport for AcceptAllTransport {
///     fn protocol(&self) -> HttpProtocol {
///         HttpProtocol::Http1
///     }
///
///     async fn is_running(&self) -> bool {
///         self.running.load(Ordering::SeqCst)
///     }
///
///     async fn start(&self) -> Result<(), LifecycleError> {
///         self.running.store(true, Ordering::SeqCst);
///         Ok(())
///     }
///
///     async fn stop(&self) -> Result<(), LifecycleError> {
///         self.running.store(false, Ordering::SeqCst);
///         Ok(())
///     }
///
///     async fn dispatch(
///         &self,
///         _request: OutboundRequest,
///     ) -> Result<TransportResponse, TransportFailure> {
///         Ok(TransportResponse::new(push_sender::StatusCode::NO_CONTENT))
///     }
/// }
/// ```
#[async_trait]
pub trait HttpTransport: Send + Sync {
    fn protocol(&self) -> HttpProtocol;

    async fn is_running(&self) -> bool;

    async fn start(&self) -> Result<(), LifecycleError>;

    /// Stops the client and releases every pooled connection.
    async fn stop(&self) -> Result<(), LifecycleError>;

    async fn dispatch(&self, request: OutboundRequest)
        -> Result<TransportResponse, TransportFailure>;
}
