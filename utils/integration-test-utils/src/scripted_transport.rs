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

use async_trait::async_trait;
use push_sender::header::HeaderMap;
use push_sender::{
    HttpClientFactory, HttpProtocol, HttpTransport, LifecycleError, OutboundRequest, StatusCode,
    TransportFailure, TransportFailureKind, TransportResponse,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// How a scripted receiver answers.
#[derive(Clone, Debug)]
pub enum Behaviour {
    Status(StatusCode),
    StatusWithHeaders(StatusCode, HeaderMap),
    /// Never answers; the sender's timeout decides.
    Hang,
    Fail(TransportFailureKind),
}

///
/// In-memory [`HttpTransport`] answering per destination host.
///
/// Every dispatched request is recorded. Like the real client it refuses to
/// dispatch while stopped.
pub struct ScriptedTransport {
    protocol: HttpProtocol,
    default_behaviour: Behaviour,
    behaviours: HashMap<String, Behaviour>,
    requests: Mutex<Vec<OutboundRequest>>,
    dispatched: AtomicUsize,
    running: AtomicBool,
    starts: AtomicUsize,
    stops: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(protocol: HttpProtocol) -> Self {
        Self {
            protocol,
            default_behaviour: Behaviour::Status(StatusCode::OK),
            behaviours: HashMap::new(),
            requests: Mutex::new(Vec::new()),
            dispatched: AtomicUsize::new(0),
            running: AtomicBool::new(false),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
        }
    }

    pub fn with_default(mut self, behaviour: Behaviour) -> Self {
        self.default_behaviour = behaviour;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>, behaviour: Behaviour) -> Self {
        self.behaviours.insert(host.into(), behaviour);
        self
    }

    pub fn dispatch_count(&self) -> usize {
        self.dispatched.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().expect("requests lock poisoned").clone()
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    fn protocol(&self) -> HttpProtocol {
        self.protocol
    }

    async fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn start(&self) -> Result<(), LifecycleError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<(), LifecycleError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn dispatch(
        &self,
        request: OutboundRequest,
    ) -> Result<TransportResponse, TransportFailure> {
        if !self.running.load(Ordering::SeqCst) {
            return Err(TransportFailure::new(
                TransportFailureKind::ClientStopped,
                "scripted client is not running",
            ));
        }

        self.dispatched.fetch_add(1, Ordering::SeqCst);
        let host = request.uri.host_str().unwrap_or_default().to_string();
        debug!(host = host.as_str(), protocol = %self.protocol, "scripted dispatch");
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(request);

        let behaviour = self
            .behaviours
            .get(&host)
            .unwrap_or(&self.default_behaviour)
            .clone();

        match behaviour {
            Behaviour::Status(status) => Ok(TransportResponse::new(status)),
            Behaviour::StatusWithHeaders(status, headers) => {
                Ok(TransportResponse { status, headers })
            }
            Behaviour::Hang => std::future::pending().await,
            Behaviour::Fail(kind) => Err(TransportFailure::new(kind, "scripted failure")),
        }
    }
}

/// Hands out two fixed [`ScriptedTransport`]s and counts protocol-2 creations.
pub struct ScriptedClientFactory {
    pub http1: Arc<ScriptedTransport>,
    pub http2: Arc<ScriptedTransport>,
    http2_created: AtomicUsize,
}

impl ScriptedClientFactory {
    pub fn new(http1: ScriptedTransport, http2: ScriptedTransport) -> Self {
        Self {
            http1: Arc::new(http1),
            http2: Arc::new(http2),
            http2_created: AtomicUsize::new(0),
        }
    }

    /// Both protocols answer 200 to everything.
    pub fn accepting() -> Self {
        Self::new(
            ScriptedTransport::new(HttpProtocol::Http1),
            ScriptedTransport::new(HttpProtocol::Http2),
        )
    }

    pub fn http2_created(&self) -> usize {
        self.http2_created.load(Ordering::SeqCst)
    }
}

impl HttpClientFactory for ScriptedClientFactory {
    fn provide(&self) -> Arc<dyn HttpTransport> {
        self.http1.clone()
    }

    fn create_client_for_http2(&self) -> Arc<dyn HttpTransport> {
        self.http2_created.fetch_add(1, Ordering::SeqCst);
        self.http2.clone()
    }
}
