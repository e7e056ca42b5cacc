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

//! Per-message request assembly.

use crate::auth::{AuthorizationError, CredentialSource};
use crate::message::Message;
use crate::metadata::MetadataAppender;
use crate::transport::{HttpTransport, OutboundRequest};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE, HOST};
use reqwest::{Method, Url};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

pub const MESSAGE_ID_HEADER: &str = "x-message-id";
pub const TOPIC_NAME_HEADER: &str = "x-topic-name";
pub const SUBSCRIPTION_NAME_HEADER: &str = "x-subscription-name";
pub const RETRY_COUNT_HEADER: &str = "x-retry-count";

const BROKER_HEADERS: [&str; 4] = [
    MESSAGE_ID_HEADER,
    TOPIC_NAME_HEADER,
    SUBSCRIPTION_NAME_HEADER,
    RETRY_COUNT_HEADER,
];

/// Headers set by the broker or the transport that credentials must not replace.
pub(crate) fn is_reserved_header(name: &HeaderName) -> bool {
    *name == CONTENT_TYPE
        || *name == CONTENT_LENGTH
        || *name == HOST
        || BROKER_HEADERS.contains(&name.as_str())
}

/// The request could not be assembled; the subscription is misconfigured.
#[derive(Debug)]
pub enum RequestBuildError {
    Authorization(AuthorizationError),
    InvalidHeader { name: String, reason: String },
}

impl Display for RequestBuildError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestBuildError::Authorization(err) => {
                write!(f, "unable to produce credentials: {err}")
            }
            RequestBuildError::InvalidHeader { name, reason } => {
                write!(f, "invalid value for header '{name}': {reason}")
            }
        }
    }
}

impl Error for RequestBuildError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RequestBuildError::Authorization(err) => Some(err),
            RequestBuildError::InvalidHeader { .. } => None,
        }
    }
}

impl From<AuthorizationError> for RequestBuildError {
    fn from(err: AuthorizationError) -> Self {
        RequestBuildError::Authorization(err)
    }
}

///
/// [`HttpRequestFactory`] builds one [`OutboundRequest`] per (receiver, message).
///
/// Everything that does not vary per message (transport client, timeout,
/// credentials, appender) is captured at construction. `build` applies, in
/// order: target URI, method and body, timeout, authorization, metadata.
pub struct HttpRequestFactory {
    client: Arc<dyn HttpTransport>,
    timeout: Duration,
    metadata_appender: Arc<dyn MetadataAppender>,
    credentials: Option<Arc<dyn CredentialSource>>,
    subscription_name: String,
}

impl HttpRequestFactory {
    pub fn new(
        client: Arc<dyn HttpTransport>,
        timeout: Duration,
        metadata_appender: Arc<dyn MetadataAppender>,
        credentials: Option<Arc<dyn CredentialSource>>,
        subscription_name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            timeout,
            metadata_appender,
            credentials,
            subscription_name: subscription_name.into(),
        }
    }

    /// The transport client requests from this factory are dispatched on.
    pub fn client(&self) -> &Arc<dyn HttpTransport> {
        &self.client
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn build(&self, uri: Url, message: &Message) -> Result<OutboundRequest, RequestBuildError> {
        let mut headers = HeaderMap::new();
        insert_header(&mut headers, CONTENT_TYPE, message.content_type())?;
        insert_header(
            &mut headers,
            HeaderName::from_static(MESSAGE_ID_HEADER),
            message.id(),
        )?;
        insert_header(
            &mut headers,
            HeaderName::from_static(TOPIC_NAME_HEADER),
            message.topic(),
        )?;
        insert_header(
            &mut headers,
            HeaderName::from_static(SUBSCRIPTION_NAME_HEADER),
            &self.subscription_name,
        )?;
        insert_header(
            &mut headers,
            HeaderName::from_static(RETRY_COUNT_HEADER),
            &message.retry_count().to_string(),
        )?;

        let mut request = OutboundRequest {
            uri,
            method: Method::POST,
            headers,
            body: Bytes::clone(message.payload()),
            timeout: self.timeout,
            protocol: self.client.protocol(),
        };

        if let Some(credentials) = &self.credentials {
            let value = credentials.header_value()?;
            request.headers.insert(credentials.header_name(), value);
        }

        self.metadata_appender.append(request, message)
    }
}

fn insert_header(
    headers: &mut HeaderMap,
    name: HeaderName,
    value: &str,
) -> Result<(), RequestBuildError> {
    let value = HeaderValue::from_str(value).map_err(|err| RequestBuildError::InvalidHeader {
        name: name.to_string(),
        reason: err.to_string(),
    })?;
    headers.insert(name, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{HttpRequestFactory, RequestBuildError};
    use crate::auth::{AuthorizationError, CredentialSource, StaticCredential};
    use crate::error::LifecycleError;
    use crate::message::Message;
    use crate::metadata::TraceMetadataAppender;
    use crate::transport::{
        HttpProtocol, HttpTransport, OutboundRequest, TransportFailure, TransportResponse,
    };
    use async_trait::async_trait;
    use reqwest::header::HeaderValue;
    use reqwest::{StatusCode, Url};
    use std::sync::Arc;
    use std::time::Duration;

    struct IdleTransport;

    #[async_trait]
    impl HttpTransport for IdleTransport {
        fn protocol(&self) -> HttpProtocol {
            HttpProtocol::Http2
        }

        async fn is_running(&self) -> bool {
            true
        }

        async fn start(&self) -> Result<(), LifecycleError> {
            Ok(())
        }

        async fn stop(&self) -> Result<(), LifecycleError> {
            Ok(())
        }

        async fn dispatch(
            &self,
            _request: OutboundRequest,
        ) -> Result<TransportResponse, TransportFailure> {
            Ok(TransportResponse::new(StatusCode::OK))
        }
    }

    struct BrokenCredentials;

    impl CredentialSource for BrokenCredentials {
        fn header_value(&self) -> Result<HeaderValue, AuthorizationError> {
            Err(AuthorizationError::EmptyValue { field: "token" })
        }
    }

    fn factory(credentials: Option<Arc<dyn CredentialSource>>) -> HttpRequestFactory {
        HttpRequestFactory::new(
            Arc::new(IdleTransport),
            Duration::from_millis(1000),
            Arc::new(TraceMetadataAppender::new()),
            credentials,
            "audit",
        )
    }

    #[test]
    fn build_applies_body_timeout_headers_and_credentials() {
        let credentials = StaticCredential::authorization("X").expect("valid value");
        let factory = factory(Some(Arc::new(credentials)));
        let message = Message::new("orders.created", r#"{"id":1}"#)
            .with_id("m-1")
            .with_retry_count(3)
            .with_external_metadata("Trace-Id", "abc");
        let uri = Url::parse("http://host/ep").expect("valid url");

        let request = factory.build(uri.clone(), &message).expect("request builds");

        assert_eq!(request.uri, uri);
        assert_eq!(request.method, reqwest::Method::POST);
        assert_eq!(request.body.as_ref(), br#"{"id":1}"#);
        assert_eq!(request.timeout, Duration::from_millis(1000));
        assert_eq!(request.protocol, HttpProtocol::Http2);
        assert_eq!(request.headers["authorization"], "X");
        assert_eq!(request.headers["content-type"], "application/json");
        assert_eq!(request.headers["x-message-id"], "m-1");
        assert_eq!(request.headers["x-topic-name"], "orders.created");
        assert_eq!(request.headers["x-subscription-name"], "audit");
        assert_eq!(request.headers["x-retry-count"], "3");
        assert_eq!(request.headers["trace-id"], "abc");
    }

    #[test]
    fn build_leaves_the_message_untouched() {
        let factory = factory(None);
        let message = Message::new("orders.created", "{}").with_external_metadata("Span-Id", "s");
        let before = message.clone();

        factory
            .build(Url::parse("http://host/ep").expect("valid url"), &message)
            .expect("request builds");

        assert_eq!(message, before);
    }

    #[test]
    fn credential_failure_is_a_build_error() {
        let factory = factory(Some(Arc::new(BrokenCredentials)));

        let result = factory.build(
            Url::parse("http://host/ep").expect("valid url"),
            &Message::new("t", "{}"),
        );

        assert!(matches!(result, Err(RequestBuildError::Authorization(_))));
    }
}
