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

use crate::message::Message;
use crate::request_factory::RequestBuildError;
use crate::transport::OutboundRequest;
use reqwest::header::{HeaderName, HeaderValue};

/// External metadata keys propagated as request headers.
pub const TRACE_HEADERS: [&str; 5] = [
    "Trace-Id",
    "Span-Id",
    "Parent-Span-Id",
    "Trace-Sampled",
    "Trace-Reported",
];

///
/// [`MetadataAppender`] decorates an outbound request with observability
/// headers derived from the message.
///
/// It is invoked once per outbound request, after authorization. It must only
/// touch the request.
pub trait MetadataAppender: Send + Sync {
    fn append(
        &self,
        request: OutboundRequest,
        message: &Message,
    ) -> Result<OutboundRequest, RequestBuildError>;
}

/// Copies the well-known trace keys from `external_metadata` into headers.
#[derive(Clone, Copy, Debug, Default)]
pub struct TraceMetadataAppender;

impl TraceMetadataAppender {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataAppender for TraceMetadataAppender {
    fn append(
        &self,
        mut request: OutboundRequest,
        message: &Message,
    ) -> Result<OutboundRequest, RequestBuildError> {
        for key in TRACE_HEADERS {
            let Some(value) = message.external_metadata().get(key) else {
                continue;
            };
            let invalid = |reason: String| RequestBuildError::InvalidHeader {
                name: key.to_string(),
                reason,
            };
            let name =
                HeaderName::from_bytes(key.as_bytes()).map_err(|err| invalid(err.to_string()))?;
            let value = HeaderValue::from_str(value).map_err(|err| invalid(err.to_string()))?;
            request.headers.insert(name, value);
        }
        Ok(request)
    }
}

/// Leaves requests untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopMetadataAppender;

impl MetadataAppender for NoopMetadataAppender {
    fn append(
        &self,
        request: OutboundRequest,
        _message: &Message,
    ) -> Result<OutboundRequest, RequestBuildError> {
        Ok(request)
    }
}
