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

use bytes::Bytes;
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

///
/// [`Message`] is one already-serialized message handed to a
/// [`MessageSender`][crate::MessageSender] by the consumption pipeline.
///
/// The payload is opaque to this crate and is forwarded unmodified. `attributes`
/// carry the message fields that endpoint templates may reference, while
/// `external_metadata` carries trace context that the
/// [`MetadataAppender`][crate::MetadataAppender] may turn into headers.
///
/// # Examples
///
/// ```
/// use push_sender::Message;
///
/// let message = Message::new("orders.created", r#"{"order":{"id":7}}"#)
///     .with_attribute("region", "eu")
///     .with_external_metadata("Trace-Id", "abc")
///     .with_retry_count(2);
///
/// assert_eq!(message.topic(), "orders.created");
/// assert_eq!(message.attribute("region"), Some("eu"));
/// assert_eq!(message.retry_count(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    id: String,
    topic: String,
    content_type: String,
    payload: Bytes,
    attributes: HashMap<String, String>,
    external_metadata: HashMap<String, String>,
    retry_count: u32,
    succeeded_uris: BTreeSet<String>,
}

impl Message {
    pub fn new(topic: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            id: Uuid::new_v4().hyphenated().to_string(),
            topic: topic.into(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            payload: payload.into(),
            attributes: HashMap::new(),
            external_metadata: HashMap::new(),
            retry_count: 0,
            succeeded_uris: BTreeSet::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_external_metadata(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.external_metadata.insert(name.into(), value.into());
        self
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    /// Marks receivers that were already reached by an earlier attempt.
    ///
    /// Broadcast senders skip these on the next attempt; the values come from
    /// [`DeliveryOutcome::succeeded_uris`][crate::DeliveryOutcome::succeeded_uris].
    pub fn with_succeeded_uris<I, S>(mut self, uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.succeeded_uris.extend(uris.into_iter().map(Into::into));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    pub fn external_metadata(&self) -> &HashMap<String, String> {
        &self.external_metadata
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn has_succeeded_for(&self, uri: &str) -> bool {
        self.succeeded_uris.contains(uri)
    }

    pub fn succeeded_uris(&self) -> &BTreeSet<String> {
        &self.succeeded_uris
    }
}
