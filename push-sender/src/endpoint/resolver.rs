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
use crate::endpoint::template::{parse_template, MalformedTemplate, TemplateSegment};
use crate::message::Message;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

const SUPPORTED_SCHEMES: [&str; 2] = ["http", "https"];
const JSON_PATH_SEPARATOR: char = '.';
const SCHEME_SEPARATOR: &str = "://";
const AUTHORITY_END: [char; 3] = ['/', '?', '#'];
const AUTHORITY_DELIMITERS: [char; 5] = ['@', '/', '\\', '?', '#'];

/// Upper bound on the receivers one broadcast address may expand to.
pub const MAX_BROADCAST_RECEIVERS: usize = 1024;

/// Everything but RFC 3986 unreserved characters is encoded.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Reasons an endpoint address could not be turned into a destination URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionError {
    MissingField { field: String },
    AmbiguousField { field: String, values: usize },
    UnsupportedValue { field: String, kind: &'static str },
    MalformedTemplate { position: usize, reason: &'static str },
    InvalidUri { uri: String, reason: String },
    TooManyReceivers { receivers: usize, limit: usize },
    Resolver { reason: String },
}

impl Display for ResolutionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionError::MissingField { field } => {
                write!(f, "field '{field}' is absent from message and resolver metadata")
            }
            ResolutionError::AmbiguousField { field, values } => {
                write!(f, "field '{field}' has {values} values but one receiver is expected")
            }
            ResolutionError::UnsupportedValue { field, kind } => {
                write!(f, "field '{field}' holds an unsupported {kind} value")
            }
            ResolutionError::MalformedTemplate { position, reason } => {
                write!(f, "malformed endpoint template at {position}: {reason}")
            }
            ResolutionError::InvalidUri { uri, reason } => {
                write!(f, "resolved address '{uri}' is not a valid URI: {reason}")
            }
            ResolutionError::TooManyReceivers { receivers, limit } => {
                write!(f, "address expands to {receivers} receivers, limit is {limit}")
            }
            ResolutionError::Resolver { reason } => write!(f, "resolver failed: {reason}"),
        }
    }
}

impl Error for ResolutionError {}

impl ResolutionError {
    pub(crate) fn from_malformed(malformed: MalformedTemplate) -> Self {
        ResolutionError::MalformedTemplate {
            position: malformed.position,
            reason: malformed.reason,
        }
    }
}

///
/// [`EndpointAddressResolverMetadata`] is the opaque key/value bag a subscription
/// carries for its resolver. Its meaning belongs to the resolver implementation;
/// [`InterpolatingEndpointAddressResolver`] reads entries as a last-resort source
/// for placeholder values.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EndpointAddressResolverMetadata(BTreeMap<String, Value>);

impl EndpointAddressResolverMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

///
/// [`EndpointAddressResolver`] turns a (possibly templated) endpoint address into
/// concrete destination URIs for one message.
///
/// Implementations must be stateless with respect to individual calls; one
/// resolver instance is shared by every sender the provider builds.
///
/// # `impl`ing the [`EndpointAddressResolver`] trait
///
/// ```
/// use push_sender::{
///     EndpointAddress, EndpointAddressResolver, EndpointAddressResolverMetadata, Message,
///     ResolutionError, Url,
/// };
///
/// /// Routes every message to a fixed fleet of receivers.
/// struct FleetResolver {
///     hosts: Vec<String>,
/// }
///
/// impl EndpointAddressResolver for FleetResolver {
///     fn resolve(
///         &self,
///         address: &EndpointAddress,
///         message: &Message,
///         metadata: &EndpointAddressResolverMetadata,
///     ) -> Result<Url, ResolutionError> {
///         let mut all = self.resolve_all(address, message, metadata)?;
///         all.pop().ok_or(ResolutionError::Resolver {
///             reason: "empty fleet".to_string(),
///         })
///     }
///
///     fn resolve_all(
///         &self,
///         _address: &EndpointAddress,
///         _message: &Message,
///         _metadata: &EndpointAddressResolverMetadata,
///     ) -> Result<Vec<Url>, ResolutionError> {
///         self.hosts
///             .iter()
///             .map(|host| {
///                 Url::parse(&format!("http://{host}/ep")).map_err(|err| {
///                     ResolutionError::InvalidUri {
///                         uri: host.clone(),
///                         reason: err.to_string(),
///                     }
///                 })
///             })
///             .collect()
///     }
/// }
/// ```
pub trait EndpointAddressResolver: Send + Sync {
    /// Resolves the single receiver used by unicast delivery.
    fn resolve(
        &self,
        address: &EndpointAddress,
        message: &Message,
        metadata: &EndpointAddressResolverMetadata,
    ) -> Result<Url, ResolutionError>;

    /// Resolves every receiver used by broadcast delivery.
    fn resolve_all(
        &self,
        address: &EndpointAddress,
        message: &Message,
        metadata: &EndpointAddressResolverMetadata,
    ) -> Result<Vec<Url>, ResolutionError> {
        self.resolve(address, message, metadata).map(|uri| vec![uri])
    }
}

/// Validates a candidate destination and parses it into a [`Url`].
pub(crate) fn parse_endpoint_uri(candidate: &str) -> Result<Url, ResolutionError> {
    let uri = Url::parse(candidate).map_err(|err| ResolutionError::InvalidUri {
        uri: candidate.to_string(),
        reason: err.to_string(),
    })?;

    if !SUPPORTED_SCHEMES.contains(&uri.scheme()) {
        return Err(ResolutionError::InvalidUri {
            uri: candidate.to_string(),
            reason: format!("unsupported scheme '{}'", uri.scheme()),
        });
    }
    if uri.host_str().map_or(true, str::is_empty) {
        return Err(ResolutionError::InvalidUri {
            uri: candidate.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(uri)
}

///
/// [`InterpolatingEndpointAddressResolver`] fills `{field}` placeholders.
///
/// A placeholder value is looked up, in order, among the message attributes,
/// the JSON payload (dot-separated path, e.g. `{order.region}`) and the resolver
/// metadata. Array values make a placeholder multi-valued: broadcast delivery
/// expands every combination, unicast delivery rejects it as ambiguous.
///
/// # Examples
///
/// ```
/// use push_sender::{
///     EndpointAddress, EndpointAddressResolver, EndpointAddressResolverMetadata,
///     InterpolatingEndpointAddressResolver, Message,
/// };
///
/// let resolver = InterpolatingEndpointAddressResolver::new();
/// let address = EndpointAddress::new("http://{host-field}/ep");
/// let message = Message::new("topic", "{}").with_attribute("host-field", "svcA");
///
/// let uri = resolver
///     .resolve(&address, &message, &EndpointAddressResolverMetadata::new())
///     .unwrap();
/// assert_eq!(uri.as_str(), "http://svca/ep");
/// ```
#[derive(Clone, Debug, Default)]
pub struct InterpolatingEndpointAddressResolver;

impl InterpolatingEndpointAddressResolver {
    pub fn new() -> Self {
        Self
    }

    /// Splits the template into literal text and the values of each placeholder.
    ///
    /// Values are made safe for where they land: values inside the authority
    /// must not carry authority delimiters, values after it are percent-encoded.
    fn expand(
        &self,
        address: &EndpointAddress,
        message: &Message,
        metadata: &EndpointAddressResolverMetadata,
    ) -> Result<Vec<(String, Vec<String>)>, ResolutionError> {
        let segments =
            parse_template(address.endpoint()).map_err(ResolutionError::from_malformed)?;
        let mut payload = LazyJsonPayload::new(message);
        let mut literal_prefix = String::new();

        segments
            .into_iter()
            .map(|segment| match segment {
                TemplateSegment::Literal(text) => {
                    literal_prefix.push_str(text);
                    Ok((text.to_string(), Vec::new()))
                }
                TemplateSegment::Placeholder(field) => {
                    let position = ValuePosition::after(&literal_prefix);
                    let values = lookup_field(field, message, &mut payload, metadata)?
                        .into_iter()
                        .map(|value| position.place(field, value))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok((field.to_string(), values))
                }
            })
            .collect()
    }
}

/// Where a placeholder value lands in the resolved address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ValuePosition {
    /// Scheme or authority: the value becomes part of the host or port.
    Authority,
    /// Path, query or fragment.
    Component,
}

impl ValuePosition {
    fn after(literal_prefix: &str) -> Self {
        match literal_prefix.find(SCHEME_SEPARATOR) {
            Some(index)
                if literal_prefix[index + SCHEME_SEPARATOR.len()..].contains(AUTHORITY_END) =>
            {
                ValuePosition::Component
            }
            _ => ValuePosition::Authority,
        }
    }

    fn place(self, field: &str, value: String) -> Result<String, ResolutionError> {
        match self {
            ValuePosition::Authority if value.contains(AUTHORITY_DELIMITERS) => {
                Err(ResolutionError::UnsupportedValue {
                    field: field.to_string(),
                    kind: "authority-delimiting",
                })
            }
            ValuePosition::Authority => Ok(value),
            ValuePosition::Component => Ok(utf8_percent_encode(&value, COMPONENT).to_string()),
        }
    }
}

impl EndpointAddressResolver for InterpolatingEndpointAddressResolver {
    fn resolve(
        &self,
        address: &EndpointAddress,
        message: &Message,
        metadata: &EndpointAddressResolverMetadata,
    ) -> Result<Url, ResolutionError> {
        if !address.is_templated() {
            return parse_endpoint_uri(address.endpoint());
        }

        let mut resolved = String::with_capacity(address.endpoint().len());
        for (text, values) in self.expand(address, message, metadata)? {
            match values.as_slice() {
                [] => resolved.push_str(&text),
                [value] => resolved.push_str(value),
                many => {
                    return Err(ResolutionError::AmbiguousField {
                        field: text,
                        values: many.len(),
                    })
                }
            }
        }

        parse_endpoint_uri(&resolved)
    }

    fn resolve_all(
        &self,
        address: &EndpointAddress,
        message: &Message,
        metadata: &EndpointAddressResolverMetadata,
    ) -> Result<Vec<Url>, ResolutionError> {
        if !address.is_templated() {
            return parse_endpoint_uri(address.endpoint()).map(|uri| vec![uri]);
        }

        let pieces = self.expand(address, message, metadata)?;
        let receivers = pieces
            .iter()
            .map(|(_, values)| values.len().max(1))
            .try_fold(1usize, usize::checked_mul)
            .unwrap_or(usize::MAX);
        if receivers > MAX_BROADCAST_RECEIVERS {
            return Err(ResolutionError::TooManyReceivers {
                receivers,
                limit: MAX_BROADCAST_RECEIVERS,
            });
        }

        let mut candidates = vec![String::new()];
        for (text, values) in pieces {
            if values.is_empty() {
                candidates.iter_mut().for_each(|c| c.push_str(&text));
                continue;
            }
            candidates = candidates
                .iter()
                .flat_map(|prefix| values.iter().map(move |value| format!("{prefix}{value}")))
                .collect();
        }

        let mut seen = HashSet::with_capacity(candidates.len());
        let mut uris = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let uri = parse_endpoint_uri(&candidate)?;
            if seen.insert(uri.clone()) {
                uris.push(uri);
            }
        }
        Ok(uris)
    }
}

/// Parses the payload as JSON at most once, and only when a placeholder needs it.
struct LazyJsonPayload<'a> {
    message: &'a Message,
    parsed: Option<Option<Value>>,
}

impl<'a> LazyJsonPayload<'a> {
    fn new(message: &'a Message) -> Self {
        Self {
            message,
            parsed: None,
        }
    }

    fn get(&mut self) -> Option<&Value> {
        let message = self.message;
        self.parsed
            .get_or_insert_with(|| {
                message
                    .content_type()
                    .contains("json")
                    .then(|| serde_json::from_slice::<Value>(message.payload()).ok())
                    .flatten()
            })
            .as_ref()
    }
}

fn lookup_field(
    field: &str,
    message: &Message,
    payload: &mut LazyJsonPayload<'_>,
    metadata: &EndpointAddressResolverMetadata,
) -> Result<Vec<String>, ResolutionError> {
    if let Some(value) = message.attribute(field) {
        return Ok(vec![value.to_string()]);
    }

    if let Some(value) = payload.get().and_then(|body| json_path(body, field)) {
        return json_values(field, value);
    }

    if let Some(value) = metadata.get(field) {
        return json_values(field, value);
    }

    Err(ResolutionError::MissingField {
        field: field.to_string(),
    })
}

fn json_path<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    path.split(JSON_PATH_SEPARATOR)
        .try_fold(root, |node, key| match node {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

fn json_values(field: &str, value: &Value) -> Result<Vec<String>, ResolutionError> {
    match value {
        Value::Array(items) if items.is_empty() => Err(ResolutionError::UnsupportedValue {
            field: field.to_string(),
            kind: "empty array",
        }),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                scalar_value(item).ok_or_else(|| ResolutionError::UnsupportedValue {
                    field: field.to_string(),
                    kind: "nested",
                })
            })
            .collect(),
        other => scalar_value(other)
            .map(|value| vec![value])
            .ok_or_else(|| ResolutionError::UnsupportedValue {
                field: field.to_string(),
                kind: json_kind(other),
            }),
    }
}

fn scalar_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        Value::String(_) | Value::Number(_) | Value::Bool(_) => "scalar",
    }
}

#[cfg(test)]
mod tests {
    use super::{
        EndpointAddressResolver, EndpointAddressResolverMetadata,
        InterpolatingEndpointAddressResolver, ResolutionError, MAX_BROADCAST_RECEIVERS,
    };
    use crate::{EndpointAddress, Message};
    use serde_json::json;

    fn resolver() -> InterpolatingEndpointAddressResolver {
        InterpolatingEndpointAddressResolver::new()
    }

    fn no_metadata() -> EndpointAddressResolverMetadata {
        EndpointAddressResolverMetadata::new()
    }

    #[test]
    fn static_address_resolves_to_itself() {
        let address = EndpointAddress::new("http://host/ep");
        let uri = resolver()
            .resolve(&address, &Message::new("t", "{}"), &no_metadata())
            .expect("static address resolves");

        assert_eq!(uri.as_str(), "http://host/ep");
    }

    #[test]
    fn attribute_wins_over_payload_and_metadata() {
        let address = EndpointAddress::new("http://{target}/ep");
        let message = Message::new("t", r#"{"target":"from-body"}"#).with_attribute("target", "attr");
        let metadata = no_metadata().with_entry("target", "from-metadata");

        let uri = resolver()
            .resolve(&address, &message, &metadata)
            .expect("attribute resolves");

        assert_eq!(uri.host_str(), Some("attr"));
    }

    #[test]
    fn nested_json_payload_field_is_interpolated() {
        let address = EndpointAddress::new("http://host/regions/{order.region}/shard/{order.shard}");
        let message = Message::new("t", r#"{"order":{"region":"eu","shard":3}}"#);

        let uri = resolver()
            .resolve(&address, &message, &no_metadata())
            .expect("payload fields resolve");

        assert_eq!(uri.as_str(), "http://host/regions/eu/shard/3");
    }

    #[test]
    fn payload_is_ignored_for_non_json_content() {
        let address = EndpointAddress::new("http://{target}/ep");
        let message = Message::new("t", r#"{"target":"svc"}"#).with_content_type("avro/binary");

        let err = resolver()
            .resolve(&address, &message, &no_metadata())
            .expect_err("binary payload is not inspected");

        assert_eq!(
            err,
            ResolutionError::MissingField {
                field: "target".to_string()
            }
        );
    }

    #[test]
    fn metadata_fills_remaining_placeholders() {
        let address = EndpointAddress::new("http://{cluster}/ep");
        let metadata = no_metadata().with_entry("cluster", "dc1.internal");

        let uri = resolver()
            .resolve(&address, &Message::new("t", "{}"), &metadata)
            .expect("metadata resolves");

        assert_eq!(uri.as_str(), "http://dc1.internal/ep");
    }

    #[test]
    fn missing_field_is_a_resolution_error() {
        let address = EndpointAddress::new("http://{host-field}/ep");

        let err = resolver()
            .resolve(&address, &Message::new("t", "{}"), &no_metadata())
            .expect_err("field is absent");

        assert!(matches!(err, ResolutionError::MissingField { ref field } if field == "host-field"));
    }

    #[test]
    fn invalid_resolved_uri_is_rejected() {
        let address = EndpointAddress::new("{scheme}://host/ep");
        let message = Message::new("t", "{}").with_attribute("scheme", "ftp");

        let err = resolver()
            .resolve(&address, &message, &no_metadata())
            .expect_err("ftp is not supported");

        assert!(matches!(err, ResolutionError::InvalidUri { .. }));
    }

    #[test]
    fn object_value_is_unsupported() {
        let address = EndpointAddress::new("http://{order}/ep");
        let message = Message::new("t", r#"{"order":{"id":1}}"#);

        let err = resolver()
            .resolve(&address, &message, &no_metadata())
            .expect_err("objects cannot be interpolated");

        assert_eq!(
            err,
            ResolutionError::UnsupportedValue {
                field: "order".to_string(),
                kind: "object"
            }
        );
    }

    #[test]
    fn unicast_rejects_multi_valued_field() {
        let address = EndpointAddress::new("http://{receivers}/ep");
        let metadata = no_metadata().with_entry("receivers", json!(["r1", "r2"]));

        let err = resolver()
            .resolve(&address, &Message::new("t", "{}"), &metadata)
            .expect_err("two receivers for unicast");

        assert_eq!(
            err,
            ResolutionError::AmbiguousField {
                field: "receivers".to_string(),
                values: 2
            }
        );
    }

    #[test]
    fn broadcast_expands_every_combination_without_duplicates() {
        let address = EndpointAddress::new("http://{receivers}/{path}");
        let metadata = no_metadata()
            .with_entry("receivers", json!(["r1", "r2", "r1"]))
            .with_entry("path", json!(["a", "b"]));

        let uris: Vec<String> = resolver()
            .resolve_all(&address, &Message::new("t", "{}"), &metadata)
            .expect("broadcast expansion")
            .into_iter()
            .map(String::from)
            .collect();

        assert_eq!(
            uris,
            vec!["http://r1/a", "http://r1/b", "http://r2/a", "http://r2/b"]
        );
    }

    #[test]
    fn path_value_cannot_add_query_or_fragment() {
        let address = EndpointAddress::new("http://svc/orders/{id}");
        let message = Message::new("t", "{}").with_attribute("id", "1?admin=true#x");

        let uri = resolver()
            .resolve(&address, &message, &no_metadata())
            .expect("value is encoded");

        assert_eq!(uri.as_str(), "http://svc/orders/1%3Fadmin%3Dtrue%23x");
        assert_eq!(uri.query(), None);
        assert_eq!(uri.fragment(), None);
    }

    #[test]
    fn path_value_cannot_climb_out_of_its_segment() {
        let address = EndpointAddress::new("http://svc/orders/{id}/items");
        let message = Message::new("t", "{}").with_attribute("id", "../admin");

        let uri = resolver()
            .resolve(&address, &message, &no_metadata())
            .expect("value is encoded");

        assert_eq!(uri.path(), "/orders/..%2Fadmin/items");
    }

    #[test]
    fn query_value_is_encoded() {
        let address = EndpointAddress::new("http://svc/ep?tenant={tenant}");
        let message = Message::new("t", "{}").with_attribute("tenant", "a&b=c d");

        let uri = resolver()
            .resolve(&address, &message, &no_metadata())
            .expect("value is encoded");

        assert_eq!(uri.query(), Some("tenant=a%26b%3Dc%20d"));
    }

    #[test]
    fn authority_value_cannot_redirect_to_another_host() {
        let address = EndpointAddress::new("http://{id}/ep");

        for value in ["x@evil.example", "evil.example/", "svc?x", "svc#x", "svc\\x"] {
            let message = Message::new("t", "{}").with_attribute("id", value);

            let err = resolver()
                .resolve(&address, &message, &no_metadata())
                .expect_err("authority delimiters are rejected");

            assert_eq!(
                err,
                ResolutionError::UnsupportedValue {
                    field: "id".to_string(),
                    kind: "authority-delimiting"
                },
                "{value}"
            );
        }
    }

    #[test]
    fn authority_value_keeps_its_port() {
        let address = EndpointAddress::new("http://{receiver}/ep");
        let metadata = no_metadata().with_entry("receiver", "localhost:8081");

        let uri = resolver()
            .resolve(&address, &Message::new("t", "{}"), &metadata)
            .expect("host and port resolve");

        assert_eq!(uri.as_str(), "http://localhost:8081/ep");
    }

    #[test]
    fn broadcast_rejects_authority_delimiters_in_any_receiver() {
        let address = EndpointAddress::new("http://{receivers}/ep");
        let metadata = no_metadata().with_entry("receivers", json!(["r1", "r2@evil.example"]));

        let err = resolver()
            .resolve_all(&address, &Message::new("t", "{}"), &metadata)
            .expect_err("one receiver is unsafe");

        assert!(matches!(err, ResolutionError::UnsupportedValue { .. }));
    }

    #[test]
    fn broadcast_expansion_is_capped() {
        let address = EndpointAddress::new("http://{hosts}/{paths}");
        let many: Vec<String> = (0..40).map(|index| format!("r{index}")).collect();
        let metadata = no_metadata()
            .with_entry("hosts", json!(many))
            .with_entry("paths", json!(many));

        let err = resolver()
            .resolve_all(&address, &Message::new("t", "{}"), &metadata)
            .expect_err("1600 receivers exceed the cap");

        assert_eq!(
            err,
            ResolutionError::TooManyReceivers {
                receivers: 1600,
                limit: MAX_BROADCAST_RECEIVERS
            }
        );
    }

    #[test]
    fn broadcast_up_to_the_cap_is_allowed() {
        let address = EndpointAddress::new("http://{hosts}/ep");
        let hosts: Vec<String> = (0..MAX_BROADCAST_RECEIVERS)
            .map(|index| format!("r{index}"))
            .collect();
        let metadata = no_metadata().with_entry("hosts", json!(hosts));

        let uris = resolver()
            .resolve_all(&address, &Message::new("t", "{}"), &metadata)
            .expect("exactly at the cap");

        assert_eq!(uris.len(), MAX_BROADCAST_RECEIVERS);
    }

    #[test]
    fn broadcast_of_static_address_is_single_receiver() {
        let address = EndpointAddress::new("http://host/ep");

        let uris = resolver()
            .resolve_all(&address, &Message::new("t", "{}"), &no_metadata())
            .expect("static address resolves");

        assert_eq!(uris.len(), 1);
    }
}
