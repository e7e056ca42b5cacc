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
use crate::endpoint::resolver::{
    parse_endpoint_uri, EndpointAddressResolver, EndpointAddressResolverMetadata,
    ResolutionError,
};
use crate::endpoint::template::parse_template;
use crate::message::Message;
use reqwest::Url;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

enum ResolutionStrategy {
    Constant(Url),
    Templated {
        resolver: Arc<dyn EndpointAddressResolver>,
        metadata: EndpointAddressResolverMetadata,
    },
}

///
/// [`ResolvableEndpointAddress`] binds a subscription's endpoint address to the
/// resolver that turns it into destination URIs.
///
/// The strategy is chosen once, on construction: a placeholder-free address is
/// parsed up front and returned as-is for every message without involving the
/// resolver, a templated one is handed to the resolver on every call.
pub struct ResolvableEndpointAddress {
    address: EndpointAddress,
    strategy: ResolutionStrategy,
}

impl ResolvableEndpointAddress {
    /// Fails when a static address is not a valid URI or a template cannot be parsed.
    pub fn new(
        address: EndpointAddress,
        resolver: Arc<dyn EndpointAddressResolver>,
        metadata: EndpointAddressResolverMetadata,
    ) -> Result<Self, ResolutionError> {
        let strategy = if address.is_templated() {
            parse_template(address.endpoint()).map_err(ResolutionError::from_malformed)?;
            ResolutionStrategy::Templated { resolver, metadata }
        } else {
            ResolutionStrategy::Constant(parse_endpoint_uri(address.endpoint())?)
        };

        Ok(Self { address, strategy })
    }

    pub fn address(&self) -> &EndpointAddress {
        &self.address
    }

    pub fn is_templated(&self) -> bool {
        matches!(self.strategy, ResolutionStrategy::Templated { .. })
    }

    /// Destination for unicast delivery of `message`.
    pub fn address_for(&self, message: &Message) -> Result<Url, ResolutionError> {
        match &self.strategy {
            ResolutionStrategy::Constant(uri) => Ok(uri.clone()),
            ResolutionStrategy::Templated { resolver, metadata } => {
                resolver.resolve(&self.address, message, metadata)
            }
        }
    }

    /// Every destination for broadcast delivery of `message`.
    pub fn addresses_for(&self, message: &Message) -> Result<Vec<Url>, ResolutionError> {
        match &self.strategy {
            ResolutionStrategy::Constant(uri) => Ok(vec![uri.clone()]),
            ResolutionStrategy::Templated { resolver, metadata } => {
                resolver.resolve_all(&self.address, message, metadata)
            }
        }
    }
}

impl Debug for ResolvableEndpointAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvableEndpointAddress")
            .field("address", &self.address)
            .field("templated", &self.is_templated())
            .finish()
    }
}
