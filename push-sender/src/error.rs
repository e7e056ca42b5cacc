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

//! Construction-time and lifecycle-time failures.
//!
//! Delivery problems are never errors: they become a
//! [`DeliveryOutcome`][crate::DeliveryOutcome]. Only the failures below are
//! raised to the caller.

use crate::auth::AuthorizationError;
use crate::endpoint::resolver::ResolutionError;
use crate::transport::HttpProtocol;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A transport client could not start or stop cleanly.
#[derive(Debug)]
pub enum LifecycleError {
    StartFailed {
        protocol: HttpProtocol,
        reason: String,
    },
    StopFailed {
        protocol: HttpProtocol,
        reason: String,
    },
}

impl Display for LifecycleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleError::StartFailed { protocol, reason } => {
                write!(f, "failed to start {protocol} client: {reason}")
            }
            LifecycleError::StopFailed { protocol, reason } => {
                write!(f, "failed to stop {protocol} client: {reason}")
            }
        }
    }
}

impl Error for LifecycleError {}

/// A subscription cannot be turned into a sender.
#[derive(Debug)]
pub enum SenderCreationError {
    InvalidEndpoint {
        subscription: String,
        source: ResolutionError,
    },
    Authorization {
        subscription: String,
        source: AuthorizationError,
    },
    ZeroRequestTimeout {
        subscription: String,
    },
}

impl Display for SenderCreationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SenderCreationError::InvalidEndpoint {
                subscription,
                source,
            } => write!(
                f,
                "subscription '{subscription}' has an unusable endpoint: {source}"
            ),
            SenderCreationError::Authorization {
                subscription,
                source,
            } => write!(
                f,
                "subscription '{subscription}' has invalid authorization: {source}"
            ),
            SenderCreationError::ZeroRequestTimeout { subscription } => write!(
                f,
                "subscription '{subscription}' has a zero request timeout"
            ),
        }
    }
}

impl Error for SenderCreationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SenderCreationError::InvalidEndpoint { source, .. } => Some(source),
            SenderCreationError::Authorization { source, .. } => Some(source),
            SenderCreationError::ZeroRequestTimeout { .. } => None,
        }
    }
}

/// Configuration could not be read or parsed.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Parse(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "unable to read config file '{path}': {source}")
            }
            ConfigError::Parse(reason) => write!(f, "unable to parse config: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(_) => None,
        }
    }
}
