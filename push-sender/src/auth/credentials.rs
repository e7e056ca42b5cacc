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

use crate::auth::{sensitive_value, AuthorizationError, CredentialSource};
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use std::fmt::{Debug, Formatter};
use std::path::PathBuf;

const BEARER_SCHEME: &str = "Bearer";

/// A header computed once at sender construction.
#[derive(Clone)]
pub struct StaticCredential {
    name: HeaderName,
    value: HeaderValue,
}

impl StaticCredential {
    pub fn new(name: HeaderName, value: HeaderValue) -> Self {
        Self { name, value }
    }

    /// An `Authorization` header with the value marked sensitive.
    pub fn authorization(value: &str) -> Result<Self, AuthorizationError> {
        Ok(Self::new(AUTHORIZATION, sensitive_value(value)?))
    }
}

impl Debug for StaticCredential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredential")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl CredentialSource for StaticCredential {
    fn header_name(&self) -> HeaderName {
        self.name.clone()
    }

    fn header_value(&self) -> Result<HeaderValue, AuthorizationError> {
        Ok(self.value.clone())
    }
}

/// Bearer token read from a file on every request.
#[derive(Clone, Debug)]
pub struct TokenFileCredential {
    path: PathBuf,
}

impl TokenFileCredential {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialSource for TokenFileCredential {
    fn header_value(&self) -> Result<HeaderValue, AuthorizationError> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|err| AuthorizationError::TokenFile {
                path: self.path.clone(),
                reason: err.to_string(),
            })?;

        let token = contents.trim();
        if token.is_empty() {
            return Err(AuthorizationError::TokenFile {
                path: self.path.clone(),
                reason: "file is empty".to_string(),
            });
        }

        sensitive_value(&format!("{BEARER_SCHEME} {token}"))
    }
}

#[cfg(test)]
mod tests {
    use super::TokenFileCredential;
    use crate::auth::{AuthorizationError, CredentialSource};
    use std::path::PathBuf;

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("push-sender-{}-{name}", std::process::id()))
    }

    #[test]
    fn token_file_is_reread_on_every_call() {
        let path = scratch_file("rotating-token");
        std::fs::write(&path, "first\n").expect("write token");
        let source = TokenFileCredential::new(&path);

        assert_eq!(source.header_value().expect("token"), "Bearer first");

        std::fs::write(&path, "second").expect("rotate token");
        assert_eq!(source.header_value().expect("token"), "Bearer second");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_or_empty_token_file_is_an_error() {
        let missing = TokenFileCredential::new(scratch_file("missing-token"));
        assert!(matches!(
            missing.header_value(),
            Err(AuthorizationError::TokenFile { .. })
        ));

        let path = scratch_file("empty-token");
        std::fs::write(&path, "  \n").expect("write token");
        let empty = TokenFileCredential::new(&path);
        assert!(matches!(
            empty.header_value(),
            Err(AuthorizationError::TokenFile { .. })
        ));

        let _ = std::fs::remove_file(&path);
    }
}
