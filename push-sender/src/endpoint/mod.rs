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

//! Endpoint layer.
//!
//! Owns the subscription endpoint address, the resolver contract that turns it
//! into destination URIs, and the per-sender binding that picks the constant or
//! templated resolution strategy once.

pub(crate) mod address;
pub(crate) mod resolvable;
pub(crate) mod resolver;
pub(crate) mod template;
