/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
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

//! Canonical structured event names used across `push-sender`.

// Delivery events, one set per leg.
pub const DELIVERY_ATTEMPT: &str = "delivery_attempt";
pub const DELIVERY_OK: &str = "delivery_ok";
pub const DELIVERY_FAILED: &str = "delivery_failed";
pub const DELIVERY_SKIPPED: &str = "delivery_skipped";
pub const RESOLUTION_FAILED: &str = "resolution_failed";
pub const REQUEST_BUILD_FAILED: &str = "request_build_failed";
pub const BROADCAST_SUMMARY: &str = "broadcast_summary";

// Provider construction and lifecycle events.
pub const SENDER_CREATE: &str = "sender_create";
pub const SENDER_CREATE_FAILED: &str = "sender_create_failed";
pub const PROTOCOL_FALLBACK: &str = "protocol_fallback";
pub const PROVIDER_START: &str = "provider_start";
pub const PROVIDER_STOP: &str = "provider_stop";

// Transport client events.
pub const CLIENT_STARTED: &str = "client_started";
pub const CLIENT_STOPPED: &str = "client_stopped";
