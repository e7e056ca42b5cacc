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

mod config;

use crate::config::Config;
use clap::Parser;
use push_sender::{HttpMessageSenderProvider, Message, MessageSenderProvider};
use tracing::{info, warn};

#[derive(Parser)]
#[command(about = "Pushes one message to a configured subscription over HTTP")]
struct SenderArgs {
    #[arg(short, long, value_name = "FILE")]
    config: String,

    /// Name of the subscription to deliver to.
    #[arg(short, long)]
    subscription: String,

    #[arg(short, long, default_value = "{}")]
    payload: String,

    #[arg(long)]
    content_type: Option<String>,

    /// Message attribute, may be repeated.
    #[arg(short, long, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    attribute: Vec<(String, String)>,

    /// Trace metadata copied onto the request headers, may be repeated.
    #[arg(short, long, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    metadata: Vec<(String, String)>,

    /// Delivery attempt number reported to the receiver.
    #[arg(long, default_value_t = 0)]
    retry_count: u32,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt::try_init();

    info!("Started configurable-sender");

    let args = SenderArgs::parse();
    let config = Config::from_file(&args.config)?;
    let subscription = config
        .subscription(&args.subscription)
        .ok_or_else(|| format!("Subscription not configured: {}", args.subscription))?;

    let provider = HttpMessageSenderProvider::with_defaults(&config.sender);
    provider.start().await?;
    let sender = provider.create(subscription)?;

    let mut message = Message::new(subscription.topic(), args.payload.into_bytes())
        .with_retry_count(args.retry_count);
    if let Some(content_type) = args.content_type {
        message = message.with_content_type(content_type);
    }
    for (key, value) in args.attribute {
        message = message.with_attribute(key, value);
    }
    for (key, value) in args.metadata {
        message = message.with_external_metadata(key, value);
    }

    let outcome = sender.send(&message).await;
    provider.stop().await?;

    for leg in outcome.legs() {
        match &leg.failure {
            None => info!(uri = ?leg.uri.as_ref().map(|u| u.as_str()), "delivered"),
            Some(failure) => warn!(
                uri = ?leg.uri.as_ref().map(|u| u.as_str()),
                failure = %failure,
                "not delivered"
            ),
        }
    }
    println!("{outcome}");

    if outcome.succeeded() {
        Ok(())
    } else {
        Err(format!("delivery to '{}' failed", subscription.name()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::parse_key_value;

    #[test]
    fn key_value_splits_on_first_equals() {
        assert_eq!(
            parse_key_value("region=eu=west"),
            Ok(("region".to_string(), "eu=west".to_string()))
        );
        assert!(parse_key_value("region").is_err());
        assert!(parse_key_value("=eu").is_err());
    }
}
