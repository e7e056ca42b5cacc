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

//! `{field}` placeholder parsing shared by address detection and interpolation.

pub(crate) const PLACEHOLDER_START: char = '{';
pub(crate) const PLACEHOLDER_END: char = '}';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TemplateSegment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// Error position and reason for a template that cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MalformedTemplate {
    pub(crate) position: usize,
    pub(crate) reason: &'static str,
}

pub(crate) fn parse_template(template: &str) -> Result<Vec<TemplateSegment<'_>>, MalformedTemplate> {
    let mut segments = Vec::new();
    let mut rest = template;
    let mut offset = 0;

    while let Some(start) = rest.find(PLACEHOLDER_START) {
        if start > 0 {
            segments.push(TemplateSegment::Literal(&rest[..start]));
        }

        let after_start = &rest[start + 1..];
        let Some(end) = after_start.find(PLACEHOLDER_END) else {
            return Err(MalformedTemplate {
                position: offset + start,
                reason: "unterminated placeholder",
            });
        };

        let name = after_start[..end].trim();
        if name.is_empty() {
            return Err(MalformedTemplate {
                position: offset + start,
                reason: "empty placeholder",
            });
        }
        if name.contains(PLACEHOLDER_START) {
            return Err(MalformedTemplate {
                position: offset + start,
                reason: "nested placeholder",
            });
        }

        segments.push(TemplateSegment::Placeholder(name));
        let consumed = start + 1 + end + 1;
        offset += consumed;
        rest = &rest[consumed..];
    }

    if !rest.is_empty() {
        segments.push(TemplateSegment::Literal(rest));
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::{parse_template, TemplateSegment};

    #[test]
    fn splits_literals_and_placeholders() {
        let segments = parse_template("http://{host-field}/ep/{ id }").expect("valid template");

        assert_eq!(
            segments,
            vec![
                TemplateSegment::Literal("http://"),
                TemplateSegment::Placeholder("host-field"),
                TemplateSegment::Literal("/ep/"),
                TemplateSegment::Placeholder("id"),
            ]
        );
    }

    #[test]
    fn rejects_unterminated_placeholder() {
        let err = parse_template("http://{host/ep").expect_err("template is malformed");

        assert_eq!(err.position, 7);
        assert_eq!(err.reason, "unterminated placeholder");
    }

    #[test]
    fn rejects_empty_and_nested_placeholders() {
        assert!(parse_template("http://{}/ep").is_err());
        assert!(parse_template("http://{a{b}/ep").is_err());
    }
}
