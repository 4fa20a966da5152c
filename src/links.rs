// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! ADS `links_data` descriptors.
//!
//! ADS returns each descriptor as a string holding a dict literal, sometimes
//! valid JSON, sometimes Python-style with single quotes. Both are accepted;
//! anything else is reported and skipped.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

static PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"['"](\w+)['"]\s*:\s*(?:'([^']*)'|"([^"]*)")"#).expect("link descriptor pattern")
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkDescriptor {
    pub kind: Option<String>,
    pub url: Option<String>,
}

impl LinkDescriptor {
    pub fn pdf_url(&self) -> Option<&str> {
        match (self.kind.as_deref(), self.url.as_deref()) {
            (Some("pdf"), Some(url)) if !url.is_empty() => Some(url),
            _ => None,
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let field = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            kind: field("type"),
            url: field("url"),
        }
    }
}

pub fn parse_descriptor(value: &Value) -> Result<LinkDescriptor, String> {
    match value {
        Value::Object(map) => Ok(LinkDescriptor::from_map(map)),
        Value::String(text) => parse_literal(text),
        other => Err(format!("unsupported link descriptor: {other}")),
    }
}

fn parse_literal(text: &str) -> Result<LinkDescriptor, String> {
    let text = text.trim();
    if !(text.starts_with('{') && text.ends_with('}')) {
        let preview: String = text.chars().take(60).collect();
        return Err(format!("not a dict literal: {preview}"));
    }

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) {
        return Ok(LinkDescriptor::from_map(&map));
    }

    let mut descriptor = LinkDescriptor::default();
    for caps in PAIR.captures_iter(text) {
        let value = caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str().to_string());
        match &caps[1] {
            "type" => descriptor.kind = value,
            "url" => descriptor.url = value,
            _ => {}
        }
    }
    Ok(descriptor)
}

/// First PDF url among `links`. Descriptors that fail to parse before it
/// are passed to `on_error`.
pub fn find_pdf_url(links: &[Value], mut on_error: impl FnMut(String)) -> Option<String> {
    for link in links {
        match parse_descriptor(link) {
            Ok(descriptor) => {
                if let Some(url) = descriptor.pdf_url() {
                    return Some(url.to_string());
                }
            }
            Err(err) => on_error(err),
        }
    }
    None
}
