//! Named request templates.
//!
//! Templates are parsed once, on first use, into a process-wide cache and
//! never change afterwards. Rendering substitutes `{{name}}` placeholders
//! with XML-escaped values and fails if a placeholder has no value.

use crate::error::CheckError;
use std::collections::HashMap;
use std::fmt;

/// Values substituted into a template, keyed by placeholder name.
pub type TemplateData = HashMap<&'static str, String>;

/// The templates this crate ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    /// Domain check with a fee-0.6 extension for a one year create
    DomainCheckFee,
}

impl TemplateKey {
    pub fn name(&self) -> &'static str {
        match self {
            TemplateKey::DomainCheckFee => "domain_check_fee",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            TemplateKey::DomainCheckFee => DOMAIN_CHECK_FEE,
        }
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const DOMAIN_CHECK_FEE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<epp xmlns="urn:ietf:params:xml:ns:epp-1.0">
  <command>
    <check>
      <domain:check xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">
        <domain:name>{{domainName}}</domain:name>
      </domain:check>
    </check>
    <extension>
      <fee:check xmlns:fee="urn:ietf:params:xml:ns:fee-0.6">
        <fee:domain>
          <fee:name>{{domainName}}</fee:name>
          <fee:currency>{{currency}}</fee:currency>
          <fee:command>{{command}}</fee:command>
          <fee:period unit="y">{{period}}</fee:period>
        </fee:domain>
      </fee:check>
    </extension>
  </command>
</epp>
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed template.
#[derive(Debug, Clone)]
struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Split `source` into literal text and `{{name}}` placeholders. An
    /// unterminated `{{` is kept as literal text.
    fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                break;
            };
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            segments.push(Segment::Placeholder(after[..end].trim().to_string()));
            rest = &after[end + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Self { segments }
    }

    fn render(&self, key: TemplateKey, data: &TemplateData) -> Result<String, CheckError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = data.get(name.as_str()).ok_or_else(|| {
                        CheckError::render(key.name(), format!("missing variable '{}'", name))
                    })?;
                    out.push_str(&escape_xml(value));
                }
            }
        }
        Ok(out)
    }
}

lazy_static::lazy_static! {
    /// Every shipped template, parsed once.
    static ref TEMPLATES: HashMap<TemplateKey, Template> = [TemplateKey::DomainCheckFee]
        .into_iter()
        .map(|key| (key, Template::parse(key.source())))
        .collect();
}

/// Renders a named template into request bytes.
///
/// Implementations must be pure: no I/O, no state changes.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, key: TemplateKey, data: &TemplateData) -> Result<Vec<u8>, CheckError>;
}

/// Renderer backed by the process-wide template cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct CachedTemplates;

impl CachedTemplates {
    /// Force the template cache to load. Optional; first render does it too.
    pub fn warm() {
        lazy_static::initialize(&TEMPLATES);
    }
}

impl TemplateRenderer for CachedTemplates {
    fn render(&self, key: TemplateKey, data: &TemplateData) -> Result<Vec<u8>, CheckError> {
        let template = TEMPLATES
            .get(&key)
            .ok_or_else(|| CheckError::render(key.name(), "template not loaded"))?;
        template.render(key, data).map(String::into_bytes)
    }
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
