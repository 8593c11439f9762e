//! EPP-style request and response model.
//!
//! Only the slice of the protocol a single domain check touches is modelled:
//! the typed check command, the per-call session, the transaction id, and
//! the check/fee response items.

use std::collections::BTreeSet;
use std::fmt;

/// Namespace URI of the fee extension declared by the check endpoint.
pub const FEE_0_6_URI: &str = "urn:ietf:params:xml:ns:fee-0.6";

/// Protocol flows the bridge can ask the engine to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowKind {
    /// Domain availability check, optionally with fee lookup
    DomainCheck,
}

impl FlowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::DomainCheck => "DomainCheckFlow",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client transaction identifier attached to an engine call.
///
/// Built from a fixed label, so two concurrent calls carry the same value.
/// It exists for log correlation only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trid {
    client_transaction_id: String,
}

impl Trid {
    pub fn create<S: Into<String>>(label: S) -> Self {
        Self {
            client_transaction_id: label.into(),
        }
    }

    pub fn client_transaction_id(&self) -> &str {
        &self.client_transaction_id
    }
}

impl fmt::Display for Trid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.client_transaction_id)
    }
}

/// Where a session's traffic came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSource {
    /// Plain HTTP, no EPP login
    Http,
}

/// Read-only per-call session handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMetadata {
    client_id: String,
    is_superuser: bool,
    is_dry_run: bool,
    service_extension_uris: BTreeSet<String>,
    source: SessionSource,
}

impl SessionMetadata {
    /// A session that exists for exactly one request and has no login state.
    pub fn stateless<I, S>(
        client_id: impl Into<String>,
        is_superuser: bool,
        is_dry_run: bool,
        service_extension_uris: I,
        source: SessionSource,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            client_id: client_id.into(),
            is_superuser,
            is_dry_run,
            service_extension_uris: service_extension_uris.into_iter().map(Into::into).collect(),
            source,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    pub fn is_dry_run(&self) -> bool {
        self.is_dry_run
    }

    pub fn source(&self) -> SessionSource {
        self.source
    }

    /// Whether the session declared the extension with namespace `uri`.
    pub fn declares_extension(&self, uri: &str) -> bool {
        self.service_extension_uris.contains(uri)
    }
}

/// Typed form of a rendered check request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EppInput {
    /// Names listed in `<domain:check>`
    pub domain_names: Vec<String>,
    /// Fee lookup requested through the fee extension, if any
    pub fee_check: Option<FeeCheckCommand>,
}

/// One `<fee:domain>` entry of a fee check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeCheckCommand {
    pub domain_name: String,
    pub currency: String,
    pub command: String,
    pub period_years: u32,
}

/// Structured engine response: result items then extension items, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EppResponse {
    pub response_data: Vec<ResponseData>,
    pub extensions: Vec<ResponseExtension>,
}

/// A result item of an engine response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseData {
    /// `<domain:chkData>`
    DomainCheck(DomainCheckData),
    /// Result data for another object type, identified by its element name
    Other { element: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainCheckData {
    pub checks: Vec<DomainCheck>,
}

/// Availability of one name as decided by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainCheck {
    /// Name echoed by the engine
    pub name: String,
    pub available: bool,
    /// Why the name is unavailable; engine-authored text
    pub reason: Option<String>,
}

impl DomainCheck {
    pub fn available<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            available: true,
            reason: None,
        }
    }

    pub fn unavailable<S: Into<String>, R: Into<String>>(name: S, reason: R) -> Self {
        Self {
            name: name.into(),
            available: false,
            reason: Some(reason.into()),
        }
    }
}

/// An extension item of an engine response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseExtension {
    /// `<fee:chkData>`
    FeeCheck(FeeCheckResponse),
    /// Any other extension, identified by namespace URI
    Other { uri: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeCheckResponse {
    pub checks: Vec<FeeCheck>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeCheck {
    pub name: String,
    pub currency: String,
    /// Pricing class such as "premium"; absent for standard pricing
    pub fee_class: Option<String>,
}
