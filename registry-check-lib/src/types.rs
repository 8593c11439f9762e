//! Core data types for the check endpoint.
//!
//! This module defines the response envelope, the only thing ever shown to
//! a caller, and the configuration the bridge runs with.

use crate::error::{GENERIC_FAILURE_REASON, INVALID_DOMAIN_REASON};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Tier reported for available names the engine gave no fee class for.
pub const STANDARD_TIER: &str = "standard";

/// Response envelope for one check.
///
/// Serializes to exactly one of:
///
/// - `{"status":"success","available":true,"tier":"..."}`
/// - `{"status":"success","available":false,"reason":"..."}`
/// - `{"status":"error","reason":"..."}`
///
/// Nothing in it is ever copied from the caller's input. Tiers and reasons
/// come from the engine or from fixed strings in this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResponse {
    /// Name can be registered at the given pricing tier
    Available { tier: String },
    /// Name cannot be registered; `reason` is engine-authored
    Unavailable { reason: String },
    /// Check did not complete
    Error { reason: String },
}

impl CheckResponse {
    pub fn available<T: Into<String>>(tier: T) -> Self {
        Self::Available { tier: tier.into() }
    }

    pub fn unavailable<R: Into<String>>(reason: R) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn error<R: Into<String>>(reason: R) -> Self {
        Self::Error {
            reason: reason.into(),
        }
    }

    /// The envelope for input that failed normalization.
    pub fn invalid_domain() -> Self {
        Self::error(INVALID_DOMAIN_REASON)
    }

    /// The envelope for any failure whose detail must stay server-side.
    pub fn generic_failure() -> Self {
        Self::error(GENERIC_FAILURE_REASON)
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Error { .. })
    }

    /// Serialize to the JSON wire form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for CheckResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Field order is part of the wire contract
        let mut map = serializer.serialize_map(Some(if self.is_success() { 3 } else { 2 }))?;
        match self {
            Self::Available { tier } => {
                map.serialize_entry("status", "success")?;
                map.serialize_entry("available", &true)?;
                map.serialize_entry("tier", tier)?;
            }
            Self::Unavailable { reason } => {
                map.serialize_entry("status", "success")?;
                map.serialize_entry("available", &false)?;
                map.serialize_entry("reason", reason)?;
            }
            Self::Error { reason } => {
                map.serialize_entry("status", "error")?;
                map.serialize_entry("reason", reason)?;
            }
        }
        map.end()
    }
}

/// Configuration for the check bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    /// Registrar identity the endpoint acts as toward the engine
    /// Default: "TheRegistrar"
    pub client_id: String,

    /// Fixed label every engine call's transaction id is created from
    /// Default: "CheckApiAction"
    pub trid_label: String,

    /// Zones the endpoint answers for
    /// Default: ["app", "dev", "how"]
    pub zones: Vec<String>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            client_id: "TheRegistrar".to_string(),
            trid_label: "CheckApiAction".to_string(),
            zones: vec!["app".to_string(), "dev".to_string(), "how".to_string()],
        }
    }
}

impl CheckConfig {
    /// Set the registrar client id.
    pub fn with_client_id<S: Into<String>>(mut self, client_id: S) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Set the transaction id label.
    pub fn with_trid_label<S: Into<String>>(mut self, label: S) -> Self {
        self.trid_label = label.into();
        self
    }

    /// Set the managed zones.
    pub fn with_zones(mut self, zones: Vec<String>) -> Self {
        self.zones = zones;
        self
    }
}
