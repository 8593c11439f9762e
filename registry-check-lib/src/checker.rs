//! Main domain checker implementation.
//!
//! This module provides the `DomainChecker` struct that runs one raw domain
//! string through normalization, request building, the protocol bridge and
//! response translation, and turns every failure into an envelope.

use crate::bridge::ProtocolBridge;
use crate::classify::classify;
use crate::domain::normalize;
use crate::error::CheckError;
use crate::protocols::{Clock, FlowEngine, SystemClock};
use crate::request::RequestBuilder;
use crate::template::{CachedTemplates, TemplateRenderer};
use crate::translate::translate;
use crate::types::{CheckConfig, CheckResponse};
use crate::zones::{ManagedZones, ZoneRegistry};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::debug;

/// Answers "is this domain available, and at what tier?" for one raw input.
///
/// The checker holds only read-only state and can be shared freely between
/// threads; concurrent checks need no coordination.
///
/// # Example
///
/// ```rust
/// use registry_check_lib::{CheckConfig, DomainChecker, TableEngine};
/// use std::sync::Arc;
///
/// let engine = TableEngine::new().with_registered("taken.app", "In use");
/// let checker = DomainChecker::new(CheckConfig::default(), Arc::new(engine));
///
/// let json = checker.check(Some("taken.app")).to_json().unwrap();
/// assert_eq!(json, r#"{"status":"success","available":false,"reason":"In use"}"#);
/// ```
#[derive(Clone)]
pub struct DomainChecker {
    /// Configuration settings for this checker instance
    config: CheckConfig,
    /// Managed zone lookup
    zones: Arc<dyn ZoneRegistry>,
    /// Renders check requests
    builder: RequestBuilder,
    /// Calls the protocol engine
    bridge: ProtocolBridge,
}

impl DomainChecker {
    /// Create a checker with the configured zones, the built-in templates
    /// and the system clock.
    pub fn new(config: CheckConfig, engine: Arc<dyn FlowEngine>) -> Self {
        let zones = Arc::new(ManagedZones::new(&config.zones));
        Self::with_parts(
            config,
            zones,
            Arc::new(CachedTemplates),
            engine,
            Arc::new(SystemClock),
        )
    }

    /// Create a checker from explicit collaborators.
    pub fn with_parts(
        config: CheckConfig,
        zones: Arc<dyn ZoneRegistry>,
        renderer: Arc<dyn TemplateRenderer>,
        engine: Arc<dyn FlowEngine>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let bridge = ProtocolBridge::new(engine, clock, &config);
        Self {
            config,
            zones,
            builder: RequestBuilder::new(renderer),
            bridge,
        }
    }

    /// Check one domain and always produce an envelope.
    ///
    /// A panic in any collaborator is caught and classified as an
    /// unexpected failure.
    ///
    /// # Arguments
    ///
    /// * `raw` - The `domain` parameter as received; `None` when it was absent
    pub fn check(&self, raw: Option<&str>) -> CheckResponse {
        panic::catch_unwind(AssertUnwindSafe(|| self.try_check(raw)))
            .unwrap_or_else(|payload| Err(CheckError::internal(panic_message(payload.as_ref()))))
            .unwrap_or_else(|error| classify(&error))
    }

    /// Check one domain, returning failures instead of classifying them.
    ///
    /// The checking process:
    /// 1. Normalizes the input and resolves its managed zone
    /// 2. Renders the domain check request
    /// 3. Runs the check flow on the engine
    /// 4. Translates the engine response
    ///
    /// # Errors
    ///
    /// Returns `CheckError` for validation, protocol and unexpected failures
    /// alike; [`CheckError::kind`] tells them apart.
    pub fn try_check(&self, raw: Option<&str>) -> Result<CheckResponse, CheckError> {
        let domain = normalize(raw, self.zones.as_ref())?;
        debug!(domain = domain.name(), zone = %domain.zone(), "Checking domain");

        let payload = self.builder.build(&domain)?;
        let response = self.bridge.execute(&payload)?;
        translate(&response)
    }

    /// Get the configuration for this checker.
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload");
    format!("panic during check: {}", detail)
}

impl std::fmt::Debug for DomainChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainChecker")
            .field("config", &self.config)
            .field("bridge", &self.bridge)
            .finish_non_exhaustive()
    }
}
