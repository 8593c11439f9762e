//! Table-driven reference engine.
//!
//! Answers domain checks from fixed lookup tables so the endpoint can run
//! without a registry backend (local development, demos, tests). It has no
//! registration state machine and computes no prices.

use super::engine::{Clock, EngineError, FlowEngine, REQUIRED_PARAMETER_MISSING};
use super::epp::{
    DomainCheck, DomainCheckData, EppInput, EppResponse, FeeCheck, FeeCheckResponse, FlowKind,
    ResponseData, ResponseExtension, SessionMetadata, Trid, FEE_0_6_URI,
};
use crate::config::EngineConfig;
use std::collections::HashMap;
use tracing::debug;

/// Reference [`FlowEngine`] backed by name → value tables.
#[derive(Debug, Clone, Default)]
pub struct TableEngine {
    /// Registered names and the reason reported for them
    registered: HashMap<String, String>,
    /// Reserved names and the reason reported for them
    reserved: HashMap<String, String>,
    /// Premium names and their fee class
    premium: HashMap<String, String>,
    /// Fail every flow with "Command is not implemented"
    unimplemented: bool,
}

impl TableEngine {
    /// An engine that reports every name as available at standard pricing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tables from the `[engine]` configuration section.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut engine = Self::new();
        for (name, reason) in config.registered.iter().flatten() {
            engine = engine.with_registered(name, reason);
        }
        for (name, reason) in config.reserved.iter().flatten() {
            engine = engine.with_reserved(name, reason);
        }
        for (name, class) in config.premium.iter().flatten() {
            engine = engine.with_premium(name, class);
        }
        engine.with_unimplemented(config.unimplemented.unwrap_or(false))
    }

    pub fn with_registered<N: AsRef<str>, R: Into<String>>(mut self, name: N, reason: R) -> Self {
        self.registered.insert(table_key(name.as_ref()), reason.into());
        self
    }

    pub fn with_reserved<N: AsRef<str>, R: Into<String>>(mut self, name: N, reason: R) -> Self {
        self.reserved.insert(table_key(name.as_ref()), reason.into());
        self
    }

    pub fn with_premium<N: AsRef<str>, C: Into<String>>(mut self, name: N, fee_class: C) -> Self {
        self.premium.insert(table_key(name.as_ref()), fee_class.into());
        self
    }

    pub fn with_unimplemented(mut self, unimplemented: bool) -> Self {
        self.unimplemented = unimplemented;
        self
    }

    fn check_name(&self, name: &str) -> DomainCheck {
        let key = table_key(name);
        if let Some(reason) = self.registered.get(&key) {
            DomainCheck::unavailable(name, reason.as_str())
        } else if let Some(reason) = self.reserved.get(&key) {
            DomainCheck::unavailable(name, reason.as_str())
        } else {
            DomainCheck::available(name)
        }
    }

    fn domain_check(
        &self,
        input: &EppInput,
        session: &SessionMetadata,
    ) -> Result<EppResponse, EngineError> {
        if input.domain_names.is_empty() {
            return Err(EngineError::protocol(
                REQUIRED_PARAMETER_MISSING,
                "Required parameter missing",
            ));
        }

        let checks = input
            .domain_names
            .iter()
            .map(|name| self.check_name(name))
            .collect();

        let mut extensions = Vec::new();
        if let Some(fee) = &input.fee_check {
            // Fee data is only returned to sessions that declared the extension
            if session.declares_extension(FEE_0_6_URI) {
                extensions.push(ResponseExtension::FeeCheck(FeeCheckResponse {
                    checks: vec![FeeCheck {
                        name: fee.domain_name.clone(),
                        currency: fee.currency.clone(),
                        fee_class: self.premium.get(&table_key(&fee.domain_name)).cloned(),
                    }],
                }));
            }
        }

        Ok(EppResponse {
            response_data: vec![ResponseData::DomainCheck(DomainCheckData { checks })],
            extensions,
        })
    }
}

impl FlowEngine for TableEngine {
    fn run(
        &self,
        flow: FlowKind,
        input: &EppInput,
        trid: &Trid,
        session: &SessionMetadata,
        raw_payload: &[u8],
        _response_hint: Option<&str>,
        _clock: &dyn Clock,
    ) -> Result<EppResponse, EngineError> {
        debug!(
            flow = %flow,
            trid = %trid,
            client_id = session.client_id(),
            payload_bytes = raw_payload.len(),
            "Running flow on table engine"
        );

        if self.unimplemented {
            return Err(EngineError::unimplemented());
        }

        match flow {
            FlowKind::DomainCheck => self.domain_check(input, session),
        }
    }
}

fn table_key(name: &str) -> String {
    name.trim().trim_end_matches('.').to_lowercase()
}
