//! Request building: normalized domain in, protocol request out.

use crate::domain::NormalizedDomain;
use crate::error::CheckError;
use crate::protocols::{EppInput, FeeCheckCommand};
use crate::template::{TemplateData, TemplateKey, TemplateRenderer};
use std::sync::Arc;

const FEE_CURRENCY: &str = "USD";
const FEE_COMMAND: &str = "create";
const FEE_PERIOD_YEARS: u32 = 1;

/// A rendered check request and the typed command it encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPayload {
    input: EppInput,
    bytes: Vec<u8>,
}

impl RequestPayload {
    pub fn input(&self) -> &EppInput {
        &self.input
    }

    /// Rendered request bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Builds domain check requests from the `domain_check_fee` template.
#[derive(Clone)]
pub struct RequestBuilder {
    renderer: Arc<dyn TemplateRenderer>,
}

impl RequestBuilder {
    pub fn new(renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self { renderer }
    }

    /// Render the check request for `domain`.
    ///
    /// # Errors
    ///
    /// Renderer faults come back as `CheckError::Render`, which is an
    /// unexpected failure, never a validation failure.
    pub fn build(&self, domain: &NormalizedDomain) -> Result<RequestPayload, CheckError> {
        let data = TemplateData::from([
            ("domainName", domain.name().to_string()),
            ("currency", FEE_CURRENCY.to_string()),
            ("command", FEE_COMMAND.to_string()),
            ("period", FEE_PERIOD_YEARS.to_string()),
        ]);

        let bytes = self.renderer.render(TemplateKey::DomainCheckFee, &data)?;

        let input = EppInput {
            domain_names: vec![domain.name().to_string()],
            fee_check: Some(FeeCheckCommand {
                domain_name: domain.name().to_string(),
                currency: FEE_CURRENCY.to_string(),
                command: FEE_COMMAND.to_string(),
                period_years: FEE_PERIOD_YEARS,
            }),
        };

        Ok(RequestPayload { input, bytes })
    }
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder").finish_non_exhaustive()
    }
}
