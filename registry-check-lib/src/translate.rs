//! Response translation: engine response in, envelope out.
//!
//! A single-domain check promises one domain check result first in the
//! response data and, when fee data exists, a fee check first among the
//! extensions. These positions are read directly. Anything that breaks the
//! promise is a contract violation, never a guess.

use crate::error::CheckError;
use crate::protocols::{DomainCheck, EppResponse, ResponseData, ResponseExtension};
use crate::types::{CheckResponse, STANDARD_TIER};

/// Translate the engine response for a single-domain check.
///
/// # Errors
///
/// Returns `CheckError::ContractViolation` when the response has no check
/// result, when the first result or extension item is of another kind, or
/// when an unavailable check has no reason.
pub fn translate(response: &EppResponse) -> Result<CheckResponse, CheckError> {
    let check = first_domain_check(response)?;

    if check.available {
        Ok(CheckResponse::available(fee_tier(response)?))
    } else {
        let reason = check
            .reason
            .as_deref()
            .ok_or_else(|| CheckError::contract("unavailable check carries no reason"))?;
        Ok(CheckResponse::unavailable(reason))
    }
}

fn first_domain_check(response: &EppResponse) -> Result<&DomainCheck, CheckError> {
    let data = match response.response_data.first() {
        Some(ResponseData::DomainCheck(data)) => data,
        Some(ResponseData::Other { element }) => {
            return Err(CheckError::contract(format!(
                "expected domain check data, got '{}'",
                element
            )))
        }
        None => return Err(CheckError::contract("response has no result data")),
    };

    data.checks
        .first()
        .ok_or_else(|| CheckError::contract("domain check data has no checks"))
}

/// Fee class of the first fee check, or the standard tier when there is no
/// fee extension, no fee check entry, or no class.
fn fee_tier(response: &EppResponse) -> Result<String, CheckError> {
    match response.extensions.first() {
        None => Ok(STANDARD_TIER.to_string()),
        Some(ResponseExtension::FeeCheck(fee)) => Ok(fee
            .checks
            .first()
            .and_then(|check| check.fee_class.clone())
            .unwrap_or_else(|| STANDARD_TIER.to_string())),
        Some(ResponseExtension::Other { uri }) => Err(CheckError::contract(format!(
            "expected fee check extension, got '{}'",
            uri
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::protocols::{DomainCheckData, FeeCheck, FeeCheckResponse};

    fn response(check: DomainCheck, extensions: Vec<ResponseExtension>) -> EppResponse {
        EppResponse {
            response_data: vec![ResponseData::DomainCheck(DomainCheckData {
                checks: vec![check],
            })],
            extensions,
        }
    }

    fn fee(class: Option<&str>) -> ResponseExtension {
        ResponseExtension::FeeCheck(FeeCheckResponse {
            checks: vec![FeeCheck {
                name: "example.app".to_string(),
                currency: "USD".to_string(),
                fee_class: class.map(str::to_string),
            }],
        })
    }

    #[test]
    fn test_available_premium() {
        let translated = translate(&response(
            DomainCheck::available("example.app"),
            vec![fee(Some("premium"))],
        ))
        .unwrap();
        assert_eq!(translated, CheckResponse::available("premium"));
    }

    #[test]
    fn test_available_defaults_to_standard() {
        for extensions in [
            vec![],
            vec![fee(None)],
            vec![ResponseExtension::FeeCheck(FeeCheckResponse::default())],
        ] {
            let translated =
                translate(&response(DomainCheck::available("example.app"), extensions)).unwrap();
            assert_eq!(translated, CheckResponse::available("standard"));
        }
    }

    #[test]
    fn test_unavailable_uses_engine_reason() {
        let translated = translate(&response(
            DomainCheck::unavailable("example.app", "In use"),
            vec![fee(Some("premium"))],
        ))
        .unwrap();
        assert_eq!(translated, CheckResponse::unavailable("In use"));
    }

    #[test]
    fn test_unavailable_without_reason_is_violation() {
        let mut check = DomainCheck::unavailable("example.app", "In use");
        check.reason = None;
        assert!(matches!(
            translate(&response(check, vec![])),
            Err(CheckError::ContractViolation { .. })
        ));
    }

    #[test]
    fn test_only_first_items_are_read() {
        let mut resp = response(
            DomainCheck::available("example.app"),
            vec![fee(Some("premium")), fee(Some("platinum"))],
        );
        if let ResponseData::DomainCheck(data) = &mut resp.response_data[0] {
            data.checks.push(DomainCheck::unavailable("other.app", "In use"));
        }
        assert_eq!(translate(&resp).unwrap(), CheckResponse::available("premium"));
    }

    #[test]
    fn test_contract_violations() {
        let empty = EppResponse::default();
        assert_eq!(translate(&empty).unwrap_err().kind(), FailureKind::Unexpected);

        let no_checks = EppResponse {
            response_data: vec![ResponseData::DomainCheck(DomainCheckData::default())],
            extensions: vec![],
        };
        assert!(matches!(
            translate(&no_checks),
            Err(CheckError::ContractViolation { .. })
        ));

        let wrong_data = EppResponse {
            response_data: vec![ResponseData::Other {
                element: "host:chkData".to_string(),
            }],
            extensions: vec![],
        };
        assert!(matches!(
            translate(&wrong_data),
            Err(CheckError::ContractViolation { .. })
        ));

        let wrong_extension = response(
            DomainCheck::available("example.app"),
            vec![ResponseExtension::Other {
                uri: "urn:ietf:params:xml:ns:launch-1.0".to_string(),
            }],
        );
        assert!(matches!(
            translate(&wrong_extension),
            Err(CheckError::ContractViolation { .. })
        ));
    }
}
