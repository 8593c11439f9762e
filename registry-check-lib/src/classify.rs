//! Error classification: every failure becomes an envelope.

use crate::error::{CheckError, FailureKind};
use crate::types::CheckResponse;
use tracing::warn;

/// Map a failure to the envelope the caller sees.
///
/// Validation failures get the fixed invalid-domain reason, protocol
/// failures their engine message, and everything else is logged here with
/// full detail and reported as "Invalid request".
pub fn classify(error: &CheckError) -> CheckResponse {
    match (error.kind(), error) {
        (FailureKind::Validation, _) => CheckResponse::invalid_domain(),
        (FailureKind::Protocol, CheckError::Protocol { message, .. }) => {
            CheckResponse::error(message.as_str())
        }
        (FailureKind::Protocol, _) | (FailureKind::Unexpected, _) => {
            warn!(error = %error, "Unknown error");
            CheckResponse::generic_failure()
        }
    }
}
