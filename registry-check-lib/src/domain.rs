//! Input normalization for the check endpoint.
//!
//! Turns whatever the caller sent into a canonical ASCII domain name on a
//! managed zone, or fails with a single fixed reason. Malformed input and
//! unmanaged zones are deliberately indistinguishable to the caller.

use crate::error::CheckError;
use crate::zones::{Zone, ZoneRegistry};
use regex::Regex;

/// Maximum length of a full domain name in octets (RFC 1035).
const MAX_NAME_LENGTH: usize = 253;

lazy_static::lazy_static! {
    /// One LDH label: letters, digits and hyphens, 1-63 octets, no leading or
    /// trailing hyphen. Applied after IDNA conversion, so only ASCII remains.
    static ref LABEL_PATTERN: Regex =
        Regex::new(r"^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?$").expect("label pattern compiles");
}

/// A canonical domain name together with the managed zone that owns it.
///
/// Only [`normalize`] creates these, so holding one means the zone check
/// already passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDomain {
    name: String,
    zone: Zone,
}

impl NormalizedDomain {
    /// Canonical ASCII form, e.g. `"xn--bcher-kva.app"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The managed zone this name falls under.
    pub fn zone(&self) -> &Zone {
        &self.zone
    }
}

/// Canonicalize a domain name.
///
/// Drops a single trailing root dot, folds case and applies IDNA (UTS #46)
/// mapping to the punycode ASCII form, then checks RFC 1035 length and label
/// syntax. Surrounding whitespace is not trimmed and fails the label check.
///
/// # Arguments
///
/// * `raw` - The domain name exactly as the caller sent it
///
/// # Returns
///
/// The canonical name, or `CheckError::InvalidDomain` if it is not a
/// syntactically valid host name.
pub fn canonicalize_domain_name(raw: &str) -> Result<String, CheckError> {
    let name = raw.strip_suffix('.').unwrap_or(raw);

    if name.is_empty() {
        return Err(CheckError::invalid_domain("empty domain name"));
    }

    let ascii = idna::domain_to_ascii(&name.to_lowercase())
        .map_err(|_| CheckError::invalid_domain("IDNA conversion failed"))?;

    if ascii.is_empty() || ascii.len() > MAX_NAME_LENGTH {
        return Err(CheckError::invalid_domain(format!(
            "name length {} outside 1..={}",
            ascii.len(),
            MAX_NAME_LENGTH
        )));
    }

    if let Some(bad) = ascii.split('.').position(|label| !LABEL_PATTERN.is_match(label)) {
        return Err(CheckError::invalid_domain(format!(
            "label {} is not a valid host label",
            bad + 1
        )));
    }

    Ok(ascii)
}

/// Validate and canonicalize the caller's input and resolve its zone.
///
/// A missing parameter is treated exactly like an empty one.
///
/// # Errors
///
/// Returns `CheckError::InvalidDomain` when the name is malformed or no
/// managed zone owns it. Both surface with the same caller-visible reason.
pub fn normalize(raw: Option<&str>, zones: &dyn ZoneRegistry) -> Result<NormalizedDomain, CheckError> {
    let name = canonicalize_domain_name(raw.unwrap_or_default())?;

    let zone = zones
        .resolve(&name)
        .ok_or_else(|| CheckError::invalid_domain("no managed zone owns this name"))?;

    Ok(NormalizedDomain { name, zone })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::zones::ManagedZones;

    fn zones() -> ManagedZones {
        ManagedZones::new(["app", "dev", "co.uk"])
    }

    #[test]
    fn test_canonicalize_folds_case_and_drops_root_dot() {
        assert_eq!(canonicalize_domain_name("Example.APP").unwrap(), "example.app");
        assert_eq!(canonicalize_domain_name("example.app.").unwrap(), "example.app");
    }

    #[test]
    fn test_canonicalize_applies_idna() {
        assert_eq!(
            canonicalize_domain_name("bücher.app").unwrap(),
            "xn--bcher-kva.app"
        );
        assert_eq!(
            canonicalize_domain_name("BÜCHER.app").unwrap(),
            "xn--bcher-kva.app"
        );
    }

    #[test]
    fn test_canonicalize_rejects_malformed() {
        for input in [
            "",
            "   ",
            ".",
            "-example.app",
            "example-.app",
            "exa mple.app",
            "under_score.app",
            "example..app",
            "<script>.app",
            "\"quoted\".app",
            " example.app",
            "example.app\t",
            "\nexample.app\n",
            "example.app..",
        ] {
            assert!(
                canonicalize_domain_name(input).is_err(),
                "expected {:?} to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_canonicalize_enforces_lengths() {
        let long_label = format!("{}.app", "a".repeat(64));
        assert!(canonicalize_domain_name(&long_label).is_err());

        let max_label = format!("{}.app", "a".repeat(63));
        assert!(canonicalize_domain_name(&max_label).is_ok());

        let long_name = format!("{}app", "abcdefghi.".repeat(26));
        assert!(long_name.len() > MAX_NAME_LENGTH);
        assert!(canonicalize_domain_name(&long_name).is_err());
    }

    #[test]
    fn test_normalize_resolves_zone() {
        let domain = normalize(Some("Example.Co.UK"), &zones()).unwrap();
        assert_eq!(domain.name(), "example.co.uk");
        assert_eq!(domain.zone().name(), "co.uk");
    }

    #[test]
    fn test_normalize_missing_is_empty() {
        let err = normalize(None, &zones()).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Validation);
        assert_eq!(err, normalize(Some(""), &zones()).unwrap_err());
    }

    #[test]
    fn test_normalize_rejects_unmanaged_zone() {
        for input in ["example.com", "EXAMPLE.COM", "example.uk"] {
            let err = normalize(Some(input), &zones()).unwrap_err();
            assert_eq!(err.kind(), FailureKind::Validation);
        }
    }
}
