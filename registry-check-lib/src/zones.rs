//! Managed zone lookup.
//!
//! A zone is a name suffix the registry is authoritative for ("app",
//! "co.uk"). Only names that resolve to a managed zone are ever sent to the
//! protocol engine.

use crate::domain::canonicalize_domain_name;
use std::collections::HashSet;
use std::fmt;

/// An administratively managed domain-name suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Zone {
    name: String,
}

impl Zone {
    /// Create a zone from its canonical (lowercase, dot-free at the ends) name.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }

    /// The zone name, e.g. `"app"`.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Resolves a canonical domain name to the zone that owns it.
pub trait ZoneRegistry: Send + Sync {
    /// Return the owning zone, or `None` when no managed zone matches.
    fn resolve(&self, domain_name: &str) -> Option<Zone>;
}

/// Fixed set of managed zones loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct ManagedZones {
    zones: HashSet<String>,
}

impl ManagedZones {
    /// Build the set from zone names in any case or script.
    ///
    /// Entries are trimmed, stripped of surrounding dots and canonicalized
    /// like domain names, so `"Bücher"` is stored as `"xn--bcher-kva"`.
    /// Blank or malformed entries are ignored.
    pub fn new<I, S>(zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let zones = zones
            .into_iter()
            .filter_map(|z| canonicalize_domain_name(z.as_ref().trim().trim_matches('.')).ok())
            .collect();
        Self { zones }
    }

    /// Managed zone names, sorted alphabetically.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.zones.iter().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl ZoneRegistry for ManagedZones {
    /// Walk the proper suffixes of `domain_name`, longest first, and return
    /// the first one that is managed. A bare zone name has no owning zone.
    fn resolve(&self, domain_name: &str) -> Option<Zone> {
        let labels: Vec<&str> = domain_name.split('.').collect();

        (1..labels.len())
            .map(|i| labels[i..].join("."))
            .find(|suffix| self.zones.contains(suffix))
            .map(Zone::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_entries() {
        let zones = ManagedZones::new([" App ", ".dev.", "", "co.uk"]);
        assert_eq!(zones.names(), vec!["app", "co.uk", "dev"]);
        assert_eq!(zones.len(), 3);
        assert!(!zones.is_empty());
    }

    #[test]
    fn test_unicode_zone_is_stored_as_punycode() {
        let zones = ManagedZones::new(["Bücher", "bad zone", "-x"]);
        assert_eq!(zones.names(), vec!["xn--bcher-kva"]);
        assert_eq!(
            zones.resolve("shop.xn--bcher-kva"),
            Some(Zone::new("xn--bcher-kva"))
        );
    }

    #[test]
    fn test_resolve_single_label_zone() {
        let zones = ManagedZones::new(["app", "dev"]);
        assert_eq!(zones.resolve("example.app"), Some(Zone::new("app")));
        assert_eq!(zones.resolve("www.example.dev"), Some(Zone::new("dev")));
        assert_eq!(zones.resolve("example.com"), None);
    }

    #[test]
    fn test_resolve_prefers_longest_suffix() {
        let zones = ManagedZones::new(["uk", "co.uk"]);
        assert_eq!(zones.resolve("example.co.uk"), Some(Zone::new("co.uk")));
        assert_eq!(zones.resolve("example.uk"), Some(Zone::new("uk")));
    }

    #[test]
    fn test_resolve_excludes_name_itself() {
        let zones = ManagedZones::new(["app", "co.uk"]);
        assert_eq!(zones.resolve("app"), None);
        assert_eq!(zones.resolve("co.uk"), None);
    }

    #[test]
    fn test_resolve_is_label_aligned() {
        // "happ" ends with "app" but is not under the app zone
        let zones = ManagedZones::new(["app"]);
        assert_eq!(zones.resolve("example.happ"), None);
    }

    #[test]
    fn test_empty_registry_resolves_nothing() {
        let zones = ManagedZones::default();
        assert!(zones.is_empty());
        assert_eq!(zones.resolve("example.app"), None);
    }
}
