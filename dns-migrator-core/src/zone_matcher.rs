//! Zone membership by literal suffix with label boundary
//!
//! `www.example.org` and `example.org` belong to zone `example.org`;
//! `example.org.de` and `notexample.org` do not. Comparison is ASCII
//! case-insensitive and ignores one trailing dot on either side.

use crate::error::{CoreError, CoreResult};
use crate::types::ManagedZone;

/// Owner name relative to its zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelativeName {
    /// The domain is the zone itself.
    Apex,
    /// Labels left of the zone suffix, e.g. `www` or `a.b`.
    Label(String),
}

/// Suffix matching helpers.
pub struct ZoneMatcher;

impl ZoneMatcher {
    /// Whether `domain` equals `zone` or ends with `"." + zone`.
    pub fn belongs_to(domain: &str, zone: &str) -> bool {
        Self::relative_name(domain, zone).is_some()
    }

    /// Label part of `domain` under `zone`, or `None` if it is outside the zone.
    pub fn relative_name(domain: &str, zone: &str) -> Option<RelativeName> {
        let domain = trim_dot(domain);
        let zone = trim_dot(zone);
        if domain.is_empty() || zone.is_empty() {
            return None;
        }
        if domain.eq_ignore_ascii_case(zone) {
            return Some(RelativeName::Apex);
        }

        let split = domain.len().checked_sub(zone.len() + 1)?;
        if !domain.is_char_boundary(split) || !domain.is_char_boundary(split + 1) {
            return None;
        }
        let (label, rest) = domain.split_at(split);
        let suffix = rest.strip_prefix('.')?;
        if label.is_empty() || !suffix.eq_ignore_ascii_case(zone) {
            return None;
        }
        Some(RelativeName::Label(label.to_string()))
    }

    /// The most specific zone `domain` belongs to.
    ///
    /// With zones `example.org` and `eu.example.org`, `www.eu.example.org`
    /// goes to the latter. Two zone entries with the same name both
    /// claiming a domain is a [`CoreError::ZoneMatchAmbiguity`].
    pub fn owning_zone<'a>(
        domain: &str,
        zones: &'a [ManagedZone],
    ) -> CoreResult<Option<&'a ManagedZone>> {
        let mut best: Vec<&ManagedZone> = Vec::new();
        for zone in zones.iter().filter(|z| Self::belongs_to(domain, &z.name)) {
            let len = trim_dot(&zone.name).len();
            match best.first().map(|z| trim_dot(&z.name).len()) {
                Some(best_len) if len < best_len => {}
                Some(best_len) if len == best_len => best.push(zone),
                _ => best = vec![zone],
            }
        }

        match best.as_slice() {
            [] => Ok(None),
            [zone] => Ok(Some(*zone)),
            many => Err(CoreError::ZoneMatchAmbiguity {
                domain: domain.to_string(),
                zones: many
                    .iter()
                    .map(|z| z.id.clone().unwrap_or_else(|| z.name.clone()))
                    .collect(),
            }),
        }
    }
}

fn trim_dot(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(name: &str, id: &str) -> ManagedZone {
        ManagedZone {
            name: name.to_string(),
            id: Some(id.to_string()),
        }
    }

    #[test]
    fn suffix_with_label_boundary() {
        assert!(ZoneMatcher::belongs_to("www.example.org", "example.org"));
        assert!(ZoneMatcher::belongs_to("example.org", "example.org"));
        assert!(!ZoneMatcher::belongs_to("example.org.de", "example.org"));
        assert!(!ZoneMatcher::belongs_to("notexample.org", "example.org"));
    }

    #[test]
    fn case_and_trailing_dot_are_ignored() {
        assert!(ZoneMatcher::belongs_to("WWW.Example.ORG.", "example.org"));
        assert!(ZoneMatcher::belongs_to("www.example.org", "example.org."));
        assert!(!ZoneMatcher::belongs_to("", "example.org"));
        assert!(!ZoneMatcher::belongs_to(".example.org", "example.org"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        assert!(!ZoneMatcher::belongs_to("wwwXexampleYorg", "example.org"));
        assert!(!ZoneMatcher::belongs_to("a.exampleXorg", "example.org"));
    }

    #[test]
    fn relative_names() {
        assert_eq!(
            ZoneMatcher::relative_name("example.org", "example.org"),
            Some(RelativeName::Apex)
        );
        assert_eq!(
            ZoneMatcher::relative_name("a.b.example.org", "example.org"),
            Some(RelativeName::Label("a.b".to_string()))
        );
        assert_eq!(ZoneMatcher::relative_name("example.net", "example.org"), None);
    }

    #[test]
    fn owning_zone_prefers_longest() {
        let zones = vec![zone("example.org", "z1"), zone("eu.example.org", "z2")];
        let owner = ZoneMatcher::owning_zone("www.eu.example.org", &zones).unwrap();
        assert_eq!(owner.and_then(|z| z.id.as_deref()), Some("z2"));

        let owner = ZoneMatcher::owning_zone("www.example.org", &zones).unwrap();
        assert_eq!(owner.and_then(|z| z.id.as_deref()), Some("z1"));

        assert!(
            ZoneMatcher::owning_zone("example.net", &zones)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn duplicate_zone_names_are_ambiguous() {
        let zones = vec![zone("example.org", "z1"), zone("Example.org.", "z2")];
        let err = ZoneMatcher::owning_zone("www.example.org", &zones).unwrap_err();
        assert!(matches!(
            err,
            CoreError::ZoneMatchAmbiguity { zones, .. } if zones == ["z1", "z2"]
        ));
    }
}
