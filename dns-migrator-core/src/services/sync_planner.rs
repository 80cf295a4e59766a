//! UPSERT planning
//!
//! Turns the record store into one change batch per (zone, type, domain).
//! Planning is pure: the same zones, store and run date always yield the
//! same batches, which keeps re-runs byte-identical.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use dns_migrator_provider::{ChangeBatch, RecordSetType, ResourceRecordSet, to_fqdn};

use crate::error::CoreError;
use crate::record_store::RecordStore;
use crate::types::{DnsRecord, ManagedZone, PlannedUpsert, SyncPlan};
use crate::zone_matcher::ZoneMatcher;

/// Longest character-string a TXT value chunk may hold.
pub const TXT_CHUNK_LEN: usize = 255;

/// Comment attached to every change batch.
pub fn change_comment(record_type: RecordSetType, run_date: NaiveDate) -> String {
    format!(
        "[{record_type}] Record change initiated on {}",
        run_date.format("%Y-%m-%d")
    )
}

/// Provider encoding of a TXT value.
///
/// Values up to 255 characters are quoted once; longer ones are cut into
/// 255-character chunks, each quoted, joined by a space. Lengths count the
/// unescaped text; `"` and `\` are backslash-escaped inside each chunk.
pub fn encode_txt_value(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= TXT_CHUNK_LEN {
        return quote_chunk(&chars);
    }
    chars
        .chunks(TXT_CHUNK_LEN)
        .map(quote_chunk)
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_chunk(chunk: &[char]) -> String {
    let mut quoted = String::with_capacity(chunk.len() + 2);
    quoted.push('"');
    for &c in chunk {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Merged MX value: one `"<priority> <server>\n"` line per entry, ascending priority.
///
/// `entries` must already be in file order; the sort is stable.
pub fn merge_mx_value(entries: &[(u16, &str)]) -> String {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|(priority, _)| *priority);
    sorted
        .iter()
        .map(|(priority, server)| format!("{priority} {server}\n"))
        .collect()
}

type GroupKey<'a> = (&'a str, RecordSetType, &'a str);

/// Build the full UPSERT plan for `zones`.
///
/// Zones without a provider id are ignored. NS records are never imported.
pub fn plan_changes(zones: &[ManagedZone], store: &RecordStore, run_date: NaiveDate) -> SyncPlan {
    let zones: Vec<ManagedZone> = zones.iter().filter(|z| z.id.is_some()).cloned().collect();
    let mut groups: BTreeMap<GroupKey<'_>, (&ManagedZone, Vec<&DnsRecord>)> = BTreeMap::new();
    let mut unmatched = 0;
    let mut ambiguous = BTreeSet::new();

    for record in store.records() {
        let record_type = record.record_type();
        if !RecordSetType::IMPORTED.contains(&record_type) {
            continue;
        }
        match ZoneMatcher::owning_zone(record.domain(), &zones) {
            Ok(Some(zone)) => {
                groups
                    .entry((zone.name.as_str(), record_type, record.domain()))
                    .or_insert_with(|| (zone, Vec::new()))
                    .1
                    .push(record);
            }
            Ok(None) => {
                log::debug!("No managed zone for {record}");
                unmatched += 1;
            }
            Err(e @ CoreError::ZoneMatchAmbiguity { .. }) => {
                log::warn!("{e}");
                ambiguous.insert(record.domain().to_string());
            }
            Err(e) => log::error!("Zone lookup failed for {}: {e}", record.domain()),
        }
    }

    let upserts = groups
        .into_iter()
        .filter_map(|((_, record_type, domain), (zone, records))| {
            let record_set = build_record_set(record_type, domain, &records)?;
            let zone_id = zone.id.clone()?;
            Some(PlannedUpsert {
                zone: zone.name.clone(),
                zone_id,
                domain: domain.to_string(),
                record_type,
                change_batch: ChangeBatch::upsert(
                    Some(change_comment(record_type, run_date)),
                    record_set,
                ),
            })
        })
        .collect();

    SyncPlan {
        upserts,
        unmatched,
        ambiguous: ambiguous.into_iter().collect(),
    }
}

/// Merge one domain's records of one type into a record set.
fn build_record_set(
    record_type: RecordSetType,
    domain: &str,
    records: &[&DnsRecord],
) -> Option<ResourceRecordSet> {
    let first = records.first()?;
    let ttl = first.ttl()?;
    if records.iter().any(|r| r.ttl() != Some(ttl)) {
        log::warn!(
            "{record_type} records for {domain} carry different TTLs; using {ttl} from the first entry"
        );
    }

    let values = match record_type {
        RecordSetType::A => dedup(records.iter().filter_map(|r| match r {
            DnsRecord::A { address, .. } => Some(address.clone()),
            _ => None,
        })),
        RecordSetType::Txt => dedup(records.iter().filter_map(|r| match r {
            DnsRecord::Txt { text, .. } => Some(encode_txt_value(text)),
            _ => None,
        })),
        RecordSetType::Mx => {
            let entries: Vec<(u16, &str)> = records
                .iter()
                .filter_map(|r| match r {
                    DnsRecord::Mx {
                        priority,
                        mail_server,
                        ..
                    } => Some((*priority, mail_server.as_str())),
                    _ => None,
                })
                .collect();
            vec![merge_mx_value(&entries)]
        }
        RecordSetType::Cname => {
            if records.len() > 1 {
                log::warn!(
                    "{} CNAME records for {domain}; keeping the last one",
                    records.len()
                );
            }
            let target = records.iter().rev().find_map(|r| match r {
                DnsRecord::Cname { target, .. } => Some(target.clone()),
                _ => None,
            })?;
            let ttl = records.last().and_then(|r| r.ttl()).unwrap_or(ttl);
            return Some(ResourceRecordSet {
                name: to_fqdn(domain),
                record_type,
                ttl,
                values: vec![target],
            });
        }
        RecordSetType::Ns => return None,
    };

    Some(ResourceRecordSet {
        name: to_fqdn(domain),
        record_type,
        ttl,
        values,
    })
}

fn dedup(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values.filter(|v| seen.insert(v.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn zones() -> Vec<ManagedZone> {
        vec![
            ManagedZone {
                name: "example.org".to_string(),
                id: Some("zone-org".to_string()),
            },
            ManagedZone {
                name: "example.net".to_string(),
                id: Some("zone-net".to_string()),
            },
        ]
    }

    #[test]
    fn txt_chunking() {
        assert_eq!(encode_txt_value("hello"), "\"hello\"");

        let exact = "a".repeat(255);
        assert_eq!(encode_txt_value(&exact), format!("\"{exact}\""));

        let long = "x".repeat(600);
        let encoded = encode_txt_value(&long);
        let chunks: Vec<&str> = encoded.split(' ').collect();
        assert_eq!(chunks.len(), 3);
        let lens: Vec<usize> = chunks.iter().map(|c| c.trim_matches('"').len()).collect();
        assert_eq!(lens, [255, 255, 90]);
        assert!(chunks.iter().all(|c| c.starts_with('"') && c.ends_with('"')));
    }

    #[test]
    fn txt_quotes_and_backslashes_are_escaped() {
        assert_eq!(encode_txt_value(""), "\"\"");
        assert_eq!(encode_txt_value("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(encode_txt_value("a\\b"), "\"a\\\\b\"");

        // 255 unescaped characters stay one chunk even though escaping adds bytes
        let quoted = "\"".repeat(255);
        let encoded = encode_txt_value(&quoted);
        assert_eq!(encoded, format!("\"{}\"", "\\\"".repeat(255)));

        let mut long = "y".repeat(254);
        long.push('"');
        long.push_str("tail");
        assert_eq!(
            encode_txt_value(&long),
            format!("\"{}\\\"\" \"tail\"", "y".repeat(254))
        );
    }

    #[test]
    fn mx_merge_sorts_by_priority() {
        let value = merge_mx_value(&[
            (20, "mx2.example.org"),
            (10, "mx1.example.org"),
            (30, "mx3.example.org"),
        ]);
        assert_eq!(
            value,
            "10 mx1.example.org\n20 mx2.example.org\n30 mx3.example.org\n"
        );
    }

    #[test]
    fn comment_format() {
        assert_eq!(
            change_comment(RecordSetType::Mx, date()),
            "[MX] Record change initiated on 2024-05-01"
        );
    }

    #[test]
    fn plan_orders_by_zone_type_domain() {
        let store = RecordStore::parse(
            "\
Cwww.example.org:web.example.org:300
+b.example.org:192.0.2.2:300
@example.org::mx.example.org:10:3600
+a.example.org:192.0.2.1:300
'example.org:v=spf1 -all:300
+www.example.net:192.0.2.9:300
",
        );
        let plan = plan_changes(&zones(), &store, date());
        let keys: Vec<(&str, RecordSetType, &str)> = plan
            .upserts
            .iter()
            .map(|u| (u.zone.as_str(), u.record_type, u.domain.as_str()))
            .collect();
        assert_eq!(
            keys,
            [
                ("example.net", RecordSetType::A, "www.example.net"),
                ("example.org", RecordSetType::A, "a.example.org"),
                ("example.org", RecordSetType::A, "b.example.org"),
                ("example.org", RecordSetType::Txt, "example.org"),
                ("example.org", RecordSetType::Mx, "example.org"),
                ("example.org", RecordSetType::Cname, "www.example.org"),
            ]
        );
        assert_eq!(plan.upserts[0].zone_id, "zone-net");
    }

    #[test]
    fn plan_builds_upsert_batches() {
        let store = RecordStore::parse(
            "\
@example.org::mx2.example.org:20:3600
@example.org::mx1.example.org:10:600
'example.org:v=spf1 -all:300
",
        );
        let plan = plan_changes(&zones(), &store, date());
        assert_eq!(plan.len(), 2);

        let txt = &plan.upserts[0].change_batch;
        assert_eq!(
            txt.comment.as_deref(),
            Some("[TXT] Record change initiated on 2024-05-01")
        );
        let rs = &txt.changes[0].record_set;
        assert_eq!(rs.name, "example.org.");
        assert_eq!(rs.values, ["\"v=spf1 -all\""]);

        let mx = &plan.upserts[1].change_batch.changes[0].record_set;
        assert_eq!(mx.ttl, 3600);
        assert_eq!(
            mx.values,
            ["10 mx1.example.org\n20 mx2.example.org\n"]
        );
    }

    #[test]
    fn duplicates_merge_or_last_wins() {
        let store = RecordStore::parse(
            "\
+www.example.org:192.0.2.1:300
+www.example.org:192.0.2.2:300
+www.example.org:192.0.2.1:300
Calias.example.org:one.example.org:300
Calias.example.org:two.example.org:600
",
        );
        let plan = plan_changes(&zones(), &store, date());
        let a = &plan.upserts[0].change_batch.changes[0].record_set;
        assert_eq!(a.values, ["192.0.2.1", "192.0.2.2"]);
        let cname = &plan.upserts[1].change_batch.changes[0].record_set;
        assert_eq!(cname.values, ["two.example.org"]);
        assert_eq!(cname.ttl, 600);
    }

    #[test]
    fn unmatched_ns_and_zoneless_entries() {
        let store = RecordStore::parse(
            "\
+www.example.com:192.0.2.1:300
+example.org.de:192.0.2.2:300
&example.org::ns1.example.org
",
        );
        let mut zones = zones();
        zones.push(ManagedZone::named("example.com"));
        let plan = plan_changes(&zones, &store, date());
        assert!(plan.is_empty());
        assert_eq!(plan.unmatched, 2);
    }

    #[test]
    fn ambiguous_zones_are_reported() {
        let store = RecordStore::parse("+www.example.org:192.0.2.1:300\n+www.example.net:192.0.2.2:300\n");
        let mut zones = zones();
        zones.push(ManagedZone {
            name: "example.org".to_string(),
            id: Some("zone-org-2".to_string()),
        });
        let plan = plan_changes(&zones, &store, date());
        assert_eq!(plan.ambiguous, ["www.example.org"]);
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn planning_is_deterministic() {
        let store = RecordStore::parse("+a.example.org:192.0.2.1:300\n'example.org:x:300\n");
        assert_eq!(
            plan_changes(&zones(), &store, date()),
            plan_changes(&zones(), &store, date())
        );
    }
}
