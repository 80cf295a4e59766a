//! tinydns data file parser
//!
//! Each line starts with a one-character type tag followed by `:`-separated
//! fields. Only `+`, `'`, `@`, `C` and `&` are read; every other tag
//! (comments, SOA, PTR, generic records, ...) is skipped without error.
//! A malformed line is recorded in [`RecordStore::skipped`] and parsing
//! continues with the next line.

use std::collections::BTreeMap;
use std::path::Path;

use dns_migrator_provider::RecordSetType;

use crate::error::{CoreError, CoreResult, ParseError, ParseErrorKind};
use crate::types::DnsRecord;

/// TTL used by tinydns when the field is left empty.
pub const TINYDNS_DEFAULT_TTL: u32 = 86_400;

const FIELD_DELIMITER: char = ':';

/// Immutable, queryable collection of parsed records.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<DnsRecord>,
    skipped: Vec<ParseError>,
}

impl RecordStore {
    /// Parse the full text of a tinydns data file.
    pub fn parse(raw: &str) -> Self {
        let mut store = Self::default();

        for (index, line) in raw.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let mut chars = line.chars();
            let Some(tag) = chars.next() else {
                continue;
            };
            let fields: Vec<&str> = chars.as_str().split(FIELD_DELIMITER).collect();

            match parse_line(tag, &fields) {
                Ok(Some(record)) => store.records.push(record),
                Ok(None) => {}
                Err(kind) => {
                    let error = ParseError {
                        line: index + 1,
                        tag,
                        kind,
                    };
                    store.skipped.push(error.clone());
                    log::warn!("Skipping tinydns line: {}", CoreError::from(error));
                }
            }
        }

        log::debug!(
            "Parsed {} record(s), skipped {} line(s)",
            store.records.len(),
            store.skipped.len()
        );
        store
    }

    /// Read and parse a tinydns data file.
    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Io(format!("{}: {e}", path.display())))?;
        Ok(Self::parse(&raw))
    }

    /// Build a store from already-typed records.
    pub fn from_records(records: Vec<DnsRecord>) -> Self {
        Self {
            records,
            skipped: Vec::new(),
        }
    }

    /// All records in file order.
    pub fn records(&self) -> &[DnsRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lines that were rejected, in file order.
    pub fn skipped(&self) -> &[ParseError] {
        &self.skipped
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Records of one type grouped by domain, entries in file order.
    pub fn by_type(&self, record_type: RecordSetType) -> BTreeMap<&str, Vec<&DnsRecord>> {
        let mut grouped: BTreeMap<&str, Vec<&DnsRecord>> = BTreeMap::new();
        for record in self
            .records
            .iter()
            .filter(|r| r.record_type() == record_type)
        {
            grouped.entry(record.domain()).or_default().push(record);
        }
        grouped
    }

    /// MX records grouped by domain, sorted by ascending priority.
    ///
    /// The sort is stable: equal priorities keep file order.
    pub fn mx_groups(&self) -> BTreeMap<&str, Vec<&DnsRecord>> {
        let mut grouped = self.by_type(RecordSetType::Mx);
        for entries in grouped.values_mut() {
            entries.sort_by_key(|r| match r {
                DnsRecord::Mx { priority, .. } => *priority,
                _ => u16::MAX,
            });
        }
        grouped
    }
}

/// Map one line's fields to a record. `Ok(None)` means the tag is not imported.
fn parse_line(tag: char, fields: &[&str]) -> Result<Option<DnsRecord>, ParseErrorKind> {
    let record = match tag {
        '+' => {
            require_fields(fields, 3)?;
            DnsRecord::A {
                domain: parse_domain(fields[0])?,
                address: fields[1].to_string(),
                ttl: parse_ttl(fields[2])?,
            }
        }
        '\'' => {
            if fields.len() != 3 {
                return Err(ParseErrorKind::UnexpectedFieldCount {
                    expected: 3,
                    found: fields.len(),
                });
            }
            DnsRecord::Txt {
                domain: parse_domain(fields[0])?,
                text: decode_octal_escapes(fields[1]),
                ttl: parse_ttl(fields[2])?,
            }
        }
        '@' => {
            require_fields(fields, 5)?;
            DnsRecord::Mx {
                domain: parse_domain(fields[0])?,
                mail_server: fields[2].to_string(),
                priority: parse_priority(fields[3])?,
                ttl: parse_ttl(fields[4])?,
            }
        }
        'C' => {
            require_fields(fields, 3)?;
            DnsRecord::Cname {
                domain: parse_domain(fields[0])?,
                target: fields[1].to_string(),
                ttl: parse_ttl(fields[2])?,
            }
        }
        '&' => {
            require_fields(fields, 3)?;
            DnsRecord::Ns {
                domain: parse_domain(fields[0])?,
                name_server: fields[2].to_string(),
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(record))
}

/// tinydns 的 `\NNN` 八进制转义（如 `\072` 表示 `:`）
///
/// A backslash not followed by three octal digits is kept as is.
fn decode_octal_escapes(field: &str) -> String {
    if !field.contains('\\') {
        return field.to_string();
    }
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            if let Some(byte) = bytes.get(i + 1..i + 4).and_then(octal_byte) {
                out.push(byte);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn octal_byte(digits: &[u8]) -> Option<u8> {
    let value = digits.iter().try_fold(0u16, |acc, &d| match d {
        b'0'..=b'7' => Some(acc * 8 + u16::from(d - b'0')),
        _ => None,
    })?;
    u8::try_from(value).ok()
}

fn require_fields(fields: &[&str], expected: usize) -> Result<(), ParseErrorKind> {
    if fields.len() < expected {
        return Err(ParseErrorKind::MissingFields {
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

fn parse_domain(field: &str) -> Result<String, ParseErrorKind> {
    let domain = field.trim().trim_end_matches('.');
    if domain.is_empty() {
        return Err(ParseErrorKind::EmptyDomain);
    }
    Ok(domain.to_string())
}

fn parse_ttl(field: &str) -> Result<u32, ParseErrorKind> {
    let field = field.trim();
    if field.is_empty() {
        return Ok(TINYDNS_DEFAULT_TTL);
    }
    field.parse().map_err(|_| ParseErrorKind::InvalidTtl {
        value: field.to_string(),
    })
}

fn parse_priority(field: &str) -> Result<u16, ParseErrorKind> {
    let field = field.trim();
    if field.is_empty() {
        return Ok(0);
    }
    field.parse().map_err(|_| ParseErrorKind::InvalidPriority {
        value: field.to_string(),
    })
}
