//! BIND zone file rendering

use std::fmt::Write;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::record_store::RecordStore;
use crate::types::DnsRecord;
use crate::zone_matcher::{RelativeName, ZoneMatcher};

/// Width of the owner-name column.
const NAME_COLUMN_WIDTH: usize = 45;

const SOA_REFRESH: u32 = 14_400;
const SOA_RETRY: u32 = 3_600;
const SOA_EXPIRE: u32 = 1_048_576;
const SOA_MINIMUM: u32 = 2_560;

/// Static zone file settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindZoneOptions {
    /// Name servers written as the zone's NS lines; the first is the SOA primary.
    pub name_servers: Vec<String>,
    /// SOA mailbox domain. Defaults to `hostmaster.<zone>`.
    pub hostmaster: Option<String>,
    /// `$TTL` directive value.
    pub default_ttl: u32,
}

impl Default for BindZoneOptions {
    fn default() -> Self {
        Self {
            name_servers: vec![
                "ns1.artofliving.org".to_string(),
                "ns2.artofliving.org".to_string(),
            ],
            hostmaster: None,
            default_ttl: 3_600,
        }
    }
}

impl BindZoneOptions {
    /// 检查 NS 列表和 `$TTL`
    pub fn validate(&self) -> CoreResult<()> {
        if self.name_servers.is_empty() {
            return Err(CoreError::Validation(
                "At least one name server is required".to_string(),
            ));
        }
        if let Some(blank) = self.name_servers.iter().position(|ns| ns.trim().is_empty()) {
            return Err(CoreError::Validation(format!(
                "Name server #{} is empty",
                blank + 1
            )));
        }
        if self.default_ttl == 0 {
            return Err(CoreError::Validation(
                "Default TTL must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// One rendered zone file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedZone {
    pub zone: String,
    pub text: String,
    /// Number of record lines below the SOA/NS header.
    pub record_lines: usize,
}

/// Formats a zone's records as BIND zone file text.
///
/// The renderer only produces text; writing files is up to the caller.
pub struct BindZoneRenderer {
    options: BindZoneOptions,
}

impl BindZoneRenderer {
    #[must_use]
    pub fn new(options: BindZoneOptions) -> Self {
        Self { options }
    }

    /// Render `zone` with today's date in the serial.
    pub fn render(&self, zone: &str, records: &[DnsRecord]) -> String {
        self.render_on(zone, records, Local::now().date_naive())
    }

    /// Render `zone` with an explicit serial date.
    ///
    /// Records outside the zone are ignored; the rest keep their input order.
    pub fn render_on(&self, zone: &str, records: &[DnsRecord], date: NaiveDate) -> String {
        self.render_counted(zone, records, date).0
    }

    /// Render every zone in `zones` from the store, serial dated today.
    pub fn render_zones(&self, zones: &[String], store: &RecordStore) -> Vec<RenderedZone> {
        let date = Local::now().date_naive();
        zones
            .iter()
            .map(|zone| {
                let zone = zone.trim_end_matches('.');
                let (text, record_lines) = self.render_counted(zone, store.records(), date);
                log::info!("Rendered zone {zone} with {record_lines} record line(s)");
                RenderedZone {
                    zone: zone.to_string(),
                    text,
                    record_lines,
                }
            })
            .collect()
    }

    fn render_counted(&self, zone: &str, records: &[DnsRecord], date: NaiveDate) -> (String, usize) {
        let zone = zone.trim_end_matches('.');
        let mut out = self.header(zone, date);
        let mut lines = 0;

        for record in records {
            let Some(relative) = ZoneMatcher::relative_name(record.domain(), zone) else {
                continue;
            };
            if let Some(line) = record_line(record, &relative) {
                log::debug!("Importing {record}");
                out.push_str(&line);
                out.push('\n');
                lines += 1;
            }
        }
        (out, lines)
    }

    /// `$TTL`, SOA stanza and NS lines.
    fn header(&self, zone: &str, date: NaiveDate) -> String {
        let primary = self
            .options
            .name_servers
            .first()
            .map_or_else(|| format!("ns1.{zone}."), |ns| fqdn(ns));
        let mailbox = self
            .options
            .hostmaster
            .as_deref()
            .map_or_else(|| format!("hostmaster.{zone}."), fqdn);
        let serial = format!("{}01", date.format("%Y%m%d"));

        let mut out = String::new();
        let _ = writeln!(out, "$TTL {}", self.options.default_ttl);
        let _ = writeln!(out, "@  IN  SOA {primary} {mailbox}     (");
        let _ = writeln!(out, "        {serial:<14} ; serial");
        let _ = writeln!(out, "        {SOA_REFRESH:<14} ; refresh");
        let _ = writeln!(out, "        {SOA_RETRY:<14} ; retry");
        let _ = writeln!(out, "        {SOA_EXPIRE:<14} ; expire");
        let _ = writeln!(out, "        {SOA_MINIMUM:<14} ; minimum");
        let _ = writeln!(out, ")");
        for ns in &self.options.name_servers {
            let _ = writeln!(out, "{:<NAME_COLUMN_WIDTH$} IN  NS    {}", " ", fqdn(ns));
        }
        out
    }
}

/// One zone file line, or `None` for record kinds that are not rendered (NS).
fn record_line(record: &DnsRecord, relative: &RelativeName) -> Option<String> {
    let owner = match relative {
        RelativeName::Apex => fqdn(record.domain()),
        RelativeName::Label(label) => label.clone(),
    };
    let line = match record {
        DnsRecord::A { address, .. } => {
            format!("{owner:<NAME_COLUMN_WIDTH$} IN  A     {address}")
        }
        DnsRecord::Cname { target, .. } => {
            format!("{owner:<NAME_COLUMN_WIDTH$} IN  CNAME {}", fqdn(target))
        }
        DnsRecord::Txt { text, .. } => {
            format!("{owner:<NAME_COLUMN_WIDTH$} IN  TXT {}", quote_txt(text))
        }
        DnsRecord::Mx {
            domain,
            mail_server,
            priority,
            ..
        } => format!(
            "{:<NAME_COLUMN_WIDTH$} IN  MX    {priority:<5} {}",
            fqdn(domain),
            fqdn(mail_server)
        ),
        DnsRecord::Ns { .. } => return None,
    };
    Some(line)
}

fn fqdn(name: &str) -> String {
    format!("{}.", name.trim_end_matches('.'))
}

/// Double-quoted character-string.
///
/// `"` and `\` get a backslash; control characters become `\DDD` (decimal).
fn quote_txt(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            c if c.is_ascii_control() => {
                let _ = write!(quoted, "\\{:03}", u32::from(c));
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
