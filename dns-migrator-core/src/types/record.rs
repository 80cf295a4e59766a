//! tinydns record model

use std::fmt;

use serde::{Deserialize, Serialize};

use dns_migrator_provider::RecordSetType;

/// One record read from the tinydns data file.
///
/// Domain names never carry a trailing dot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum DnsRecord {
    /// `+fqdn:ip:ttl`
    A {
        domain: String,
        address: String,
        ttl: u32,
    },
    /// `'fqdn:text:ttl`
    Txt { domain: String, text: String, ttl: u32 },
    /// `Cfqdn:target:ttl`
    Cname {
        domain: String,
        target: String,
        ttl: u32,
    },
    /// `@fqdn:ip:mail_server:priority:ttl`
    Mx {
        domain: String,
        #[serde(rename = "mailServer")]
        mail_server: String,
        priority: u16,
        ttl: u32,
    },
    /// `&fqdn:ip:name_server`
    Ns {
        domain: String,
        #[serde(rename = "nameServer")]
        name_server: String,
    },
}

impl DnsRecord {
    /// Owner name of the record.
    pub fn domain(&self) -> &str {
        match self {
            Self::A { domain, .. }
            | Self::Txt { domain, .. }
            | Self::Cname { domain, .. }
            | Self::Mx { domain, .. }
            | Self::Ns { domain, .. } => domain,
        }
    }

    /// TTL in seconds. NS lines carry none.
    pub fn ttl(&self) -> Option<u32> {
        match self {
            Self::A { ttl, .. }
            | Self::Txt { ttl, .. }
            | Self::Cname { ttl, .. }
            | Self::Mx { ttl, .. } => Some(*ttl),
            Self::Ns { .. } => None,
        }
    }

    pub fn record_type(&self) -> RecordSetType {
        match self {
            Self::A { .. } => RecordSetType::A,
            Self::Txt { .. } => RecordSetType::Txt,
            Self::Cname { .. } => RecordSetType::Cname,
            Self::Mx { .. } => RecordSetType::Mx,
            Self::Ns { .. } => RecordSetType::Ns,
        }
    }
}

impl fmt::Display for DnsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A {
                domain,
                address,
                ttl,
            } => write!(f, "A record {domain} -> ({address}, {ttl})"),
            Self::Txt { domain, text, ttl } => write!(f, "TXT record {domain} -> ({text}, {ttl})"),
            Self::Cname {
                domain,
                target,
                ttl,
            } => write!(f, "CNAME record {domain} -> ({target}, {ttl})"),
            Self::Mx {
                domain,
                mail_server,
                priority,
                ttl,
            } => write!(f, "MX record {domain} -> ({mail_server}, {priority}, {ttl})"),
            Self::Ns {
                domain,
                name_server,
            } => write!(f, "NS record {domain} -> {name_server}"),
        }
    }
}
