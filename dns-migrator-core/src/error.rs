//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

use dns_migrator_provider::RecordSetType;

// Re-export library error type
pub use dns_migrator_provider::ProviderError;

/// Why a tinydns line was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParseErrorKind {
    /// Fewer fields than the tag's mapping reads.
    #[error("expected at least {expected} fields, found {found}")]
    MissingFields { expected: usize, found: usize },

    /// A tag that requires an exact field count got a different one.
    #[error("expected exactly {expected} fields, found {found}")]
    UnexpectedFieldCount { expected: usize, found: usize },

    /// The domain field is empty.
    #[error("empty domain name")]
    EmptyDomain,

    /// TTL is not a non-negative integer.
    #[error("invalid TTL '{value}'")]
    InvalidTtl { value: String },

    /// MX priority is not a 16-bit unsigned integer.
    #[error("invalid MX priority '{value}'")]
    InvalidPriority { value: String },
}

/// A malformed source line. The line is skipped, parsing continues.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("line {line} ('{tag}'): {kind}")]
pub struct ParseError {
    /// 1-based line number in the source file.
    pub line: usize,
    /// Type tag of the line.
    pub tag: char,
    /// What was wrong with it.
    pub kind: ParseErrorKind,
}

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Malformed tinydns line
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Several managed zones share the most specific suffix of a domain
    #[error("Ambiguous zone match for '{domain}': {}", .zones.join(", "))]
    ZoneMatchAmbiguity { domain: String, zones: Vec<String> },

    /// The provider refused one domain's change batch
    #[error("Change batch rejected for {record_type} {domain} in zone {zone}: {reason}")]
    ChangeBatch {
        zone: String,
        domain: String,
        record_type: RecordSetType,
        reason: String,
    },

    /// Reading the source file failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (bad input data, missing zone, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Parse(_) | Self::ZoneMatchAmbiguity { .. } | Self::Validation(_) => true,
            Self::Provider(e) => e.is_expected(),
            Self::ChangeBatch { .. } | Self::Io(_) => false,
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
