//! Request fingerprints used as cache keys.
//!
//! A fingerprint is a comma-separated list of segments. Segments that are
//! secret or unbounded (bearer tokens, full request paths) are replaced by
//! their SHA-256 hex digest; identifiers are kept verbatim so whole groups of
//! keys can be removed by prefix.

use sha2::{Digest, Sha256};

/// SHA-256 of `input` as lowercase hex.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Builds a fingerprint one segment at a time.
///
/// ```
/// use respcache_core::cache::hash::Fingerprint;
///
/// let key = Fingerprint::new()
///     .hashed("secret-token")
///     .segment("app123")
///     .segment("tbl456")
///     .build();
/// assert!(key.ends_with(",app123,tbl456"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fingerprint {
    segments: Vec<String>,
}

impl Fingerprint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a verbatim segment.
    pub fn segment(mut self, value: impl Into<String>) -> Self {
        self.segments.push(value.into());
        self
    }

    /// Append the SHA-256 digest of `value`.
    pub fn hashed(self, value: &str) -> Self {
        self.segment(sha256_hex(value))
    }

    /// Append a segment only when present. Absent segments are skipped rather
    /// than left empty.
    pub fn optional(self, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.segment(v),
            None => self,
        }
    }

    /// The full key.
    pub fn build(&self) -> String {
        self.segments.join(",")
    }

    /// The key followed by a separator, for matching everything nested under
    /// these segments without also matching siblings that share a textual
    /// prefix (`tbl1` vs `tbl10`).
    pub fn prefix(&self) -> String {
        let mut prefix = self.build();
        prefix.push(',');
        prefix
    }
}

/// Fingerprint for a request against a tabular data API.
///
/// Layout: `sha256(token),base,table,record,sha256(path)`, with absent parts
/// omitted.
pub fn request_key(token: &str, base: &str, table: Option<&str>, record: Option<&str>, path: &str) -> String {
    Fingerprint::new()
        .hashed(token)
        .segment(base)
        .optional(table)
        .optional(record)
        .hashed(path)
        .build()
}
