//! Decode diagnostics.
//!
//! The legacy decoder kept a process-wide tally of record tags it had no
//! table for. Here the tally is an explicit context passed into decode
//! calls: concurrent batches each own one and merge afterwards. Purely
//! informational -- it never changes what a decode returns.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Occurrences of tags that matched no registered variant.
    pub unknown_tags: BTreeMap<String, u64>,
    /// Records or links that degraded to a raw-text fallback, keyed by kind.
    pub failed_records: BTreeMap<String, u64>,
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    pub fn unknown_tag(&mut self, tag: &str) {
        *self.unknown_tags.entry(tag.to_owned()).or_insert(0) += 1;
    }

    pub fn failed_record(&mut self, kind: &str) {
        *self.failed_records.entry(kind.to_owned()).or_insert(0) += 1;
    }

    /// Fold another context into this one; counts are additive.
    pub fn merge(&mut self, other: Diagnostics) {
        for (tag, n) in other.unknown_tags {
            *self.unknown_tags.entry(tag).or_insert(0) += n;
        }
        for (kind, n) in other.failed_records {
            *self.failed_records.entry(kind).or_insert(0) += n;
        }
    }

    pub fn is_clean(&self) -> bool {
        self.unknown_tags.is_empty() && self.failed_records.is_empty()
    }
}
