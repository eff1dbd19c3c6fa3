use std::collections::HashMap;
use std::path::PathBuf;

use super::{AlignmentKey, ReferenceRecord, ReferenceStore};
use crate::error::{HivevoError, Result};
use crate::stats::{Alignment, FrequencyMatrix};

/// In-memory store; lookups of absent keys fail like missing files would.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    references: HashMap<String, ReferenceRecord>,
    alignments: HashMap<AlignmentKey, Alignment>,
    frequencies: HashMap<(String, String), FrequencyMatrix>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference(mut self, record: ReferenceRecord) -> Self {
        self.references.insert(record.name.clone(), record);
        self
    }

    pub fn with_alignment(mut self, key: AlignmentKey, aln: Alignment) -> Self {
        self.alignments.insert(key, aln);
        self
    }

    pub fn with_frequencies(mut self, subtype: &str, refname: &str, af: FrequencyMatrix) -> Self {
        self.frequencies.insert((subtype.to_string(), refname.to_string()), af);
        self
    }
}

fn missing(what: String) -> HivevoError {
    HivevoError::data_load(PathBuf::from(what), "not present in memory store")
}

impl ReferenceStore for MemoryStore {
    fn sequence(&self, refname: &str) -> Result<ReferenceRecord> {
        self.references
            .get(refname)
            .cloned()
            .ok_or_else(|| missing(format!("reference:{}", refname)))
    }

    fn alignment(&self, key: &AlignmentKey) -> Result<Alignment> {
        self.alignments.get(key).cloned().ok_or_else(|| {
            missing(format!("alignment:{}.{}.{}@{}", key.region, key.subtype, key.kind, key.refname))
        })
    }

    fn frequencies(&self, subtype: &str, refname: &str) -> Result<FrequencyMatrix> {
        self.frequencies
            .get(&(subtype.to_string(), refname.to_string()))
            .cloned()
            .ok_or_else(|| missing(format!("frequencies:{}@{}", subtype, refname)))
    }
}
