//! Reference data store: raw sequences, alignments and precomputed frequencies.

pub mod fs;
pub mod memory;

use std::fmt;

use crate::error::Result;
use crate::reference::annotation::Annotation;
use crate::stats::{Alignment, FrequencyMatrix};

pub use fs::FsStore;
pub use memory::MemoryStore;

pub const GENOMEWIDE: &str = "genomewide";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeqKind {
    Nucleotide,
    AminoAcid,
}

impl fmt::Display for SeqKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeqKind::Nucleotide => write!(f, "nuc"),
            SeqKind::AminoAcid => write!(f, "aa"),
        }
    }
}

/// Identifies one subtype alignment pairwise-mapped to a reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlignmentKey {
    pub subtype: String,
    pub refname: String,
    pub region: String,
    pub kind: SeqKind,
}

impl AlignmentKey {
    pub fn genomewide(subtype: &str, refname: &str) -> Self {
        Self {
            subtype: subtype.to_string(),
            refname: refname.to_string(),
            region: GENOMEWIDE.to_string(),
            kind: SeqKind::Nucleotide,
        }
    }

    pub fn aminoacid(subtype: &str, refname: &str, region: &str) -> Self {
        Self {
            subtype: subtype.to_string(),
            refname: refname.to_string(),
            region: region.to_string(),
            kind: SeqKind::AminoAcid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRecord {
    pub name: String,
    pub seq: Vec<u8>,
    pub annotation: Annotation,
}

pub trait ReferenceStore {
    fn sequence(&self, refname: &str) -> Result<ReferenceRecord>;

    fn alignment(&self, key: &AlignmentKey) -> Result<Alignment>;

    fn frequencies(&self, subtype: &str, refname: &str) -> Result<FrequencyMatrix>;
}
