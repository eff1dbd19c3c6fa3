use tracing::{debug, info_span};

use super::global::{BandedGlobal, GlobalAligner};
use crate::error::{HivevoError, Result};
use crate::store::ReferenceStore;
use crate::util::{dna, GAP};

/// 比对列 -> 未含 gap 的累计位置减一，单调不减
fn cumulative_positions(aligned: &[u8]) -> Vec<i64> {
    let mut count = -1i64;
    aligned
        .iter()
        .map(|&c| {
            if c != GAP {
                count += 1;
            }
            count
        })
        .collect()
}

// searchsorted(side="left") 于源坐标，再读取目标坐标；越界返回 -1
fn lookup(from: &[i64], to: &[i64], pos: i64) -> i64 {
    let ii = from.partition_point(|&c| c < pos);
    to.get(ii).copied().unwrap_or(-1)
}

/// Translates positions between two reference coordinate systems through
/// one global alignment of the two reference sequences.
#[derive(Debug, Clone)]
pub struct ReferenceTranslator {
    ref1: String,
    ref2: String,
    count1: Vec<i64>,
    count2: Vec<i64>,
}

impl ReferenceTranslator {
    pub fn new<S: ReferenceStore + ?Sized>(store: &S, ref1: &str, ref2: &str) -> Result<Self> {
        Self::with_aligner(store, ref1, ref2, &BandedGlobal::default())
    }

    pub fn with_aligner<S, A>(store: &S, ref1: &str, ref2: &str, aligner: &A) -> Result<Self>
    where
        S: ReferenceStore + ?Sized,
        A: GlobalAligner + ?Sized,
    {
        let _span = info_span!("reference_translator", ref1, ref2).entered();
        let seq1 = dna::normalize_seq(&store.sequence(ref1)?.seq);
        let seq2 = dna::normalize_seq(&store.sequence(ref2)?.seq);
        let aln = aligner.align(&seq1, &seq2);
        debug!(score = aln.score, columns = aln.aligned_a.len(), "references aligned");
        Self::from_aligned(ref1, ref2, &aln.aligned_a, &aln.aligned_b)
    }

    /// Builds the translator from an existing pairwise alignment.
    pub fn from_aligned(ref1: &str, ref2: &str, ali1: &[u8], ali2: &[u8]) -> Result<Self> {
        if ali1.len() != ali2.len() {
            return Err(HivevoError::invalid_data(format!(
                "pairwise alignment rows differ in length ({} vs {})",
                ali1.len(),
                ali2.len()
            )));
        }
        Ok(Self {
            ref1: ref1.to_string(),
            ref2: ref2.to_string(),
            count1: cumulative_positions(ali1),
            count2: cumulative_positions(ali2),
        })
    }

    pub fn ref1(&self) -> &str {
        &self.ref1
    }

    pub fn ref2(&self) -> &str {
        &self.ref2
    }

    /// Maps `pos` (0-based, in `from_ref` coordinates) to the other reference.
    ///
    /// Returns `-1` as the position when `pos` lies past the end of the
    /// alignment. Positions falling into an insertion of `from_ref` map to
    /// the last residue of the other reference before that insertion.
    pub fn translate(&self, pos: i64, from_ref: &str) -> Result<(&str, i64)> {
        let (from, to, to_name) = if from_ref == self.ref1 {
            (&self.count1, &self.count2, self.ref2.as_str())
        } else if from_ref == self.ref2 {
            (&self.count2, &self.count1, self.ref1.as_str())
        } else {
            return Err(HivevoError::UnknownReference {
                name: from_ref.to_string(),
                ref1: self.ref1.clone(),
                ref2: self.ref2.clone(),
            });
        };

        Ok((to_name, lookup(from, to, pos)))
    }

    /// Translates from the first reference.
    pub fn translate_default(&self, pos: i64) -> (&str, i64) {
        (self.ref2.as_str(), lookup(&self.count1, &self.count2, pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::Annotation;
    use crate::store::{MemoryStore, ReferenceRecord};

    fn record(name: &str, seq: &[u8]) -> ReferenceRecord {
        ReferenceRecord { name: name.into(), seq: seq.to_vec(), annotation: Annotation::new() }
    }

    #[test]
    fn cumulative_counts() {
        assert_eq!(cumulative_positions(b"-AC--G"), vec![-1, 0, 1, 1, 1, 2]);
    }

    #[test]
    fn identical_references_map_to_themselves() {
        let seq = b"ACGTTGCAAGGCTTACCGAT";
        let store = MemoryStore::new().with_reference(record("HXB2", seq)).with_reference(record("NL4-3", seq));
        let t = ReferenceTranslator::new(&store, "HXB2", "NL4-3").unwrap();
        assert_eq!(t.translate(0, "HXB2").unwrap(), ("NL4-3", 0));
        for pos in 0..seq.len() as i64 {
            assert_eq!(t.translate(pos, "NL4-3").unwrap(), ("HXB2", pos));
        }
        assert_eq!(t.translate_default(7), ("NL4-3", 7));
    }

    #[test]
    fn insertion_shifts_downstream_positions() {
        // ref1 carries two extra bases at 4..6
        let t = ReferenceTranslator::from_aligned("A", "B", b"ACGTTTGCA", b"ACGT--GCA").unwrap();
        assert_eq!(t.translate(3, "A").unwrap(), ("B", 3));
        assert_eq!(t.translate(6, "A").unwrap(), ("B", 4));
        assert_eq!(t.translate(4, "B").unwrap(), ("A", 6));
        // inside the insertion: last B residue before it
        assert_eq!(t.translate(4, "A").unwrap(), ("B", 3));
        assert_eq!(t.translate(5, "A").unwrap(), ("B", 3));
    }

    #[test]
    fn round_trip_outside_insertions() {
        let t = ReferenceTranslator::from_aligned("A", "B", b"AC-GTTAC", b"ACCG--AC").unwrap();
        for pos in [0, 1, 2, 5, 6] {
            let (other, mapped) = t.translate(pos, "A").unwrap();
            assert_eq!(t.translate(mapped, other).unwrap(), ("A", pos));
        }
    }

    #[test]
    fn past_the_end_is_minus_one() {
        let t = ReferenceTranslator::from_aligned("A", "B", b"ACGTAA", b"ACGT--").unwrap();
        assert_eq!(t.translate(6, "A").unwrap(), ("B", -1));
        assert_eq!(t.translate(100, "B").unwrap(), ("A", -1));
        assert_eq!(t.translate_default(6), ("B", -1));
    }

    #[test]
    fn unknown_reference_is_an_error() {
        let t = ReferenceTranslator::from_aligned("HXB2", "NL4-3", b"AC", b"AC").unwrap();
        let err = t.translate(0, "SIVmac").unwrap_err();
        assert!(matches!(err, HivevoError::UnknownReference { ref name, .. } if name == "SIVmac"));
    }

    #[test]
    fn mismatched_rows_are_rejected() {
        assert!(ReferenceTranslator::from_aligned("A", "B", b"ACG", b"AC").is_err());
    }
}
