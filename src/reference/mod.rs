//! Reference objects: per-site frequencies, entropy and consensus of a
//! subtype alignment mapped onto a reference, with region-scoped queries.

pub mod aminoacid;
pub mod annotation;
pub mod nucleotide;

use tracing::debug;

use crate::error::{HivevoError, Result};
use crate::stats::{self, Alignment, EntropyBucket, FrequencyMatrix};
use crate::util::Alphabet;

pub use aminoacid::HivReferenceAminoacid;
pub use annotation::{Annotation, RegionFeature, Segment};
pub use nucleotide::HivReference;

/// 参考坐标选择器。
///
/// `ColumnMajor` 的每一行首列为参考坐标，其余列（患者坐标等）在此忽略。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSelector {
    Direct(Vec<usize>),
    ColumnMajor(Vec<Vec<usize>>),
}

impl IndexSelector {
    /// Builds a selector from a flat row-major array and its shape.
    pub fn from_array(shape: &[usize], data: &[usize]) -> Result<Self> {
        let unsupported = || HivevoError::UnsupportedShape { shape: shape.to_vec() };
        match *shape {
            [n] if data.len() == n => Ok(Self::Direct(data.to_vec())),
            [rows, cols] if cols > 0 && data.len() == rows * cols => {
                Ok(Self::ColumnMajor(data.chunks(cols).map(<[usize]>::to_vec).collect()))
            }
            _ => Err(unsupported()),
        }
    }

    /// Reference positions in selector order.
    pub fn positions(&self) -> Result<Vec<usize>> {
        match self {
            Self::Direct(ix) => Ok(ix.clone()),
            Self::ColumnMajor(rows) => rows
                .iter()
                .map(|r| {
                    r.first().copied().ok_or_else(|| HivevoError::UnsupportedShape {
                        shape: vec![rows.len(), 0],
                    })
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Direct(ix) => ix.len(),
            Self::ColumnMajor(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 由频率矩阵派生的全部位点统计量，构建后不可变
#[derive(Debug, Clone)]
pub struct SiteProfile {
    alphabet: Alphabet,
    frequencies: FrequencyMatrix,
    entropy: Vec<f64>,
    consensus_indices: Vec<usize>,
    consensus: Vec<u8>,
}

impl SiteProfile {
    pub fn from_alignment(aln: &Alignment, alphabet: Alphabet) -> Self {
        let af = stats::compute_frequencies(aln, &alphabet);
        Self::derive(af, alphabet)
    }

    /// Wraps a precomputed matrix; its row count must match the alphabet.
    pub fn from_frequencies(af: FrequencyMatrix, alphabet: Alphabet) -> Result<Self> {
        if af.num_rows() != alphabet.counted_len() {
            return Err(HivevoError::invalid_data(format!(
                "frequency matrix has {} rows, alphabet counts {} symbols",
                af.num_rows(),
                alphabet.counted_len()
            )));
        }
        Ok(Self::derive(af, alphabet))
    }

    fn derive(frequencies: FrequencyMatrix, alphabet: Alphabet) -> Self {
        let consensus_indices = stats::consensus_indices(&frequencies);
        let consensus = stats::consensus_sequence(&consensus_indices, &alphabet);
        let entropy = stats::compute_entropy(&frequencies);
        debug!(positions = frequencies.num_positions(), "site profile derived");
        Self { alphabet, frequencies, entropy, consensus_indices, consensus }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn len(&self) -> usize {
        self.frequencies.num_positions()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn gather<T: Copy>(&self, values: &[T], sel: &IndexSelector) -> Result<Vec<T>> {
        sel.positions()?
            .into_iter()
            .map(|p| {
                values
                    .get(p)
                    .copied()
                    .ok_or(HivevoError::PositionOutOfRange { position: p, len: values.len() })
            })
            .collect()
    }
}

/// Queries shared by the nucleotide and amino-acid references.
pub trait SiteQueries {
    fn profile(&self) -> &SiteProfile;

    fn frequencies(&self) -> &FrequencyMatrix {
        &self.profile().frequencies
    }

    fn entropy(&self) -> &[f64] {
        &self.profile().entropy
    }

    fn consensus(&self) -> &[u8] {
        &self.profile().consensus
    }

    fn consensus_indices(&self) -> &[usize] {
        &self.profile().consensus_indices
    }

    /// `true` where the gap frequency is below `threshold` (0.05 in hivevo).
    fn get_ungapped(&self, threshold: f64) -> Vec<bool> {
        let p = self.profile();
        match p.alphabet.gap_row() {
            Some(row) => p.frequencies.row(row).iter().map(|&f| f < threshold).collect(),
            None => vec![true; p.len()],
        }
    }

    fn get_entropy_quantiles(&self, q: usize) -> Result<Vec<EntropyBucket>> {
        stats::entropy_quantiles(self.entropy(), q)
    }

    fn get_entropy_in_patient_region(&self, sel: &IndexSelector) -> Result<Vec<f64>> {
        let p = self.profile();
        p.gather(&p.entropy, sel)
    }

    fn get_consensus_in_patient_region(&self, sel: &IndexSelector) -> Result<Vec<u8>> {
        let p = self.profile();
        p.gather(&p.consensus, sel)
    }

    fn get_consensus_indices_in_patient_region(&self, sel: &IndexSelector) -> Result<Vec<usize>> {
        let p = self.profile();
        p.gather(&p.consensus_indices, sel)
    }
}
