//! Annotation map: region name → feature segments, and region extraction.

use std::collections::BTreeMap;

use crate::error::{HivevoError, Result};
use crate::util::dna;

/// Half-open `[start, end)` on the reference, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub reverse: bool,
}

impl Segment {
    pub fn forward(start: usize, end: usize) -> Self {
        Self { start, end, reverse: false }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 一个注释特征。segments 已按抽取顺序排列：
/// complement(join(a,b)) 存为 [b(rev), a(rev)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionFeature {
    pub kind: String,
    pub segments: Vec<Segment>,
}

impl RegionFeature {
    pub fn new(kind: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self { kind: kind.into(), segments }
    }

    pub fn len(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_bounds(&self, ref_len: usize) -> Result<()> {
        match self.segments.iter().find(|s| s.end > ref_len || s.start > s.end) {
            Some(s) => Err(HivevoError::invalid_data(format!(
                "feature segment {}..{} does not fit a reference of length {}",
                s.start, s.end, ref_len
            ))),
            None => Ok(()),
        }
    }

    /// Extracts the feature's sequence; minus-strand segments are reverse complemented.
    pub fn extract(&self, seq: &[u8]) -> Result<Vec<u8>> {
        self.check_bounds(seq.len())?;
        let mut out = Vec::with_capacity(self.len());
        for s in &self.segments {
            let part = &seq[s.start..s.end];
            if s.reverse {
                out.extend(dna::revcomp(part));
            } else {
                out.extend_from_slice(part);
            }
        }
        Ok(out)
    }

    /// Reference positions in extraction order (descending inside minus-strand segments).
    pub fn positions(&self, ref_len: usize) -> Result<Vec<usize>> {
        self.check_bounds(ref_len)?;
        let mut out = Vec::with_capacity(self.len());
        for s in &self.segments {
            if s.reverse {
                out.extend((s.start..s.end).rev());
            } else {
                out.extend(s.start..s.end);
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    features: BTreeMap<String, RegionFeature>,
}

impl Annotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later insertions under the same name replace earlier ones.
    pub fn insert(&mut self, region: impl Into<String>, feature: RegionFeature) {
        self.features.insert(region.into(), feature);
    }

    pub fn get(&self, region: &str) -> Option<&RegionFeature> {
        self.features.get(region)
    }

    pub fn require(&self, region: &str, reference: &str) -> Result<&RegionFeature> {
        self.get(region).ok_or_else(|| HivevoError::RegionNotFound {
            region: region.to_string(),
            reference: reference.to_string(),
        })
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_forward_join() {
        let f = RegionFeature::new("CDS", vec![Segment::forward(0, 3), Segment::forward(5, 8)]);
        assert_eq!(f.extract(b"ACGTTGCA").unwrap(), b"ACGGCA");
        assert_eq!(f.positions(8).unwrap(), vec![0, 1, 2, 5, 6, 7]);
        assert_eq!(f.len(), 6);
    }

    #[test]
    fn extract_minus_strand() {
        let f = RegionFeature::new(
            "gene",
            vec![Segment { start: 4, end: 8, reverse: true }, Segment { start: 0, end: 2, reverse: true }],
        );
        // complement(join(0..2, 4..8)) on AAGGCCTT
        assert_eq!(f.extract(b"AAGGCCTT").unwrap(), b"AAGGTT");
        assert_eq!(f.positions(8).unwrap(), vec![7, 6, 5, 4, 1, 0]);
    }

    #[test]
    fn out_of_bounds_segment_is_rejected() {
        let f = RegionFeature::new("gene", vec![Segment::forward(2, 20)]);
        assert!(matches!(f.extract(b"ACGT"), Err(HivevoError::InvalidData { .. })));
    }

    #[test]
    fn missing_region_is_typed() {
        let ann = Annotation::new();
        let err = ann.require("gag", "HXB2").unwrap_err();
        assert!(matches!(err, HivevoError::RegionNotFound { ref region, .. } if region == "gag"));
    }
}
