use tracing::info_span;

use super::annotation::Annotation;
use super::{IndexSelector, SiteProfile, SiteQueries};
use crate::error::Result;
use crate::stats::Alignment;
use crate::store::{AlignmentKey, ReferenceStore};
use crate::util::Alphabet;

/// Genome-wide nucleotide reference with subtype allele frequencies.
#[derive(Debug, Clone)]
pub struct HivReference {
    refname: String,
    subtype: String,
    seq: Vec<u8>,
    annotation: Annotation,
    alignment: Option<Alignment>,
    profile: SiteProfile,
}

impl HivReference {
    /// `load_alignment = false` 时直接读取预计算频率矩阵（低内存模式）
    pub fn load<S: ReferenceStore + ?Sized>(
        store: &S,
        refname: &str,
        subtype: &str,
        load_alignment: bool,
    ) -> Result<Self> {
        let _span = info_span!("hiv_reference", refname, subtype, load_alignment).entered();
        let record = store.sequence(refname)?;
        let alphabet = Alphabet::nucleotides();

        let (alignment, profile) = if load_alignment {
            let aln = store.alignment(&AlignmentKey::genomewide(subtype, refname))?;
            let profile = SiteProfile::from_alignment(&aln, alphabet);
            (Some(aln), profile)
        } else {
            let af = store.frequencies(subtype, refname)?;
            (None, SiteProfile::from_frequencies(af, alphabet)?)
        };

        Ok(Self {
            refname: refname.to_string(),
            subtype: subtype.to_string(),
            seq: record.seq,
            annotation: record.annotation,
            alignment,
            profile,
        })
    }

    pub fn refname(&self) -> &str {
        &self.refname
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    pub fn seq(&self) -> &[u8] {
        &self.seq
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    /// Only present when constructed with `load_alignment`.
    pub fn alignment(&self) -> Option<&Alignment> {
        self.alignment.as_ref()
    }

    pub fn region_sequence(&self, region: &str) -> Result<Vec<u8>> {
        self.annotation.require(region, &self.refname)?.extract(&self.seq)
    }

    /// Reference positions of a region, ready for the `*_in_patient_region` queries.
    pub fn region_positions(&self, region: &str) -> Result<IndexSelector> {
        let feature = self.annotation.require(region, &self.refname)?;
        Ok(IndexSelector::Direct(feature.positions(self.seq.len())?))
    }
}

impl SiteQueries for HivReference {
    fn profile(&self) -> &SiteProfile {
        &self.profile
    }
}
