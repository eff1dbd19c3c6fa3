use tracing::info_span;

use super::{SiteProfile, SiteQueries};
use crate::error::Result;
use crate::stats::Alignment;
use crate::store::{AlignmentKey, ReferenceStore};
use crate::util::Alphabet;

/// Amino-acid profile of one annotated region (e.g. `pol`, `gp120`).
#[derive(Debug, Clone)]
pub struct HivReferenceAminoacid {
    region: String,
    refname: String,
    subtype: String,
    /// 该区域的核苷酸序列
    seq: Vec<u8>,
    alignment: Alignment,
    profile: SiteProfile,
}

impl HivReferenceAminoacid {
    pub fn load<S: ReferenceStore + ?Sized>(store: &S, region: &str, refname: &str, subtype: &str) -> Result<Self> {
        let _span = info_span!("hiv_reference_aa", region, refname, subtype).entered();
        let record = store.sequence(refname)?;
        let seq = record.annotation.require(region, refname)?.extract(&record.seq)?;

        let alignment = store.alignment(&AlignmentKey::aminoacid(subtype, refname, region))?;
        let profile = SiteProfile::from_alignment(&alignment, Alphabet::amino_acids());

        Ok(Self {
            region: region.to_string(),
            refname: refname.to_string(),
            subtype: subtype.to_string(),
            seq,
            alignment,
            profile,
        })
    }

    pub fn region(&self) -> &str {
        &self.region
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

    pub fn alignment(&self) -> &Alignment {
        &self.alignment
    }
}

impl SiteQueries for HivReferenceAminoacid {
    fn profile(&self) -> &SiteProfile {
        &self.profile
    }
}
