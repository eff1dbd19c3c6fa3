use std::path::PathBuf;

use tracing::info_span;

use super::{AlignmentKey, ReferenceRecord, ReferenceStore, GENOMEWIDE};
use crate::config::StoreConfig;
use crate::error::Result;
use crate::io::{fasta, genbank};
use crate::stats::{Alignment, FrequencyMatrix, FrequencyTable};

/// 按 hivevo 目录布局读取参考数据：
///
/// ```text
/// <reference_root>/<name>.gb
/// <reference_root>/alignments/pairwise_to_<ref>/<region>.<subtype>.<nuc|aa>.aligned.fasta
/// <reference_root>/alignments/pairwise_to_<ref>/genomewide.<subtype>.nuc.aligned_afs.bin
/// ```
#[derive(Debug, Clone)]
pub struct FsStore {
    config: StoreConfig,
}

impl FsStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn reference_path(&self, refname: &str) -> PathBuf {
        self.config.reference_root.join(format!("{}.gb", refname))
    }

    fn pairwise_dir(&self, refname: &str) -> PathBuf {
        self.config
            .reference_root
            .join("alignments")
            .join(format!("pairwise_to_{}", refname))
    }

    pub fn alignment_path(&self, key: &AlignmentKey) -> PathBuf {
        self.pairwise_dir(&key.refname)
            .join(format!("{}.{}.{}.aligned.fasta", key.region, key.subtype, key.kind))
    }

    pub fn frequencies_path(&self, subtype: &str, refname: &str) -> PathBuf {
        self.pairwise_dir(refname)
            .join(format!("{}.{}.nuc.aligned_afs.bin", GENOMEWIDE, subtype))
    }
}

impl ReferenceStore for FsStore {
    fn sequence(&self, refname: &str) -> Result<ReferenceRecord> {
        let path = self.reference_path(refname);
        // LOCUS 名（如 HXB2 的 K03455）不一定等于文件名，记录以请求的名字为准
        info_span!("load_reference", refname).in_scope(|| {
            let mut rec = genbank::load_reference(&path)?;
            rec.name = refname.to_string();
            Ok(rec)
        })
    }

    fn alignment(&self, key: &AlignmentKey) -> Result<Alignment> {
        let path = self.alignment_path(key);
        info_span!("load_alignment", region = %key.region, subtype = %key.subtype, kind = %key.kind)
            .in_scope(|| fasta::read_alignment(&path))
    }

    fn frequencies(&self, subtype: &str, refname: &str) -> Result<FrequencyMatrix> {
        let path = self.frequencies_path(subtype, refname);
        info_span!("load_frequencies", subtype, refname)
            .in_scope(|| FrequencyTable::load_from_file(&path).map(|t| t.frequencies))
    }
}
