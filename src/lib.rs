//! # hivevo-ref
//!
//! HIV 参考基因组数据访问与坐标映射。
//!
//! 本 crate 提供：
//!
//! - **频率与熵**：由亚型多序列比对计算逐位点等位基因频率、Shannon 熵与一致序列
//! - **参考对象**：核苷酸（全基因组）与氨基酸（按注释区域）两种参考，支持区域查询
//! - **坐标转换**：两条参考序列做一次带状全局对齐，之后以二分查找转换坐标
//! - **数据存储**：按 hivevo 目录布局读取 GenBank / FASTA / 预计算频率表
//!
//! ## 快速示例
//!
//! ```rust
//! use hivevo_ref::align::ReferenceTranslator;
//! use hivevo_ref::reference::{HivReference, IndexSelector, SiteQueries};
//! use hivevo_ref::stats::Alignment;
//! use hivevo_ref::store::{AlignmentKey, MemoryStore, ReferenceRecord};
//!
//! let record = ReferenceRecord {
//!     name: "HXB2".to_string(),
//!     seq: b"ACGTACGT".to_vec(),
//!     annotation: Default::default(),
//! };
//! let aln = Alignment::from_strs(&["ACGTACGT", "ACGAACGT", "ACGTAC-T"]).unwrap();
//! let store = MemoryStore::new()
//!     .with_reference(record.clone())
//!     .with_reference(ReferenceRecord { name: "NL4-3".to_string(), ..record })
//!     .with_alignment(AlignmentKey::genomewide("B", "HXB2"), aln);
//!
//! let reference = HivReference::load(&store, "HXB2", "B", true).unwrap();
//! let entropy = reference
//!     .get_entropy_in_patient_region(&IndexSelector::Direct(vec![3, 6]))
//!     .unwrap();
//! assert!(entropy.iter().all(|&h| h > 0.0));
//!
//! let translator = ReferenceTranslator::new(&store, "HXB2", "NL4-3").unwrap();
//! assert_eq!(translator.translate(0, "HXB2").unwrap(), ("NL4-3", 0));
//! ```
//!
//! ## 模块说明
//!
//! - [`stats`] — 比对矩阵、频率、熵、分位数、预计算频率表
//! - [`reference`] — 参考对象、注释与区域查询
//! - [`align`] — 带状全局对齐与坐标转换
//! - [`store`] — 参考数据存储（文件系统 / 内存）
//! - [`io`] — FASTA / GenBank 读取
//! - [`util`] — 字母表与 DNA 工具函数

pub mod align;
pub mod config;
pub mod error;
pub mod io;
pub mod reference;
pub mod stats;
pub mod store;
pub mod util;

pub use config::StoreConfig;
pub use error::{HivevoError, Result};
