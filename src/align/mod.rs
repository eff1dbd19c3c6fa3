//! Pairwise global alignment of two references and coordinate translation.

pub mod global;
pub mod translate;

pub use global::{banded_global, BandedGlobal, GlobalAligner, GlobalAlignment, GlobalParams};
pub use translate::ReferenceTranslator;
