//! Frequency / entropy engine.

pub mod alignment;
pub mod entropy;
pub mod frequencies;
pub mod table;

pub use alignment::Alignment;
pub use entropy::{compute_entropy, entropy_quantiles, percentile, EntropyBucket};
pub use frequencies::{compute_frequencies, consensus_indices, consensus_sequence, FrequencyMatrix, EPSILON};
pub use table::{FrequencyTable, TableMeta};
