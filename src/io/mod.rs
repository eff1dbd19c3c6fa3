pub mod fasta;
pub mod genbank;
