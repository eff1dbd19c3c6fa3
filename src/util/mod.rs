pub mod alphabet;
pub mod dna;

pub use alphabet::{Alphabet, GAP};
