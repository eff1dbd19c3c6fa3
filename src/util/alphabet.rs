use crate::error::{HivevoError, Result};

/// 有序字母表。最后一个符号为 non-call 哨兵（N / X），不参与频率统计；
/// gap `-` 若出现在计数符号中，则对应频率矩阵的一行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
    /// byte -> 符号下标，255 表示不在字母表中
    lookup: [u8; 256],
}

pub const GAP: u8 = b'-';

const NOT_IN_ALPHABET: u8 = u8::MAX;

impl Alphabet {
    /// Builds an alphabet from its ordered symbols; the last one is the sentinel.
    ///
    /// Symbols are matched case-insensitively, so they must be distinct
    /// ignoring case. Between 1 and 254 symbols.
    pub fn new(symbols: &[u8]) -> Result<Self> {
        if symbols.is_empty() || symbols.len() >= NOT_IN_ALPHABET as usize {
            return Err(HivevoError::invalid_data(format!(
                "alphabet needs between 1 and 254 symbols, got {}",
                symbols.len()
            )));
        }
        let alphabet = Self::build(symbols);
        if alphabet.symbols.iter().enumerate().any(|(i, &s)| alphabet.index_of(s) != Some(i)) {
            return Err(HivevoError::invalid_data(format!(
                "alphabet '{}' repeats a symbol",
                String::from_utf8_lossy(symbols)
            )));
        }
        Ok(alphabet)
    }

    fn build(symbols: &[u8]) -> Self {
        let mut lookup = [NOT_IN_ALPHABET; 256];
        let mut upper = Vec::with_capacity(symbols.len());
        for (i, &s) in symbols.iter().enumerate() {
            let s = s.to_ascii_uppercase();
            upper.push(s);
            lookup[s as usize] = i as u8;
            lookup[s.to_ascii_lowercase() as usize] = i as u8;
        }
        Self { symbols: upper, lookup }
    }

    /// `A C G T - N`
    pub fn nucleotides() -> Self {
        Self::build(b"ACGT-N")
    }

    /// `A C D E F G H I K L M N P Q R S T V W Y * - X`
    pub fn amino_acids() -> Self {
        Self::build(b"ACDEFGHIKLMNPQRSTVWY*-X")
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Number of symbols that get a frequency row (everything but the sentinel).
    pub fn counted_len(&self) -> usize {
        self.symbols.len() - 1
    }

    #[inline]
    pub fn index_of(&self, b: u8) -> Option<usize> {
        match self.lookup[b as usize] {
            NOT_IN_ALPHABET => None,
            i => Some(i as usize),
        }
    }

    #[inline]
    pub fn symbol(&self, index: usize) -> u8 {
        self.symbols[index]
    }

    /// Frequency row holding the gap symbol, if the gap is counted.
    pub fn gap_row(&self) -> Option<usize> {
        self.index_of(GAP).filter(|&i| i < self.counted_len())
    }
}
