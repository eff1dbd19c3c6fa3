use serde::{Deserialize, Serialize};

use super::Alignment;
use crate::util::Alphabet;

/// 防止除零 / log(0) 的小量
pub const EPSILON: f64 = 1e-10;

/// 等位基因频率矩阵，形状 (alphabet_size - 1) x num_positions，行优先展平
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct FrequencyMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

/// 反序列化的中间形态，校验 rows * cols == data.len() 后才转为 FrequencyMatrix
#[derive(Deserialize)]
struct RawMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl TryFrom<RawMatrix> for FrequencyMatrix {
    type Error = String;

    fn try_from(raw: RawMatrix) -> Result<Self, Self::Error> {
        match raw.rows.checked_mul(raw.cols) {
            Some(n) if n == raw.data.len() => Ok(Self { rows: raw.rows, cols: raw.cols, data: raw.data }),
            _ => Err(format!(
                "frequency matrix declares {}x{} but holds {} values",
                raw.rows,
                raw.cols,
                raw.data.len()
            )),
        }
    }
}

impl FrequencyMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows, cols, data: vec![0.0; rows * cols] }
    }

    /// Builds a matrix from per-symbol rows; `None` if the rows are ragged.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        let n = rows.len();
        Some(Self { rows: n, cols, data: rows.into_iter().flatten().collect() })
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Number of positions.
    pub fn num_positions(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut f64 {
        &mut self.data[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.rows).map(move |r| self.get(r, col))
    }
}

/// 逐列统计前 k-1 个符号的出现次数，再除以 (覆盖度 + EPSILON)。
/// 不在字母表中的字符以及哨兵符号不计入覆盖度。
pub fn compute_frequencies(aln: &Alignment, alphabet: &Alphabet) -> FrequencyMatrix {
    let k = alphabet.counted_len();
    let width = aln.width();
    let mut af = FrequencyMatrix::zeros(k, width);

    for row in aln.rows() {
        for (col, &b) in row.iter().enumerate() {
            if let Some(i) = alphabet.index_of(b).filter(|&i| i < k) {
                *af.get_mut(i, col) += 1.0;
            }
        }
    }

    for col in 0..width {
        let cov: f64 = af.column(col).sum();
        for i in 0..k {
            *af.get_mut(i, col) /= cov + EPSILON;
        }
    }
    af
}

/// argmax per column; ties go to the lowest row.
pub fn consensus_indices(af: &FrequencyMatrix) -> Vec<usize> {
    (0..af.num_positions())
        .map(|col| {
            let mut best = 0usize;
            let mut best_val = f64::NEG_INFINITY;
            for (i, v) in af.column(col).enumerate() {
                if v > best_val {
                    best = i;
                    best_val = v;
                }
            }
            best
        })
        .collect()
}

pub fn consensus_sequence(indices: &[usize], alphabet: &Alphabet) -> Vec<u8> {
    indices.iter().map(|&i| alphabet.symbol(i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-8
    }

    #[test]
    fn frequencies_exclude_sentinel() {
        let aln = Alignment::from_strs(&["ACGT-", "ACG-T"]).unwrap();
        let alpha = Alphabet::new(b"ACGT-").unwrap();
        let af = compute_frequencies(&aln, &alpha);
        assert_eq!(af.num_rows(), 4);
        assert_eq!(af.num_positions(), 5);
        let col0: Vec<f64> = af.column(0).collect();
        assert!(close(col0[0], 1.0));
        assert!(col0[1..].iter().all(|&v| v == 0.0));
        // column 3: one T, one gap (not counted)
        assert!(close(af.get(3, 3), 1.0));
    }

    #[test]
    fn columns_sum_to_at_most_one() {
        let aln = Alignment::from_strs(&["AC-N", "GC-N", "A--N", "TCAN"]).unwrap();
        let af = compute_frequencies(&aln, &Alphabet::nucleotides());
        for col in 0..af.num_positions() {
            let s: f64 = af.column(col).sum();
            assert!(s <= 1.0 + EPSILON);
            assert!(af.column(col).all(|v| (0.0..=1.0).contains(&v)));
        }
        // full coverage
        assert!(close(af.column(0).sum(), 1.0));
        assert!(close(af.get(0, 0), 0.5));
        // gaps are counted in the nucleotide alphabet
        assert!(close(af.get(4, 2), 0.75));
        // all-N column: no coverage, no NaN
        assert!(af.column(3).all(|v| v == 0.0));
    }

    #[test]
    fn consensus_prefers_first_on_ties() {
        let aln = Alignment::from_strs(&["AT", "CT", "CA"]).unwrap();
        let alpha = Alphabet::nucleotides();
        let af = compute_frequencies(&aln, &alpha);
        let idx = consensus_indices(&af);
        assert_eq!(idx, vec![1, 3]);
        assert_eq!(consensus_sequence(&idx, &alpha), b"CT");

        let tie = Alignment::from_strs(&["G", "A"]).unwrap();
        let af = compute_frequencies(&tie, &alpha);
        assert_eq!(consensus_indices(&af), vec![0]);
    }

    #[test]
    fn from_rows_rejects_ragged() {
        assert!(FrequencyMatrix::from_rows(vec![vec![1.0], vec![0.5, 0.5]]).is_none());
        let m = FrequencyMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert_eq!(m.row(1), &[0.0, 1.0]);
    }

    #[test]
    fn deserialize_checks_dimensions() {
        let bytes = bincode::serialize(&(5usize, 3usize, vec![0.0f64; 10])).unwrap();
        let err = bincode::deserialize::<FrequencyMatrix>(&bytes).unwrap_err();
        assert!(err.to_string().contains("5x3"));

        let bytes = bincode::serialize(&(5usize, 2usize, vec![0.0f64; 10])).unwrap();
        let m: FrequencyMatrix = bincode::deserialize(&bytes).unwrap();
        assert_eq!((m.num_rows(), m.num_positions()), (5, 2));
    }
}
