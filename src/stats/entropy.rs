use super::frequencies::{FrequencyMatrix, EPSILON};
use crate::error::{HivevoError, Result};

/// Shannon 熵（自然对数），log 内加 EPSILON，结果截断到 >= 0
pub fn compute_entropy(af: &FrequencyMatrix) -> Vec<f64> {
    (0..af.num_positions())
        .map(|col| {
            let h: f64 = af.column(col).map(|f| -f * (EPSILON + f).ln()).sum();
            h.max(0.0)
        })
        .collect()
}

/// Percentile with linear interpolation between the two nearest ranks.
///
/// `sorted` must be sorted ascending; `p` is clamped to `[0, 100]`.
/// Returns `None` for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = p.clamp(0.0, 100.0) / 100.0 * last as f64;
    let lo = (rank.floor() as usize).min(last);
    let hi = (lo + 1).min(last);
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntropyBucket {
    /// `[lo, hi)`；最后一个桶包含 hi
    pub range: (f64, f64),
    pub positions: Vec<usize>,
}

/// 按熵的分位数把位点分成 q 个桶，每个位点恰好落入一个桶
pub fn entropy_quantiles(entropy: &[f64], q: usize) -> Result<Vec<EntropyBucket>> {
    if entropy.is_empty() {
        return Err(HivevoError::invalid_data("cannot compute quantiles of an empty entropy profile"));
    }
    if q == 0 {
        return Ok(Vec::new());
    }

    let mut sorted = entropy.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mut thresholds: Vec<f64> = (0..=q)
        .map(|i| percentile(&sorted, 100.0 * i as f64 / q as f64))
        .collect::<Option<_>>()
        .ok_or_else(|| HivevoError::invalid_data("cannot compute quantiles of an empty entropy profile"))?;
    // 插值可能产生极小的非单调误差
    for i in 1..thresholds.len() {
        if thresholds[i] < thresholds[i - 1] {
            thresholds[i] = thresholds[i - 1];
        }
    }

    let mut buckets: Vec<EntropyBucket> = thresholds
        .windows(2)
        .map(|w| EntropyBucket { range: (w[0], w[1]), positions: Vec::new() })
        .collect();

    for (pos, &e) in entropy.iter().enumerate() {
        // 第一个上界 > e 的桶；若不存在则归入最后一个桶
        let upper = thresholds[1..].partition_point(|&t| t <= e);
        let b = upper.min(q - 1);
        buckets[b].positions.push(pos);
    }
    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{compute_frequencies, Alignment};
    use crate::util::Alphabet;

    #[test]
    fn entropy_of_fixed_column_is_zero() {
        let aln = Alignment::from_strs(&["ACGT-", "ACG-T"]).unwrap();
        let af = compute_frequencies(&aln, &Alphabet::new(b"ACGT-").unwrap());
        let h = compute_entropy(&af);
        assert!(h[0].abs() < 1e-8);
        assert!(h.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn entropy_of_uniform_column_is_ln_k() {
        let aln = Alignment::from_strs(&["A", "C", "G", "T"]).unwrap();
        let af = compute_frequencies(&aln, &Alphabet::new(b"ACGT-").unwrap());
        let h = compute_entropy(&af);
        assert!((h[0] - 4f64.ln()).abs() < 1e-6);
    }

    #[test]
    fn entropy_of_empty_column_is_zero() {
        let af = FrequencyMatrix::zeros(5, 3);
        assert_eq!(compute_entropy(&af), vec![0.0; 3]);
    }

    #[test]
    fn percentile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&v, 0.0), Some(1.0));
        assert_eq!(percentile(&v, 100.0), Some(4.0));
        assert!((percentile(&v, 50.0).unwrap() - 2.5).abs() < 1e-12);
        assert_eq!(percentile(&[7.0], 30.0), Some(7.0));
    }

    #[test]
    fn percentile_of_nothing() {
        assert_eq!(percentile(&[], 50.0), None);
        // 超出范围的百分位被截断
        assert_eq!(percentile(&[1.0, 2.0], 150.0), Some(2.0));
    }

    #[test]
    fn quantiles_cover_every_position_once() {
        let entropy = [0.0, 0.0, 0.1, 0.5, 0.3, 0.9, 0.0, 1.2, 0.7, 0.2];
        let buckets = entropy_quantiles(&entropy, 4).unwrap();
        assert_eq!(buckets.len(), 4);

        let mut seen: Vec<usize> = buckets.iter().flat_map(|b| b.positions.iter().copied()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..entropy.len()).collect::<Vec<_>>());

        for w in buckets.windows(2) {
            assert!(w[0].range.0 <= w[1].range.0);
            assert!(w[0].range.1 <= w[1].range.1);
        }
        // maximum lands in the last bucket, whose upper bound is the maximum
        let last = buckets.last().unwrap();
        assert_eq!(last.range.1, 1.2);
        assert!(last.positions.contains(&7));
    }

    #[test]
    fn quantiles_of_constant_profile_fall_into_last_bucket() {
        let buckets = entropy_quantiles(&[0.0; 5], 3).unwrap();
        assert_eq!(buckets.len(), 3);
        assert!(buckets[0].positions.is_empty());
        assert_eq!(buckets[2].positions, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn quantiles_bucket_membership_is_half_open() {
        // thresholds: 0, 1, 2
        let buckets = entropy_quantiles(&[0.0, 1.0, 2.0], 2).unwrap();
        assert_eq!(buckets[0].range, (0.0, 1.0));
        assert_eq!(buckets[0].positions, vec![0]);
        assert_eq!(buckets[1].positions, vec![1, 2]);
    }

    #[test]
    fn quantiles_edge_inputs() {
        assert!(entropy_quantiles(&[], 4).is_err());
        assert!(entropy_quantiles(&[0.3], 0).unwrap().is_empty());
    }
}
