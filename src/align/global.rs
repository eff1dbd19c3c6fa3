use tracing::warn;

use crate::util::GAP;

const NEG_INF: i32 = i32::MIN / 4;

// traceback 位编码：低两位为 H 的来源，另两位记录 E/F 是否为延伸
const FROM_DIAG: u8 = 0;
const FROM_E: u8 = 1;
const FROM_F: u8 = 2;
const FROM_MASK: u8 = 0b11;
const E_EXT: u8 = 0b100;
const F_EXT: u8 = 0b1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlobalParams {
    pub match_score: i32,
    pub mismatch_penalty: i32,
    /// A gap of length L costs `gap_open + L * gap_extend`.
    pub gap_open: i32,
    pub gap_extend: i32,
    pub band_width: usize,
}

impl Default for GlobalParams {
    fn default() -> Self {
        Self {
            match_score: 3,
            mismatch_penalty: 3,
            gap_open: 4,
            gap_extend: 1,
            band_width: 200,
        }
    }
}

/// Two gapped rows of equal length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalAlignment {
    pub score: i32,
    pub aligned_a: Vec<u8>,
    pub aligned_b: Vec<u8>,
}

/// Pairwise global aligner used by the coordinate translator.
pub trait GlobalAligner {
    fn align(&self, a: &[u8], b: &[u8]) -> GlobalAlignment;
}

/// 带状仿射间隙 Needleman-Wunsch 全局对齐
#[derive(Clone, Copy, Debug, Default)]
pub struct BandedGlobal {
    pub params: GlobalParams,
}

impl BandedGlobal {
    pub fn new(params: GlobalParams) -> Self {
        Self { params }
    }
}

impl GlobalAligner for BandedGlobal {
    fn align(&self, a: &[u8], b: &[u8]) -> GlobalAlignment {
        banded_global(a, b, self.params)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    H,
    E,
    F,
}

/// 得分矩阵只保留两行；traceback 按带状布局存储，
/// 第 i 行第 j 列位于 `i * w + (j + band - i)`。
/// 若 band 小于长度差，自动放宽以保证终点可达。
pub fn banded_global(a: &[u8], b: &[u8], p: GlobalParams) -> GlobalAlignment {
    let m = a.len();
    let n = b.len();

    let mut band = p.band_width;
    if m.abs_diff(n) > band {
        warn!(band, len_a = m, len_b = n, "band narrower than length difference, widening");
        band = m.abs_diff(n);
    }
    let w = 2 * band + 1;
    let gap_cost = |len: usize| p.gap_open + p.gap_extend * len as i32;

    let mut h_prev = vec![NEG_INF; w];
    let mut e_prev = vec![NEG_INF; w];
    let mut h_cur = vec![NEG_INF; w];
    let mut e_cur = vec![NEG_INF; w];
    let mut f_cur = vec![NEG_INF; w];
    let mut trace = vec![0u8; (m + 1) * w];

    // row 0: leading gaps in a
    for j in 0..=n.min(band) {
        let k = j + band;
        h_prev[k] = if j == 0 { 0 } else { -gap_cost(j) };
        if j > 0 {
            trace[k] = FROM_F | if j > 1 { F_EXT } else { 0 };
        }
    }

    for i in 1..=m {
        h_cur.fill(NEG_INF);
        e_cur.fill(NEG_INF);
        f_cur.fill(NEG_INF);

        let lo = i.saturating_sub(band);
        let hi = n.min(i + band);
        let row = i * w;

        for j in lo..=hi {
            let k = j + band - i;

            if j == 0 {
                let v = -gap_cost(i);
                h_cur[k] = v;
                e_cur[k] = v;
                trace[row + k] = FROM_E | if i > 1 { E_EXT } else { 0 };
                continue;
            }

            // (i-1, j) 位于上一行的 k+1
            let (h_up, e_up) = if k + 1 < w { (h_prev[k + 1], e_prev[k + 1]) } else { (NEG_INF, NEG_INF) };
            let e_open = h_up - p.gap_open - p.gap_extend;
            let e_ext = e_up - p.gap_extend;
            let mut t = 0u8;
            let e = if e_ext > e_open {
                t |= E_EXT;
                e_ext
            } else {
                e_open
            };

            // (i, j-1) 位于本行的 k-1
            let (h_left, f_left) = if k > 0 { (h_cur[k - 1], f_cur[k - 1]) } else { (NEG_INF, NEG_INF) };
            let f_open = h_left - p.gap_open - p.gap_extend;
            let f_ext = f_left - p.gap_extend;
            let f = if f_ext > f_open {
                t |= F_EXT;
                f_ext
            } else {
                f_open
            };

            let subst = if a[i - 1].eq_ignore_ascii_case(&b[j - 1]) {
                p.match_score
            } else {
                -p.mismatch_penalty
            };
            let diag = h_prev[k] + subst;

            let h = if diag >= e && diag >= f {
                diag
            } else if e >= f {
                t |= FROM_E;
                e
            } else {
                t |= FROM_F;
                f
            };

            h_cur[k] = h;
            e_cur[k] = e;
            f_cur[k] = f;
            trace[row + k] = t;
        }

        std::mem::swap(&mut h_prev, &mut h_cur);
        std::mem::swap(&mut e_prev, &mut e_cur);
    }

    let score = h_prev[n + band - m];

    let mut aligned_a = Vec::with_capacity(m + n);
    let mut aligned_b = Vec::with_capacity(m + n);
    let (mut i, mut j) = (m, n);
    let mut state = State::H;
    while i > 0 || j > 0 {
        let t = trace[i * w + j + band - i];
        match state {
            State::H => match t & FROM_MASK {
                FROM_DIAG => {
                    aligned_a.push(a[i - 1]);
                    aligned_b.push(b[j - 1]);
                    i -= 1;
                    j -= 1;
                }
                FROM_E => state = State::E,
                _ => state = State::F,
            },
            State::E => {
                aligned_a.push(a[i - 1]);
                aligned_b.push(GAP);
                i -= 1;
                if t & E_EXT == 0 {
                    state = State::H;
                }
            }
            State::F => {
                aligned_a.push(GAP);
                aligned_b.push(b[j - 1]);
                j -= 1;
                if t & F_EXT == 0 {
                    state = State::H;
                }
            }
        }
    }
    aligned_a.reverse();
    aligned_b.reverse();

    GlobalAlignment { score, aligned_a, aligned_b }
}
