use crate::error::{HivevoError, Result};

/// 多序列比对矩阵：行 = 序列，列 = 比对位点（0-based 全局坐标）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    rows: Vec<Vec<u8>>,
    width: usize,
}

impl Alignment {
    pub fn new(rows: Vec<Vec<u8>>) -> Result<Self> {
        let width = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(HivevoError::invalid_data(format!(
                "alignment row {} has length {}, expected {}",
                i,
                row.len(),
                width
            )));
        }
        let rows = rows.into_iter().map(|r| r.to_ascii_uppercase()).collect();
        Ok(Self { rows, width })
    }

    pub fn from_strs(rows: &[&str]) -> Result<Self> {
        Self::new(rows.iter().map(|r| r.as_bytes().to_vec()).collect())
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of alignment columns.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }
}
