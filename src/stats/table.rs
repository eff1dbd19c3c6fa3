use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::FrequencyMatrix;
use crate::error::{HivevoError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableMeta {
    pub refname: String,
    pub subtype: String,
    pub source_alignment: Option<String>,
    pub build_timestamp: Option<String>,
}

/// 预计算的核苷酸频率表（bincode 序列化），供低内存模式直接加载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTable {
    pub meta: TableMeta,
    pub frequencies: FrequencyMatrix,
}

impl FrequencyTable {
    pub fn new(frequencies: FrequencyMatrix, meta: TableMeta) -> Self {
        Self { meta, frequencies }
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| HivevoError::data_load(dir, e))?;
        }
        let f = std::fs::File::create(path).map_err(|e| HivevoError::data_load(path, e))?;
        let mut w = std::io::BufWriter::new(f);
        bincode::serialize_into(&mut w, self).map_err(|e| HivevoError::data_load(path, e))?;
        w.flush().map_err(|e| HivevoError::data_load(path, e))?;
        info!(path = %path.display(), positions = self.frequencies.num_positions(), "frequency table saved");
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let f = std::fs::File::open(path).map_err(|e| HivevoError::data_load(path, e))?;
        bincode::deserialize_from(std::io::BufReader::new(f)).map_err(|e| HivevoError::data_load(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_survives_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("afs.bin");
        let m = FrequencyMatrix::from_rows(vec![vec![0.25, 1.0], vec![0.75, 0.0]]).unwrap();
        let table = FrequencyTable::new(
            m,
            TableMeta {
                refname: "HXB2".into(),
                subtype: "B".into(),
                source_alignment: None,
                build_timestamp: Some("2015-04-25T00:00:00+00:00".into()),
            },
        );
        table.save_to_file(&path).unwrap();
        assert_eq!(FrequencyTable::load_from_file(&path).unwrap(), table);
    }

    #[test]
    fn corrupt_table_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("afs.bin");
        std::fs::write(&path, b"xx").unwrap();
        assert!(matches!(FrequencyTable::load_from_file(&path), Err(HivevoError::DataLoad { .. })));
    }

    #[test]
    fn table_with_mismatched_dimensions_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("afs.bin");
        // 与 FrequencyTable 相同的字段布局，但 cols 与数据长度不符
        let bad = (TableMeta::default(), (5usize, 3usize, vec![0.2f64; 10]));
        std::fs::write(&path, bincode::serialize(&bad).unwrap()).unwrap();
        assert!(matches!(FrequencyTable::load_from_file(&path), Err(HivevoError::DataLoad { .. })));
    }
}
