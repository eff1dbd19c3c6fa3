use std::path::{Path, PathBuf};

/// 数据目录配置，由调用方一次性解析后传入，库内部不探测环境
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub reference_root: PathBuf,
}

impl StoreConfig {
    pub fn new(reference_root: impl Into<PathBuf>) -> Self {
        Self { reference_root: reference_root.into() }
    }

    /// hivevo data layout: references live in `<data_root>/reference/`.
    pub fn from_data_root(data_root: &Path) -> Self {
        Self::new(data_root.join("reference"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_root_maps_to_reference_folder() {
        let cfg = StoreConfig::from_data_root(Path::new("/data/hiv"));
        assert_eq!(cfg.reference_root, PathBuf::from("/data/hiv/reference"));
    }
}
