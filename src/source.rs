use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, CatalogProvider};
use crate::error::ConfigError;
use crate::odds::{OddsProvider, OddsTable};

/// A JSON file on disk, read fresh on every fetch.
#[derive(Debug, Clone)]
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read<T: serde::de::DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let file = File::open(&self.path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

impl CatalogProvider for JsonSource {
    fn catalog(&self) -> Result<Catalog, ConfigError> {
        self.read()
    }
}

impl OddsProvider for JsonSource {
    fn odds(&self) -> Result<OddsTable, ConfigError> {
        self.read()
    }
}
