//! Portal configuration (YAML)
//!
//! ```yaml
//! workbook: data/naac.xlsx
//! host: 0.0.0.0
//! port: 8080
//! collections:          # optional, replaces the built-in set
//!   - id: theses
//!     title: Theses guided
//!     sheet: "3.9"
//!     header_rows: 2
//!     fields: [student, guide, year]
//!     required: [student]
//! ```

use crate::collections::{CollectionRegistry, CollectionSpec};
use crate::error::PortalResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_WORKBOOK: &str = "naac.xlsx";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub workbook: PathBuf,
    pub host: String,
    pub port: u16,
    pub collections: Option<Vec<CollectionSpec>>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from(DEFAULT_WORKBOOK),
            host: "127.0.0.1".to_string(),
            port: 8080,
            collections: None,
        }
    }
}

impl PortalConfig {
    pub fn load(path: &Path) -> PortalResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PortalConfig = serde_yaml::from_str(&content)?;
        // Fail on a bad collection list at load time, not on first request.
        config.registry()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> PortalResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn registry(&self) -> PortalResult<CollectionRegistry> {
        match &self.collections {
            Some(specs) => CollectionRegistry::new(specs.clone()),
            None => Ok(CollectionRegistry::builtin()),
        }
    }
}
