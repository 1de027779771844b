use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use varclust_core::consts::{DEFAULT_CLUSTERED_MONOTONIC_INIT, DEFAULT_SUBMITTED_MONOTONIC_INIT};
use varclust_core::{Accession, NamespaceSelector};

use crate::consts::{DEFAULT_CHUNK_SIZE, DEFAULT_PROCESS_CLUSTERED_REMAPPED_VARIANTS};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AccessioningConfig {
    /// First SS accession issued by the active service.
    pub submitted_monotonic_init: Accession,
    /// First RS accession issued by the active service.
    pub clustered_monotonic_init: Accession,
}

impl Default for AccessioningConfig {
    fn default() -> Self {
        AccessioningConfig {
            submitted_monotonic_init: DEFAULT_SUBMITTED_MONOTONIC_INIT,
            clustered_monotonic_init: DEFAULT_CLUSTERED_MONOTONIC_INIT,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ClusteringOptions {
    #[serde(default = "default_process_clustered_remapped_variants")]
    pub process_clustered_remapped_variants: bool,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for ClusteringOptions {
    fn default() -> Self {
        ClusteringOptions {
            process_clustered_remapped_variants: DEFAULT_PROCESS_CLUSTERED_REMAPPED_VARIANTS,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

fn default_process_clustered_remapped_variants() -> bool {
    DEFAULT_PROCESS_CLUSTERED_REMAPPED_VARIANTS
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct ClusteringConfig {
    #[serde(default)]
    pub accessioning: AccessioningConfig,
    #[serde(default)]
    pub clustering: ClusteringOptions,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid accessioning threshold: {0}")]
    InvalidThreshold(String),
    #[error("Chunk size must be greater than zero")]
    InvalidChunkSize,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl ClusteringConfig {
    pub fn selector(&self) -> NamespaceSelector {
        NamespaceSelector::new(
            self.accessioning.submitted_monotonic_init,
            self.accessioning.clustered_monotonic_init,
        )
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.accessioning.submitted_monotonic_init == 0 {
            return Err(ConfigError::InvalidThreshold(
                "submitted_monotonic_init must be greater than zero".to_string(),
            ));
        }
        if self.accessioning.clustered_monotonic_init == 0 {
            return Err(ConfigError::InvalidThreshold(
                "clustered_monotonic_init must be greater than zero".to_string(),
            ));
        }
        if self.clustering.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        Ok(())
    }
}

impl TryFrom<&Path> for ClusteringConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config: ClusteringConfig = toml::from_str(&toml_str)?;
        config.validate()?;
        Ok(config)
    }
}
