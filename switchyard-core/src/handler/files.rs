use crate::conf::ConfigError;
use crate::conf::types::Origin;
use std::path::{Path, PathBuf};

/// Serves a directory below `base_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandler {
    base_path: String,
    document_root: PathBuf,
}

impl FileHandler {
    pub fn new(base_path: &str, document_root: &Path, origin: &Origin) -> Result<Self, ConfigError> {
        if !document_root.is_dir() {
            return Err(ConfigError::InvalidDocumentRoot {
                path: document_root.to_path_buf(),
                origin: origin.clone(),
            });
        }

        Ok(Self {
            base_path: base_path.to_string(),
            document_root: document_root.to_path_buf(),
        })
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn document_root(&self) -> &Path {
        &self.document_root
    }
}

/// Answers every SPA path with the bootstrap file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaHandler {
    bootstrap_file: PathBuf,
}

impl SpaHandler {
    pub fn new(bootstrap_file: &Path, origin: &Origin) -> Result<Self, ConfigError> {
        if !bootstrap_file.is_file() {
            return Err(ConfigError::InvalidBootstrapFile {
                path: bootstrap_file.to_path_buf(),
                origin: origin.clone(),
            });
        }

        Ok(Self {
            bootstrap_file: bootstrap_file.to_path_buf(),
        })
    }

    pub fn bootstrap_file(&self) -> &Path {
        &self.bootstrap_file
    }
}
