use std::path::PathBuf;

use thiserror::Error;

use dispatch_core::network::NetworkError;
use dispatch_core::registry::RegistryError;

/// Failure reading or writing one of the data files.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: invalid {field} `{value}` in row {row}")]
    InvalidField {
        path: PathBuf,
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("{path}: {source}")]
    Network {
        path: PathBuf,
        #[source]
        source: NetworkError,
    },

    #[error("{path}: {source}")]
    Registry {
        path: PathBuf,
        #[source]
        source: RegistryError,
    },
}

impl LoadError {
    pub(crate) fn csv(path: &std::path::Path, source: csv::Error) -> Self {
        LoadError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    /// File the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Csv { path, .. }
            | LoadError::Io { path, .. }
            | LoadError::InvalidField { path, .. }
            | LoadError::Network { path, .. }
            | LoadError::Registry { path, .. } => path,
        }
    }
}
