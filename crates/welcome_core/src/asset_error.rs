//! Asset error types

use std::fmt;
use std::io;

/// Error type for asset operations
#[derive(Debug)]
pub enum AssetError {
    /// IO error (file not found, permission denied, worker spawn failure)
    Io(io::Error),
    /// The file was read but could not be decoded
    Parse(String),
    /// Asset not found in the cache
    NotFound(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io(err) => write!(f, "Asset IO error: {}", err),
            AssetError::Parse(msg) => write!(f, "Asset parse error: {}", msg),
            AssetError::NotFound(name) => write!(f, "Asset not found: {}", name),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io(err) => Some(err),
            AssetError::Parse(_) | AssetError::NotFound(_) => None,
        }
    }
}

impl From<io::Error> for AssetError {
    fn from(err: io::Error) -> Self {
        AssetError::Io(err)
    }
}

impl From<gltf::Error> for AssetError {
    fn from(err: gltf::Error) -> Self {
        AssetError::Parse(err.to_string())
    }
}
