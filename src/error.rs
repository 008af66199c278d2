//! Error type shared by every generator.

#[derive(Debug, thiserror::Error)]
pub enum MapGenError {
    #[error("invalid map dimensions {width}x{height}: both must be at least 1")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{algorithm} could not satisfy its constraints after {attempts} attempts")]
    Unsatisfiable { algorithm: &'static str, attempts: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MapGenError>;

/// Reject zero-sized grids.
pub fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(MapGenError::InvalidDimensions { width, height });
    }
    Ok(())
}
