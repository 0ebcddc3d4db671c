use thiserror::Error;

/// Errors produced while running a feature selection.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// The caller-supplied scorer failed on a subset of `size` features.
    /// The selection is aborted and no partial result is returned.
    #[error("scorer failed on a subset of {size} feature(s): {source}")]
    Scorer {
        size: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid selection configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, SelectionError>;
