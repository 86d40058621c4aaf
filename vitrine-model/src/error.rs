use thiserror::Error;

/// Errors produced by model constructors and parsers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid product id: {0:?}")]
    InvalidId(String),

    #[error("unknown sort option: {0:?}")]
    UnknownSortOption(String),
}
