//! Error types for brick element evaluation

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ElementError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElementError {
    #[error("element nodes have not been set")]
    NodesNotSet,

    #[error("element material has not been set")]
    MaterialNotSet,

    #[error("element has not been initialized (call setup first)")]
    NotInitialized,

    #[error("element is already initialized; reference configuration is fixed")]
    AlreadyInitialized,

    #[error("{kind} node {index} not found in node store")]
    NodeNotFound { kind: &'static str, index: usize },

    #[error("non-positive Jacobian determinant {det:e} at parametric point {point:?}")]
    DegenerateGeometry { det: f64, point: [f64; 3] },

    #[error("{what}: expected size {expected:?}, found {found:?}")]
    DimensionMismatch {
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("sub-block {index} out of range (element has {count})")]
    InvalidBlock { index: usize, count: usize },

    #[error("invalid element dimensions: {0:?}")]
    InvalidDimensions([f64; 3]),

    #[error("missing material property: {0}")]
    MissingProperty(&'static str),

    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ElementError {
    fn from(err: serde_json::Error) -> Self {
        ElementError::Config(err.to_string())
    }
}
