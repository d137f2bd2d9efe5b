//! Error types for the vortex panel solver.
//!
//! Every fallible operation returns `VortexResult<T>`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VortexError {
    /// Coordinates are non-finite or otherwise malformed.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A panel whose two nodes coincide.
    #[error("Degenerate panel #{id}: length {length:.3e} is below tolerance")]
    DegeneratePanel { id: usize, length: f64 },

    /// Induction evaluated at (or extremely close to) the vortex itself.
    #[error("Singular induction: collocation point lies {distance:.3e} from the vortex")]
    SingularInduction { distance: f64 },

    /// An airfoil needs at least two nodes to form one panel.
    #[error("Insufficient nodes: an airfoil needs at least 2, got {count}")]
    InsufficientNodes { count: usize },

    /// A derived quantity was requested before its inputs were available.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// The influence matrix could not be factorized.
    #[error("Influence matrix for {panels} panels is singular")]
    SingularSystem { panels: usize },

    /// Coordinate file content could not be parsed.
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Run configuration is missing, malformed or out of range.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenience alias for `Result<T, VortexError>`.
pub type VortexResult<T> = Result<T, VortexError>;
