use thiserror::Error;

/// Top-level error type for the cycle engine.
#[derive(Debug, Error)]
pub enum VacError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors related to cells and boundary graphs.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("wrong cell kind: expected {expected}")]
    WrongCellKind { expected: &'static str },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// A caller broke the contract of a surgery operation.
    #[error("invariant violated: {0}")]
    InvariantViolated(String),
}

/// Errors raised while reading the textual boundary formats.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("malformed token `{0}`")]
    MalformedToken(String),

    #[error("expected a multiple of {expected} fields, found {found}")]
    WrongFieldCount { expected: usize, found: usize },

    #[error("reference to unknown node id {0}")]
    UnknownNodeId(u32),

    #[error("node id {0} declared twice")]
    DuplicateNodeId(u32),
}

/// Convenience type alias for results using [`VacError`].
pub type Result<T> = std::result::Result<T, VacError>;
