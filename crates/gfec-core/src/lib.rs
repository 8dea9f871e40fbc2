//! Shared constants and the error type for the gfec workspace.

/// Number of elements in GF(2^8).
pub const FIELD_SIZE: usize = 256;

/// Bytes of expanded table generated per coefficient (two 16-entry nibble tables).
pub const TABLE_BYTES: usize = 32;

/// Upper bound on coded rows `m`. Cauchy coefficients index rows by byte.
pub const MAX_ROWS: usize = 256;

pub type EcResult<T> = Result<T, EcError>;

/// Errors returned by field, matrix and codec operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcError {
    /// A scalar operation was applied to an element outside its domain.
    #[error("{op} is undefined for element {value:#04x}")]
    Domain {
        /// Name of the operation (`inverse`, `divide`).
        op: &'static str,
        /// The offending element.
        value: u8,
    },

    /// Gaussian elimination found no nonzero pivot.
    #[error("matrix is singular: no pivot in column {column}")]
    SingularMatrix {
        /// Column in which elimination stalled.
        column: usize,
    },

    /// A size or shape contract was violated at the API boundary.
    #[error("precondition violated: {0}")]
    Precondition(#[from] Precondition),
}

/// The specific size contract a caller broke.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Precondition {
    #[error("invalid geometry k={k}, m={m} (need 1 <= k < m <= {max})", max = MAX_ROWS)]
    InvalidGeometry { k: usize, m: usize },

    #[error("block length must be at least one byte")]
    EmptyBlock,

    #[error("matrix has no rows")]
    EmptyMatrix,

    #[error("{what}: expected {expected}, got {got}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{what} does not fit in usize")]
    SizeOverflow { what: &'static str },

    #[error("expanded table holds {got} bytes, {expected} required")]
    TableSize { expected: usize, got: usize },

    #[error("{what} buffer count: expected {expected}, got {got}")]
    BufferCount {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{what} buffer {index} holds {got} bytes, {needed} required")]
    BufferTooShort {
        what: &'static str,
        index: usize,
        needed: usize,
        got: usize,
    },

    #[error("{erasures} erasures exceed the {max} recoverable rows")]
    TooManyErasures { erasures: usize, max: usize },

    #[error("row {row} is outside 0..{rows}")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("row {row} is listed as erased more than once")]
    DuplicateErasure { row: usize },

    #[error("erasure descriptor is inconsistent: {0}")]
    InconsistentErasures(&'static str),
}

impl EcError {
    /// True for [`EcError::SingularMatrix`].
    pub fn is_singular(&self) -> bool {
        matches!(self, EcError::SingularMatrix { .. })
    }
}
