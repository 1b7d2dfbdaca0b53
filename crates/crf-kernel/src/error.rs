use thiserror::Error;

pub type KernelResult<T> = Result<T, KernelError>;

/// Failures surfaced by the mesh model and reference catalog.
#[derive(Debug, Clone, Error)]
pub enum KernelError {
    /// No reference geometry exists under this canonical name.
    #[error("no reference geometry for \"{name}\"")]
    NotFound { name: String },

    /// A mesh traversal broke an invariant (missing twin, unclosed cycle,
    /// iteration bound exceeded). Signals a bug in whatever produced the
    /// mesh; never retryable.
    #[error("mesh invariant violated: {detail}")]
    InvariantViolation { detail: String },

    /// Geometry degenerate below tolerance (zero-length edge, zero-area
    /// face, unnormalizable direction).
    #[error("degenerate geometry: {detail}")]
    DegenerateGeometry { detail: String },

    /// A face index or face shape does not fit the requested operation.
    #[error("face {face} unsuitable: {detail}")]
    UnsuitableFace { face: usize, detail: String },
}

impl KernelError {
    pub fn invariant(detail: impl Into<String>) -> Self {
        KernelError::InvariantViolation {
            detail: detail.into(),
        }
    }

    pub fn degenerate(detail: impl Into<String>) -> Self {
        KernelError::DegenerateGeometry {
            detail: detail.into(),
        }
    }
}
