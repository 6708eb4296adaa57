//! Error types for the contour pipeline
//!
//! All errors are detected eagerly at stage entry; once a stage starts it
//! assumes well-formed input. A failure aborts the whole pipeline run for
//! that input with a single descriptive error and no partial output.

/// Errors that can occur while running the contour pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Malformed input: empty speed field, or an empty/out-of-bounds seed set
    InvalidInput(String),
    /// The travel-time field contains no finite values to select levels from
    EmptyField,
    /// Level selection collapsed to a single repeated value even after
    /// falling back to the true maximum (constant travel-time field)
    DegenerateLevels,
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            PipelineError::EmptyField => {
                write!(f, "Travel-time field has no finite values")
            }
            PipelineError::DegenerateLevels => {
                write!(f, "Level selection collapsed to a single value")
            }
        }
    }
}

impl std::error::Error for PipelineError {}
