//! Error types for the detection engine.

use thiserror::Error;

/// Errors that can occur while building or running the engine.
///
/// Config/geometry errors always happen before any step runs; the rest
/// can happen mid-run, in which case output up to the prior step is valid.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Missing namelist field or mutually inconsistent configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Degenerate grid geometry or a missing privileged pressure level.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Reader/writer/store failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// NaN/Inf encountered where a finite mean was required.
    #[error("numeric error at cell ({i}, {j}): {detail}")]
    Numeric { i: usize, j: usize, detail: String },

    /// More than `NVMAX` detections in a single step.
    #[error("capacity error: {count} detections exceeds NVMAX ({nvmax})")]
    Capacity { count: usize, nvmax: usize },
}

impl EngineError {
    /// Process exit code for this error, per the detection-output contract.
    pub fn exit_code(&self) -> i32 {
        match self {
            EngineError::Config(_) => 2,
            EngineError::Geometry(_) => 3,
            EngineError::Io(_) => 4,
            EngineError::Numeric { .. } => 5,
            EngineError::Capacity { .. } => 6,
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
