//! Errors surfaced to callers of the scoring and labeling entry points.
//!
//! Each variant knows the integer code the C ABI returns for it.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("too many rows: {rows} exceeds the segment cap of {cap}")]
    OverCapacity { rows: usize, cap: usize },
}

impl ScoreError {
    pub fn code(&self) -> i32 {
        match self {
            ScoreError::InvalidInput(_) => -1,
            ScoreError::OverCapacity { .. } => -2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("label buffer is null or empty")]
    InvalidBuffer,
}

impl LabelError {
    pub fn code(&self) -> i32 {
        -1
    }
}
