use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("reservation cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),
}

pub type GridResult<T> = Result<T, GridError>;
