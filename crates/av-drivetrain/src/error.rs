use thiserror::Error;

#[derive(Debug, Error)]
pub enum DrivetrainError {
    #[error("invalid drivetrain configuration: {0}")]
    Config(String),

    #[error("wheel index {0} out of range (vehicles have {1} wheels)")]
    WheelIndex(usize, usize),
}

pub type DrivetrainResult<T> = Result<T, DrivetrainError>;
