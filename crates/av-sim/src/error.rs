use av_core::{AgentId, CoreError};
use av_driver::DriverError;
use av_drivetrain::DrivetrainError;
use av_reservation::GridError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("reservation grid: {0}")]
    Grid(#[from] GridError),

    #[error("driver: {0}")]
    Driver(#[from] DriverError),

    #[error("drivetrain: {0}")]
    Drivetrain(#[from] DrivetrainError),
}

pub type SimResult<T> = Result<T, SimError>;
