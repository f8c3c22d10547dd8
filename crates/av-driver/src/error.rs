use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("invalid driver configuration: {0}")]
    Config(String),

    #[error("graph error: {0}")]
    Graph(#[from] av_graph::GraphError),
}

pub type DriverResult<T> = Result<T, DriverError>;
