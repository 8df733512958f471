use thiserror::Error;

/// Errors surfaced by the environment, its agents and its log sinks.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("unsupported render mode: {0}")]
    UnsupportedMode(String),
    #[error("{capability} is not implemented by agent {agent}")]
    NotImplemented {
        agent: String,
        capability: &'static str,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("unrecognized agent spec: {0}")]
    UnknownAgent(String),
    #[error("log sink i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("log sink serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}
