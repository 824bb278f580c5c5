use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    #[error("Engine binary not found: {0}")]
    EngineNotFound(String),

    #[error("Workspace error: {0}")]
    Workspace(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
