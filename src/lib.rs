//! # LaTeX Compilation Service
//!
//! A sandboxed LaTeX compilation core. Each request gets an isolated
//! workspace seeded with the uploaded document and optional assets, the
//! configured engine runs inside it as a subprocess under a hard deadline,
//! and the outcome is classified into a PDF artifact or a structured
//! diagnostic. The workspace is destroyed on every exit path.

mod archive;
mod assemble;
mod config;
mod engine;
mod error;
mod service;
mod types;
mod workspace;


pub use archive::extract_archive;
pub use config::EngineConfig;
pub use error::Error;
pub use service::CompileService;
pub use types::{
    Artifact, CompileOutcome, CompileRequest, Diagnostic, FailureReason, PDF_MEDIA_TYPE,
};
pub use workspace::Workspace;

/// Result type for compilation service operations
pub type Result<T> = std::result::Result<T, Error>;
