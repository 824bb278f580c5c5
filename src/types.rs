use serde::{Deserialize, Serialize};

/// Media type of the artifact produced by every supported engine.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A single compilation request: the primary document plus optional assets.
///
/// Both fields are already-decoded byte streams; multipart parsing belongs
/// to the layer in front of this crate.
#[derive(Debug, Clone)]
pub struct CompileRequest {
    /// Primary LaTeX source. Persisted under the configured main filename,
    /// never under a client-supplied name.
    pub source: Vec<u8>,
    /// Optional ZIP archive of supporting assets (images, classes, bib files).
    pub assets: Option<Vec<u8>>,
}

/// Outcome of one compilation request.
#[derive(Debug, Clone)]
pub enum CompileOutcome {
    /// The engine exited zero and produced the expected artifact.
    Success(Artifact),
    /// Anything else: rejected input, engine failure, timeout, or an
    /// engine that claimed success without producing output.
    Failure(Diagnostic),
}

/// The compiled binary output.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Artifact filename, derived from the configured main filename.
    pub filename: String,
    /// Raw artifact bytes, exactly as the engine wrote them.
    pub bytes: Vec<u8>,
    /// Media type for the response.
    pub media_type: &'static str,
}

/// Structured explanation of a failed compilation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What went wrong.
    pub reason: FailureReason,
    /// Captured engine stdout (empty when the engine never ran or was killed).
    pub stdout: String,
    /// Captured engine stderr; for rejected archives this carries the
    /// rejection detail naming the offending entry.
    pub stderr: String,
}

/// Failure discriminator surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The engine exited with a nonzero status.
    NonzeroExit,
    /// The deadline elapsed and the engine process tree was killed.
    Timeout,
    /// The engine exited zero but the expected artifact is absent.
    MissingArtifact,
    /// The asset archive was rejected before the engine ran.
    InvalidArchive,
}

impl Diagnostic {
    pub(crate) fn new(reason: FailureReason, stdout: String, stderr: String) -> Self {
        Self {
            reason,
            stdout,
            stderr,
        }
    }
}
