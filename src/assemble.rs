use std::path::Path;

use tokio::fs;
use tracing::{error, info};

use crate::{
    engine::EngineRun,
    types::{Artifact, CompileOutcome, Diagnostic, FailureReason, PDF_MEDIA_TYPE},
    Result,
};

/// Derive the expected artifact filename from the configured main filename:
/// same basename, `.pdf` extension.
pub(crate) fn artifact_filename(main_filename: &str) -> String {
    let stem = Path::new(main_filename)
        .file_stem()
        .unwrap_or_else(|| main_filename.as_ref());
    format!("{}.pdf", stem.to_string_lossy())
}

/// Translate an engine run into the caller-facing outcome.
///
/// A zero exit without the expected artifact is an internal inconsistency
/// (the engine claimed success but produced nothing) and is reported as
/// `missing_artifact`, never as an empty success body.
pub(crate) async fn assemble(
    workspace: &Path,
    main_filename: &str,
    run: EngineRun,
) -> Result<CompileOutcome> {
    match run {
        EngineRun::Exited {
            code: 0,
            stdout,
            stderr,
        } => {
            let filename = artifact_filename(main_filename);
            let path = workspace.join(&filename);
            match fs::read(&path).await {
                Ok(bytes) => {
                    info!("Compilation produced {} ({} bytes)", filename, bytes.len());
                    Ok(CompileOutcome::Success(Artifact {
                        filename,
                        bytes,
                        media_type: PDF_MEDIA_TYPE,
                    }))
                }
                Err(_) => {
                    error!("Engine exited zero but {} is missing", filename);
                    Ok(CompileOutcome::Failure(Diagnostic::new(
                        FailureReason::MissingArtifact,
                        stdout,
                        stderr,
                    )))
                }
            }
        }
        EngineRun::Exited {
            code,
            stdout,
            stderr,
        } => {
            info!("Engine exited with status {}", code);
            Ok(CompileOutcome::Failure(Diagnostic::new(
                FailureReason::NonzeroExit,
                stdout,
                stderr,
            )))
        }
        EngineRun::TimedOut => Ok(CompileOutcome::Failure(Diagnostic::new(
            FailureReason::Timeout,
            String::new(),
            String::new(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_name_tracks_main_file_basename() {
        assert_eq!(artifact_filename("main.tex"), "main.pdf");
        assert_eq!(artifact_filename("paper.tex"), "paper.pdf");
        assert_eq!(artifact_filename("thesis"), "thesis.pdf");
    }
}
