use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use crate::{
    archive::extract_archive,
    assemble::assemble,
    config::EngineConfig,
    engine::run_engine,
    error::Error,
    types::{CompileOutcome, CompileRequest, Diagnostic, FailureReason},
    workspace::Workspace,
    Result,
};

/// Compilation orchestrator.
///
/// Each request runs through a fresh workspace that is destroyed before
/// the outcome is returned; requests share nothing except the engine's
/// cache directory, which the engine itself keeps concurrency-safe. A
/// semaphore caps how many engine processes run at once.
#[derive(Clone)]
pub struct CompileService {
    config: Arc<EngineConfig>,
    semaphore: Arc<Semaphore>,
}

impl CompileService {
    pub async fn new(config: EngineConfig, max_concurrent: usize) -> Result<Self> {
        tokio::fs::create_dir_all(&config.cache_dir).await?;
        Ok(Self {
            config: Arc::new(config),
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
        })
    }

    /// Compile one request to completion.
    ///
    /// Every request-level failure (rejected archive, engine error,
    /// timeout, missing artifact) comes back as `CompileOutcome::Failure`;
    /// `Err` is reserved for faults of the service itself, such as an
    /// unlocatable engine binary. The workspace is released on all paths.
    pub async fn compile(&self, request: CompileRequest) -> Result<CompileOutcome> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| Error::Workspace(format!("Failed to acquire compile permit: {e}")))?;

        let CompileRequest { source, assets } = request;
        let workspace = Workspace::create().await?;

        if let Some(assets) = assets {
            debug!("Extracting {} byte asset archive", assets.len());
            // Extraction is blocking std IO; keep it off the async executor.
            let dest = workspace.root().to_path_buf();
            let extracted =
                tokio::task::spawn_blocking(move || extract_archive(&assets, &dest))
                    .await
                    .map_err(|e| Error::Workspace(format!("Extraction task failed: {e}")))?;
            if let Err(e) = extracted {
                return match e {
                    Error::InvalidArchive(detail) => {
                        info!("Rejected asset archive: {}", detail);
                        Ok(CompileOutcome::Failure(Diagnostic::new(
                            FailureReason::InvalidArchive,
                            String::new(),
                            detail,
                        )))
                    }
                    other => Err(other),
                };
            }
        }

        // Written after extraction: the uploaded document always wins a
        // name collision with an archive entry.
        workspace
            .write_source(&self.config.main_filename, &source)
            .await?;

        let run = run_engine(&self.config, workspace.root()).await?;
        let outcome = assemble(workspace.root(), &self.config.main_filename, run).await;

        match &outcome {
            Ok(CompileOutcome::Success(_)) => info!("Compilation completed successfully"),
            Ok(CompileOutcome::Failure(d)) => info!("Compilation failed: {:?}", d.reason),
            Err(e) => error!("Compilation errored: {}", e),
        }

        outcome
    }

    /// Remaining concurrent-compilation permits.
    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
