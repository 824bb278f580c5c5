use std::path::{Path, PathBuf};
use std::process::Stdio;

use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::process::Command;
use tokio::time::{self, Duration};
use tracing::{debug, warn};

use crate::{config::EngineConfig, error::Error, Result};

/// How long to wait after killing the process group before returning, so
/// the kill has taken effect and the child can be reaped.
const KILL_GRACE: Duration = Duration::from_millis(100);

/// How one engine invocation ended, as seen by the invoker.
///
/// Classification of nonzero exits and missing artifacts into caller-facing
/// diagnostics happens downstream in the assembler.
#[derive(Debug)]
pub(crate) enum EngineRun {
    /// The engine exited before the deadline. A process killed by a signal
    /// carries code -1.
    Exited {
        code: i32,
        stdout: String,
        stderr: String,
    },
    /// The deadline elapsed; the whole process group was killed. The
    /// captured streams go down with the child, so none are carried here.
    TimedOut,
}

/// Run the configured engine inside `workspace` under the configured
/// deadline, capturing both output streams in full.
///
/// The child is spawned into its own process group; on timeout the entire
/// group is SIGKILLed, since LaTeX engines fork auxiliary tools that must
/// not outlive the request. Total blocking time is bounded by the timeout
/// plus a small constant grace period.
pub(crate) async fn run_engine(config: &EngineConfig, workspace: &Path) -> Result<EngineRun> {
    let binary = resolve_engine(&config.engine)?;
    let args = engine_args(config, workspace);
    debug!("Invoking {} {:?} in {}", binary.display(), args, workspace.display());

    let mut command = Command::new(&binary);
    command
        .args(&args)
        .arg(&config.main_filename)
        .current_dir(workspace)
        .env("TECTONIC_CACHE_DIR", &config.cache_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    command.process_group(0);

    let child = command.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::EngineNotFound(config.engine.clone())
        } else {
            Error::Io(e)
        }
    })?;
    let child_id = child.id();

    match time::timeout(config.timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(EngineRun::Exited {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }),
        Ok(Err(e)) => Err(Error::Io(e)),
        Err(_) => {
            warn!(
                "Engine exceeded {:?} deadline, killing process group",
                config.timeout
            );
            if let Some(id) = child_id {
                // The child leads its own process group, so this takes out
                // any helper processes the engine forked as well.
                let _ = killpg(Pid::from_raw(id as i32), Signal::SIGKILL);
            }
            time::sleep(KILL_GRACE).await;
            Ok(EngineRun::TimedOut)
        }
    }
}

/// Resolve the configured engine to an executable path. An explicit path
/// is used as-is; a bare name is looked up on `PATH`.
fn resolve_engine(engine: &str) -> Result<PathBuf> {
    let path = Path::new(engine);
    if path.components().count() > 1 {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(Error::EngineNotFound(engine.to_string()));
    }
    which::which(engine).map_err(|_| Error::EngineNotFound(engine.to_string()))
}

/// Flags preceding the positional main-file argument, tailored to the
/// engine. Tectonic has its own CLI surface; everything else is assumed to
/// speak the common TeX Live dialect.
fn engine_args(config: &EngineConfig, workspace: &Path) -> Vec<String> {
    if config.engine.to_ascii_lowercase() == "tectonic" {
        vec![
            "--synctex=0".into(),
            "--keep-intermediates".into(),
            "--keep-logs".into(),
            "--outdir".into(),
            workspace.display().to_string(),
        ]
    } else {
        vec![
            "-interaction=nonstopmode".into(),
            "-halt-on-error".into(),
            "-output-directory".into(),
            workspace.display().to_string(),
        ]
    }
}
