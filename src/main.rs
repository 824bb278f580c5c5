use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tex_exec::{CompileOutcome, CompileRequest, CompileService, EngineConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// LaTeX source file to compile
    tex_file: PathBuf,

    /// Optional ZIP archive of supporting assets
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Where to write the compiled PDF
    #[arg(short, long, default_value = "out.pdf")]
    output: PathBuf,

    /// Maximum number of concurrent compilations
    #[arg(long, default_value = "4")]
    max_concurrent: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = EngineConfig::from_env().context("invalid engine configuration")?;
    let service = CompileService::new(config, args.max_concurrent).await?;
    let effective = service.config();
    tracing::info!(
        "Using engine {} with {:?} timeout, main file {}",
        effective.engine,
        effective.timeout,
        effective.main_filename
    );

    let source = tokio::fs::read(&args.tex_file)
        .await
        .with_context(|| format!("failed to read {}", args.tex_file.display()))?;
    let assets = match &args.assets {
        Some(path) => Some(
            tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        None => None,
    };

    match service.compile(CompileRequest { source, assets }).await? {
        CompileOutcome::Success(artifact) => {
            tokio::fs::write(&args.output, &artifact.bytes).await?;
            println!("{}", args.output.display());
            Ok(())
        }
        CompileOutcome::Failure(diagnostic) => {
            eprintln!("{}", serde_json::to_string_pretty(&diagnostic)?);
            std::process::exit(1);
        }
    }
}
