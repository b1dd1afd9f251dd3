use anyhow::{Context, Result};
use circle_cli::commands::{self, TraceQuery};
use circle_cli::{BackendRegistry, Cli, Commands};
use circle_tracer::ProvenanceTracker;
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn run(cli: Cli, registry: &BackendRegistry) -> Result<String> {
    let output = match cli.command {
        Commands::Info { model, decode } => {
            let bytes = read(&model)?;
            commands::info(registry, &model, &bytes, &decode.config()?)
                .with_context(|| format!("failed to inspect {}", model.display()))?
        }
        Commands::Dump { model, decode } => {
            let bytes = read(&model)?;
            commands::dump(&bytes, &decode.config()?)
                .with_context(|| format!("failed to dump {}", model.display()))?
        }
        Commands::Json {
            model,
            pretty,
            decode,
        } => {
            let bytes = read(&model)?;
            commands::json(&bytes, &decode.config()?, pretty)
                .with_context(|| format!("failed to project {}", model.display()))?
        }
        Commands::Tensor {
            model,
            name,
            subgraph,
            decode,
        } => {
            let bytes = read(&model)?;
            commands::tensor(&bytes, &decode.config()?, &name, subgraph)?
        }
        Commands::Trace {
            passes,
            node,
            at,
            target,
            descendants,
            snapshot,
        } => {
            let json = std::fs::read_to_string(&passes)
                .with_context(|| format!("failed to read {}", passes.display()))?;
            let tracker = ProvenanceTracker::<String>::from_json(&json)
                .with_context(|| format!("invalid pass log {}", passes.display()))?;
            if let Some(path) = snapshot {
                std::fs::write(&path, tracker.to_snapshot()?)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                tracing::info!(path = %path.display(), passes = tracker.pass_count(), "wrote tracker snapshot");
            }
            let query = TraceQuery {
                node: &node,
                at,
                target,
                descendants,
            };
            commands::trace(&tracker, &query)?
        }
        Commands::Backends { path } => commands::backends(registry, path.as_deref()),
    };
    Ok(output)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = BackendRegistry::with_builtin()
        .map_err(anyhow::Error::from)
        .and_then(|registry| run(cli, &registry));

    match result {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
