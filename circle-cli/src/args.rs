use circle_reader::{ConfigError, DecoderConfig};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "circle", author, version, about = "Inspect circle models and pass provenance", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show schema version, digest and graph sizes
    Info {
        /// Path to the model file
        model: PathBuf,
        #[command(flatten)]
        decode: DecodeArgs,
    },
    /// Print a listing of every subgraph, tensor and operator
    Dump {
        model: PathBuf,
        #[command(flatten)]
        decode: DecodeArgs,
    },
    /// Print the model projection as JSON
    Json {
        model: PathBuf,
        /// Indent the output
        #[arg(long)]
        pretty: bool,
        #[command(flatten)]
        decode: DecodeArgs,
    },
    /// Look up tensors by name
    Tensor {
        model: PathBuf,
        /// Tensor name
        #[arg(long)]
        name: String,
        /// Subgraph index
        #[arg(long, default_value_t = 0)]
        subgraph: usize,
        #[command(flatten)]
        decode: DecodeArgs,
    },
    /// Query node provenance from a JSON pass log
    Trace {
        /// Pass log: [{"name", "nodes", "derivations"}, ...]
        passes: PathBuf,
        /// Node id to trace
        #[arg(long)]
        node: String,
        /// Pass the node belongs to
        #[arg(long)]
        at: usize,
        /// Pass to trace to (default: source graph, or the last pass with --descendants)
        #[arg(long)]
        target: Option<usize>,
        /// Trace forward instead of backward
        #[arg(long)]
        descendants: bool,
        /// Write a bincode snapshot of the loaded tracker
        #[arg(long, value_name = "FILE")]
        snapshot: Option<PathBuf>,
    },
    /// List registered backends and executors
    Backends {
        /// Report which executor would handle this file
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Flags shared by every command that decodes a model
#[derive(Args, Debug, Clone, Default)]
pub struct DecodeArgs {
    /// Buffer starts with a u32 length
    #[arg(long)]
    pub size_prefixed: bool,
    /// Expected 4-character file identifier
    #[arg(long, value_name = "XXXX")]
    pub identifier: Option<String>,
    /// Walk the whole model before reading
    #[arg(long)]
    pub verify: bool,
}

impl DecodeArgs {
    pub fn config(&self) -> Result<DecoderConfig, ConfigError> {
        let config = match &self.identifier {
            Some(identifier) => DecoderConfig::with_identifier(identifier)?,
            None => DecoderConfig::DEFAULT,
        };
        Ok(config.size_prefixed(self.size_prefixed).verify(self.verify))
    }
}
