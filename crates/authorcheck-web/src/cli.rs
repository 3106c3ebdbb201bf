use crate::presentation::OutcomeView;
use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::PathBuf;

/// Exit status of `classify` when there is nothing to analyze
pub const EXIT_EMPTY_INPUT: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "authorcheck")]
#[command(
    author,
    version,
    about = "Guess whether a piece of text was written by a human or an AI"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web page
    Serve {
        #[command(flatten)]
        model: ModelArgs,

        /// Listen address
        #[arg(short, long)]
        address: Option<String>,

        /// Listen port
        #[arg(short, long)]
        port: Option<u16>,

        /// Load the model on the first analysis instead of at startup
        #[arg(long)]
        lazy: bool,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,

        /// Log output format
        #[arg(long, value_enum, default_value_t = LogFormat::Text)]
        log_format: LogFormat,
    },

    /// Classify one text and print the verdict
    Classify {
        #[command(flatten)]
        model: ModelArgs,

        /// Text to analyze (reads stdin when neither this nor --file is given)
        text: Option<String>,

        /// Read the text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Options shared by every command that loads the model
#[derive(Args, Debug, Clone, Default)]
pub struct ModelArgs {
    /// Configuration file (defaults to ./authorcheck.yaml when present)
    #[arg(short, long, env = "AUTHORCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Hugging Face repo id or local model directory
    #[arg(long)]
    pub model: Option<String>,

    /// Inference device: cpu, cuda or metal
    #[arg(long)]
    pub device: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Text for `classify`: the argument, else the file, else `stdin` to EOF
pub fn read_input(
    text: Option<String>,
    file: Option<PathBuf>,
    mut stdin: impl Read,
) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    let mut input = String::new();
    stdin
        .read_to_string(&mut input)
        .context("Failed to read stdin")?;
    Ok(input)
}

/// Process exit status for a `classify` outcome
pub fn exit_status(view: &OutcomeView) -> i32 {
    match view {
        OutcomeView::ValidationError { .. } => EXIT_EMPTY_INPUT,
        _ => 0,
    }
}
