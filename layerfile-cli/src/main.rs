//! Command-line interface for Layerfiles
//! Prints the lexer tokens or the semantic highlighting of a Layerfile as JSON, which is handy
//! when debugging what an editor will show.
//!
//! Usage:
//!   layerfile `<path>` [--format tokens|spans|encoded] [--config `<file>`]

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use layerfile_config::{ConfigError, LayerfileConfig, Loader};
use layerfile_lsp::{collect_semantic_spans, encode_semantic_tokens, logging, Legend};
use layerfile_parser::tokenize;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(
    name = "layerfile",
    version,
    about = "Inspect the tokens and semantic highlighting of a Layerfile"
)]
struct Cli {
    /// Path to the Layerfile
    path: PathBuf,

    /// What to print
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Spans)]
    format: OutputFormat,

    /// Configuration file layered over the built-in defaults
    #[arg(long, short)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Lexer tokens with kind, line, column and text
    Tokens,
    /// Highlight spans with 0-based positions and category names
    Spans,
    /// LSP relative encoding: [deltaLine, deltaStart, length, tokenType, tokenModifiers]
    Encoded,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_ref())?;
    logging::init(&config.logging.filter);

    let source = std::fs::read_to_string(&cli.path).map_err(|source| CliError::Io {
        path: cli.path.clone(),
        source,
    })?;
    println!("{}", render(&source, cli.format, &config)?);
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<LayerfileConfig, ConfigError> {
    let loader = match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new(),
    };
    loader.build()
}

fn render(
    source: &str,
    format: OutputFormat,
    config: &LayerfileConfig,
) -> Result<String, CliError> {
    let output = match format {
        OutputFormat::Tokens => serde_json::to_string_pretty(&tokenize(source))?,
        OutputFormat::Spans => serde_json::to_string_pretty(&collect_semantic_spans(
            source,
            config.highlighting.value_span,
        ))?,
        OutputFormat::Encoded => {
            let spans = collect_semantic_spans(source, config.highlighting.value_span);
            let rows: Vec<[u32; 5]> = encode_semantic_tokens(&spans, &Legend::standard())
                .iter()
                .map(|token| {
                    [
                        token.delta_line,
                        token.delta_start,
                        token.length,
                        token.token_type,
                        token.token_modifiers_bitset,
                    ]
                })
                .collect();
            serde_json::to_string(&rows)?
        }
    };
    Ok(output)
}
