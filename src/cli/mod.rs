//! The `ruby-canon` debugging binary.
//!
//! Reads raw tree dumps, normalizes them and prints the canonical trees. A
//! `# coding: NAME` comment on the first two lines of a dump sets the source
//! encoding, as a magic comment would in Ruby source.
//!
//! Logging goes to stderr and is controlled by `RUBY_CANON_LOG`, which takes
//! the same directives as `RUST_LOG`.

use clap::Parser;
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use std::{fs, process};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use crate::config::{detect_encoding, ParserConfig, SourceFile};
use crate::errors::NormalizeError;
use crate::parser::RubyParser;
use crate::raw::reader::read_dump;

pub mod args;
pub mod output;

use args::CanonArgs;

/// Extension of raw tree dump files when a directory is given.
pub const DUMP_EXTENSION: &str = "dump";

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("cannot read {}", .path.display())]
    #[diagnostic(code(ruby_canon::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {}", .path.display())]
    #[diagnostic(code(ruby_canon::config))]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot render output")]
    #[diagnostic(code(ruby_canon::output))]
    Output(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Normalize(#[from] NormalizeError),
}

/// The main entry point for the CLI.
pub fn run() {
    let args = CanonArgs::parse();
    init_tracing();

    if let Err(error) = execute(&args) {
        output::print_error(error);
        process::exit(1);
    }
}

/// Installs a stderr subscriber filtered by `RUBY_CANON_LOG` (default
/// `warn`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("RUBY_CANON_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn execute(args: &CanonArgs) -> Result<(), CliError> {
    let config = load_config(args)?;
    let parser = RubyParser::new(config);
    let files = dump_files(&args.path)?;
    let many = args.path.is_dir();
    info!(count = files.len(), "normalizing dumps");

    for path in files {
        let rendered = normalize_file(&parser, args, &path)?;
        if many {
            println!("== {}", path.display());
        }
        println!("{}", rendered);
    }
    Ok(())
}

fn load_config(args: &CanonArgs) -> Result<ParserConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let text = read(path)?;
            ParserConfig::from_json(&text).map_err(|source| CliError::Config {
                path: path.clone(),
                source,
            })?
        }
        None => ParserConfig::default(),
    };
    if args.extra_compatible {
        config.extra_compatible = true;
    }
    Ok(config)
}

/// The dump itself, or every `*.dump` below a directory in sorted order.
fn dump_files(path: &Path) -> Result<Vec<PathBuf>, CliError> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|error| CliError::Io {
            path: path.to_path_buf(),
            source: error.into(),
        })?;
        let is_dump = entry.path().extension().is_some_and(|ext| ext == DUMP_EXTENSION);
        if entry.file_type().is_file() && is_dump {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn normalize_file(parser: &RubyParser, args: &CanonArgs, path: &Path) -> Result<String, CliError> {
    let text = read(path)?;
    let origin = path.display().to_string();
    let filename = args.filename.clone().unwrap_or_else(|| origin.clone());
    debug!(path = %origin, "normalizing");

    let raw = read_dump(&text, &origin)?;
    let mut source = SourceFile::named(filename).with_lineno(args.line);
    let encoding = detect_encoding(&text, &source.filename)?;
    source = source.with_encoding(encoding);

    let tree = parser.normalize(raw, &source)?;
    Ok(output::render(tree.as_ref(), args.format, args.lines)?)
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}
