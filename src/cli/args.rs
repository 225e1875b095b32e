//! Command-line arguments for the `ruby-canon` binary.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "ruby-canon",
    version,
    about = "Normalize Ripper-style raw parse tree dumps into canonical s-expressions."
)]
pub struct CanonArgs {
    /// A raw tree dump, or a directory searched for `*.dump` files.
    #[arg(required = true)]
    pub path: PathBuf,

    /// Filename reported by `__FILE__` and in error messages. Defaults to
    /// the dump's own path.
    #[arg(long)]
    pub filename: Option<String>,

    /// Line number of the first source line.
    #[arg(long, default_value_t = 1)]
    pub line: usize,

    /// Keep literal bytes in the source encoding.
    #[arg(long)]
    pub extra_compatible: bool,

    /// Parser configuration as a JSON file; flags given on the command line
    /// take precedence.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Sexp)]
    pub format: OutputFormat,

    /// Annotate every node with its line (`s(...)@line`).
    #[arg(long)]
    pub lines: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `s(:call, nil, :foo)`
    Sexp,
    /// The tree serialized with serde.
    Json,
}
