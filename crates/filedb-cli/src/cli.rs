use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "filedb",
    about = "Records stored as YAML and JSON files in a directory tree",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file
    #[arg(long, global = true, default_value = "filedb.toml")]
    pub config: PathBuf,

    /// Root of the record tree (overrides the config file)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Definition file, YAML or TOML (overrides the config file)
    #[arg(long, global = true)]
    pub definition: Option<PathBuf>,

    /// Author recorded in change descriptions (overrides the config file)
    #[arg(long, global = true)]
    pub author: Option<String>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print a record
    Get(KeyArgs),
    /// Create or replace a record
    Set(WriteArgs),
    /// Create a record that must not exist yet
    Insert(WriteArgs),
    /// Delete a record
    Delete(KeyArgs),
    /// List the files of a collection
    Ls(LsArgs),
    /// Show the change history of the tree
    History(HistoryArgs),
}

#[derive(Args)]
pub struct KeyArgs {
    pub collection: String,
    pub key: String,
}

#[derive(Args)]
pub struct WriteArgs {
    pub collection: String,
    pub key: String,
    /// Record fields as a JSON object
    pub json: String,
}

#[derive(Args)]
pub struct LsArgs {
    pub collection: String,
}

#[derive(Args)]
pub struct HistoryArgs {
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}
