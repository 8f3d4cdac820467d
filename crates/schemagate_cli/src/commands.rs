pub mod annotate;
pub mod init_db;
pub mod schema;
pub mod validate;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "schemagate")]
#[command(about = "Company_List entity validation and class-validator annotation.")]
#[command(version)]
pub struct CommandLine {
    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true, env = "SCHEMAGATE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files; logging is off without it
    #[arg(long, global = true, env = "SCHEMAGATE_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add class-validator decorators to a TypeORM entity file
    #[command(alias = "a")]
    Annotate {
        file: PathBuf,
        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip column defaults containing this marker (repeatable)
        #[arg(long = "ignore-default-marker")]
        ignore_default_marker: Vec<String>,
    },
    /// Validate a Company JSON document
    #[command(alias = "v")]
    Validate { file: PathBuf },
    /// Print the Company_List column mapping and SQLite DDL
    Schema,
    /// Create or migrate a Company_List database file
    InitDb { path: PathBuf },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
