//! `schemagate` command-line entry point.

mod commands;

use commands::{annotate, init_db, schema, validate, CommandLine, Commands};
use log::info;
use schemagate_core::{default_log_level, init_logging};

fn main() -> anyhow::Result<()> {
    let cli = CommandLine::parse_args();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
        info!(
            "event=cli_start module=cli status=ok version={}",
            schemagate_core::core_version()
        );
    }

    match cli.command {
        Commands::Annotate {
            file,
            output,
            ignore_default_marker,
        } => annotate::annotate(&file, output.as_deref(), ignore_default_marker),
        Commands::Validate { file } => validate::validate(&file),
        Commands::Schema => {
            schema::schema();
            Ok(())
        }
        Commands::InitDb { path } => init_db::init_db(&path),
    }
}
