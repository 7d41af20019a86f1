#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod logging;

use clap::Parser;
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "esmext")]
#[command(author, version, about = "Add explicit file extensions to relative ESM specifiers", long_about = None)]
struct Cli {
    /// Project to convert: a tsconfig.json or a directory containing one
    #[arg(value_name = "PROJECT")]
    project: Option<PathBuf>,

    /// Log every visited file and every candidate path that did not exist
    #[arg(long)]
    debug: bool,

    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Show which files would change without writing them
    #[arg(long)]
    dry_run: bool,

    /// Print the conversion report as one JSON object on stdout
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if matches!(cli.command, Some(Commands::Version)) {
        return commands::version::run();
    }

    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let verbosity = if cli.debug { cli.verbose.max(1) } else { cli.verbose };
    logging::init(verbosity, cli.json_logs);

    let action = commands::convert::ConvertAction {
        cwd,
        project: cli.project,
        debug: cli.debug || cli.verbose > 0,
        dry_run: cli.dry_run,
    };

    let span = tracing::info_span!("convert", cmd = "convert", cwd = %action.cwd.display());
    let _guard = span.enter();
    commands::convert::run(action, cli.json)
}
