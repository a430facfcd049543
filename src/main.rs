use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use log::error;
use migration_adapters::PipelineKind;
use migration_core::{ConsoleOperator, Operator};
use wb_migration::{commands, logging, CliError, MigrationConfig, Overrides, PipelineSelection};

#[derive(Parser, Debug)]
#[command(author, version, about = "ACeDB to Datomic migration driver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level filter (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Root directory of all migration artefacts
    #[arg(long, global = true)]
    base_path: Option<PathBuf>,

    /// File holding the resume marker
    #[arg(long, global = true)]
    state_path: Option<PathBuf>,

    /// ACeDB data release, e.g. WS260
    #[arg(long, global = true)]
    release: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs the migration, resuming after the last successful step.
    Run(PipelineArgs),
    /// Rewinds the resume marker to an earlier step.
    ResetToStep(PipelineArgs),
    /// Shows the resume marker and the numbered step list.
    Status(PipelineArgs),
    /// Removes data from a previous migration run.
    CleanPreviousState {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct PipelineArgs {
    /// full, convert or import
    #[arg(long, default_value = "full")]
    pipeline: PipelineKind,

    /// Skip the operator confirmation before the database backup
    #[arg(long)]
    no_gate: bool,
}

impl PipelineArgs {
    fn selection(&self) -> PipelineSelection {
        PipelineSelection { kind: self.pipeline,
                            gate: !self.no_gate }
    }
}

fn dispatch(command: Commands, cfg: &MigrationConfig) -> Result<(), CliError> {
    let operator: Arc<dyn Operator> = Arc::new(ConsoleOperator::stdio());
    match command {
        Commands::Run(args) => commands::run(cfg, args.selection(), operator),
        Commands::ResetToStep(args) => commands::reset(cfg, args.selection(), operator).map(|_| ()),
        Commands::Status(args) => {
            let mut out = std::io::stdout();
            commands::status(cfg, args.selection(), operator, &mut out)
        }
        Commands::CleanPreviousState { yes } => commands::clean(cfg, yes, operator.as_ref()).map(|_| ()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let cfg = MigrationConfig::from_env().with_overrides(Overrides { base_path: cli.base_path,
                                                                     state_path: cli.state_path,
                                                                     release: cli.release });
    if let Err(e) = logging::init(&cli.log_level, Some(&cfg.log_file)) {
        eprintln!("error: {e}");
        return ExitCode::from(e.exit_code());
    }
    match dispatch(cli.command, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
