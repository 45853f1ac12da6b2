use clap::Parser;
use netsweep::cli::{Cli, Commands};
use netsweep::config::AppSettings;
use netsweep::error::CliResult;
use netsweep::logging::{self, Verbosity};
use netsweep::output;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.verbose, cli.quiet))?;

    match run(cli).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            output::print_error(&e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let settings = AppSettings::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Scan(cmd) => cmd.execute(settings, cli.quiet).await,
        Commands::Serve(cmd) => cmd.execute(settings, cli.quiet).await,
        Commands::Export(cmd) => cmd.execute(cli.quiet),
    }
}
