//! Serve subcommand implementation.

use crate::api::{self, AppState};
use crate::config::AppSettings;
use crate::error::CliResult;
use crate::output;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};

/// Run the HTTP API and dashboard.
#[derive(Parser, Debug)]
pub struct ServeCommand {
    /// Address to bind (defaults to the configured bind address)
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<IpAddr>,

    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeCommand {
    /// Resolve the listen address from flags and settings.
    pub fn address(&self, settings: &AppSettings) -> SocketAddr {
        SocketAddr::new(
            self.bind.unwrap_or(settings.bind_address),
            self.port.unwrap_or(settings.port),
        )
    }

    pub async fn execute(&self, settings: AppSettings, quiet: bool) -> CliResult<()> {
        let addr = self.address(&settings);
        let state = AppState::from_settings(&settings)?;

        if !quiet {
            output::print_info(&format!("Dashboard available at http://{}", addr));
        }
        api::serve(state, addr).await?;
        Ok(())
    }
}
