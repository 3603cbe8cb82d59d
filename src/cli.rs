use clap::{Parser, Subcommand};

/// StarLine dashboard — telemetry poller and maintenance log
#[derive(Parser)]
#[command(name = "starline-dash", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the background refresher and the dashboard server
    Serve {
        /// Port to bind (defaults to STARLINE_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run a single refresh cycle and exit
    Refresh,

    /// Print the cached status without contacting StarLine
    Status,
}
