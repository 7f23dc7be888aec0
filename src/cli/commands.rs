use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "todo-manager")]
#[command(version, about = "An in-memory REST service for projects, todos and categories")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server until `/shutdown` or Ctrl-C
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Interface to bind (default 127.0.0.1)
    #[arg(long, env = "TODO_MANAGER_HOST")]
    pub host: Option<String>,

    /// Port to listen on (default 4567)
    #[arg(long, short = 'p', env = "TODO_MANAGER_PORT")]
    pub port: Option<u16>,

    /// YAML config file
    #[arg(long, short = 'c', env = "TODO_MANAGER_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (e.g. "debug", "todo_manager=trace")
    #[arg(long)]
    pub log_filter: Option<String>,
}
