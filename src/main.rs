//! Kanban MCP Server - Main Entry Point
//!
//! This is the main entry point for the kanban MCP server application.
//! The actual implementation is in the `kanban_mcp` library.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use kanban_mcp::KanbanServerHandler;
use mcp_attr::server::serve_stdio;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Kanban MCP Server - move board items between columns, kept in sync with a REST backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the board file (TOML)
    file: String,

    /// Confirm changes locally instead of calling the remote store
    #[arg(long)]
    offline: bool,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries the MCP transport, so logs go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        // No arguments provided, show help and exit with error code
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!(); // Add a newline after help
        std::process::exit(2);
    }

    let args = Args::parse();
    init_logging(args.verbose);

    let handler = KanbanServerHandler::new(&args.file, args.offline)?;
    serve_stdio(handler).await?;
    Ok(())
}
