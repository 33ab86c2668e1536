//! Contacts service entry point
//!
//! # Usage
//!
//! ```bash
//! # Persistent store under ./data
//! contacts-server --port 5000 --db-path data/contacts.db
//!
//! # Throwaway in-memory store with readable logs
//! contacts-server --store memory --log-format pretty
//! ```

use clap::Parser;
use contacts_api::{init_tracing, serve, ServerConfig};

#[derive(Parser)]
#[command(name = "contacts-server")]
#[command(about = "REST API for managing contact records")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    config: ServerConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.config.log_format)?;

    serve(cli.config).await
}
