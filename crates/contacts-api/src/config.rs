//! Server configuration
//!
//! Every option can be given as a flag or through the environment; flags win.

use anyhow::Context;
use clap::{Args, ValueEnum};
use contacts_core::{ContactStore, MemoryContactStore, SledContactStore, Validator};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// 1 MiB
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    /// Volatile in-process map
    Memory,
    /// Embedded sled database at `--db-path`
    Sled,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 5000, env = "PORT")]
    pub port: u16,

    /// Storage backend
    #[arg(long, value_enum, default_value_t = StoreBackend::Sled, env = "CONTACTS_STORE")]
    pub store: StoreBackend,

    /// Database directory for the sled backend
    #[arg(long, default_value = "data/contacts.db", env = "CONTACTS_DB_PATH")]
    pub db_path: PathBuf,

    /// Report every validation violation instead of only the first
    #[arg(long, env = "CONTACTS_REPORT_ALL_VIOLATIONS")]
    pub report_all_violations: bool,

    /// Maximum accepted request body size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES, env = "CONTACTS_MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Json, env = "LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            store: StoreBackend::Sled,
            db_path: PathBuf::from("data/contacts.db"),
            report_all_violations: false,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_format: LogFormat::Json,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }

    pub fn validator(&self) -> Validator {
        Validator::new().collect_all_errors(self.report_all_violations)
    }

    /// Open the configured store
    pub fn open_store(&self) -> anyhow::Result<Arc<dyn ContactStore>> {
        let store: Arc<dyn ContactStore> = match self.store {
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; contacts are lost on exit");
                Arc::new(MemoryContactStore::new())
            }
            StoreBackend::Sled => Arc::new(
                SledContactStore::open(&self.db_path).with_context(|| {
                    format!("failed to open database at {}", self.db_path.display())
                })?,
            ),
        };
        Ok(store)
    }
}
