use crate::config::ServerConfig;
use crate::core_auth::{Authenticator, Credential};
use crate::core_directory::{DirectoryService, LocalDirectory};
use crate::core_network::network;
use crate::core_transfer::TransferOptions;
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Read-only state shared by every session.
pub struct ServerContext {
    pub authenticator: Authenticator,
    pub directory: Arc<dyn DirectoryService>,
    pub options: TransferOptions,
    pub idle_timeout: Option<Duration>,
    pub root_dir: PathBuf,
}

impl ServerContext {
    pub fn new(config: &ServerConfig, credential: Credential) -> Result<Self> {
        Ok(Self {
            authenticator: Authenticator::new(credential),
            directory: Arc::new(LocalDirectory),
            options: config.transfer_options(),
            idle_timeout: config.idle_timeout(),
            root_dir: config.root_dir()?,
        })
    }
}

/// Binds the listening socket. Kept apart from `serve` so the secret can be
/// asked for once the address is known to be usable.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener> {
    let addr = format!("{}:{}", config.host, config.port);
    info!("Server starting at {} ...", addr);
    TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))
}

/// Runs the accept loop until the process is stopped.
pub async fn serve(listener: TcpListener, config: &ServerConfig, credential: Credential) -> Result<()> {
    let ctx = ServerContext::new(config, credential)?;
    info!("Serving files from {}", ctx.root_dir.display());
    info!(
        "Buffer size: {} bytes, chunk interval: {:?}",
        ctx.options.buffer_size, ctx.options.chunk_interval
    );
    network::start_server(listener, Arc::new(ctx)).await
}
