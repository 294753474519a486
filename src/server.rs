//! Accept loop: one spawned session per control connection.

use std::net::Ipv4Addr;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::net::TcpListener;

use crate::config::Config;
use crate::core_datasource::DataSource;
use crate::session::{Session, SessionError};

pub async fn run(config: Config, source: Arc<dyn DataSource>) -> Result<()> {
    let host: Ipv4Addr = config
        .server
        .listen_host
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.server.listen_host))?;
    let listener = TcpListener::bind((host, config.server.listen_port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, config.server.listen_port))?;
    info!("Listening on {}:{}", host, config.server.listen_port);

    loop {
        let (socket, addr) = listener.accept().await?;
        info!("New control connection from {}", addr);

        let source = Arc::clone(&source);
        tokio::spawn(async move {
            let mut session = Session::new(host, socket, source);
            match session.dispatch().await {
                Ok(()) => info!("Session from {} closed", addr),
                Err(SessionError::ProtocolViolation(what)) => {
                    warn!("Dropping session from {}: {}", addr, what)
                }
                Err(SessionError::Io(e)) => warn!("Session from {} lost: {}", addr, e),
            }
        });
    }
}
