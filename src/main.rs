use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};

use fwdftpd::config::Config;
use fwdftpd::core_cli::Cli;
use fwdftpd::core_datasource::stub::StubSource;
use fwdftpd::server;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    // Initialize the logger with a custom format
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();

    // Load configuration, then let explicit CLI arguments win
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    if let Some(host) = args.host {
        config.server.listen_host = host;
    }
    if let Some(port) = args.port {
        config.server.listen_port = port;
    }

    server::run(config, Arc::new(StubSource)).await
}
