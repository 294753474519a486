use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "fwdftpd", about = "An FTP frontend for forwarded content.")]
pub struct Cli {
    /// IPv4 address to bind, also advertised in PASV replies
    pub host: Option<String>,

    /// Command channel port number
    pub port: Option<u16>,

    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}
