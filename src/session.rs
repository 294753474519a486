//! Per-connection command/reply state machine.

use std::net::Ipv4Addr;
use std::sync::Arc;

use log::info;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time;

use crate::constants::{GREETING, TRANSFER_POLL_INTERVAL};
use crate::core_datasource::DataSource;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::{self, Flow};
use crate::core_network::pasv::PassiveChannel;
use crate::core_network::transfer::Transfer;
use crate::helpers;

/// Typed reason a session stops dispatching. Both variants unwind to
/// `server.rs`, which logs and drops the connection without taking the
/// process down.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub struct Session {
    host: Ipv4Addr,
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    /// Carries a partially read command line across transfer-poll timeouts.
    line: String,
    cwd: String,
    rest: Option<u64>,
    transfer: Option<Transfer>,
    pasv: PassiveChannel,
    source: Arc<dyn DataSource>,
}

impl Session {
    pub fn new(host: Ipv4Addr, socket: TcpStream, source: Arc<dyn DataSource>) -> Self {
        let (read_half, write_half) = socket.into_split();
        Self {
            host,
            reader: BufReader::new(read_half),
            writer: write_half,
            line: String::new(),
            cwd: String::from("/"),
            rest: None,
            transfer: None,
            pasv: PassiveChannel::new(),
            source,
        }
    }

    /// Runs the command loop until the channel closes, the client QUITs,
    /// or a protocol violation drops the session.
    pub async fn dispatch(&mut self) -> Result<(), SessionError> {
        self.reply(GREETING).await?;

        loop {
            let line = match self.next_line().await? {
                Some(line) => line,
                None => break,
            };
            info!("[<] {}", line);

            let (verb, arg) = split_command(&line);
            let cmd = match FtpCommand::from_str(verb) {
                Some(cmd) => cmd,
                None => {
                    self.reply("502 Not implemented").await?;
                    return Err(SessionError::ProtocolViolation(verb.to_string()));
                }
            };
            match handlers::handle_command(self, cmd, arg).await? {
                Flow::Continue => {}
                Flow::Quit => break,
            }
        }
        Ok(())
    }

    /// Reads the next command line. While a transfer is pending the read is
    /// bounded so completion gets noticed within a poll interval. `None`
    /// means the channel closed (or the client sent a blank line).
    ///
    /// Built on `fill_buf`/`consume` rather than `read_line`: cancelling a
    /// timed-out `read_line` would drop bytes it had already pulled out of
    /// the buffer, while a cancelled `fill_buf` loses nothing.
    async fn next_line(&mut self) -> Result<Option<String>, SessionError> {
        loop {
            self.reap_transfer().await?;

            let available = if self.transfer.is_some() {
                match time::timeout(TRANSFER_POLL_INTERVAL, self.reader.fill_buf()).await {
                    Ok(data) => data?,
                    Err(_) => continue,
                }
            } else {
                self.reader.fill_buf().await?
            };
            if available.is_empty() {
                // EOF; a partial line that never got its newline is dropped.
                return Ok(None);
            }

            let (consumed, complete) = match available.iter().position(|&b| b == b'\n') {
                Some(pos) => (pos + 1, true),
                None => (available.len(), false),
            };
            self.line
                .push_str(&String::from_utf8_lossy(&available[..consumed]));
            self.reader.consume(consumed);

            if complete {
                let line = std::mem::take(&mut self.line);
                let line = line.trim_end().to_string();
                if line.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(line));
            }
        }
    }

    /// Reports the outcome of a finished transfer. Only the dispatcher ever
    /// emits the completion reply.
    async fn reap_transfer(&mut self) -> Result<(), SessionError> {
        match &self.transfer {
            Some(transfer) if transfer.is_finished() => {}
            _ => return Ok(()),
        }
        if let Some(transfer) = self.transfer.take() {
            if transfer.outcome().await {
                self.reply("226 Transfer done").await?;
            } else {
                self.reply("426 Transfer failed").await?;
            }
        }
        Ok(())
    }

    /// Writes one reply line, CRLF-terminated, and flushes it out.
    pub async fn reply(&mut self, msg: &str) -> Result<(), SessionError> {
        info!("[>] {}", msg);
        self.writer.write_all(msg.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Writes a multi-line reply (`NNN-` continuations, final `NNN ` line).
    pub async fn reply_multi(&mut self, lines: &[&str]) -> Result<(), SessionError> {
        for line in lines {
            self.reply(line).await?;
        }
        Ok(())
    }

    pub fn host(&self) -> Ipv4Addr {
        self.host
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn set_cwd(&mut self, cwd: String) {
        self.cwd = cwd;
    }

    /// Resolves a command argument against the working directory.
    pub fn resolve_path(&self, arg: &str) -> String {
        helpers::resolve_path(&self.cwd, arg)
    }

    pub fn source(&self) -> Arc<dyn DataSource> {
        Arc::clone(&self.source)
    }

    pub fn pasv(&mut self) -> &mut PassiveChannel {
        &mut self.pasv
    }

    pub async fn await_data_connection(&mut self) -> Result<TcpStream, SessionError> {
        Ok(self.pasv.await_connection().await?)
    }

    pub fn set_rest(&mut self, offset: u64) {
        self.rest = Some(offset);
    }

    pub fn take_rest(&mut self) -> Option<u64> {
        self.rest.take()
    }

    pub fn set_transfer(&mut self, transfer: Transfer) {
        self.transfer = Some(transfer);
    }

    pub fn take_transfer(&mut self) -> Option<Transfer> {
        self.transfer.take()
    }

    pub async fn shutdown_writer(&mut self) {
        let _ = self.writer.shutdown().await;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // A torn-down session must not leave its transfer running detached.
        if let Some(transfer) = &self.transfer {
            transfer.cancel();
        }
    }
}

/// Splits a command line into its verb token and the remainder argument.
fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((verb, arg)) => (verb, arg.trim_start()),
        None => (line, ""),
    }
}
