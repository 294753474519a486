//! Passive-mode data channel management and the PASV/EPSV handlers.

use std::io;
use std::net::Ipv4Addr;
use std::time::Duration;

use log::{debug, info};
use tokio::net::{TcpListener, TcpStream};
use tokio::time;

use crate::session::{Session, SessionError};

/// Per-session passive listener. Bound lazily on the first PASV/EPSV and
/// reused for the rest of the session; at most one unconsumed connection
/// promise is tracked at a time.
pub struct PassiveChannel {
    listener: Option<TcpListener>,
    port: u16,
    armed: bool,
}

impl PassiveChannel {
    pub fn new() -> Self {
        Self {
            listener: None,
            port: 0,
            armed: false,
        }
    }

    /// Binds the ephemeral listener on first call; later calls just report
    /// the port again.
    pub async fn ensure(&mut self, host: Ipv4Addr) -> io::Result<u16> {
        if self.listener.is_none() {
            let listener = TcpListener::bind((host, 0)).await?;
            self.port = listener.local_addr()?.port();
            debug!("passive listener bound on {}:{}", host, self.port);
            self.listener = Some(listener);
        }
        Ok(self.port)
    }

    /// Issues a fresh connection promise. A connection made against an
    /// earlier, unconsumed promise is drained and dropped here so it can
    /// never be claimed by a later transfer.
    pub async fn arm(&mut self) {
        if let Some(listener) = &self.listener {
            while let Ok(Ok((stale, addr))) =
                time::timeout(Duration::ZERO, listener.accept()).await
            {
                debug!("discarding stale data connection from {}", addr);
                drop(stale);
            }
        }
        self.armed = true;
    }

    /// Waits for the peer to connect to the passive port, consuming the
    /// current promise.
    pub async fn await_connection(&mut self) -> io::Result<TcpStream> {
        if !self.armed {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "no passive connection expected",
            ));
        }
        let listener = self.listener.as_ref().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "passive listener not bound")
        })?;
        let (conn, addr) = listener.accept().await?;
        self.armed = false;
        info!("data connection accepted from {}", addr);
        Ok(conn)
    }
}

/// Sets up (or reuses) the passive listener and announces it in PASV form.
pub async fn handle_pasv_command(session: &mut Session, _arg: &str) -> Result<(), SessionError> {
    let host = session.host();
    let port = session.pasv().ensure(host).await?;
    session.pasv().arm().await;
    let response = format!(
        "227 Passive ready ({},{},{})",
        host.to_string().replace('.', ","),
        port / 256,
        port % 256
    );
    session.reply(&response).await
}

/// EPSV variant: same listener, port-only reply.
pub async fn handle_epsv_command(session: &mut Session, _arg: &str) -> Result<(), SessionError> {
    let host = session.host();
    let port = session.pasv().ensure(host).await?;
    session.pasv().arm().await;
    session
        .reply(&format!("229 Passive ready (|||{}|)", port))
        .await
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use tokio::io::AsyncReadExt;
    use tokio::net::TcpStream;

    use super::PassiveChannel;

    #[tokio::test]
    async fn ensure_is_idempotent() {
        let mut channel = PassiveChannel::new();
        let port = channel.ensure(Ipv4Addr::LOCALHOST).await.unwrap();
        assert_ne!(port, 0);
        assert_eq!(channel.ensure(Ipv4Addr::LOCALHOST).await.unwrap(), port);
    }

    #[tokio::test]
    async fn await_connection_requires_an_armed_promise() {
        let mut channel = PassiveChannel::new();
        channel.ensure(Ipv4Addr::LOCALHOST).await.unwrap();
        assert!(channel.await_connection().await.is_err());
    }

    #[tokio::test]
    async fn rearming_discards_a_stale_connection() {
        let mut channel = PassiveChannel::new();
        let port = channel.ensure(Ipv4Addr::LOCALHOST).await.unwrap();
        channel.arm().await;

        let mut stale = TcpStream::connect((Ipv4Addr::LOCALHOST, port))
            .await
            .unwrap();

        // A second PASV replaces the unconsumed promise and throws away the
        // connection made against it.
        channel.arm().await;
        let fresh = TcpStream::connect((Ipv4Addr::LOCALHOST, port))
            .await
            .unwrap();
        let accepted = channel.await_connection().await.unwrap();
        assert_eq!(
            accepted.peer_addr().unwrap(),
            fresh.local_addr().unwrap(),
            "the accepted connection must be the fresh one"
        );

        let mut buf = [0u8; 1];
        let closed = stale.read(&mut buf).await;
        assert!(matches!(closed, Ok(0) | Err(_)), "stale socket should be dead");
    }
}
