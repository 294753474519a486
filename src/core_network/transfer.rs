//! Transfer supervision: the one LIST or RETR a session may have in
//! flight, cancellable, reporting a boolean outcome back to the dispatcher.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::warn;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

use crate::core_datasource::{DataSource, ListEntry};
use crate::core_network::pipe::Pipe;
use crate::helpers::format_list_time;

const DIR_HEADER: &str = "dr-xr-xr-x 2 fwd fwd 4096";
const FILE_HEADER: &str = "-r--r--r-- 2 fwd fwd";

/// Handle to a background transfer task.
pub struct Transfer {
    handle: JoinHandle<bool>,
}

impl Transfer {
    /// Streams the backend listing, ls-style, over `conn`.
    pub fn spawn_list(source: Arc<dyn DataSource>, conn: TcpStream) -> Self {
        Self {
            handle: tokio::spawn(run_list(source, conn)),
        }
    }

    /// Streams `path` starting at `offset` over `conn`.
    pub fn spawn_retr(
        source: Arc<dyn DataSource>,
        path: String,
        offset: u64,
        conn: TcpStream,
    ) -> Self {
        Self {
            handle: tokio::spawn(run_retr(source, path, offset, conn)),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Requests cancellation; the task observes it at its next suspension
    /// point and the outcome becomes failure.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Waits for the task and folds cancellation (and any panic) into a
    /// plain failure outcome.
    pub async fn outcome(self) -> bool {
        self.handle.await.unwrap_or(false)
    }
}

async fn run_list(source: Arc<dyn DataSource>, conn: TcpStream) -> bool {
    let entries = source.list("").await;
    let listing = render_listing(&entries, Utc::now());
    let pipe = Pipe::new();
    let (sent, drained) = tokio::join!(
        async { pipe.finish(Some(listing.into_bytes())).await.is_ok() },
        pipe.run(conn),
    );
    sent && drained.is_ok()
}

async fn run_retr(source: Arc<dyn DataSource>, path: String, offset: u64, mut conn: TcpStream) -> bool {
    let mut chunks = match source.fetch(&path, offset).await {
        Ok(chunks) => chunks,
        Err(e) => {
            warn!("fetch of {} failed to open: {}", path, e);
            let _ = conn.shutdown().await;
            return false;
        }
    };

    let pipe = Pipe::new();
    let producer = async {
        let mut ok = true;
        loop {
            match chunks.next_chunk().await {
                Ok(Some(chunk)) => {
                    if pipe.send(chunk).await.is_err() {
                        ok = false;
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("fetch of {} failed mid-stream: {}", path, e);
                    ok = false;
                    break;
                }
            }
        }
        // The sentinel goes out even on failure, or the drain side would
        // wait on it forever.
        let finished = pipe.finish(None).await.is_ok();
        ok && finished
    };
    let (sent, drained) = tokio::join!(producer, pipe.run(conn));
    sent && drained.is_ok()
}

fn render_listing(entries: &HashMap<String, ListEntry>, now: DateTime<Utc>) -> String {
    let mut rows: Vec<(&String, &ListEntry)> = entries.iter().collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));

    let mut listing = String::new();
    for (name, entry) in rows {
        let stamp = format_list_time(entry.mtime, now);
        match entry.size {
            None => listing.push_str(&format!("{} {} {}\r\n", DIR_HEADER, stamp, name)),
            Some(size) => {
                listing.push_str(&format!("{} {} {} {}\r\n", FILE_HEADER, size, stamp, name))
            }
        }
    }
    listing
}
