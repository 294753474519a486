//! Content backend seam. The dispatcher and the transfer supervisor only
//! ever talk to a [`DataSource`]; what actually backs the bytes is the
//! caller's business.

pub mod stub;

use std::collections::HashMap;
use std::io;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One row of a directory listing. A `None` size marks a directory.
#[derive(Debug, Clone)]
pub struct ListEntry {
    pub mtime: DateTime<Utc>,
    pub size: Option<u64>,
}

#[async_trait]
pub trait DataSource: Send + Sync {
    /// Best-effort: the PASS argument is handed over verbatim.
    fn set_credential(&self, creds: &str);

    /// Listing for `path` (empty string = whatever the backend considers
    /// its root). Paths the backend does not know yield an empty map.
    async fn list(&self, path: &str) -> HashMap<String, ListEntry>;

    fn exists(&self, path: &str) -> bool;

    fn size(&self, path: &str) -> Option<u64>;

    fn mtime(&self, path: &str) -> Option<DateTime<Utc>>;

    /// Opens a chunk stream starting at `offset`. The stream is finite and
    /// not restartable; resuming means calling `fetch` again.
    async fn fetch(&self, path: &str, offset: u64) -> io::Result<Box<dyn FetchStream>>;
}

/// Lazy sequence of byte chunks produced by [`DataSource::fetch`].
#[async_trait]
pub trait FetchStream: Send {
    /// `Ok(Some(chunk))` is the next chunk, `Ok(None)` the clean end of the
    /// stream; `Err` means the transfer must be reported as failed.
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>>;
}
