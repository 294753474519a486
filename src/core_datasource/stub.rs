use std::collections::HashMap;
use std::io;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{DataSource, FetchStream, ListEntry};

pub const TEST_DATA: &[u8] = b"An implementation is left as an excercise for the reader.\n";
pub const TEST_DATA_PATH: &str = "/test.txt";

/// In-memory single-file backend, enough to exercise every code path of
/// the protocol layer without a real content service behind it.
pub struct StubSource;

#[async_trait]
impl DataSource for StubSource {
    fn set_credential(&self, _creds: &str) {}

    async fn list(&self, path: &str) -> HashMap<String, ListEntry> {
        if !path.is_empty() && path != TEST_DATA_PATH {
            return HashMap::new();
        }
        let mut entries = HashMap::new();
        entries.insert(
            String::from("test.txt"),
            ListEntry {
                mtime: DateTime::UNIX_EPOCH,
                size: Some(TEST_DATA.len() as u64),
            },
        );
        entries
    }

    fn exists(&self, path: &str) -> bool {
        path == TEST_DATA_PATH || path == "/"
    }

    fn size(&self, path: &str) -> Option<u64> {
        (path == TEST_DATA_PATH).then(|| TEST_DATA.len() as u64)
    }

    fn mtime(&self, path: &str) -> Option<DateTime<Utc>> {
        (path == TEST_DATA_PATH).then(|| DateTime::UNIX_EPOCH)
    }

    async fn fetch(&self, path: &str, offset: u64) -> io::Result<Box<dyn FetchStream>> {
        if path != TEST_DATA_PATH {
            return Err(io::Error::new(io::ErrorKind::NotFound, path.to_string()));
        }
        let start = (offset as usize).min(TEST_DATA.len());
        Ok(Box::new(StubFetch {
            remaining: Some(TEST_DATA[start..].to_vec()),
        }))
    }
}

struct StubFetch {
    remaining: Option<Vec<u8>>,
}

#[async_trait]
impl FetchStream for StubFetch {
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.remaining.take())
    }
}
