//! Bounded streaming pipe between a transfer and its data connection.
//!
//! A single producer queues byte chunks with [`Pipe::send`] while the
//! consumer side ([`Pipe::run`]) drains them into the destination in order.
//! The queue is bounded by a byte budget: a send that does not fit suspends
//! until the consumer has written and reclaimed enough capacity. There is
//! exactly one producer and one consumer per instance, so a single stored
//! wakeup permit per direction is all the coordination needed.

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use log::debug;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Notify;

use crate::constants::PIPE_CAPACITY;

/// The consumer is gone; whatever was being sent will never be written.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("pipe closed")]
pub struct PipeClosed;

pub struct Pipe {
    state: Mutex<PipeState>,
    /// Wakes the producer after the consumer reclaims capacity or exits.
    space_freed: Notify,
    /// Wakes the consumer after a chunk or the end sentinel is queued.
    chunk_ready: Notify,
}

struct PipeState {
    /// Queued chunks; `None` is the end sentinel.
    queue: VecDeque<Option<Vec<u8>>>,
    /// Remaining byte budget for enqueued-but-unwritten chunks.
    left: usize,
    closed: bool,
}

impl Pipe {
    pub fn new() -> Self {
        Self::with_capacity(PIPE_CAPACITY)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(PipeState {
                queue: VecDeque::new(),
                left: capacity,
                closed: false,
            }),
            space_freed: Notify::new(),
            chunk_ready: Notify::new(),
        }
    }

    /// Queues one chunk, waiting for capacity if it does not fit yet.
    pub async fn send(&self, chunk: Vec<u8>) -> Result<(), PipeClosed> {
        loop {
            {
                let mut state = self.state.lock().unwrap();
                if state.closed {
                    return Err(PipeClosed);
                }
                if chunk.len() <= state.left {
                    state.left -= chunk.len();
                    state.queue.push_back(Some(chunk));
                    drop(state);
                    self.chunk_ready.notify_one();
                    return Ok(());
                }
            }
            self.space_freed.notified().await;
        }
    }

    /// Optionally queues one last chunk, then the end sentinel.
    pub async fn finish(&self, last: Option<Vec<u8>>) -> Result<(), PipeClosed> {
        if let Some(chunk) = last {
            self.send(chunk).await?;
        }
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return Err(PipeClosed);
        }
        state.queue.push_back(None);
        drop(state);
        self.chunk_ready.notify_one();
        Ok(())
    }

    /// Consumer side: writes chunks to `conn` in queue order until the end
    /// sentinel, then shuts the destination down. Every exit path closes
    /// the pipe and releases a producer still waiting on capacity.
    pub async fn run<W>(&self, mut conn: W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let result = self.drain(&mut conn).await;
        self.state.lock().unwrap().closed = true;
        self.space_freed.notify_one();
        let _ = conn.shutdown().await;
        result
    }

    async fn drain<W>(&self, conn: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        loop {
            let item = loop {
                {
                    let mut state = self.state.lock().unwrap();
                    if let Some(item) = state.queue.pop_front() {
                        break item;
                    }
                }
                self.chunk_ready.notified().await;
            };
            let chunk = match item {
                Some(chunk) => chunk,
                None => return Ok(()),
            };
            conn.write_all(&chunk).await?;
            conn.flush().await?;
            debug!("[D] data chunk, {} bytes", chunk.len());
            self.state.lock().unwrap().left += chunk.len();
            self.space_freed.notify_one();
        }
    }
}
