// src/constants.rs

use std::time::Duration;

pub const GREETING: &str = "220 nUl1 FWD Server";

/// Upper bound on bytes queued between a transfer and its data socket.
pub const PIPE_CAPACITY: usize = 64 * 1024 * 1024;

/// How often the dispatcher wakes to reap a pending transfer while no
/// command line has arrived.
pub const TRANSFER_POLL_INTERVAL: Duration = Duration::from_secs(1);
