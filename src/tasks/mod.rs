//! Background Tasks Module
//!
//! # Tasks
//! - TTL Cleanup: Removes expired cache entries at a fixed interval. Opt-in;
//!   without it expiry happens only when an entry is read.

mod cleanup;

pub use cleanup::spawn_cleanup_task;
