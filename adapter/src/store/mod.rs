//! Storage for generated missions awaiting download.
//!
//! Artifacts are fetched once: a successful `take` removes them. Anything not
//! collected is dropped by `expire` once it outlives the retention window.

pub mod disk;
pub mod memory;
pub mod naming;

pub use disk::DiskStore;
pub use memory::MemoryStore;

use std::time::Duration;

pub trait MissionStore: Send + Sync {
    /// Stores a rendered document and returns its generated name.
    fn put(&self, document: &[u8]) -> anyhow::Result<String>;
    /// Removes and returns the artifact, `None` if it is absent.
    fn take(&self, name: &str) -> anyhow::Result<Option<Vec<u8>>>;
    /// Drops every artifact at least `max_age` old; returns how many went.
    fn expire(&self, max_age: Duration) -> anyhow::Result<usize>;
}
