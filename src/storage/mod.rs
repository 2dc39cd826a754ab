//! Storage backends for the transition graph
//!
//! Backends implement the `GraphStore` trait. The primary implementation
//! is `SqliteStore` for persistent storage.

mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{GraphStore, OpenStore, StartPair, StorageError, StorageResult, Successor};
