//! Storage trait definitions

use crate::graph::{EdgeId, NodeKey, TokenNode};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// Store unreachable or query failed. Fatal to the current run.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored row could not be decoded back into a node identity.
    #[error("Malformed node key: {0}")]
    MalformedKey(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// One observed sentence-initial bigram: a two-hop path
/// (Boundary) -> (first) -> (second).
///
/// The store returns one row per occurrence combination, so pairs observed
/// in several sentences appear several times. That repetition is the
/// implicit frequency weight of the start phase.
#[derive(Debug, Clone)]
pub struct StartPair {
    pub first: TokenNode,
    pub second: TokenNode,
}

/// A provenance-consistent continuation candidate.
///
/// `weight` counts the matching two-edge combinations; sampling one
/// occurrence uniformly from the expanded multiset realizes
/// frequency-proportional selection.
#[derive(Debug, Clone)]
pub struct Successor {
    pub node: TokenNode,
    pub weight: u64,
}

/// Trait for transition graph storage backends
///
/// Node upserts are idempotent; edge creation always appends. The two-hop
/// read queries are the only traversals generation needs, so backends can
/// satisfy this with SQL joins, a graph engine, or an in-memory adjacency
/// structure.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait GraphStore: Send + Sync {
    // === Write operations (ingestion) ===

    /// Create the node if absent; return its key either way.
    ///
    /// Idempotent: equal identities always resolve to the same stored node.
    fn upsert_node(&self, node: &TokenNode) -> StorageResult<NodeKey>;

    /// Insert a new edge row tagged with the originating line.
    ///
    /// Never deduplicates: parallel edges with equal endpoints and equal
    /// provenance are distinct rows.
    fn create_edge(&self, from: &NodeKey, to: &NodeKey, provenance: &str)
        -> StorageResult<EdgeId>;

    // === Read operations (generation) ===

    /// All two-hop paths (Boundary) -> (Word n1) -> (Word n2), one row per
    /// occurrence combination.
    fn start_pairs(&self) -> StorageResult<Vec<StartPair>>;

    /// All Word nodes reachable from the trailing pair (n1, n2) via two
    /// edges with byte-identical provenance, with occurrence weights.
    fn successors(&self, n1: &NodeKey, n2: &NodeKey) -> StorageResult<Vec<Successor>>;

    /// Whether any provenance-consistent two-edge path from (n1, n2) lands
    /// on the Boundary node.
    fn reaches_boundary(&self, n1: &NodeKey, n2: &NodeKey) -> StorageResult<bool>;

    // === Counts (reporting and tests) ===

    fn node_count(&self) -> StorageResult<u64>;

    fn edge_count(&self) -> StorageResult<u64>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: GraphStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
