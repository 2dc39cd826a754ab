//! Babble: token transition graph with provenance-consistent generation
//!
//! Sentences are ingested into a persistent directed graph where nodes are
//! distinct tokens and edges record adjacency tagged with the originating
//! line. Generation performs a weighted random walk that only chains edges
//! sharing byte-identical provenance, so a walk never splices transitions
//! learned from unrelated sentences.
//!
//! # Core Concepts
//!
//! - **Token nodes**: deduplicated by (surface, feature key); one shared
//!   boundary node marks every sentence start and end
//! - **Transition edges**: append-only adjacency rows carrying the original
//!   line verbatim; multiplicity is the frequency signal
//! - **Walker**: three-phase random walk (start bigram, boundary check,
//!   weighted continuation)
//!
//! # Example
//!
//! ```
//! use babble::{Ingestor, OpenStore, SpaceTokenizer, SqliteStore, Walker};
//!
//! let store = SqliteStore::open_in_memory().unwrap();
//! let tokenizer = SpaceTokenizer::new();
//! Ingestor::new(&store, &tokenizer).ingest_line("hello world");
//!
//! let sentence = Walker::new(&store).generate(" ").unwrap();
//! assert_eq!(sentence, "hello world");
//! ```

pub mod config;
mod graph;
pub mod ingest;
pub mod storage;
pub mod tokenize;
pub mod walk;

pub use config::{Config, ConfigError};
pub use graph::{
    join_features, split_features, EdgeId, NodeKey, TokenKind, TokenNode, TransitionEdge,
    BOUNDARY_SURFACE, FEATURE_SEPARATOR,
};
pub use ingest::{IngestReport, Ingestor};
pub use storage::{GraphStore, OpenStore, SqliteStore, StartPair, StorageError, StorageResult, Successor};
pub use tokenize::{SpaceTokenizer, Token, Tokenizer};
pub use walk::{WalkError, WalkResult, Walker};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
