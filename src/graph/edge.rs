//! Transition edge representation with sentence provenance

use super::node::NodeKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(Uuid);

impl EdgeId {
    /// Create a new random EdgeId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed adjacency edge: "from is immediately followed by to within
/// one specific source sentence."
///
/// `provenance` carries the original input line verbatim. Edges created
/// while ingesting the same line share identical provenance; the walker
/// later chains only edges whose provenance strings are byte-identical.
///
/// Edges are append-only and never deduplicated. Re-ingesting a line
/// creates parallel edges, and that multiplicity is the frequency signal
/// used for weighted selection during generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionEdge {
    /// Unique identifier
    pub id: EdgeId,
    /// Source node
    pub from: NodeKey,
    /// Target node
    pub to: NodeKey,
    /// Full original input line this adjacency was observed in
    pub provenance: String,
    /// When the edge was created
    pub created_at: DateTime<Utc>,
}

impl TransitionEdge {
    /// Create a new edge tagged with the originating line.
    pub fn new(from: NodeKey, to: NodeKey, provenance: impl Into<String>) -> Self {
        Self {
            id: EdgeId::new(),
            from,
            to,
            provenance: provenance.into(),
            created_at: Utc::now(),
        }
    }
}
