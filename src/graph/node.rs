//! Token node representation in the transition graph

use serde::{Deserialize, Serialize};

/// Sentinel surface shared by every boundary occurrence.
///
/// All sentence starts and ends, across all ingested lines, collapse onto
/// the single node carrying this surface.
pub const BOUNDARY_SURFACE: &str = "<s>";

/// Separator used to join feature strings into one comparison key.
///
/// U+001F (unit separator) is a control character that cannot occur inside
/// a legitimate morphological feature value, so joined keys never collide
/// with each other (`["a,b"]` and `["a", "b"]` derive distinct keys).
pub const FEATURE_SEPARATOR: char = '\u{1f}';

/// Node kind classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Shared start/end-of-sentence sentinel
    Boundary,
    /// A real word token
    Word,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Boundary => "boundary",
            TokenKind::Word => "word",
        }
    }

    /// Parse the storage column form back into a kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "boundary" => Some(TokenKind::Boundary),
            "word" => Some(TokenKind::Word),
            _ => None,
        }
    }
}

/// A node in the transition graph: either a word token or the boundary
/// sentinel.
///
/// A Word node is uniquely identified by (surface, feature key); the
/// Boundary node by its sentinel surface alone. Nodes are upserted
/// idempotently and never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenNode {
    /// Kind of node
    pub kind: TokenKind,
    /// Literal text form
    pub surface: String,
    /// Ordered morphological/category features (empty for Boundary)
    pub features: Vec<String>,
}

impl TokenNode {
    /// Create a word node with the given surface and features.
    pub fn word(surface: impl Into<String>, features: Vec<String>) -> Self {
        Self {
            kind: TokenKind::Word,
            surface: surface.into(),
            features,
        }
    }

    /// The shared boundary node.
    pub fn boundary() -> Self {
        Self {
            kind: TokenKind::Boundary,
            surface: BOUNDARY_SURFACE.to_string(),
            features: Vec::new(),
        }
    }

    pub fn is_boundary(&self) -> bool {
        self.kind == TokenKind::Boundary
    }

    /// Join the feature sequence into the single comparison key used for
    /// node identity and storage.
    pub fn feature_key(&self) -> String {
        join_features(&self.features)
    }

    /// Derive the storable identity of this node.
    pub fn key(&self) -> NodeKey {
        NodeKey {
            kind: self.kind,
            surface: self.surface.clone(),
            feature_key: self.feature_key(),
        }
    }
}

/// Join features with [`FEATURE_SEPARATOR`].
pub fn join_features(features: &[String]) -> String {
    let mut key = String::new();
    for (i, f) in features.iter().enumerate() {
        if i > 0 {
            key.push(FEATURE_SEPARATOR);
        }
        key.push_str(f);
    }
    key
}

/// Split a stored feature key back into the feature sequence.
pub fn split_features(key: &str) -> Vec<String> {
    if key.is_empty() {
        return Vec::new();
    }
    key.split(FEATURE_SEPARATOR).map(String::from).collect()
}

/// Storable node identity: (kind, surface, joined feature key).
///
/// Two word tokens with equal surface and equal feature sequence always
/// derive the same key; the boundary node has one fixed key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeKey {
    pub kind: TokenKind,
    pub surface: String,
    pub feature_key: String,
}

impl NodeKey {
    /// Key of the shared boundary node.
    pub fn boundary() -> Self {
        TokenNode::boundary().key()
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.surface)
    }
}
