//! Core graph data structures

mod edge;
mod node;

pub use edge::{EdgeId, TransitionEdge};
pub use node::{
    join_features, split_features, NodeKey, TokenKind, TokenNode, BOUNDARY_SURFACE,
    FEATURE_SEPARATOR,
};
