//! Weighted provenance-consistent random walk over the transition graph
//!
//! Three phases per generated sentence:
//! 1. Start: pick one observed sentence-initial bigram uniformly from the
//!    full occurrence set.
//! 2. Termination check: if a provenance-consistent two-edge path from the
//!    trailing pair lands on the boundary node, the sentence is complete.
//! 3. Continuation: sample the next word frequency-proportionally from the
//!    provenance-consistent successor multiset; an empty multiset ends the
//!    walk normally (dead end, not an error).
//!
//! The boundary node itself is never emitted.

use crate::graph::{NodeKey, TokenKind, TokenNode};
use crate::storage::{GraphStore, StorageError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that abort a generation run
#[derive(Debug, Error)]
pub enum WalkError {
    /// No sentence-initial bigrams exist: nothing has been ingested.
    #[error("no start pairs found: the corpus is empty")]
    EmptyCorpus,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for walk operations
pub type WalkResult<T> = Result<T, WalkError>;

/// Performs one constrained random walk per call.
///
/// The randomness source is injected so tests can drive the walk with a
/// seeded generator; [`Walker::new`] seeds from OS entropy, since each
/// production run should plausibly produce different output.
pub struct Walker<'a, R: Rng> {
    store: &'a dyn GraphStore,
    rng: R,
}

impl<'a> Walker<'a, StdRng> {
    /// Create a walker seeded from OS entropy.
    pub fn new(store: &'a dyn GraphStore) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }
}

impl<'a, R: Rng> Walker<'a, R> {
    /// Create a walker with an explicit randomness source.
    pub fn with_rng(store: &'a dyn GraphStore, rng: R) -> Self {
        Self { store, rng }
    }

    /// Walk the graph once, returning the emitted surface forms in order.
    pub fn walk(&mut self) -> WalkResult<Vec<String>> {
        let pairs = self.store.start_pairs()?;
        if pairs.is_empty() {
            return Err(WalkError::EmptyCorpus);
        }
        let pair = &pairs[self.rng.gen_range(0..pairs.len())];

        let mut surfaces = vec![pair.first.surface.clone(), pair.second.surface.clone()];
        let mut n1 = pair.first.key();
        let mut n2 = pair.second.key();

        loop {
            if self.store.reaches_boundary(&n1, &n2)? {
                break;
            }
            let Some(next) = self.pick_successor(&n1, &n2)? else {
                // Dead end: no provenance-consistent continuation. This is
                // the other legitimate loop exit, distinct from sentence
                // completion; emit what we have.
                debug!(n1 = %n1, n2 = %n2, "no provenance-consistent successor, ending walk");
                break;
            };
            surfaces.push(next.surface.clone());
            n1 = n2;
            n2 = next.key();
        }

        Ok(surfaces)
    }

    /// Walk once and join the surfaces with the given separator.
    pub fn generate(&mut self, separator: &str) -> WalkResult<String> {
        Ok(self.walk()?.join(separator))
    }

    /// Sample one occurrence uniformly from the successor multiset.
    ///
    /// Rows claiming a provenance-consistent match but carrying a
    /// non-word node or a zero weight are malformed; they are skipped as
    /// if absent.
    fn pick_successor(&mut self, n1: &NodeKey, n2: &NodeKey) -> WalkResult<Option<TokenNode>> {
        let mut rows = self.store.successors(n1, n2)?;
        rows.retain(|row| {
            let well_formed = row.node.kind == TokenKind::Word && row.weight > 0;
            if !well_formed {
                warn!(node = %row.node.key(), weight = row.weight,
                    "malformed provenance match from store, ignoring");
            }
            well_formed
        });

        let total: u64 = rows.iter().map(|row| row.weight).sum();
        if total == 0 {
            return Ok(None);
        }

        let mut target = self.rng.gen_range(0..total);
        for row in rows {
            if target < row.weight {
                return Ok(Some(row.node));
            }
            target -= row.weight;
        }
        unreachable!("target is bounded by the summed weights")
    }
}
