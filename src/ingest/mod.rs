//! Best-effort line ingestion into the transition graph
//!
//! One line is fully ingested before the next is read. A failed node
//! upsert or edge insert is logged and skipped; the rest of the line (and
//! the rest of the run) continues. No transaction spans a line, so a
//! partially ingested sentence is tolerated.

use crate::graph::{NodeKey, TokenNode};
use crate::storage::GraphStore;
use crate::tokenize::{Token, Tokenizer};
use std::io::BufRead;
use tracing::{debug, warn};

/// Counters for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Lines read from the input
    pub lines: u64,
    /// Successful node upserts (including repeats of existing nodes)
    pub nodes_upserted: u64,
    /// Edge rows inserted
    pub edges_created: u64,
    /// Individual node/edge operations that failed and were skipped
    pub failures: u64,
}

impl IngestReport {
    fn merge(&mut self, other: IngestReport) {
        self.lines += other.lines;
        self.nodes_upserted += other.nodes_upserted;
        self.edges_created += other.edges_created;
        self.failures += other.failures;
    }
}

/// Ingests tokenized lines into a `GraphStore`.
///
/// Holds no state between lines beyond the store handle.
pub struct Ingestor<'a> {
    store: &'a dyn GraphStore,
    tokenizer: &'a dyn Tokenizer,
}

impl<'a> Ingestor<'a> {
    pub fn new(store: &'a dyn GraphStore, tokenizer: &'a dyn Tokenizer) -> Self {
        Self { store, tokenizer }
    }

    /// Ingest every line of the reader, strictly sequentially.
    ///
    /// A read error ends the loop; it is reported in the log, not
    /// propagated, so a partially read input still yields a usable corpus.
    pub fn ingest_lines(&self, reader: impl BufRead) -> IngestReport {
        let mut report = IngestReport::default();
        for line in reader.lines() {
            match line {
                Ok(line) => report.merge(self.ingest_line(&line)),
                Err(e) => {
                    warn!(error = %e, "failed to read input line, stopping");
                    break;
                }
            }
        }
        report
    }

    /// Ingest one line: upsert a node per token, then insert one
    /// provenance-tagged edge per adjacency, with the sentence wrapped in
    /// the shared boundary node at both ends.
    pub fn ingest_line(&self, line: &str) -> IngestReport {
        let mut report = IngestReport { lines: 1, ..Default::default() };

        let tokens = self.tokenizer.tokenize(line);
        if tokens.is_empty() {
            debug!("line tokenized to nothing, skipping");
            return report;
        }

        let mut nodes: Vec<TokenNode> = tokens.iter().map(node_for_token).collect();
        // Implicit boundary wrapping: every sentence begins and ends at the
        // shared boundary node. Tokenizers that already emit boundary-class
        // markers are left alone.
        if !nodes.first().map(TokenNode::is_boundary).unwrap_or(false) {
            nodes.insert(0, TokenNode::boundary());
        }
        if !nodes.last().map(TokenNode::is_boundary).unwrap_or(false) {
            nodes.push(TokenNode::boundary());
        }

        // Upsert all nodes first; an edge is only attempted when both of
        // its endpoints made it into the store.
        let keys: Vec<Option<NodeKey>> = nodes
            .iter()
            .map(|node| match self.store.upsert_node(node) {
                Ok(key) => {
                    report.nodes_upserted += 1;
                    Some(key)
                }
                Err(e) => {
                    warn!(surface = %node.surface, error = %e, "node upsert failed, skipping");
                    report.failures += 1;
                    None
                }
            })
            .collect();

        for pair in keys.windows(2) {
            let (Some(from), Some(to)) = (&pair[0], &pair[1]) else {
                continue;
            };
            match self.store.create_edge(from, to, line) {
                Ok(_) => report.edges_created += 1,
                Err(e) => {
                    warn!(from = %from, to = %to, error = %e, "edge insert failed, skipping");
                    report.failures += 1;
                }
            }
        }

        report
    }
}

fn node_for_token(token: &Token) -> TokenNode {
    if token.boundary_class {
        // All boundary-class tokens map to THE shared boundary node,
        // whatever surface the tokenizer gave them.
        TokenNode::boundary()
    } else {
        TokenNode::word(token.surface.clone(), token.features.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{OpenStore, SqliteStore};
    use crate::tokenize::SpaceTokenizer;
    use std::io::Cursor;

    fn ingestor_over<'a>(store: &'a SqliteStore, tokenizer: &'a SpaceTokenizer) -> Ingestor<'a> {
        Ingestor::new(store, tokenizer)
    }

    #[test]
    fn single_line_builds_wrapped_chain() {
        let store = SqliteStore::open_in_memory().unwrap();
        let tokenizer = SpaceTokenizer::new();
        let report = ingestor_over(&store, &tokenizer).ingest_line("a b");

        // Nodes: boundary, a, b. Edges: B->a, a->b, b->B.
        assert_eq!(store.node_count().unwrap(), 3);
        assert_eq!(store.edge_count().unwrap(), 3);
        assert_eq!(report.lines, 1);
        assert_eq!(report.edges_created, 3);
        assert_eq!(report.failures, 0);
    }

    #[test]
    fn reingesting_doubles_edges_not_nodes() {
        let store = SqliteStore::open_in_memory().unwrap();
        let tokenizer = SpaceTokenizer::new();
        let ingestor = ingestor_over(&store, &tokenizer);
        ingestor.ingest_line("a b c");
        let nodes_before = store.node_count().unwrap();
        let edges_before = store.edge_count().unwrap();

        ingestor.ingest_line("a b c");
        assert_eq!(store.node_count().unwrap(), nodes_before);
        assert_eq!(store.edge_count().unwrap(), edges_before * 2);
    }

    #[test]
    fn boundary_collapses_across_lines() {
        let store = SqliteStore::open_in_memory().unwrap();
        let tokenizer = SpaceTokenizer::new();
        let ingestor = ingestor_over(&store, &tokenizer);
        ingestor.ingest_line("a b");
        ingestor.ingest_line("c d");
        ingestor.ingest_line("e f");

        // 6 word nodes + exactly one boundary node, however many lines.
        assert_eq!(store.node_count().unwrap(), 7);
    }

    #[test]
    fn shared_token_from_different_lines_dedups() {
        let store = SqliteStore::open_in_memory().unwrap();
        let tokenizer = SpaceTokenizer::new();
        let ingestor = ingestor_over(&store, &tokenizer);
        ingestor.ingest_line("a b");
        ingestor.ingest_line("a c");

        // boundary, a, b, c
        assert_eq!(store.node_count().unwrap(), 4);
    }

    #[test]
    fn empty_line_is_a_no_op() {
        let store = SqliteStore::open_in_memory().unwrap();
        let tokenizer = SpaceTokenizer::new();
        let report = ingestor_over(&store, &tokenizer).ingest_line("   ");

        assert_eq!(store.node_count().unwrap(), 0);
        assert_eq!(store.edge_count().unwrap(), 0);
        assert_eq!(report.lines, 1);
    }

    #[test]
    fn ingest_lines_walks_the_whole_reader() {
        let store = SqliteStore::open_in_memory().unwrap();
        let tokenizer = SpaceTokenizer::new();
        let input = Cursor::new("a b\n\nc d\n");
        let report = ingestor_over(&store, &tokenizer).ingest_lines(input);

        assert_eq!(report.lines, 3);
        assert_eq!(report.edges_created, 6);
        assert_eq!(store.node_count().unwrap(), 5);
    }

    #[test]
    fn boundary_class_tokens_map_to_the_shared_node() {
        struct MarkedTokenizer;
        impl Tokenizer for MarkedTokenizer {
            fn tokenize(&self, line: &str) -> Vec<Token> {
                let mut tokens = vec![Token::boundary("BOS")];
                tokens.extend(line.split_whitespace().map(|w| Token::word(w, Vec::new())));
                tokens.push(Token::boundary("EOS"));
                tokens
            }
        }

        let store = SqliteStore::open_in_memory().unwrap();
        let tokenizer = MarkedTokenizer;
        let ingestor = Ingestor::new(&store, &tokenizer);
        ingestor.ingest_line("a b");

        // BOS and EOS both collapse onto the single boundary node and no
        // extra wrapping happens: boundary, a, b / B->a, a->b, b->B.
        assert_eq!(store.node_count().unwrap(), 3);
        assert_eq!(store.edge_count().unwrap(), 3);
        assert_eq!(store.start_pairs().unwrap().len(), 1);
    }
}
