//! SQLite storage backend for the transition graph

use super::traits::{GraphStore, OpenStore, StartPair, StorageError, StorageResult, Successor};
use crate::graph::{split_features, EdgeId, NodeKey, TokenKind, TokenNode, TransitionEdge};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed transition graph store
///
/// Uses a single database file with one table for nodes and one for edges.
/// Node identity is the (kind, surface, feature_key) triple; edges embed
/// the endpoint keys directly so the two-hop generation queries are plain
/// self-joins on the edges table. Thread-safe via internal mutex on the
/// connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Initialize the database schema
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            -- Nodes table: identity is the full primary key
            CREATE TABLE IF NOT EXISTS nodes (
                kind TEXT NOT NULL,
                surface TEXT NOT NULL,
                feature_key TEXT NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (kind, surface, feature_key)
            );

            -- Edges table: append-only, one row per observed adjacency
            CREATE TABLE IF NOT EXISTS edges (
                id TEXT PRIMARY KEY,
                from_kind TEXT NOT NULL,
                from_surface TEXT NOT NULL,
                from_features TEXT NOT NULL,
                to_kind TEXT NOT NULL,
                to_surface TEXT NOT NULL,
                to_features TEXT NOT NULL,
                provenance TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            -- Indexes for the two-hop traversal joins
            CREATE INDEX IF NOT EXISTS idx_edges_from
                ON edges(from_kind, from_surface, from_features);
            CREATE INDEX IF NOT EXISTS idx_edges_to
                ON edges(to_kind, to_surface, to_features);

            -- Enable WAL mode for concurrent reads during writes
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    /// Decode a (kind, surface, feature_key) row back into a node.
    fn row_to_node(kind: String, surface: String, feature_key: String) -> StorageResult<TokenNode> {
        let kind = TokenKind::parse(&kind)
            .ok_or_else(|| StorageError::MalformedKey(format!("unknown kind '{}'", kind)))?;
        Ok(TokenNode {
            kind,
            surface,
            features: split_features(&feature_key),
        })
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl GraphStore for SqliteStore {
    fn upsert_node(&self, node: &TokenNode) -> StorageResult<NodeKey> {
        let conn = self.conn.lock().unwrap();
        let key = node.key();

        conn.execute(
            r#"
            INSERT INTO nodes (kind, surface, feature_key, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(kind, surface, feature_key) DO NOTHING
            "#,
            params![
                key.kind.as_str(),
                key.surface,
                key.feature_key,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(key)
    }

    fn create_edge(
        &self,
        from: &NodeKey,
        to: &NodeKey,
        provenance: &str,
    ) -> StorageResult<EdgeId> {
        let conn = self.conn.lock().unwrap();
        let edge = TransitionEdge::new(from.clone(), to.clone(), provenance);

        conn.execute(
            r#"
            INSERT INTO edges (id, from_kind, from_surface, from_features,
                               to_kind, to_surface, to_features, provenance, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                edge.id.to_string(),
                edge.from.kind.as_str(),
                edge.from.surface,
                edge.from.feature_key,
                edge.to.kind.as_str(),
                edge.to.surface,
                edge.to.feature_key,
                edge.provenance,
                edge.created_at.to_rfc3339(),
            ],
        )?;

        Ok(edge.id)
    }

    fn start_pairs(&self) -> StorageResult<Vec<StartPair>> {
        let conn = self.conn.lock().unwrap();

        // Every (Boundary -> n1 -> n2) two-hop path, one row per edge
        // combination. No provenance constraint at the start phase.
        let mut stmt = conn.prepare(
            r#"
            SELECT e2.from_surface, e2.from_features, e2.to_surface, e2.to_features
            FROM edges e1
            JOIN edges e2
              ON e2.from_kind = e1.to_kind
             AND e2.from_surface = e1.to_surface
             AND e2.from_features = e1.to_features
            WHERE e1.from_kind = 'boundary'
              AND e1.to_kind = 'word'
              AND e2.to_kind = 'word'
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut pairs = Vec::new();
        for row in rows {
            let (s1, f1, s2, f2) = row?;
            pairs.push(StartPair {
                first: TokenNode::word(s1, split_features(&f1)),
                second: TokenNode::word(s2, split_features(&f2)),
            });
        }
        Ok(pairs)
    }

    fn successors(&self, n1: &NodeKey, n2: &NodeKey) -> StorageResult<Vec<Successor>> {
        let conn = self.conn.lock().unwrap();

        // Chain (n1 -> n2) with (n2 -> n3) only where both edges carry the
        // same provenance, so a continuation never splices transitions
        // learned from unrelated sentences.
        let mut stmt = conn.prepare(
            r#"
            SELECT e2.to_kind, e2.to_surface, e2.to_features, COUNT(*)
            FROM edges e1
            JOIN edges e2
              ON e2.from_kind = e1.to_kind
             AND e2.from_surface = e1.to_surface
             AND e2.from_features = e1.to_features
             AND e2.provenance = e1.provenance
            WHERE e1.from_kind = ?1 AND e1.from_surface = ?2 AND e1.from_features = ?3
              AND e1.to_kind = ?4 AND e1.to_surface = ?5 AND e1.to_features = ?6
              AND e2.to_kind = 'word'
            GROUP BY e2.to_kind, e2.to_surface, e2.to_features
            "#,
        )?;

        let rows = stmt.query_map(
            params![
                n1.kind.as_str(),
                n1.surface,
                n1.feature_key,
                n2.kind.as_str(),
                n2.surface,
                n2.feature_key,
            ],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, u64>(3)?,
                ))
            },
        )?;

        let mut successors = Vec::new();
        for row in rows {
            let (kind, surface, features, weight) = row?;
            successors.push(Successor {
                node: Self::row_to_node(kind, surface, features)?,
                weight,
            });
        }
        Ok(successors)
    }

    fn reaches_boundary(&self, n1: &NodeKey, n2: &NodeKey) -> StorageResult<bool> {
        let conn = self.conn.lock().unwrap();

        let exists: bool = conn.query_row(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM edges e1
                JOIN edges e2
                  ON e2.from_kind = e1.to_kind
                 AND e2.from_surface = e1.to_surface
                 AND e2.from_features = e1.to_features
                 AND e2.provenance = e1.provenance
                WHERE e1.from_kind = ?1 AND e1.from_surface = ?2 AND e1.from_features = ?3
                  AND e1.to_kind = ?4 AND e1.to_surface = ?5 AND e1.to_features = ?6
                  AND e2.to_kind = 'boundary'
            )
            "#,
            params![
                n1.kind.as_str(),
                n1.surface,
                n1.feature_key,
                n2.kind.as_str(),
                n2.surface,
                n2.feature_key,
            ],
            |row| row.get(0),
        )?;

        Ok(exists)
    }

    fn node_count(&self) -> StorageResult<u64> {
        let conn = self.conn.lock().unwrap();
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM nodes", [], |row| row.get(0))?;
        Ok(count)
    }

    fn edge_count(&self) -> StorageResult<u64> {
        let conn = self.conn.lock().unwrap();
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM edges", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(surface: &str) -> TokenNode {
        TokenNode::word(surface, Vec::new())
    }

    /// Ingest the token sequence as one line, boundary-wrapped.
    fn put_line(store: &SqliteStore, surfaces: &[&str], provenance: &str) {
        let boundary = store.upsert_node(&TokenNode::boundary()).unwrap();
        let keys: Vec<NodeKey> = surfaces
            .iter()
            .map(|s| store.upsert_node(&word(s)).unwrap())
            .collect();
        store.create_edge(&boundary, &keys[0], provenance).unwrap();
        for pair in keys.windows(2) {
            store.create_edge(&pair[0], &pair[1], provenance).unwrap();
        }
        store
            .create_edge(&keys[keys.len() - 1], &boundary, provenance)
            .unwrap();
    }

    #[test]
    fn upsert_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();
        let k1 = store.upsert_node(&word("a")).unwrap();
        let k2 = store.upsert_node(&word("a")).unwrap();
        assert_eq!(k1, k2);
        assert_eq!(store.node_count().unwrap(), 1);
    }

    #[test]
    fn edges_append_without_dedup() {
        let store = SqliteStore::open_in_memory().unwrap();
        let a = store.upsert_node(&word("a")).unwrap();
        let b = store.upsert_node(&word("b")).unwrap();
        store.create_edge(&a, &b, "ab").unwrap();
        store.create_edge(&a, &b, "ab").unwrap();
        assert_eq!(store.edge_count().unwrap(), 2);
    }

    #[test]
    fn start_pairs_count_occurrences() {
        let store = SqliteStore::open_in_memory().unwrap();
        put_line(&store, &["a", "b"], "ab");
        put_line(&store, &["a", "c"], "ac");

        let pairs = store.start_pairs().unwrap();
        // Two Boundary->a edges, each chaining with both a->b and a->c:
        // the start phase has no provenance constraint, so 4 rows.
        assert_eq!(pairs.len(), 4);
        assert!(pairs.iter().all(|p| p.first.surface == "a"));
    }

    #[test]
    fn successors_respect_provenance() {
        let store = SqliteStore::open_in_memory().unwrap();
        put_line(&store, &["x", "a", "y"], "xay");
        put_line(&store, &["z", "a", "w"], "zaw");

        let x = word("x").key();
        let a = word("a").key();
        let succ = store.successors(&x, &a).unwrap();
        // Only "y" shares provenance with (x -> a); "w" comes from the
        // other sentence and must not be offered.
        assert_eq!(succ.len(), 1);
        assert_eq!(succ[0].node.surface, "y");
        assert_eq!(succ[0].weight, 1);
    }

    #[test]
    fn successor_weights_count_parallel_edges() {
        let store = SqliteStore::open_in_memory().unwrap();
        put_line(&store, &["a", "b", "c"], "abc");
        put_line(&store, &["a", "b", "c"], "abc");

        let a = word("a").key();
        let b = word("b").key();
        let succ = store.successors(&a, &b).unwrap();
        assert_eq!(succ.len(), 1);
        assert_eq!(succ[0].node.surface, "c");
        // Two parallel (a->b) edges x two parallel (b->c) edges.
        assert_eq!(succ[0].weight, 4);
    }

    #[test]
    fn reaches_boundary_only_at_sentence_end() {
        let store = SqliteStore::open_in_memory().unwrap();
        put_line(&store, &["a", "b", "c"], "abc");

        let a = word("a").key();
        let b = word("b").key();
        let c = word("c").key();
        assert!(!store.reaches_boundary(&a, &b).unwrap());
        assert!(store.reaches_boundary(&b, &c).unwrap());
    }

    #[test]
    fn boundary_reachability_is_provenance_scoped() {
        let store = SqliteStore::open_in_memory().unwrap();
        // "a b" ends after b; "a b c" does not. From (a, b) the boundary
        // is reachable only through the first sentence's provenance.
        put_line(&store, &["a", "b"], "ab");
        put_line(&store, &["a", "b", "c"], "abc");

        let a = word("a").key();
        let b = word("b").key();
        assert!(store.reaches_boundary(&a, &b).unwrap());

        let succ = store.successors(&a, &b).unwrap();
        assert_eq!(succ.len(), 1);
        assert_eq!(succ[0].node.surface, "c");
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            put_line(&store, &["a", "b"], "ab");
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.node_count().unwrap(), 3);
        assert_eq!(store.edge_count().unwrap(), 3);
        assert_eq!(store.start_pairs().unwrap().len(), 1);
    }
}
