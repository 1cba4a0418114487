//! Identifier generation for nodes and edges created by edits.
//!
//! The editing core never invents ids on its own; it asks an injected
//! [`IdGenerator`]. Two strategies ship with the crate: a monotonic counter
//! ([`SequentialIds`]) and random UUIDs ([`UuidIds`]).

use crate::store::FlowGraph;
use std::sync::atomic::{AtomicU64, Ordering};

/// Produces ids that are unique for the lifetime of the generator.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self, prefix: Option<&str>) -> String;
}

/// A monotonic counter. Ids look like `node-1`, `node-2`, ...
///
/// ```
/// use flowgraph::ids::{IdGenerator, SequentialIds};
///
/// let ids = SequentialIds::new();
/// assert_eq!(ids.next_id(Some("node")), "node-1");
/// assert_eq!(ids.next_id(None), "id-2");
/// ```
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Resume counting at `start`, e.g. after loading a saved flow.
    pub const fn with_start(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    pub fn current(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self, prefix: Option<&str>) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", prefix.unwrap_or("id"), n)
    }
}

/// Random v4 UUIDs, optionally prefixed.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self, prefix: Option<&str>) -> String {
        let uuid = uuid::Uuid::new_v4();
        match prefix {
            Some(prefix) => format!("{}-{}", prefix, uuid),
            None => uuid.to_string(),
        }
    }
}

/// Draws ids until one is free in `graph` as both a node and an edge id.
///
/// Guards against host-seeded ids that happen to match the generator's pattern.
pub fn fresh_id(graph: &FlowGraph, ids: &dyn IdGenerator, prefix: &str) -> String {
    loop {
        let candidate = ids.next_id(Some(prefix));
        if !graph.contains_node(&candidate) && !graph.contains_edge(&candidate) {
            return candidate;
        }
    }
}
