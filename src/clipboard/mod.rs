//! Cut, copy, paste, move and duplicate.
//!
//! A capture is a self-contained region of nodes with the edges between them.
//! Pasting splices the region in at an insertion point, optionally under fresh
//! ids. Move and duplicate are compositions of the two halves.

use crate::model::{GraphEdge, GraphNode, NodeId};
use ahash::AHashSet;
use std::sync::Arc;

mod capture;
mod paste;
mod relocate;

/// How the captured material left the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    Cut,
    Copy,
}

/// Material held on the clipboard.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardContents {
    pub mode: CaptureMode,
    /// The node the capture was taken from.
    pub root: NodeId,
    pub nodes: Vec<Arc<GraphNode>>,
    /// Edges with both endpoints inside the capture.
    pub edges: Vec<Arc<GraphEdge>>,
}

impl ClipboardContents {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    pub fn has_condition(&self) -> bool {
        self.nodes.iter().any(|n| n.is_condition())
    }

    /// The unique node with no incoming edge from inside the capture.
    /// Falls back to `root` when that is not unique.
    pub fn entry(&self) -> NodeId {
        let targets: AHashSet<&str> = self.edges.iter().map(|e| e.target.as_str()).collect();
        let mut entries = self.nodes.iter().filter(|n| !targets.contains(n.id.as_str()));
        match (entries.next(), entries.next()) {
            (Some(entry), None) => entry.id.clone(),
            _ => self.root.clone(),
        }
    }
}
