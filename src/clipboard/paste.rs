use super::ClipboardContents;
use crate::edit::splice::Region;
use crate::edit::{FlowEditor, InsertionPoint};
use crate::error::GraphError;
use crate::model::{BranchRef, BranchSide, Branches, GraphEdge, GraphNode, NodeId};
use crate::store::FlowGraph;
use ahash::AHashMap;
use std::sync::Arc;

impl FlowEditor {
    /// Splices captured material in at `at`.
    ///
    /// With `remap_ids` every captured node and edge gets a fresh id, so the
    /// same capture can be pasted any number of times. Without it the captured
    /// ids are reused and must not already exist in `graph`.
    ///
    /// When the capture contains a condition and the insertion point has
    /// downstream content, `move_downstream_to` names the branch that inherits
    /// it; leaving it out fails with `AmbiguousBranchTarget`.
    pub fn paste(
        &self,
        graph: &FlowGraph,
        contents: &ClipboardContents,
        at: &InsertionPoint,
        move_downstream_to: Option<BranchSide>,
        remap_ids: bool,
    ) -> Result<FlowGraph, GraphError> {
        let mut work = graph.clone();
        self.paste_in(&mut work, contents, at, move_downstream_to, remap_ids)?;
        Ok(self.finish(work, "paste"))
    }

    pub(crate) fn paste_in(
        &self,
        work: &mut FlowGraph,
        contents: &ClipboardContents,
        at: &InsertionPoint,
        move_downstream_to: Option<BranchSide>,
        remap_ids: bool,
    ) -> Result<(), GraphError> {
        if contents.is_empty() {
            return Err(GraphError::EmptyClipboard);
        }
        let region = if remap_ids {
            self.remapped_region(work, contents)
        } else {
            Region {
                nodes: contents.nodes.clone(),
                edges: contents.edges.clone(),
                entry: contents.entry(),
            }
        };
        log::debug!(
            "Pasting {} node(s) at '{}' (remap: {})",
            region.nodes.len(),
            at.anchor(),
            remap_ids
        );
        self.splice_region(work, at, region, move_downstream_to)
    }

    /// Copies the capture under fresh ids, rewriting every internal reference.
    fn remapped_region(&self, graph: &FlowGraph, contents: &ClipboardContents) -> Region {
        let node_ids: AHashMap<NodeId, NodeId> = contents
            .nodes
            .iter()
            .map(|n| {
                let fresh = if n.is_placeholder() {
                    self.placeholder_id(graph)
                } else {
                    self.node_id(graph)
                };
                (n.id.clone(), fresh)
            })
            .collect();
        let map = |id: &NodeId| node_ids.get(id).cloned().unwrap_or_else(|| id.clone());

        let nodes = contents
            .nodes
            .iter()
            .map(|n| {
                let mut node = n.as_ref().clone();
                node.id = map(&n.id);
                node.branch_of = n.branch_of.as_ref().map(|b| BranchRef {
                    condition: map(&b.condition),
                    side: b.side,
                });
                node.branches = n.branches.as_ref().map(|b| Branches {
                    yes: b.yes.iter().map(map).collect(),
                    no: b.no.iter().map(map).collect(),
                });
                Arc::new(node)
            })
            .collect();
        let edges = contents
            .edges
            .iter()
            .map(|e| {
                Arc::new(GraphEdge {
                    id: self.edge_id(graph),
                    source: map(&e.source),
                    target: map(&e.target),
                    kind: e.kind,
                    payload: e.payload.clone(),
                })
            })
            .collect();

        Region {
            nodes,
            edges,
            entry: map(&contents.entry()),
        }
    }
}
