//! Structural edit operations.
//!
//! Every operation takes a snapshot and returns a new one. Internally each
//! operation clones the input into a working copy and mutates only that copy,
//! so a failure anywhere simply drops the copy: edits are all-or-nothing.

use crate::clipboard::ClipboardContents;
use crate::error::GraphError;
use crate::ids::{IdGenerator, fresh_id};
use crate::model::{BranchSide, GraphEdge, GraphNode, NodeId};
use crate::repair::{self, RepairReport};
use crate::store::FlowGraph;
use std::sync::Arc;

mod builder;
mod delete;
mod insert;
pub(crate) mod splice;

pub use builder::{EditorConfig, FlowEditorBuilder};

/// Where new or pasted material is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertionPoint {
    /// Directly after a node; the node's previous downstream follows the new material.
    /// Targeting a placeholder replaces the placeholder.
    After(NodeId),
    /// At the head of one branch of a condition.
    BranchHead { condition: NodeId, side: BranchSide },
}

impl InsertionPoint {
    /// The existing node the insertion hangs off.
    pub fn anchor(&self) -> &str {
        match self {
            InsertionPoint::After(id) => id,
            InsertionPoint::BranchHead { condition, .. } => condition,
        }
    }
}

/// A UI-dispatchable edit with all of its arguments spelled out.
#[derive(Debug, Clone)]
pub enum EditOp {
    InsertAfter {
        target: NodeId,
        node: GraphNode,
    },
    InsertConditionAfter {
        target: NodeId,
        node: GraphNode,
        move_downstream_to: BranchSide,
    },
    InsertIntoBranch {
        condition: NodeId,
        side: BranchSide,
        node: GraphNode,
        move_downstream_to: Option<BranchSide>,
    },
    DeleteSubtree {
        id: NodeId,
    },
    DeleteSingle {
        id: NodeId,
    },
    DeleteBranchMember {
        id: NodeId,
        condition: NodeId,
        side: BranchSide,
    },
    CutNode {
        id: NodeId,
    },
    CutFlow {
        id: NodeId,
    },
    CopyNode {
        id: NodeId,
    },
    CopyFlow {
        id: NodeId,
    },
    Paste {
        contents: ClipboardContents,
        at: InsertionPoint,
        move_downstream_to: Option<BranchSide>,
        remap_ids: bool,
    },
    MoveNode {
        id: NodeId,
        to: InsertionPoint,
        move_downstream_to: Option<BranchSide>,
    },
    MoveFlow {
        id: NodeId,
        to: InsertionPoint,
        move_downstream_to: Option<BranchSide>,
    },
    DuplicateNode {
        id: NodeId,
        move_downstream_to: Option<BranchSide>,
    },
    DuplicateFlow {
        id: NodeId,
        move_downstream_to: Option<BranchSide>,
    },
    Repair,
}

/// What the dispatch boundary hands back to the UI.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    /// The new snapshot, or the untouched input when the edit failed.
    pub snapshot: FlowGraph,
    /// Material captured by a cut or copy.
    pub captured: Option<ClipboardContents>,
    pub error: Option<GraphError>,
}

impl EditOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Applies structural edits to flow snapshots.
pub struct FlowEditor {
    config: EditorConfig,
    ids: Arc<dyn IdGenerator>,
}

impl Default for FlowEditor {
    fn default() -> Self {
        FlowEditorBuilder::new().build()
    }
}

impl FlowEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> FlowEditorBuilder {
        FlowEditorBuilder::new()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn ids(&self) -> &dyn IdGenerator {
        self.ids.as_ref()
    }

    pub(crate) fn node_id(&self, graph: &FlowGraph) -> String {
        fresh_id(graph, self.ids(), &self.config.node_prefix)
    }

    pub(crate) fn edge_id(&self, graph: &FlowGraph) -> String {
        fresh_id(graph, self.ids(), &self.config.edge_prefix)
    }

    pub(crate) fn placeholder_id(&self, graph: &FlowGraph) -> String {
        fresh_id(graph, self.ids(), &self.config.placeholder_prefix)
    }

    /// Creates the starter snapshot `trigger -> end`.
    pub fn start_flow(&self, trigger: GraphNode) -> Result<FlowGraph, GraphError> {
        let mut graph = FlowGraph::new();
        let trigger_id = trigger.id.clone();
        graph.add_node(trigger)?;
        let end_id = self.node_id(&graph);
        graph.add_node(GraphNode::end(end_id.clone()))?;
        let edge_id = self.edge_id(&graph);
        graph.add_edge(GraphEdge::flow(edge_id, trigger_id, end_id))?;
        Ok(graph)
    }

    /// Runs the branch invariant repair pass.
    pub fn repair(&self, graph: &FlowGraph) -> (FlowGraph, RepairReport) {
        repair::repair(graph, self.ids(), &self.config)
    }

    /// Publishes a finished working copy, repairing it first when configured to.
    ///
    /// Without repair the conditions' `branches` lists are still rewritten.
    pub(crate) fn finish(&self, graph: FlowGraph, operation: &str) -> FlowGraph {
        let graph = if self.config.auto_repair {
            let (repaired, report) = self.repair(&graph);
            if !report.is_clean() {
                log::debug!("{}: repair pass {}", operation, report);
            }
            repaired
        } else {
            let mut graph = graph;
            graph.refresh_branch_lists();
            graph
        };
        log::debug!(
            "{} produced a snapshot with {} nodes and {} edges",
            operation,
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    /// The UI event boundary: runs `op` and never fails.
    ///
    /// On error the condition is logged and the input snapshot is handed back
    /// unchanged alongside the error.
    pub fn apply(&self, graph: &FlowGraph, op: EditOp) -> EditOutcome {
        let mut captured = None;
        let result = match op {
            EditOp::InsertAfter { target, node } => self.insert_after(graph, &target, node),
            EditOp::InsertConditionAfter {
                target,
                node,
                move_downstream_to,
            } => self.insert_condition_after(graph, &target, node, move_downstream_to),
            EditOp::InsertIntoBranch {
                condition,
                side,
                node,
                move_downstream_to,
            } => self.insert_into_branch(graph, &condition, side, node, move_downstream_to),
            EditOp::DeleteSubtree { id } => self.delete_subtree(graph, &id),
            EditOp::DeleteSingle { id } => self.delete_single(graph, &id),
            EditOp::DeleteBranchMember {
                id,
                condition,
                side,
            } => self.delete_branch_member(graph, &id, &condition, side),
            EditOp::CutNode { id } => self.cut_node(graph, &id).map(|(next, contents)| {
                captured = Some(contents);
                next
            }),
            EditOp::CutFlow { id } => self.cut_flow(graph, &id).map(|(next, contents)| {
                captured = Some(contents);
                next
            }),
            EditOp::CopyNode { id } => self.copy_node(graph, &id).map(|contents| {
                captured = Some(contents);
                graph.clone()
            }),
            EditOp::CopyFlow { id } => self.copy_flow(graph, &id).map(|contents| {
                captured = Some(contents);
                graph.clone()
            }),
            EditOp::Paste {
                contents,
                at,
                move_downstream_to,
                remap_ids,
            } => self.paste(graph, &contents, &at, move_downstream_to, remap_ids),
            EditOp::MoveNode {
                id,
                to,
                move_downstream_to,
            } => self.move_node(graph, &id, &to, move_downstream_to),
            EditOp::MoveFlow {
                id,
                to,
                move_downstream_to,
            } => self.move_flow(graph, &id, &to, move_downstream_to),
            EditOp::DuplicateNode {
                id,
                move_downstream_to,
            } => self.duplicate_node(graph, &id, move_downstream_to),
            EditOp::DuplicateFlow {
                id,
                move_downstream_to,
            } => self.duplicate_flow(graph, &id, move_downstream_to),
            EditOp::Repair => Ok(self.repair(graph).0),
        };

        match result {
            Ok(snapshot) => EditOutcome {
                snapshot,
                captured,
                error: None,
            },
            Err(e) => {
                log::warn!("Edit rejected, keeping previous snapshot: {}", e);
                EditOutcome {
                    snapshot: graph.clone(),
                    captured: None,
                    error: Some(e),
                }
            }
        }
    }
}
