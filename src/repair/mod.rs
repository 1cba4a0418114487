//! The branch invariant maintainer.
//!
//! Brings every condition's two branches back to their canonical shape: a
//! branch either reaches content, or holds exactly one placeholder and nothing
//! else. The pass only adds, removes or splices out placeholders and ghosts;
//! it never touches trigger, action, condition or end nodes, which is what
//! makes a second run a no-op.

use crate::edit::EditorConfig;
use crate::ids::{IdGenerator, fresh_id};
use crate::model::{BranchSide, GraphEdge, GraphNode, NodeId, NodeKind};
use crate::store::FlowGraph;
use std::fmt;

/// What a repair pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub placeholders_added: usize,
    pub placeholders_removed: usize,
    pub ghosts_replaced: usize,
    pub ghosts_removed: usize,
    pub branch_lists_refreshed: usize,
}

impl RepairReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for RepairReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "+{} / -{} placeholders, {} ghosts replaced, {} ghosts removed, {} branch lists refreshed",
            self.placeholders_added,
            self.placeholders_removed,
            self.ghosts_replaced,
            self.ghosts_removed,
            self.branch_lists_refreshed
        )
    }
}

/// Repairs branch invariants on a copy of `graph`.
pub fn repair(
    graph: &FlowGraph,
    ids: &dyn IdGenerator,
    config: &EditorConfig,
) -> (FlowGraph, RepairReport) {
    let mut repairer = BranchRepairer::new(graph.clone(), ids, config);
    repairer.run();
    if !repairer.report.is_clean() {
        log::info!("Branch repair: {}", repairer.report);
    }
    (repairer.graph, repairer.report)
}

struct BranchRepairer<'a> {
    graph: FlowGraph,
    ids: &'a dyn IdGenerator,
    config: &'a EditorConfig,
    report: RepairReport,
}

impl<'a> BranchRepairer<'a> {
    fn new(graph: FlowGraph, ids: &'a dyn IdGenerator, config: &'a EditorConfig) -> Self {
        Self {
            graph,
            ids,
            config,
            report: RepairReport::default(),
        }
    }

    fn run(&mut self) {
        self.resolve_ghosts();
        self.splice_out_placeholder_chains();
        for condition in self.graph.nodes_of_kind(NodeKind::Condition) {
            for side in BranchSide::BOTH {
                self.canonicalize_side(&condition, side);
            }
        }
        self.remove_orphan_placeholders();
        self.refresh_branch_lists();
    }

    /// Ghosts sitting in a branch slot become placeholders; any other ghost is
    /// spliced out of the flow.
    fn resolve_ghosts(&mut self) {
        for ghost in self.graph.nodes_of_kind(NodeKind::Ghost) {
            match self.graph.branch_slot_of(&ghost) {
                Some((condition, side)) => {
                    let mut node = GraphNode::placeholder(ghost.clone(), condition, side);
                    if let Some(old) = self.graph.get_node(&ghost) {
                        node.position = old.position;
                    }
                    log::debug!("Replacing ghost '{}' with a placeholder", ghost);
                    if self.graph.replace_node(node).is_ok() {
                        self.report.ghosts_replaced += 1;
                    }
                }
                None => {
                    log::debug!("Splicing out ghost '{}'", ghost);
                    self.splice_out(&ghost);
                    self.report.ghosts_removed += 1;
                }
            }
        }
    }

    /// A placeholder never has anything after it. If it does, whatever follows
    /// takes its slot.
    fn splice_out_placeholder_chains(&mut self) {
        for placeholder in self.graph.nodes_of_kind(NodeKind::Placeholder) {
            if !self.graph.contains_node(&placeholder)
                || self.graph.outgoing_edges(&placeholder).is_empty()
            {
                continue;
            }
            log::debug!("Placeholder '{}' has successors, splicing it out", placeholder);
            self.splice_out(&placeholder);
            self.report.placeholders_removed += 1;
        }
    }

    fn canonicalize_side(&mut self, condition: &str, side: BranchSide) {
        let edges = self.graph.branch_edges(condition, side);
        if edges.is_empty() {
            let placeholder_id = fresh_id(&self.graph, self.ids, &self.config.placeholder_prefix);
            let edge_id = fresh_id(&self.graph, self.ids, &self.config.edge_prefix);
            log::debug!(
                "Condition '{}' has no {} branch, adding placeholder '{}'",
                condition,
                side,
                placeholder_id
            );
            let added = self
                .graph
                .add_node(GraphNode::placeholder(placeholder_id.clone(), condition, side))
                .and_then(|_| {
                    self.graph
                        .add_edge(GraphEdge::branch(edge_id, condition, placeholder_id, side))
                });
            if added.is_ok() {
                self.report.placeholders_added += 1;
            }
            return;
        }

        let (placeholders, content): (Vec<_>, Vec<_>) = edges.into_iter().partition(|e| {
            self.graph
                .get_node(&e.target)
                .is_some_and(GraphNode::is_placeholder)
        });
        let surplus = if content.is_empty() {
            placeholders.into_iter().skip(1).collect::<Vec<_>>()
        } else {
            placeholders
        };
        for edge in surplus {
            log::debug!(
                "Dropping surplus placeholder '{}' from the {} branch of '{}'",
                edge.target,
                side,
                condition
            );
            self.drop_placeholder_edge(&edge.id, &edge.target);
        }
    }

    fn drop_placeholder_edge(&mut self, edge_id: &str, placeholder: &str) {
        if let Err(e) = self.graph.remove_edge(edge_id) {
            log::warn!("Could not drop placeholder edge '{}': {}", edge_id, e);
        }
        if self.graph.incoming_edges(placeholder).is_empty()
            && self.graph.remove_node(placeholder).is_ok()
        {
            self.report.placeholders_removed += 1;
        }
    }

    fn remove_orphan_placeholders(&mut self) {
        for placeholder in self.graph.nodes_of_kind(NodeKind::Placeholder) {
            if self.graph.incoming_edges(&placeholder).is_empty()
                && self.graph.remove_node(&placeholder).is_ok()
            {
                log::debug!("Removed orphaned placeholder '{}'", placeholder);
                self.report.placeholders_removed += 1;
            }
        }
    }

    fn refresh_branch_lists(&mut self) {
        self.report.branch_lists_refreshed += self.graph.refresh_branch_lists();
    }

    /// Removes `id`, handing its slot to its first successor.
    ///
    /// Every parent edge keeps its id, kind and payload and is pointed at that
    /// successor. Further successors are left detached rather than copied onto
    /// the parent, so a branch edge never fans out.
    fn splice_out(&mut self, id: &str) {
        let parents: Vec<_> = self
            .graph
            .incoming_edges(id)
            .into_iter()
            .filter(|e| e.source != id)
            .collect();
        let children: Vec<NodeId> = self
            .graph
            .outgoing_edges(id)
            .into_iter()
            .map(|e| e.target.clone())
            .filter(|t| t != id)
            .collect();
        if self.graph.remove_node(id).is_err() {
            return;
        }
        let Some(child) = children.first() else {
            return;
        };
        if children.len() > 1 {
            log::debug!(
                "'{}' had {} successors, reconnecting its parents to '{}' only",
                id,
                children.len(),
                child
            );
        }
        for parent in parents {
            if let Err(e) = self.graph.add_edge(parent.retargeted(child.clone())) {
                log::warn!("Could not reconnect '{}' past '{}': {}", parent.source, id, e);
            }
        }
    }
}
