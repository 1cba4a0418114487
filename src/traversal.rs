//! Breadth-first queries over a snapshot's forward adjacency.

use crate::model::{BranchSide, Branches, EdgeKind, GraphEdge, GraphNode, NodeId, NodeKind};
use crate::store::FlowGraph;
use ahash::AHashSet;
use std::collections::VecDeque;
use std::sync::Arc;

/// A node plus everything reachable from it, minus the `end` sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct Subtree {
    pub root: NodeId,
    /// Root first, then breadth-first order.
    pub nodes: Vec<Arc<GraphNode>>,
    /// Edges with both endpoints inside the subtree.
    pub edges: Vec<Arc<GraphEdge>>,
}

impl Subtree {
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }
}

/// Targets and downstream of one side of a condition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchView {
    /// Direct targets of the side's branch edges.
    pub targets: Vec<NodeId>,
    /// Targets followed by everything reachable from them.
    pub members: Vec<NodeId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchStructure {
    pub yes: BranchView,
    pub no: BranchView,
}

impl BranchStructure {
    pub fn side(&self, side: BranchSide) -> &BranchView {
        match side {
            BranchSide::Yes => &self.yes,
            BranchSide::No => &self.no,
        }
    }
}

impl FlowGraph {
    /// Every id reachable from `id`, in breadth-first order, excluding `id` itself.
    ///
    /// Terminates on cyclic input. Unknown ids yield an empty list.
    pub fn downstream_of(&self, id: &str) -> Vec<NodeId> {
        self.reachable_from(self.children(id), Some(id))
    }

    /// Breadth-first closure over `seeds` (seeds included, in order).
    fn reachable_from(&self, seeds: Vec<NodeId>, exclude: Option<&str>) -> Vec<NodeId> {
        let mut visited: AHashSet<NodeId> = AHashSet::new();
        if let Some(exclude) = exclude {
            visited.insert(exclude.to_string());
        }
        let mut order = Vec::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        for seed in seeds {
            if visited.insert(seed.clone()) {
                queue.push_back(seed);
            }
        }
        while let Some(current) = queue.pop_front() {
            for child in self.children(&current) {
                if visited.insert(child.clone()) {
                    queue.push_back(child);
                }
            }
            order.push(current);
        }
        order
    }

    /// `id` plus its downstream set, minus the `end` sentinel and edges into it.
    ///
    /// Returns `None` when `id` is unknown or is itself the sentinel.
    pub fn subtree_of(&self, id: &str) -> Option<Subtree> {
        let root = self.get_node(id)?;
        if root.is_end() {
            return None;
        }
        let mut ids = vec![id.to_string()];
        ids.extend(self.downstream_of(id));
        let nodes: Vec<Arc<GraphNode>> = ids
            .iter()
            .filter_map(|n| self.node_handle(n))
            .filter(|n| !n.is_end())
            .collect();
        Some(Subtree {
            root: id.to_string(),
            edges: self.edges_within(&nodes),
            nodes,
        })
    }

    /// Edges, in snapshot order, whose source and target are both in `nodes`.
    pub(crate) fn edges_within(&self, nodes: &[Arc<GraphNode>]) -> Vec<Arc<GraphEdge>> {
        let members: AHashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        self.all_edges()
            .filter(|e| members.contains(e.source.as_str()) && members.contains(e.target.as_str()))
            .filter_map(|e| self.edge_handle(&e.id))
            .collect()
    }

    pub fn is_condition(&self, id: &str) -> bool {
        self.get_node(id).is_some_and(GraphNode::is_condition)
    }

    /// Branch edges leaving `condition` on `side`, in insertion order.
    pub fn branch_edges(&self, condition: &str, side: BranchSide) -> Vec<Arc<GraphEdge>> {
        self.outgoing_edges(condition)
            .into_iter()
            .filter(|e| e.kind.is_branch(side))
            .collect()
    }

    /// Yes/no targets and their downstream sets. `None` for non-conditions.
    pub fn branch_structure(&self, id: &str) -> Option<BranchStructure> {
        if !self.is_condition(id) {
            return None;
        }
        let view = |side: BranchSide| {
            let targets: Vec<NodeId> = self
                .branch_edges(id, side)
                .into_iter()
                .map(|e| e.target.clone())
                .collect();
            let members = self.reachable_from(targets.clone(), Some(id));
            BranchView { targets, members }
        };
        Some(BranchStructure {
            yes: view(BranchSide::Yes),
            no: view(BranchSide::No),
        })
    }

    /// Rewrites every condition's `branches` lists from its branch edges.
    ///
    /// Returns how many conditions had a stale list.
    pub fn refresh_branch_lists(&mut self) -> usize {
        let mut refreshed = 0;
        for condition in self.nodes_of_kind(NodeKind::Condition) {
            let Some(structure) = self.branch_structure(&condition) else {
                continue;
            };
            let fresh = Branches {
                yes: structure.yes.members,
                no: structure.no.members,
            };
            let Some(node) = self.get_node(&condition) else {
                continue;
            };
            if node.branches.as_ref() == Some(&fresh) {
                continue;
            }
            let mut updated = node.clone();
            updated.branches = Some(fresh);
            if self.replace_node(updated).is_ok() {
                refreshed += 1;
            }
        }
        refreshed
    }

    /// The condition and side whose branch edge points directly at `id`, if any.
    pub fn branch_slot_of(&self, id: &str) -> Option<(NodeId, BranchSide)> {
        self.incoming_edges(id).into_iter().find_map(|e| match e.kind {
            EdgeKind::Branch { side } => Some((e.source.clone(), side)),
            EdgeKind::Flow => None,
        })
    }
}
