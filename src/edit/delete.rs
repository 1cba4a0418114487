use super::FlowEditor;
use crate::error::GraphError;
use crate::model::{BranchSide, GraphNode, NodeId};
use crate::store::FlowGraph;
use ahash::AHashSet;

impl FlowEditor {
    /// Deletes `id` and everything downstream of it, then reconnects `id`'s
    /// parents to whatever the deleted region used to flow into.
    pub fn delete_subtree(&self, graph: &FlowGraph, id: &str) -> Result<FlowGraph, GraphError> {
        let mut work = graph.clone();
        self.delete_subtree_in(&mut work, id)?;
        Ok(self.finish(work, "delete_subtree"))
    }

    pub(crate) fn delete_subtree_in(&self, work: &mut FlowGraph, id: &str) -> Result<(), GraphError> {
        if work.require_node(id)?.is_end() {
            return Err(GraphError::ProtectedNode(id.to_string()));
        }
        let subtree = work
            .subtree_of(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
        let deleted: AHashSet<NodeId> = subtree.node_ids().into_iter().collect();

        let parent_edges: Vec<_> = work
            .incoming_edges(id)
            .into_iter()
            .filter(|e| !deleted.contains(&e.source))
            .collect();
        let reconnect_to = reconnection_target(work, id, &subtree.node_ids(), &deleted);

        for node_id in subtree.node_ids() {
            work.remove_node(&node_id)?;
        }

        if let Some(target) = reconnect_to {
            for edge in parent_edges {
                work.add_edge(edge.retargeted(target.clone()))?;
            }
        }
        Ok(())
    }

    /// Removes exactly `id`. A node with one parent edge and one child edge is
    /// bridged: the parent edge is redirected to the child.
    pub fn delete_single(&self, graph: &FlowGraph, id: &str) -> Result<FlowGraph, GraphError> {
        let mut work = graph.clone();
        self.delete_single_in(&mut work, id)?;
        Ok(self.finish(work, "delete_single"))
    }

    pub(crate) fn delete_single_in(&self, work: &mut FlowGraph, id: &str) -> Result<(), GraphError> {
        if work.require_node(id)?.is_end() {
            return Err(GraphError::ProtectedNode(id.to_string()));
        }
        let parent_edges = work.incoming_edges(id);
        let child_edges = work.outgoing_edges(id);
        work.remove_node(id)?;

        if let ([parent], [child]) = (parent_edges.as_slice(), child_edges.as_slice()) {
            work.add_edge(parent.retargeted(child.target.clone()))?;
        }
        Ok(())
    }

    /// Removes a node sitting on one branch of `condition`.
    ///
    /// If the node had content after it, that content moves up into its slot.
    /// A nested condition has no single successor to promote, so it is removed
    /// together with its branches and the slot flows into whatever they
    /// reached. A head slot left with nothing gets a fresh placeholder tagged
    /// with the condition and side, so the branch is never left empty.
    pub fn delete_branch_member(
        &self,
        graph: &FlowGraph,
        id: &str,
        condition: &str,
        side: BranchSide,
    ) -> Result<FlowGraph, GraphError> {
        let mut work = graph.clone();
        if work.require_node(id)?.is_end() {
            return Err(GraphError::ProtectedNode(id.to_string()));
        }
        let structure = work
            .branch_structure(condition)
            .ok_or_else(|| {
                if work.contains_node(condition) {
                    GraphError::NotACondition(condition.to_string())
                } else {
                    GraphError::NodeNotFound(condition.to_string())
                }
            })?;
        if !structure.side(side).members.iter().any(|m| m == id) {
            return Err(GraphError::NotInBranch {
                node_id: id.to_string(),
                condition_id: condition.to_string(),
                side,
            });
        }

        let heads_branch = structure.side(side).targets.iter().any(|t| t == id);
        let parent_edges = work.incoming_edges(id);
        let (content_out, other_out): (Vec<_>, Vec<_>) =
            work.outgoing_edges(id).into_iter().partition(|e| {
                work.get_node(&e.target).is_some_and(GraphNode::is_content)
            });

        if work.is_condition(id) || content_out.len() > 1 {
            self.delete_subtree_in(&mut work, id)?;
        } else {
            work.remove_node(id)?;
            // Placeholders and ghosts that only hung off the removed node go with it.
            for edge in other_out {
                if work.contains_node(&edge.target) && work.incoming_edges(&edge.target).is_empty() {
                    work.remove_node(&edge.target)?;
                }
            }
            if let Some(child) = content_out.first() {
                for parent in &parent_edges {
                    work.add_edge(parent.retargeted(child.target.clone()))?;
                }
            }
        }

        if heads_branch && work.branch_edges(condition, side).is_empty() {
            let slot_edge = parent_edges
                .iter()
                .find(|e| e.source == condition && e.kind.is_branch(side));
            if let Some(edge) = slot_edge {
                let placeholder_id = self.placeholder_id(&work);
                work.add_node(GraphNode::placeholder(placeholder_id.clone(), condition, side))?;
                work.add_edge(edge.retargeted(placeholder_id))?;
            }
        }
        Ok(self.finish(work, "delete_branch_member"))
    }
}

/// The node the surviving parents should flow into after a subtree delete.
///
/// `root`'s own surviving children win; otherwise the first node outside the
/// deleted set reached by an edge leaving it, in breadth-first order.
fn reconnection_target(
    graph: &FlowGraph,
    root: &str,
    order: &[NodeId],
    deleted: &AHashSet<NodeId>,
) -> Option<NodeId> {
    graph
        .children(root)
        .into_iter()
        .find(|c| !deleted.contains(c))
        .or_else(|| {
            order
                .iter()
                .flat_map(|n| graph.children(n))
                .find(|c| !deleted.contains(c))
        })
}
