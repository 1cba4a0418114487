use super::splice::Region;
use super::{FlowEditor, InsertionPoint};
use crate::error::GraphError;
use crate::model::{BranchSide, Branches, GraphEdge, GraphNode, NodeKind};
use crate::store::FlowGraph;
use std::sync::Arc;

impl FlowEditor {
    /// Inserts `node` after `target`.
    ///
    /// A non-condition node inherits `target`'s downstream. A condition node can
    /// only be inserted this way when `target` has no downstream; otherwise the
    /// caller must say which branch inherits it (see [`Self::insert_condition_after`]).
    pub fn insert_after(
        &self,
        graph: &FlowGraph,
        target: &str,
        node: GraphNode,
    ) -> Result<FlowGraph, GraphError> {
        self.insert_at(graph, &InsertionPoint::After(target.to_string()), node, None)
    }

    /// Inserts a condition after `target` and moves `target`'s downstream onto
    /// the `move_downstream_to` branch. The other branch gets a placeholder.
    pub fn insert_condition_after(
        &self,
        graph: &FlowGraph,
        target: &str,
        node: GraphNode,
        move_downstream_to: BranchSide,
    ) -> Result<FlowGraph, GraphError> {
        self.insert_at(
            graph,
            &InsertionPoint::After(target.to_string()),
            node,
            Some(move_downstream_to),
        )
    }

    /// Inserts `node` at the head of one branch of `condition`.
    pub fn insert_into_branch(
        &self,
        graph: &FlowGraph,
        condition: &str,
        side: BranchSide,
        node: GraphNode,
        move_downstream_to: Option<BranchSide>,
    ) -> Result<FlowGraph, GraphError> {
        let point = InsertionPoint::BranchHead {
            condition: condition.to_string(),
            side,
        };
        self.insert_at(graph, &point, node, move_downstream_to)
    }

    pub fn insert_at(
        &self,
        graph: &FlowGraph,
        point: &InsertionPoint,
        node: GraphNode,
        move_downstream_to: Option<BranchSide>,
    ) -> Result<FlowGraph, GraphError> {
        let mut work = graph.clone();
        self.insert_in(&mut work, point, node, move_downstream_to)?;
        Ok(self.finish(work, "insert"))
    }

    pub(crate) fn insert_in(
        &self,
        work: &mut FlowGraph,
        point: &InsertionPoint,
        node: GraphNode,
        move_downstream_to: Option<BranchSide>,
    ) -> Result<(), GraphError> {
        if node.kind == NodeKind::End {
            return Err(GraphError::ProtectedNode(node.id));
        }
        if work.contains_node(&node.id) {
            return Err(GraphError::DuplicateId(node.id));
        }
        let region = self.fresh_region(work, node);
        self.splice_region(work, point, region, move_downstream_to)
    }

    /// Wraps a new node as a region; a condition comes with a placeholder per side.
    fn fresh_region(&self, graph: &FlowGraph, mut node: GraphNode) -> Region {
        let entry = node.id.clone();
        if !node.is_condition() {
            return Region {
                nodes: vec![Arc::new(node)],
                edges: Vec::new(),
                entry,
            };
        }

        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut branches = Branches::default();
        for side in BranchSide::BOTH {
            let placeholder_id = self.placeholder_id(graph);
            let edge_id = self.edge_id(graph);
            branches.side_mut(side).push(placeholder_id.clone());
            edges.push(Arc::new(GraphEdge::branch(
                edge_id,
                entry.clone(),
                placeholder_id.clone(),
                side,
            )));
            nodes.push(Arc::new(GraphNode::placeholder(placeholder_id, entry.clone(), side)));
        }
        node.branches = Some(branches);
        nodes.insert(0, Arc::new(node));
        Region {
            nodes,
            edges,
            entry,
        }
    }
}
