//! The graph store: one immutable-by-convention snapshot of a flow.
//!
//! A [`FlowGraph`] keeps id-keyed node and edge maps plus forward and reverse
//! adjacency. Nodes and edges sit behind `Arc`, so cloning a snapshot is
//! shallow; edits clone the previous snapshot into a working copy, mutate the
//! copy and hand it back, leaving the original untouched.

use crate::error::GraphError;
use crate::model::{EdgeId, FlowDefinition, GraphEdge, GraphNode, NodeId, NodeKind, Position};
use ahash::AHashMap;
use itertools::Itertools;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowGraph {
    nodes: AHashMap<NodeId, Arc<GraphNode>>,
    edges: AHashMap<EdgeId, Arc<GraphEdge>>,
    node_order: Vec<NodeId>,
    edge_order: Vec<EdgeId>,
    // Adjacency is kept per edge so parallel edges between the same pair of
    // nodes (both sides of a condition reaching `end`) are tracked correctly.
    outgoing: AHashMap<NodeId, Vec<EdgeId>>,
    incoming: AHashMap<NodeId, Vec<EdgeId>>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from node and edge lists.
    ///
    /// Duplicate ids and edges with a missing endpoint are skipped and logged.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = GraphNode>,
        edges: impl IntoIterator<Item = GraphEdge>,
    ) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            if let Err(e) = graph.add_node(node) {
                log::warn!("Skipping node while building snapshot: {}", e);
            }
        }
        for edge in edges {
            // add_edge already logs dangling endpoints.
            let _ = graph.add_edge(edge);
        }
        graph
    }

    pub fn from_definition(definition: FlowDefinition) -> Self {
        Self::from_parts(definition.nodes, definition.edges)
    }

    pub fn to_definition(&self) -> FlowDefinition {
        FlowDefinition {
            nodes: self.all_nodes().cloned().collect(),
            edges: self.all_edges().cloned().collect(),
        }
    }

    // --- Lookups ---

    pub fn get_node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id).map(Arc::as_ref)
    }

    pub fn get_edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.get(id).map(Arc::as_ref)
    }

    /// Shared handle to a node, for captures that outlive this snapshot.
    pub fn node_handle(&self, id: &str) -> Option<Arc<GraphNode>> {
        self.nodes.get(id).cloned()
    }

    pub fn edge_handle(&self, id: &str) -> Option<Arc<GraphEdge>> {
        self.edges.get(id).cloned()
    }

    /// Looks up a node or fails with `NodeNotFound`.
    pub fn require_node(&self, id: &str) -> Result<&GraphNode, GraphError> {
        self.get_node(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in insertion order.
    pub fn all_nodes(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.node_order
            .iter()
            .filter_map(|id| self.nodes.get(id).map(Arc::as_ref))
    }

    /// All edges in insertion order.
    pub fn all_edges(&self) -> impl Iterator<Item = &GraphEdge> + '_ {
        self.edge_order
            .iter()
            .filter_map(|id| self.edges.get(id).map(Arc::as_ref))
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<NodeId> {
        self.all_nodes()
            .filter(|n| n.kind == kind)
            .map(|n| n.id.clone())
            .collect()
    }

    /// The first `end` sentinel, if the flow has one.
    pub fn end_node(&self) -> Option<&GraphNode> {
        self.all_nodes().find(|n| n.is_end())
    }

    pub fn outgoing_edges(&self, id: &str) -> Vec<Arc<GraphEdge>> {
        self.edges_from_index(&self.outgoing, id)
    }

    pub fn incoming_edges(&self, id: &str) -> Vec<Arc<GraphEdge>> {
        self.edges_from_index(&self.incoming, id)
    }

    /// Distinct child ids, ordered by edge insertion.
    pub fn children(&self, id: &str) -> Vec<NodeId> {
        self.outgoing_edges(id)
            .into_iter()
            .map(|e| e.target.clone())
            .unique()
            .collect()
    }

    /// Distinct parent ids, ordered by edge insertion.
    pub fn parents(&self, id: &str) -> Vec<NodeId> {
        self.incoming_edges(id)
            .into_iter()
            .map(|e| e.source.clone())
            .unique()
            .collect()
    }

    fn edges_from_index(
        &self,
        index: &AHashMap<NodeId, Vec<EdgeId>>,
        id: &str,
    ) -> Vec<Arc<GraphEdge>> {
        index
            .get(id)
            .map(|edge_ids| {
                edge_ids
                    .iter()
                    .filter_map(|e| self.edges.get(e).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    // --- In-place mutators (working copies only) ---

    pub fn add_node(&mut self, node: GraphNode) -> Result<(), GraphError> {
        self.add_node_handle(Arc::new(node))
    }

    pub fn add_node_handle(&mut self, node: Arc<GraphNode>) -> Result<(), GraphError> {
        if self.nodes.contains_key(&node.id) {
            return Err(GraphError::DuplicateId(node.id.clone()));
        }
        self.node_order.push(node.id.clone());
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Swaps in a new version of an existing node, keeping its edges and order.
    pub fn replace_node(&mut self, node: GraphNode) -> Result<(), GraphError> {
        match self.nodes.get_mut(&node.id) {
            Some(slot) => {
                *slot = Arc::new(node);
                Ok(())
            }
            None => Err(GraphError::NodeNotFound(node.id)),
        }
    }

    /// Removes a node together with every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Result<Arc<GraphNode>, GraphError> {
        if !self.nodes.contains_key(id) {
            return Err(GraphError::NodeNotFound(id.to_string()));
        }
        let touching: Vec<EdgeId> = self
            .outgoing
            .get(id)
            .into_iter()
            .chain(self.incoming.get(id))
            .flatten()
            .cloned()
            .unique()
            .collect();
        for edge_id in touching {
            self.remove_edge(&edge_id)?;
        }
        self.outgoing.remove(id);
        self.incoming.remove(id);
        self.node_order.retain(|n| n != id);
        self.nodes
            .remove(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
    }

    /// Adds an edge. Both endpoints must already exist.
    pub fn add_edge(&mut self, edge: GraphEdge) -> Result<(), GraphError> {
        self.add_edge_handle(Arc::new(edge))
    }

    pub fn add_edge_handle(&mut self, edge: Arc<GraphEdge>) -> Result<(), GraphError> {
        if self.edges.contains_key(&edge.id) {
            return Err(GraphError::DuplicateId(edge.id.clone()));
        }
        let missing = [&edge.source, &edge.target]
            .into_iter()
            .find(|id| !self.nodes.contains_key(id.as_str()));
        if let Some(missing) = missing {
            let err = GraphError::DanglingEdgeRejected {
                edge_id: edge.id.clone(),
                source_id: edge.source.clone(),
                target_id: edge.target.clone(),
                missing_node_id: missing.clone(),
            };
            log::warn!("{}", err);
            return Err(err);
        }
        self.outgoing
            .entry(edge.source.clone())
            .or_default()
            .push(edge.id.clone());
        self.incoming
            .entry(edge.target.clone())
            .or_default()
            .push(edge.id.clone());
        self.edge_order.push(edge.id.clone());
        self.edges.insert(edge.id.clone(), edge);
        Ok(())
    }

    pub fn remove_edge(&mut self, id: &str) -> Result<Arc<GraphEdge>, GraphError> {
        let edge = self
            .edges
            .remove(id)
            .ok_or_else(|| GraphError::EdgeNotFound(id.to_string()))?;
        if let Some(list) = self.outgoing.get_mut(&edge.source) {
            list.retain(|e| e != id);
        }
        if let Some(list) = self.incoming.get_mut(&edge.target) {
            list.retain(|e| e != id);
        }
        self.edge_order.retain(|e| e != id);
        Ok(edge)
    }

    // --- Snapshot-producing mutators ---

    pub fn with_node(&self, node: GraphNode) -> Result<Self, GraphError> {
        let mut next = self.clone();
        next.add_node(node)?;
        Ok(next)
    }

    pub fn without_node(&self, id: &str) -> Result<Self, GraphError> {
        let mut next = self.clone();
        next.remove_node(id)?;
        Ok(next)
    }

    pub fn with_edge(&self, edge: GraphEdge) -> Result<Self, GraphError> {
        let mut next = self.clone();
        next.add_edge(edge)?;
        Ok(next)
    }

    pub fn without_edge(&self, id: &str) -> Result<Self, GraphError> {
        let mut next = self.clone();
        next.remove_edge(id)?;
        Ok(next)
    }

    /// Copies positions computed by a layout collaborator onto the nodes.
    /// Unknown ids are ignored.
    pub fn with_positions(&self, positions: &AHashMap<NodeId, Position>) -> Self {
        let mut next = self.clone();
        for (id, position) in positions {
            if let Some(slot) = next.nodes.get_mut(id) {
                Arc::make_mut(slot).position = *position;
            }
        }
        next
    }
}

impl From<FlowDefinition> for FlowGraph {
    fn from(definition: FlowDefinition) -> Self {
        Self::from_definition(definition)
    }
}
