use super::{CaptureMode, ClipboardContents};
use crate::edit::FlowEditor;
use crate::error::GraphError;
use crate::store::FlowGraph;

impl FlowEditor {
    /// Captures a single node. A condition is captured with its full branch
    /// structure, placeholders included, so a paste is complete on its own.
    pub fn copy_node(&self, graph: &FlowGraph, id: &str) -> Result<ClipboardContents, GraphError> {
        capture_node(graph, id, CaptureMode::Copy)
    }

    /// Captures `id` and everything downstream of it, minus the end sentinel.
    pub fn copy_flow(&self, graph: &FlowGraph, id: &str) -> Result<ClipboardContents, GraphError> {
        capture_flow(graph, id, CaptureMode::Copy)
    }

    /// Captures a single node and removes it, bridging its parent to its child.
    pub fn cut_node(
        &self,
        graph: &FlowGraph,
        id: &str,
    ) -> Result<(FlowGraph, ClipboardContents), GraphError> {
        let mut work = graph.clone();
        let contents = self.cut_node_in(&mut work, id)?;
        Ok((self.finish(work, "cut_node"), contents))
    }

    /// Captures a subtree and removes it, reconnecting its parent to whatever
    /// the subtree used to flow into.
    pub fn cut_flow(
        &self,
        graph: &FlowGraph,
        id: &str,
    ) -> Result<(FlowGraph, ClipboardContents), GraphError> {
        let mut work = graph.clone();
        let contents = self.cut_flow_in(&mut work, id)?;
        Ok((self.finish(work, "cut_flow"), contents))
    }

    pub(crate) fn cut_node_in(
        &self,
        work: &mut FlowGraph,
        id: &str,
    ) -> Result<ClipboardContents, GraphError> {
        let contents = capture_node(work, id, CaptureMode::Cut)?;
        if contents.has_condition() {
            self.delete_subtree_in(work, id)?;
        } else {
            self.delete_single_in(work, id)?;
        }
        Ok(contents)
    }

    pub(crate) fn cut_flow_in(
        &self,
        work: &mut FlowGraph,
        id: &str,
    ) -> Result<ClipboardContents, GraphError> {
        let contents = capture_flow(work, id, CaptureMode::Cut)?;
        self.delete_subtree_in(work, id)?;
        Ok(contents)
    }
}

fn capture_node(
    graph: &FlowGraph,
    id: &str,
    mode: CaptureMode,
) -> Result<ClipboardContents, GraphError> {
    let node = graph.require_node(id)?;
    if node.is_end() {
        return Err(GraphError::ProtectedNode(id.to_string()));
    }
    if node.is_condition() {
        // A condition's downstream is its branches.
        return capture_flow(graph, id, mode);
    }
    let handle = graph
        .node_handle(id)
        .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
    Ok(ClipboardContents {
        mode,
        root: id.to_string(),
        nodes: vec![handle],
        edges: Vec::new(),
    })
}

fn capture_flow(
    graph: &FlowGraph,
    id: &str,
    mode: CaptureMode,
) -> Result<ClipboardContents, GraphError> {
    if graph.require_node(id)?.is_end() {
        return Err(GraphError::ProtectedNode(id.to_string()));
    }
    let subtree = graph
        .subtree_of(id)
        .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
    log::debug!(
        "Captured {} node(s) and {} edge(s) from '{}'",
        subtree.nodes.len(),
        subtree.edges.len(),
        id
    );
    Ok(ClipboardContents {
        mode,
        root: subtree.root,
        nodes: subtree.nodes,
        edges: subtree.edges,
    })
}
