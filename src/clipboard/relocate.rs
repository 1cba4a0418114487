use super::ClipboardContents;
use crate::edit::{FlowEditor, InsertionPoint};
use crate::error::GraphError;
use crate::model::BranchSide;
use crate::store::FlowGraph;

impl FlowEditor {
    /// Cuts a single node and pastes it, ids unchanged, at `to`.
    pub fn move_node(
        &self,
        graph: &FlowGraph,
        id: &str,
        to: &InsertionPoint,
        move_downstream_to: Option<BranchSide>,
    ) -> Result<FlowGraph, GraphError> {
        self.relocate(graph, id, to, move_downstream_to, false)
    }

    /// Cuts a subtree and pastes it, ids unchanged, at `to`.
    pub fn move_flow(
        &self,
        graph: &FlowGraph,
        id: &str,
        to: &InsertionPoint,
        move_downstream_to: Option<BranchSide>,
    ) -> Result<FlowGraph, GraphError> {
        self.relocate(graph, id, to, move_downstream_to, true)
    }

    fn relocate(
        &self,
        graph: &FlowGraph,
        id: &str,
        to: &InsertionPoint,
        move_downstream_to: Option<BranchSide>,
        whole_flow: bool,
    ) -> Result<FlowGraph, GraphError> {
        graph.require_node(id)?;
        let destination = to.anchor();
        graph.require_node(destination)?;
        if destination == id || graph.downstream_of(id).iter().any(|d| d == destination) {
            return Err(GraphError::InvalidMove {
                node_id: id.to_string(),
                destination_id: destination.to_string(),
            });
        }

        let mut work = graph.clone();
        let contents = if whole_flow {
            self.cut_flow_in(&mut work, id)?
        } else {
            self.cut_node_in(&mut work, id)?
        };
        self.paste_in(&mut work, &contents, to, move_downstream_to, false)?;
        Ok(self.finish(work, if whole_flow { "move_flow" } else { "move_node" }))
    }

    /// Copies a node and pastes the copy right after the original.
    ///
    /// A condition's copy goes to the head of the `move_downstream_to` branch of
    /// the original, taking that branch's content along as its own downstream.
    pub fn duplicate_node(
        &self,
        graph: &FlowGraph,
        id: &str,
        move_downstream_to: Option<BranchSide>,
    ) -> Result<FlowGraph, GraphError> {
        let contents = self.copy_node(graph, id)?;
        self.duplicate(graph, id, contents, move_downstream_to, "duplicate_node")
    }

    /// Copies a subtree and pastes the copy right after its root.
    pub fn duplicate_flow(
        &self,
        graph: &FlowGraph,
        id: &str,
        move_downstream_to: Option<BranchSide>,
    ) -> Result<FlowGraph, GraphError> {
        let contents = self.copy_flow(graph, id)?;
        self.duplicate(graph, id, contents, move_downstream_to, "duplicate_flow")
    }

    fn duplicate(
        &self,
        graph: &FlowGraph,
        id: &str,
        contents: ClipboardContents,
        move_downstream_to: Option<BranchSide>,
        operation: &str,
    ) -> Result<FlowGraph, GraphError> {
        let at = if graph.is_condition(id) {
            let side = move_downstream_to.ok_or_else(|| GraphError::AmbiguousBranchTarget {
                node_id: id.to_string(),
                reason: "a duplicated condition goes into one of the original's branches"
                    .to_string(),
            })?;
            InsertionPoint::BranchHead {
                condition: id.to_string(),
                side,
            }
        } else {
            InsertionPoint::After(id.to_string())
        };
        let mut work = graph.clone();
        self.paste_in(&mut work, &contents, &at, move_downstream_to, true)?;
        Ok(self.finish(work, operation))
    }
}
