use crate::model::{BranchSide, NodeId};
use thiserror::Error;

/// Errors raised by graph store mutations and structural edits.
///
/// Every variant is recoverable: the editor logs it and keeps the last
/// consistent snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node '{0}' not found in the snapshot")]
    NodeNotFound(NodeId),

    #[error("Edge '{0}' not found in the snapshot")]
    EdgeNotFound(String),

    #[error(
        "Edge '{edge_id}' rejected: endpoint '{missing_node_id}' does not exist ({source_id} -> {target_id})"
    )]
    DanglingEdgeRejected {
        edge_id: String,
        source_id: NodeId,
        target_id: NodeId,
        missing_node_id: NodeId,
    },

    #[error("Cannot move '{node_id}' under '{destination_id}': destination is the node itself or one of its descendants")]
    InvalidMove {
        node_id: NodeId,
        destination_id: NodeId,
    },

    #[error("Inserting at '{node_id}' needs an explicit yes/no branch choice: {reason}")]
    AmbiguousBranchTarget { node_id: NodeId, reason: String },

    #[error("Node '{0}' is not a condition")]
    NotACondition(NodeId),

    #[error("Id '{0}' already exists in the snapshot")]
    DuplicateId(String),

    #[error("Node '{0}' is the end sentinel and cannot take part in this operation")]
    ProtectedNode(NodeId),

    #[error("Node '{node_id}' is not on the {side} branch of condition '{condition_id}'")]
    NotInBranch {
        node_id: NodeId,
        condition_id: NodeId,
        side: BranchSide,
    },

    #[error("The clipboard capture contains no nodes")]
    EmptyClipboard,
}

/// Errors that can occur when converting a host format into a `FlowDefinition`.
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    #[error("Failed to parse flow JSON: {0}")]
    JsonParseError(String),

    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}

/// Errors raised by an export collaborator.
#[derive(Error, Debug, Clone)]
pub enum ExportError {
    #[error("Snapshot violates {count} invariant(s): {summary}")]
    InvariantViolations { count: usize, summary: String },

    #[error("Serialization failed: {0}")]
    Serialization(String),
}
