//! Prelude module for convenient imports
//!
//! Re-exports the types most hosts need to build snapshots and run edits.
//!
//! # Example
//!
//! ```rust
//! use flowgraph::prelude::*;
//!
//! let editor = FlowEditor::new();
//! let flow = editor.start_flow(GraphNode::trigger("t")).unwrap();
//! let outcome = editor.apply(
//!     &flow,
//!     EditOp::InsertAfter { target: "t".into(), node: GraphNode::action("a") },
//! );
//! assert!(outcome.is_ok());
//! assert_eq!(outcome.snapshot.children("t"), vec!["a".to_string()]);
//! ```

// Editing
pub use crate::clipboard::{CaptureMode, ClipboardContents};
pub use crate::edit::{EditOp, EditOutcome, EditorConfig, FlowEditor, InsertionPoint};
pub use crate::repair::RepairReport;

// Snapshot and model
pub use crate::model::{
    BranchSide, EdgeKind, FlowDefinition, GraphEdge, GraphNode, IntoFlowGraph, NodeId, NodeKind,
    Position,
};
pub use crate::store::FlowGraph;
pub use crate::traversal::{BranchStructure, Subtree};

// Identifiers
pub use crate::ids::{IdGenerator, SequentialIds, UuidIds};

// Checking and export
pub use crate::export::{FlowExporter, JsonExporter, LayoutEngine};
pub use crate::invariants::{self, Violation};

// Error types
pub use crate::error::{ConversionError, ExportError, GraphError};
