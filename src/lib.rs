//! # flowgraph - Structural Editing Core for Branching Flows
//!
//! **flowgraph** keeps a directed trigger/action/condition graph structurally
//! consistent while a user edits it: insert, delete, cut, copy, paste, move and
//! duplicate, including conditions that split the flow into `yes` and `no`
//! branches.
//!
//! ## Core Workflow
//!
//! The crate is format-agnostic and never touches rendering. The primary
//! workflow is:
//!
//! 1.  **Load Your Data**: Convert the host's canvas model into a `FlowDefinition`
//!     (implement `IntoFlowGraph`, or deserialize the `{nodes, edges}` JSON directly).
//! 2.  **Build a Snapshot**: `FlowGraph::from_definition` indexes nodes, edges and
//!     adjacency. Snapshots are immutable once handed out.
//! 3.  **Edit**: A `FlowEditor` (see `FlowEditor::builder`) takes a snapshot and
//!     returns a new one for every operation. Branch invariants are repaired
//!     before the new snapshot is returned.
//! 4.  **Publish**: Hand the snapshot back to the renderer, or through a
//!     `FlowExporter` to an external runtime.
//!
//! ## Quick Start
//!
//! ```rust
//! use flowgraph::prelude::*;
//!
//! fn main() -> Result<(), GraphError> {
//!     let editor = FlowEditor::builder().build();
//!
//!     // trigger -> end
//!     let flow = editor.start_flow(GraphNode::trigger("start"))?;
//!
//!     // trigger -> check -> end
//!     let flow = editor.insert_after(&flow, "start", GraphNode::action("check"))?;
//!
//!     // A condition after `check`; `end` moves onto the yes branch and the
//!     // no branch gets a placeholder.
//!     let flow = editor.insert_condition_after(
//!         &flow,
//!         "check",
//!         GraphNode::condition("ok?"),
//!         BranchSide::Yes,
//!     )?;
//!
//!     let structure = flow.branch_structure("ok?").unwrap();
//!     assert_eq!(structure.yes.targets.len(), 1);
//!     assert!(flow.get_node(&structure.no.targets[0]).unwrap().is_placeholder());
//!     assert!(invariants::check(&flow).is_empty());
//!     Ok(())
//! }
//! ```

pub mod clipboard;
pub mod edit;
pub mod error;
pub mod export;
pub mod ids;
pub mod invariants;
pub mod model;
pub mod prelude;
pub mod repair;
pub mod store;
pub mod traversal;
