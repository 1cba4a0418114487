//! Seams for the collaborators that consume finished snapshots.
//!
//! An exporter turns a snapshot into some external runtime's format; a layout
//! engine computes node positions. Neither lives in this crate, but both plug
//! in through the traits below.

use crate::error::ExportError;
use crate::invariants;
use crate::model::{NodeId, Position};
use crate::store::FlowGraph;
use ahash::AHashMap;
use itertools::Itertools;

/// Serializes a snapshot for an external consumer.
pub trait FlowExporter {
    type Output;

    fn export(&self, graph: &FlowGraph) -> Result<Self::Output, ExportError>;
}

/// Computes advisory positions. The store only copies them through.
pub trait LayoutEngine {
    fn layout(&self, graph: &FlowGraph) -> AHashMap<NodeId, Position>;
}

/// Runs `engine` and returns a snapshot carrying its positions.
pub fn lay_out(graph: &FlowGraph, engine: &dyn LayoutEngine) -> FlowGraph {
    graph.with_positions(&engine.layout(graph))
}

/// Emits the `{nodes, edges}` JSON document. Refuses malformed snapshots so
/// downstream consumers never see one.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter {
    pub pretty: bool,
}

impl JsonExporter {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl FlowExporter for JsonExporter {
    type Output = String;

    fn export(&self, graph: &FlowGraph) -> Result<String, ExportError> {
        let violations = invariants::check(graph);
        if !violations.is_empty() {
            log::warn!("Refusing to export a snapshot with {} violation(s)", violations.len());
            return Err(ExportError::InvariantViolations {
                count: violations.len(),
                summary: violations.iter().join("; "),
            });
        }
        let definition = graph.to_definition();
        let json = if self.pretty {
            serde_json::to_string_pretty(&definition)
        } else {
            serde_json::to_string(&definition)
        };
        json.map_err(|e| ExportError::Serialization(e.to_string()))
    }
}
