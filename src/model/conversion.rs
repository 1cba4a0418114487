use super::definition::FlowDefinition;
use crate::error::ConversionError;

/// A trait for host data models that can be converted into a `FlowDefinition`.
///
/// The editing core never parses a host's canvas format itself. Implement this
/// trait on your own structs to translate them into the canonical node/edge model.
///
/// # Example
///
/// ```rust
/// use flowgraph::error::ConversionError;
/// use flowgraph::model::{FlowDefinition, GraphEdge, GraphNode, IntoFlowGraph};
///
/// struct CanvasStep { id: String, is_trigger: bool }
/// struct Canvas { steps: Vec<CanvasStep> }
///
/// impl IntoFlowGraph for Canvas {
///     fn into_flow_graph(self) -> Result<FlowDefinition, ConversionError> {
///         let mut nodes = Vec::new();
///         let mut edges = Vec::new();
///         for step in self.steps {
///             if let Some(prev) = nodes.last().map(|n: &GraphNode| n.id.clone()) {
///                 edges.push(GraphEdge::flow(format!("e-{}", step.id), prev, step.id.clone()));
///             }
///             nodes.push(if step.is_trigger {
///                 GraphNode::trigger(step.id)
///             } else {
///                 GraphNode::action(step.id)
///             });
///         }
///         Ok(FlowDefinition { nodes, edges })
///     }
/// }
/// ```
pub trait IntoFlowGraph {
    /// Consumes the object and converts it into the canonical flow model.
    fn into_flow_graph(self) -> Result<FlowDefinition, ConversionError>;
}

impl IntoFlowGraph for FlowDefinition {
    fn into_flow_graph(self) -> Result<FlowDefinition, ConversionError> {
        Ok(self)
    }
}
