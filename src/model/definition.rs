use super::{GraphEdge, GraphNode};
use crate::error::ConversionError;
use serde::{Deserialize, Serialize};

/// The plain `{nodes, edges}` record exchanged with hosts, renderers and exporters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowDefinition {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl FlowDefinition {
    pub fn from_json(json: &str) -> Result<Self, ConversionError> {
        serde_json::from_str(json).map_err(|e| ConversionError::JsonParseError(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, ConversionError> {
        serde_json::to_string_pretty(self).map_err(|e| ConversionError::JsonParseError(e.to_string()))
    }
}
