use super::FlowEditor;
use crate::error::ConversionError;
use crate::ids::{IdGenerator, SequentialIds};
use serde::Deserialize;
use std::sync::Arc;

/// Tunables for a [`FlowEditor`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub node_prefix: String,
    pub edge_prefix: String,
    pub placeholder_prefix: String,
    /// Run the branch repair pass after every successful edit.
    pub auto_repair: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            node_prefix: "node".to_string(),
            edge_prefix: "edge".to_string(),
            placeholder_prefix: "placeholder".to_string(),
            auto_repair: true,
        }
    }
}

impl EditorConfig {
    /// Parses a config document; missing keys fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConversionError> {
        serde_json::from_str(json).map_err(|e| ConversionError::JsonParseError(e.to_string()))
    }
}

pub struct FlowEditorBuilder {
    config: EditorConfig,
    ids: Option<Arc<dyn IdGenerator>>,
}

impl FlowEditorBuilder {
    pub fn new() -> Self {
        Self {
            config: EditorConfig::default(),
            ids: None,
        }
    }

    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn with_auto_repair(mut self, enabled: bool) -> Self {
        self.config.auto_repair = enabled;
        self
    }

    pub fn build(self) -> FlowEditor {
        FlowEditor {
            config: self.config,
            ids: self.ids.unwrap_or_else(|| Arc::new(SequentialIds::new())),
        }
    }
}

impl Default for FlowEditorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
