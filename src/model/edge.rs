use super::{BranchSide, EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// How an edge leaves its source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EdgeKind {
    /// Linear continuation.
    Flow,
    /// One of a condition's two outputs.
    Branch { side: BranchSide },
}

impl EdgeKind {
    pub fn branch_side(self) -> Option<BranchSide> {
        match self {
            EdgeKind::Flow => None,
            EdgeKind::Branch { side } => Some(side),
        }
    }

    pub fn is_branch(self, side: BranchSide) -> bool {
        self.branch_side() == Some(side)
    }
}

/// A directed connection between two nodes of the same snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
    /// UI-owned data such as a display index.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl GraphEdge {
    pub fn flow(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind: EdgeKind::Flow,
            payload: serde_json::Value::Null,
        }
    }

    pub fn branch(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        side: BranchSide,
    ) -> Self {
        Self {
            kind: EdgeKind::Branch { side },
            ..Self::flow(id, source, target)
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// A copy of this edge leaving `source` instead, keeping id, kind and payload.
    pub fn resourced(&self, source: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            ..self.clone()
        }
    }

    /// A copy of this edge arriving at `target` instead, keeping id, kind and payload.
    pub fn retargeted(&self, target: impl Into<NodeId>) -> Self {
        Self {
            target: target.into(),
            ..self.clone()
        }
    }
}
