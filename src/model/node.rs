use super::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The structural role of a node in a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Trigger,
    Action,
    Condition,
    Placeholder,
    Ghost,
    End,
}

impl NodeKind {
    /// Content nodes are everything that is not a placeholder or a ghost.
    /// The end sentinel counts as content: a branch flowing into it is not empty.
    pub fn is_content(self) -> bool {
        !matches!(self, NodeKind::Placeholder | NodeKind::Ghost)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Trigger => "trigger",
            NodeKind::Action => "action",
            NodeKind::Condition => "condition",
            NodeKind::Placeholder => "placeholder",
            NodeKind::Ghost => "ghost",
            NodeKind::End => "end",
        };
        f.write_str(name)
    }
}

/// One of the two outputs of a condition node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BranchSide {
    Yes,
    No,
}

impl BranchSide {
    pub const BOTH: [BranchSide; 2] = [BranchSide::Yes, BranchSide::No];

    pub fn opposite(self) -> Self {
        match self {
            BranchSide::Yes => BranchSide::No,
            BranchSide::No => BranchSide::Yes,
        }
    }
}

impl fmt::Display for BranchSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchSide::Yes => f.write_str("yes"),
            BranchSide::No => f.write_str("no"),
        }
    }
}

/// Tags a placeholder with the condition branch it stands in for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchRef {
    pub condition: NodeId,
    pub side: BranchSide,
}

/// Advisory canvas coordinate. Owned by the layout collaborator; copied through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Ordered descendant lists of a condition's two branches.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Branches {
    pub yes: Vec<NodeId>,
    pub no: Vec<NodeId>,
}

impl Branches {
    pub fn side(&self, side: BranchSide) -> &[NodeId] {
        match side {
            BranchSide::Yes => &self.yes,
            BranchSide::No => &self.no,
        }
    }

    pub fn side_mut(&mut self, side: BranchSide) -> &mut Vec<NodeId> {
        match side {
            BranchSide::Yes => &mut self.yes,
            BranchSide::No => &mut self.no,
        }
    }
}

/// A single step of the flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: NodeId,
    pub kind: NodeKind,
    /// UI-owned configuration. Never inspected by the editing core.
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(default)]
    pub position: Position,
    /// Only meaningful on condition nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<Branches>,
    /// Only meaningful on placeholder nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_of: Option<BranchRef>,
}

impl GraphNode {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        let branches = (kind == NodeKind::Condition).then(Branches::default);
        Self {
            id: id.into(),
            kind,
            payload: serde_json::Value::Null,
            position: Position::default(),
            branches,
            branch_of: None,
        }
    }

    pub fn trigger(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::Trigger)
    }

    pub fn action(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::Action)
    }

    pub fn condition(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::Condition)
    }

    pub fn end(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::End)
    }

    pub fn ghost(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::Ghost)
    }

    pub fn placeholder(id: impl Into<NodeId>, condition: impl Into<NodeId>, side: BranchSide) -> Self {
        let mut node = Self::new(id, NodeKind::Placeholder);
        node.branch_of = Some(BranchRef {
            condition: condition.into(),
            side,
        });
        node
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }

    pub fn is_condition(&self) -> bool {
        self.kind == NodeKind::Condition
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == NodeKind::Placeholder
    }

    pub fn is_end(&self) -> bool {
        self.kind == NodeKind::End
    }

    pub fn is_content(&self) -> bool {
        self.kind.is_content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_nodes_start_with_empty_branch_lists() {
        let node = GraphNode::condition("c1");
        assert_eq!(node.branches, Some(Branches::default()));
        assert!(GraphNode::action("a1").branches.is_none());
    }

    #[test]
    fn node_round_trips_through_camel_case_json() {
        let node = GraphNode::placeholder("p1", "c1", BranchSide::No);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["kind"], "placeholder");
        assert_eq!(json["branchOf"]["side"], "no");
        let back: GraphNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }
}
