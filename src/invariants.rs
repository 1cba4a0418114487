//! Read-only structural checks over a snapshot.
//!
//! The editor keeps these invariants itself; the checker exists for hosts that
//! import snapshots from elsewhere, for the export seam, and for tests.

use crate::model::{BranchSide, EdgeId, EdgeKind, NodeId, NodeKind};
use crate::store::FlowGraph;
use std::fmt;

/// One broken invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    DanglingEdge { edge_id: EdgeId, missing_node_id: NodeId },
    TriggerFanOut { trigger_id: NodeId, flow_edges: usize },
    BranchEdgeCount { condition_id: NodeId, side: BranchSide, count: usize },
    FlowEdgeFromCondition { condition_id: NodeId, edge_id: EdgeId },
    PlaceholderHasSuccessors { placeholder_id: NodeId },
    PlaceholderBesideContent { condition_id: NodeId, side: BranchSide },
    DuplicatePlaceholders { condition_id: NodeId, side: BranchSide, count: usize },
    EndHasSuccessors { end_id: NodeId },
    SurvivingGhost { ghost_id: NodeId },
    OrphanPlaceholder { placeholder_id: NodeId },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::DanglingEdge {
                edge_id,
                missing_node_id,
            } => write!(f, "edge '{}' points at missing node '{}'", edge_id, missing_node_id),
            Violation::TriggerFanOut {
                trigger_id,
                flow_edges,
            } => write!(f, "trigger '{}' has {} outgoing flow edges", trigger_id, flow_edges),
            Violation::BranchEdgeCount {
                condition_id,
                side,
                count,
            } => write!(
                f,
                "condition '{}' has {} {} branch edges, expected 1",
                condition_id, count, side
            ),
            Violation::FlowEdgeFromCondition {
                condition_id,
                edge_id,
            } => write!(f, "condition '{}' has untagged edge '{}'", condition_id, edge_id),
            Violation::PlaceholderHasSuccessors { placeholder_id } => {
                write!(f, "placeholder '{}' has outgoing edges", placeholder_id)
            }
            Violation::PlaceholderBesideContent { condition_id, side } => write!(
                f,
                "{} branch of '{}' mixes a placeholder with content",
                side, condition_id
            ),
            Violation::DuplicatePlaceholders {
                condition_id,
                side,
                count,
            } => write!(
                f,
                "{} branch of '{}' holds {} placeholders",
                side, condition_id, count
            ),
            Violation::EndHasSuccessors { end_id } => {
                write!(f, "end node '{}' has outgoing edges", end_id)
            }
            Violation::SurvivingGhost { ghost_id } => write!(f, "ghost '{}' survived", ghost_id),
            Violation::OrphanPlaceholder { placeholder_id } => {
                write!(f, "placeholder '{}' is not attached to anything", placeholder_id)
            }
        }
    }
}

/// Lists every invariant `graph` breaks. An empty list means the snapshot is
/// well formed.
pub fn check(graph: &FlowGraph) -> Vec<Violation> {
    let mut violations = Vec::new();

    for edge in graph.all_edges() {
        for endpoint in [&edge.source, &edge.target] {
            if !graph.contains_node(endpoint) {
                violations.push(Violation::DanglingEdge {
                    edge_id: edge.id.clone(),
                    missing_node_id: endpoint.clone(),
                });
            }
        }
    }

    for node in graph.all_nodes() {
        let outgoing = graph.outgoing_edges(&node.id);
        match node.kind {
            NodeKind::Trigger => {
                let flow_edges = outgoing.iter().filter(|e| e.kind == EdgeKind::Flow).count();
                if flow_edges > 1 {
                    violations.push(Violation::TriggerFanOut {
                        trigger_id: node.id.clone(),
                        flow_edges,
                    });
                }
            }
            NodeKind::Condition => check_condition(graph, &node.id, &mut violations),
            NodeKind::Placeholder => {
                if !outgoing.is_empty() {
                    violations.push(Violation::PlaceholderHasSuccessors {
                        placeholder_id: node.id.clone(),
                    });
                }
                if graph.incoming_edges(&node.id).is_empty() {
                    violations.push(Violation::OrphanPlaceholder {
                        placeholder_id: node.id.clone(),
                    });
                }
            }
            NodeKind::Ghost => violations.push(Violation::SurvivingGhost {
                ghost_id: node.id.clone(),
            }),
            NodeKind::End => {
                if !outgoing.is_empty() {
                    violations.push(Violation::EndHasSuccessors {
                        end_id: node.id.clone(),
                    });
                }
            }
            NodeKind::Action => {}
        }
    }

    violations
}

fn check_condition(graph: &FlowGraph, condition: &str, violations: &mut Vec<Violation>) {
    for edge in graph.outgoing_edges(condition) {
        if edge.kind == EdgeKind::Flow {
            violations.push(Violation::FlowEdgeFromCondition {
                condition_id: condition.to_string(),
                edge_id: edge.id.clone(),
            });
        }
    }

    for side in BranchSide::BOTH {
        let edges = graph.branch_edges(condition, side);
        if edges.len() != 1 {
            violations.push(Violation::BranchEdgeCount {
                condition_id: condition.to_string(),
                side,
                count: edges.len(),
            });
        }
        let (placeholders, content) = edges.iter().fold((0, 0), |(p, c), e| {
            match graph.get_node(&e.target) {
                Some(n) if n.is_placeholder() => (p + 1, c),
                Some(n) if n.is_content() => (p, c + 1),
                _ => (p, c),
            }
        });
        if placeholders > 0 && content > 0 {
            violations.push(Violation::PlaceholderBesideContent {
                condition_id: condition.to_string(),
                side,
            });
        } else if placeholders > 1 {
            violations.push(Violation::DuplicatePlaceholders {
                condition_id: condition.to_string(),
                side,
                count: placeholders,
            });
        }
    }
}
