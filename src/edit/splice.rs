//! Shared machinery for routing an edge `A -> B` through inserted material.
//!
//! Both single-node inserts and pastes reduce to the same three steps: open
//! the insertion point (detach its downstream edges), drop the region in and
//! wire the entry, then reattach the detached downstream at the region's exit.

use super::{FlowEditor, InsertionPoint};
use crate::error::GraphError;
use crate::model::{BranchSide, EdgeId, EdgeKind, GraphEdge, GraphNode, NodeId, NodeKind};
use crate::store::FlowGraph;
use ahash::AHashSet;
use std::sync::Arc;

/// An edge that will point at the region's entry once it is placed.
struct Inbound {
    id: Option<EdgeId>,
    source: NodeId,
    kind: EdgeKind,
    payload: serde_json::Value,
}

/// An opened insertion point.
struct Site {
    inbound: Vec<Inbound>,
    /// Edges detached from the insertion point, to be reattached at the exit.
    downstream: Vec<Arc<GraphEdge>>,
}

/// Self-contained material to splice in: nodes, their internal edges and the entry.
pub(crate) struct Region {
    pub nodes: Vec<Arc<GraphNode>>,
    pub edges: Vec<Arc<GraphEdge>>,
    pub entry: NodeId,
}

impl FlowEditor {
    /// Splices `region` into `graph` at `point`.
    ///
    /// When the insertion point had downstream content and the region branches,
    /// `side` decides which branch's exit takes over the detached edges. Every
    /// other content leaf of the region flows into the same downstream nodes,
    /// so no branch of pasted material ends in a dead end.
    pub(crate) fn splice_region(
        &self,
        graph: &mut FlowGraph,
        point: &InsertionPoint,
        region: Region,
        side: Option<BranchSide>,
    ) -> Result<(), GraphError> {
        let site = self.open_site(graph, point)?;

        let order: Vec<NodeId> = region.nodes.iter().map(|n| n.id.clone()).collect();
        let members: AHashSet<NodeId> = order.iter().cloned().collect();
        for node in region.nodes {
            graph.add_node_handle(node)?;
        }
        for edge in region.edges {
            graph.add_edge_handle(edge)?;
        }

        for inbound in site.inbound {
            let id = match inbound.id {
                Some(id) => id,
                None => self.edge_id(graph),
            };
            graph.add_edge(GraphEdge {
                id,
                source: inbound.source,
                target: region.entry.clone(),
                kind: inbound.kind,
                payload: inbound.payload,
            })?;
        }

        if site.downstream.is_empty() {
            return Ok(());
        }
        let exit = find_exit(graph, &region.entry, &members, side)?;
        let continuations: Vec<(NodeId, serde_json::Value)> = site
            .downstream
            .iter()
            .map(|e| (e.target.clone(), e.payload.clone()))
            .collect();
        self.reattach(graph, &exit, site.downstream)?;
        self.close_leaves(graph, &order, &continuations)
    }

    /// Gives each region member left without a successor a flow edge to every
    /// downstream target.
    fn close_leaves(
        &self,
        graph: &mut FlowGraph,
        order: &[NodeId],
        continuations: &[(NodeId, serde_json::Value)],
    ) -> Result<(), GraphError> {
        for id in order {
            let open = graph.get_node(id).is_some_and(|n| {
                n.is_content() && !n.is_condition() && !n.is_end()
            }) && graph.outgoing_edges(id).is_empty();
            if !open {
                continue;
            }
            log::debug!("Connecting branch leaf '{}' to the downstream flow", id);
            for (target, payload) in continuations {
                let edge_id = self.edge_id(graph);
                graph.add_edge(
                    GraphEdge::flow(edge_id, id.clone(), target.clone()).with_payload(payload.clone()),
                )?;
            }
        }
        Ok(())
    }

    /// Detaches the insertion point's downstream and describes the entry edges.
    fn open_site(&self, graph: &mut FlowGraph, point: &InsertionPoint) -> Result<Site, GraphError> {
        match point {
            InsertionPoint::After(target) => {
                let kind = graph.require_node(target)?.kind;
                match kind {
                    NodeKind::End => Err(GraphError::ProtectedNode(target.clone())),
                    NodeKind::Condition => Err(GraphError::AmbiguousBranchTarget {
                        node_id: target.clone(),
                        reason: "insert at the head of its yes or no branch instead".to_string(),
                    }),
                    NodeKind::Placeholder => {
                        // The new material takes the placeholder's slot.
                        let inbound = graph
                            .incoming_edges(target)
                            .into_iter()
                            .map(|e| Inbound {
                                id: Some(e.id.clone()),
                                source: e.source.clone(),
                                kind: e.kind,
                                payload: e.payload.clone(),
                            })
                            .collect();
                        let downstream = graph.outgoing_edges(target);
                        graph.remove_node(target)?;
                        Ok(Site {
                            inbound,
                            downstream,
                        })
                    }
                    _ => {
                        let downstream = graph.outgoing_edges(target);
                        for edge in &downstream {
                            graph.remove_edge(&edge.id)?;
                        }
                        Ok(Site {
                            inbound: vec![Inbound {
                                id: None,
                                source: target.clone(),
                                kind: EdgeKind::Flow,
                                payload: serde_json::Value::Null,
                            }],
                            downstream,
                        })
                    }
                }
            }
            InsertionPoint::BranchHead { condition, side } => {
                if !graph.require_node(condition)?.is_condition() {
                    return Err(GraphError::NotACondition(condition.clone()));
                }
                let edges = graph.branch_edges(condition, *side);
                let only_placeholders = !edges.is_empty()
                    && edges.iter().all(|e| {
                        graph
                            .get_node(&e.target)
                            .is_some_and(|n| !n.is_content())
                    });

                if only_placeholders {
                    let reuse = edges.first().map(|e| (e.id.clone(), e.payload.clone()));
                    for edge in &edges {
                        if graph.incoming_edges(&edge.target).len() > 1 {
                            graph.remove_edge(&edge.id)?;
                        } else {
                            graph.remove_node(&edge.target)?;
                        }
                    }
                    let (id, payload) = match reuse {
                        Some((id, payload)) => (Some(id), payload),
                        None => (None, serde_json::Value::Null),
                    };
                    return Ok(Site {
                        inbound: vec![Inbound {
                            id,
                            source: condition.clone(),
                            kind: EdgeKind::Branch { side: *side },
                            payload,
                        }],
                        downstream: Vec::new(),
                    });
                }

                for edge in &edges {
                    graph.remove_edge(&edge.id)?;
                }
                // Content that used to hang off the condition now continues the new material.
                let downstream = edges
                    .into_iter()
                    .map(|e| {
                        Arc::new(GraphEdge {
                            kind: EdgeKind::Flow,
                            ..e.as_ref().clone()
                        })
                    })
                    .collect();
                Ok(Site {
                    inbound: vec![Inbound {
                        id: None,
                        source: condition.clone(),
                        kind: EdgeKind::Branch { side: *side },
                        payload: serde_json::Value::Null,
                    }],
                    downstream,
                })
            }
        }
    }

    /// Hangs the detached downstream edges off `exit`.
    ///
    /// A placeholder exit is replaced: its parent edge is redirected to the
    /// downstream targets, keeping the parent edge's branch tag.
    fn reattach(
        &self,
        graph: &mut FlowGraph,
        exit: &str,
        downstream: Vec<Arc<GraphEdge>>,
    ) -> Result<(), GraphError> {
        if graph.require_node(exit)?.is_placeholder() {
            let parents = graph.incoming_edges(exit);
            graph.remove_node(exit)?;
            for (i, parent) in parents.iter().enumerate() {
                for edge in &downstream {
                    let id = if i == 0 {
                        edge.id.clone()
                    } else {
                        self.edge_id(graph)
                    };
                    graph.add_edge(GraphEdge {
                        id,
                        source: parent.source.clone(),
                        target: edge.target.clone(),
                        kind: parent.kind,
                        payload: edge.payload.clone(),
                    })?;
                }
            }
            return Ok(());
        }

        for edge in downstream {
            graph.add_edge(edge.resourced(exit))?;
        }
        Ok(())
    }
}

/// Walks from `entry` through the region to the node downstream content attaches to.
///
/// At each condition the walk takes the `side` branch; without a side a
/// branching region has no single exit.
fn find_exit(
    graph: &FlowGraph,
    entry: &str,
    members: &AHashSet<NodeId>,
    side: Option<BranchSide>,
) -> Result<NodeId, GraphError> {
    let mut current = entry.to_string();
    let mut seen: AHashSet<NodeId> = AHashSet::new();
    loop {
        if !seen.insert(current.clone()) {
            return Ok(current);
        }
        let inside: Vec<Arc<GraphEdge>> = graph
            .outgoing_edges(&current)
            .into_iter()
            .filter(|e| members.contains(&e.target))
            .collect();
        let next = if graph.is_condition(&current) {
            let side = side.ok_or_else(|| GraphError::AmbiguousBranchTarget {
                node_id: current.clone(),
                reason: "existing downstream content must move into the yes or no branch"
                    .to_string(),
            })?;
            inside
                .iter()
                .find(|e| e.kind.is_branch(side))
                .or_else(|| inside.first())
        } else {
            inside.first()
        };
        match next {
            Some(edge) => current = edge.target.clone(),
            None => return Ok(current),
        }
    }
}
