//! Common test utilities for building flow snapshots.
use flowgraph::prelude::*;
use std::sync::Arc;

/// Installs a test logger once; later calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// An editor with its own sequential id counter.
#[allow(dead_code)]
pub fn editor() -> FlowEditor {
    FlowEditor::builder()
        .with_id_generator(Arc::new(SequentialIds::new()))
        .build()
}

/// `t -> a -> e`
#[allow(dead_code)]
pub fn linear_flow() -> FlowGraph {
    FlowGraph::from_parts(
        [
            GraphNode::trigger("t"),
            GraphNode::action("a").with_payload(serde_json::json!({ "label": "send email" })),
            GraphNode::end("e"),
        ],
        [GraphEdge::flow("t-a", "t", "a"), GraphEdge::flow("a-e", "a", "e")],
    )
}

/// `t -> a -> b -> e`
#[allow(dead_code)]
pub fn two_step_flow() -> FlowGraph {
    FlowGraph::from_parts(
        [
            GraphNode::trigger("t"),
            GraphNode::action("a").with_payload(serde_json::json!({ "label": "fetch" })),
            GraphNode::action("b").with_payload(serde_json::json!({ "label": "store" })),
            GraphNode::end("e"),
        ],
        [
            GraphEdge::flow("t-a", "t", "a"),
            GraphEdge::flow("a-b", "a", "b"),
            GraphEdge::flow("b-e", "b", "e"),
        ],
    )
}

/// ```text
/// t -> a -> c --yes--> y1 -> e
///             --no---> n1 -> e
/// ```
#[allow(dead_code)]
pub fn branching_flow() -> FlowGraph {
    FlowGraph::from_parts(
        [
            GraphNode::trigger("t"),
            GraphNode::action("a"),
            GraphNode::condition("c"),
            GraphNode::action("y1"),
            GraphNode::action("n1"),
            GraphNode::end("e"),
        ],
        [
            GraphEdge::flow("t-a", "t", "a"),
            GraphEdge::flow("a-c", "a", "c"),
            GraphEdge::branch("c-y1", "c", "y1", BranchSide::Yes),
            GraphEdge::branch("c-n1", "c", "n1", BranchSide::No),
            GraphEdge::flow("y1-e", "y1", "e"),
            GraphEdge::flow("n1-e", "n1", "e"),
        ],
    )
}

/// Edges as sorted `(source, target, kind)` triples, ignoring edge ids.
#[allow(dead_code)]
pub fn topology(graph: &FlowGraph) -> Vec<(String, String, EdgeKind)> {
    let mut edges: Vec<_> = graph
        .all_edges()
        .map(|e| (e.source.clone(), e.target.clone(), e.kind))
        .collect();
    edges.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
    edges
}

/// Fails the test with every violation listed.
#[allow(dead_code)]
pub fn assert_well_formed(graph: &FlowGraph) {
    let violations = invariants::check(graph);
    assert!(
        violations.is_empty(),
        "snapshot has violations: {:?}",
        violations
    );
    for edge in graph.all_edges() {
        assert!(graph.contains_node(&edge.source), "dangling source on {}", edge.id);
        assert!(graph.contains_node(&edge.target), "dangling target on {}", edge.id);
    }
}

/// Follows single children from `start` and returns the visited ids.
#[allow(dead_code)]
pub fn walk_chain(graph: &FlowGraph, start: &str) -> Vec<String> {
    let mut chain = vec![start.to_string()];
    let mut current = start.to_string();
    while let [next] = graph.children(&current).as_slice() {
        if chain.contains(next) {
            break;
        }
        chain.push(next.clone());
        current = next.clone();
    }
    chain
}
