//! Branch invariant repair on snapshots imported from a host.
mod common;
use common::*;
use flowgraph::prelude::*;

/// A host snapshot with every defect the repair pass knows about.
fn damaged_flow() -> FlowGraph {
    FlowGraph::from_parts(
        [
            GraphNode::trigger("t"),
            GraphNode::ghost("g0"),
            GraphNode::condition("c"),
            GraphNode::ghost("g1"),
            GraphNode::placeholder("p1", "c", BranchSide::No),
            GraphNode::placeholder("p2", "c", BranchSide::No),
            GraphNode::placeholder("stray", "c", BranchSide::Yes),
            GraphNode::end("e"),
        ],
        [
            GraphEdge::flow("t-g0", "t", "g0"),
            GraphEdge::flow("g0-c", "g0", "c"),
            GraphEdge::branch("c-g1", "c", "g1", BranchSide::Yes),
            GraphEdge::branch("c-p1", "c", "p1", BranchSide::No),
            GraphEdge::branch("c-p2", "c", "p2", BranchSide::No),
        ],
    )
}

#[test]
fn repair_fixes_every_defect() {
    init_logging();
    let damaged = damaged_flow();
    assert!(!invariants::check(&damaged).is_empty());

    let (repaired, report) = editor().repair(&damaged);
    assert_eq!(report.ghosts_removed, 1);
    assert_eq!(report.ghosts_replaced, 1);
    // p2 collapses into p1, and the stray placeholder had no parent.
    assert_eq!(report.placeholders_removed, 2);
    assert!(!report.is_clean());

    assert_eq!(walk_chain(&repaired, "t"), vec!["t", "c"]);
    assert_eq!(repaired.get_edge("t-g0").unwrap().target, "c");
    assert!(repaired.get_node("g1").unwrap().is_placeholder());
    assert!(!repaired.contains_node("stray"));
    assert_well_formed(&repaired);
}

#[test]
fn repair_twice_changes_nothing_the_second_time() {
    let editor = editor();
    for flow in [damaged_flow(), branching_flow(), linear_flow()] {
        let (once, _) = editor.repair(&flow);
        let (twice, report) = editor.repair(&once);
        assert!(report.is_clean(), "second pass reported {}", report);
        assert_eq!(once, twice);
    }
}

#[test]
fn repair_leaves_content_nodes_alone() {
    let flow = branching_flow();
    let (repaired, _) = editor().repair(&flow);
    assert_eq!(topology(&repaired), topology(&flow));
    assert_eq!(repaired.node_count(), flow.node_count());
}

#[test]
fn placeholder_with_successors_is_spliced_out() {
    let flow = FlowGraph::from_parts(
        [
            GraphNode::condition("c"),
            GraphNode::placeholder("p", "c", BranchSide::Yes),
            GraphNode::action("a"),
            GraphNode::end("e"),
        ],
        [
            GraphEdge::branch("c-p", "c", "p", BranchSide::Yes),
            GraphEdge::flow("p-a", "p", "a"),
            GraphEdge::branch("c-e", "c", "e", BranchSide::No),
        ],
    );
    let (repaired, report) = editor().repair(&flow);
    assert_eq!(report.placeholders_removed, 1);
    let yes = repaired.branch_edges("c", BranchSide::Yes);
    assert_eq!(yes.len(), 1);
    assert_eq!(yes[0].id, "c-p");
    assert_eq!(yes[0].target, "a");
    assert_well_formed(&repaired);
}

#[test]
fn repair_through_apply_reports_no_error() {
    let outcome = editor().apply(&damaged_flow(), EditOp::Repair);
    assert!(outcome.is_ok());
    assert_well_formed(&outcome.snapshot);
}

#[test]
fn placeholder_with_two_successors_keeps_a_single_branch_edge() {
    let flow = FlowGraph::from_parts(
        [
            GraphNode::condition("c"),
            GraphNode::placeholder("p", "c", BranchSide::Yes),
            GraphNode::action("a"),
            GraphNode::action("b"),
            GraphNode::end("e"),
        ],
        [
            GraphEdge::branch("c-p", "c", "p", BranchSide::Yes),
            GraphEdge::flow("p-a", "p", "a"),
            GraphEdge::flow("p-b", "p", "b"),
            GraphEdge::branch("c-e", "c", "e", BranchSide::No),
        ],
    );
    let (repaired, _) = editor().repair(&flow);
    let yes = repaired.branch_edges("c", BranchSide::Yes);
    assert_eq!(yes.len(), 1);
    assert_eq!(yes[0].target, "a");
    assert!(repaired.parents("b").is_empty());
    assert_well_formed(&repaired);
}

#[test]
fn ghost_with_a_self_loop_is_bypassed() {
    init_logging();
    let flow = FlowGraph::from_parts(
        [
            GraphNode::trigger("t"),
            GraphNode::ghost("g"),
            GraphNode::action("a"),
            GraphNode::end("e"),
        ],
        [
            GraphEdge::flow("t-g", "t", "g"),
            GraphEdge::flow("g-g", "g", "g"),
            GraphEdge::flow("g-a", "g", "a"),
            GraphEdge::flow("a-e", "a", "e"),
        ],
    );
    let (repaired, report) = editor().repair(&flow);
    assert_eq!(report.ghosts_removed, 1);
    assert!(!repaired.contains_node("g"));
    assert_eq!(repaired.get_edge("t-g").unwrap().target, "a");
    assert_eq!(walk_chain(&repaired, "t"), vec!["t", "a", "e"]);
    assert_eq!(repaired.edge_count(), 2);
    assert_well_formed(&repaired);
}
