//! Structural edit operations: insert, delete and the dispatch boundary.
mod common;
use common::*;
use flowgraph::prelude::*;

#[test]
fn start_flow_creates_trigger_and_end() {
    let editor = editor();
    let flow = editor.start_flow(GraphNode::trigger("t")).unwrap();
    assert_eq!(flow.node_count(), 2);
    let end = flow.end_node().unwrap().id.clone();
    assert_eq!(flow.children("t"), vec![end]);
    assert_well_formed(&flow);
}

#[test]
fn insert_after_trigger_keeps_the_end() {
    init_logging();
    let flow = FlowGraph::from_parts(
        [GraphNode::trigger("t"), GraphNode::end("e")],
        [GraphEdge::flow("t-e", "t", "e")],
    );
    let next = editor()
        .insert_after(&flow, "t", GraphNode::action("a"))
        .unwrap();

    assert_eq!(walk_chain(&next, "t"), vec!["t", "a", "e"]);
    assert_eq!(next.edge_count(), 2);
    // The old snapshot is untouched.
    assert_eq!(flow.children("t"), vec!["e".to_string()]);
}

#[test]
fn insert_condition_after_moves_downstream_to_the_chosen_branch() {
    let flow = FlowGraph::from_parts(
        [GraphNode::trigger("t"), GraphNode::action("a"), GraphNode::end("e")],
        [GraphEdge::flow("t-a", "t", "a"), GraphEdge::flow("a-e", "a", "e")],
    );
    let next = editor()
        .insert_condition_after(&flow, "a", GraphNode::condition("c"), BranchSide::Yes)
        .unwrap();

    assert_eq!(walk_chain(&next, "t"), vec!["t", "a", "c"]);
    let yes = next.branch_edges("c", BranchSide::Yes);
    assert_eq!(yes.len(), 1);
    assert_eq!(yes[0].target, "e");
    let no = next.branch_edges("c", BranchSide::No);
    assert_eq!(no.len(), 1);
    let placeholder = next.get_node(&no[0].target).unwrap();
    assert!(placeholder.is_placeholder());
    let slot = placeholder.branch_of.as_ref().unwrap();
    assert_eq!((slot.condition.as_str(), slot.side), ("c", BranchSide::No));
    assert_eq!(next.node_count(), 5);
    assert_well_formed(&next);
}

#[test]
fn insert_condition_after_refreshes_branch_lists() {
    let next = editor()
        .insert_condition_after(&linear_flow(), "a", GraphNode::condition("c"), BranchSide::No)
        .unwrap();
    let branches = next.get_node("c").unwrap().branches.clone().unwrap();
    assert_eq!(branches.no, vec!["e".to_string()]);
    assert_eq!(branches.yes.len(), 1);
}

#[test]
fn insert_condition_with_downstream_but_no_branch_choice_is_ambiguous() {
    let flow = linear_flow();
    let err = editor()
        .insert_after(&flow, "a", GraphNode::condition("c"))
        .unwrap_err();
    assert!(matches!(err, GraphError::AmbiguousBranchTarget { .. }));
}

#[test]
fn insert_condition_at_a_leaf_gets_two_placeholders() {
    let flow = FlowGraph::from_parts(
        [GraphNode::trigger("t"), GraphNode::action("a")],
        [GraphEdge::flow("t-a", "t", "a")],
    );
    let next = editor()
        .insert_after(&flow, "a", GraphNode::condition("c"))
        .unwrap();
    for side in BranchSide::BOTH {
        let edges = next.branch_edges("c", side);
        assert_eq!(edges.len(), 1);
        assert!(next.get_node(&edges[0].target).unwrap().is_placeholder());
    }
    assert_well_formed(&next);
}

#[test]
fn inserting_after_a_placeholder_takes_its_slot() {
    let flow = FlowGraph::from_parts(
        [
            GraphNode::trigger("t"),
            GraphNode::condition("c"),
            GraphNode::placeholder("p", "c", BranchSide::No),
            GraphNode::end("e"),
        ],
        [
            GraphEdge::flow("t-c", "t", "c"),
            GraphEdge::branch("c-e", "c", "e", BranchSide::Yes),
            GraphEdge::branch("c-p", "c", "p", BranchSide::No),
        ],
    );
    let next = editor()
        .insert_at(&flow, &InsertionPoint::After("p".into()), GraphNode::action("x"), None)
        .unwrap();

    assert!(!next.contains_node("p"));
    let no = next.branch_edges("c", BranchSide::No);
    assert_eq!(no.len(), 1);
    assert_eq!(no[0].id, "c-p");
    assert_eq!(no[0].target, "x");
    assert_well_formed(&next);
}

#[test]
fn insert_into_branch_head_pushes_existing_content_down() {
    let next = editor()
        .insert_into_branch(&branching_flow(), "c", BranchSide::Yes, GraphNode::action("h"), None)
        .unwrap();

    let yes = next.branch_edges("c", BranchSide::Yes);
    assert_eq!(yes.len(), 1);
    assert_eq!(yes[0].target, "h");
    assert_eq!(walk_chain(&next, "h"), vec!["h", "y1", "e"]);
    assert_eq!(next.get_edge("c-y1").unwrap().kind, EdgeKind::Flow);
    assert_well_formed(&next);
}

#[test]
fn insert_after_condition_or_end_is_rejected() {
    let editor = editor();
    let flow = branching_flow();
    assert!(matches!(
        editor.insert_after(&flow, "c", GraphNode::action("x")),
        Err(GraphError::AmbiguousBranchTarget { .. })
    ));
    assert_eq!(
        editor.insert_after(&flow, "e", GraphNode::action("x")),
        Err(GraphError::ProtectedNode("e".to_string()))
    );
    assert_eq!(
        editor.insert_after(&flow, "missing", GraphNode::action("x")),
        Err(GraphError::NodeNotFound("missing".to_string()))
    );
    assert_eq!(
        editor.insert_after(&flow, "t", GraphNode::action("a")),
        Err(GraphError::DuplicateId("a".to_string()))
    );
}

#[test]
fn delete_single_bridges_parent_to_child() {
    let flow = FlowGraph::from_parts(
        [GraphNode::action("a"), GraphNode::action("b"), GraphNode::action("c")],
        [GraphEdge::flow("a-b", "a", "b"), GraphEdge::flow("b-c", "b", "c")],
    );
    let next = editor().delete_single(&flow, "b").unwrap();

    assert!(!next.contains_node("b"));
    assert_eq!(next.edge_count(), 1);
    assert_eq!(next.children("a"), vec!["c".to_string()]);
    assert_eq!(next.parents("c"), vec!["a".to_string()]);
    assert!(next.all_edges().all(|e| e.source != "b" && e.target != "b"));
}

#[test]
fn delete_single_keeps_the_parent_edge_payload() {
    let flow = FlowGraph::from_parts(
        [GraphNode::action("a"), GraphNode::action("b"), GraphNode::action("c")],
        [
            GraphEdge::flow("a-b", "a", "b").with_payload(serde_json::json!({ "index": 3 })),
            GraphEdge::flow("b-c", "b", "c"),
        ],
    );
    let next = editor().delete_single(&flow, "b").unwrap();
    let bridge = next.outgoing_edges("a");
    assert_eq!(bridge[0].payload, serde_json::json!({ "index": 3 }));
}

#[test]
fn delete_subtree_reconnects_parent_to_end() {
    let next = editor().delete_subtree(&two_step_flow(), "a").unwrap();
    assert_eq!(walk_chain(&next, "t"), vec!["t", "e"]);
    assert_eq!(next.node_count(), 2);
    assert_eq!(next.get_edge("t-a").unwrap().target, "e");
}

#[test]
fn delete_subtree_of_a_condition_removes_both_branches() {
    let next = editor().delete_subtree(&branching_flow(), "c").unwrap();
    assert_eq!(walk_chain(&next, "t"), vec!["t", "a", "e"]);
    for id in ["c", "y1", "n1"] {
        assert!(!next.contains_node(id));
    }
    assert_well_formed(&next);
}

#[test]
fn end_node_cannot_be_deleted() {
    let editor = editor();
    let flow = linear_flow();
    assert_eq!(
        editor.delete_subtree(&flow, "e"),
        Err(GraphError::ProtectedNode("e".to_string()))
    );
    assert_eq!(
        editor.delete_single(&flow, "e"),
        Err(GraphError::ProtectedNode("e".to_string()))
    );
}

#[test]
fn deleting_the_only_branch_member_leaves_a_placeholder() {
    let flow = FlowGraph::from_parts(
        [
            GraphNode::trigger("t"),
            GraphNode::condition("c"),
            GraphNode::action("y1"),
            GraphNode::end("e"),
        ],
        [
            GraphEdge::flow("t-c", "t", "c"),
            GraphEdge::branch("c-y1", "c", "y1", BranchSide::Yes),
            GraphEdge::branch("c-e", "c", "e", BranchSide::No),
        ],
    );
    let next = editor()
        .delete_branch_member(&flow, "y1", "c", BranchSide::Yes)
        .unwrap();

    let yes = next.branch_edges("c", BranchSide::Yes);
    assert_eq!(yes.len(), 1);
    assert_eq!(yes[0].id, "c-y1");
    let placeholder = next.get_node(&yes[0].target).unwrap();
    assert!(placeholder.is_placeholder());
    assert_eq!(placeholder.branch_of.as_ref().unwrap().side, BranchSide::Yes);
    assert_well_formed(&next);
}

#[test]
fn deleting_a_branch_head_moves_its_successor_up() {
    let flow = FlowGraph::from_parts(
        [
            GraphNode::condition("c"),
            GraphNode::action("y1"),
            GraphNode::action("y2"),
            GraphNode::end("e"),
        ],
        [
            GraphEdge::branch("c-y1", "c", "y1", BranchSide::Yes),
            GraphEdge::flow("y1-y2", "y1", "y2"),
            GraphEdge::flow("y2-e", "y2", "e"),
            GraphEdge::branch("c-e", "c", "e", BranchSide::No),
        ],
    );
    let next = editor()
        .delete_branch_member(&flow, "y1", "c", BranchSide::Yes)
        .unwrap();

    let yes = next.branch_edges("c", BranchSide::Yes);
    assert_eq!(yes.len(), 1);
    assert_eq!(yes[0].id, "c-y1");
    assert_eq!(yes[0].target, "y2");
    assert!(!next.contains_node("y1"));
}

#[test]
fn delete_branch_member_checks_the_side() {
    let editor = editor();
    let flow = branching_flow();
    assert_eq!(
        editor.delete_branch_member(&flow, "y1", "c", BranchSide::No),
        Err(GraphError::NotInBranch {
            node_id: "y1".to_string(),
            condition_id: "c".to_string(),
            side: BranchSide::No,
        })
    );
    assert_eq!(
        editor.delete_branch_member(&flow, "y1", "a", BranchSide::Yes),
        Err(GraphError::NotACondition("a".to_string()))
    );
}

#[test]
fn apply_returns_the_input_snapshot_on_failure() {
    init_logging();
    let editor = editor();
    let flow = linear_flow();
    let outcome = editor.apply(
        &flow,
        EditOp::DeleteSingle {
            id: "missing".to_string(),
        },
    );
    assert!(!outcome.is_ok());
    assert_eq!(outcome.error, Some(GraphError::NodeNotFound("missing".to_string())));
    assert_eq!(outcome.snapshot, flow);
    assert!(outcome.captured.is_none());
}

#[test]
fn apply_dispatches_inserts() {
    let editor = editor();
    let outcome = editor.apply(
        &linear_flow(),
        EditOp::InsertConditionAfter {
            target: "a".to_string(),
            node: GraphNode::condition("c"),
            move_downstream_to: BranchSide::Yes,
        },
    );
    assert!(outcome.is_ok());
    assert_eq!(outcome.snapshot.branch_edges("c", BranchSide::Yes)[0].target, "e");
}

#[test]
fn editor_without_auto_repair_skips_the_pass() {
    let editor = FlowEditor::builder().with_auto_repair(false).build();
    let flow = FlowGraph::from_parts(
        [
            GraphNode::trigger("t"),
            GraphNode::ghost("g"),
            GraphNode::action("a"),
        ],
        [GraphEdge::flow("t-g", "t", "g")],
    );
    let next = editor.insert_after(&flow, "t", GraphNode::action("x")).unwrap();
    assert!(next.contains_node("g"));

    let repaired = FlowEditor::new().insert_after(&flow, "t", GraphNode::action("y")).unwrap();
    assert!(!repaired.contains_node("g"));
}

#[test]
fn branch_lists_track_edits_without_auto_repair() {
    let editor = FlowEditor::builder().with_auto_repair(false).build();
    let flow = editor
        .insert_condition_after(&linear_flow(), "a", GraphNode::condition("c"), BranchSide::Yes)
        .unwrap();
    let branches = flow.get_node("c").unwrap().branches.clone().unwrap();
    assert_eq!(branches.yes, vec!["e"]);
    assert_eq!(branches.no.len(), 1);
    for id in branches.yes.iter().chain(&branches.no) {
        assert!(flow.contains_node(id), "branch list names missing node '{}'", id);
    }
}

/// `t -> c`, with `c --yes--> c2 {yes: y, no: n}` and `c --no--> e`.
fn nested_condition_flow() -> FlowGraph {
    FlowGraph::from_parts(
        [
            GraphNode::trigger("t"),
            GraphNode::condition("c"),
            GraphNode::condition("c2"),
            GraphNode::action("y"),
            GraphNode::action("n"),
            GraphNode::end("e"),
        ],
        [
            GraphEdge::flow("t-c", "t", "c"),
            GraphEdge::branch("c-c2", "c", "c2", BranchSide::Yes),
            GraphEdge::branch("c-e", "c", "e", BranchSide::No),
            GraphEdge::branch("c2-y", "c2", "y", BranchSide::Yes),
            GraphEdge::branch("c2-n", "c2", "n", BranchSide::No),
            GraphEdge::flow("y-e", "y", "e"),
            GraphEdge::flow("n-e", "n", "e"),
        ],
    )
}

#[test]
fn deleting_a_nested_condition_takes_its_branches_along() {
    let flow = nested_condition_flow();
    assert_well_formed(&flow);
    let next = editor()
        .delete_branch_member(&flow, "c2", "c", BranchSide::Yes)
        .unwrap();

    let yes = next.branch_edges("c", BranchSide::Yes);
    assert_eq!(yes.len(), 1);
    assert_eq!(yes[0].id, "c-c2");
    assert_eq!(yes[0].target, "e");
    for gone in ["c2", "y", "n"] {
        assert!(!next.contains_node(gone), "'{}' survived", gone);
    }
    assert_well_formed(&next);
}

#[test]
fn deleting_a_nested_condition_with_open_branches_leaves_a_placeholder() {
    let flow = FlowGraph::from_parts(
        [
            GraphNode::trigger("t"),
            GraphNode::condition("c"),
            GraphNode::condition("c2"),
            GraphNode::action("y"),
            GraphNode::action("n"),
            GraphNode::end("e"),
        ],
        [
            GraphEdge::flow("t-c", "t", "c"),
            GraphEdge::branch("c-c2", "c", "c2", BranchSide::Yes),
            GraphEdge::branch("c-e", "c", "e", BranchSide::No),
            GraphEdge::branch("c2-y", "c2", "y", BranchSide::Yes),
            GraphEdge::branch("c2-n", "c2", "n", BranchSide::No),
        ],
    );
    let editor = FlowEditor::builder().with_auto_repair(false).build();
    let next = editor
        .delete_branch_member(&flow, "c2", "c", BranchSide::Yes)
        .unwrap();

    let yes = next.branch_edges("c", BranchSide::Yes);
    assert_eq!(yes.len(), 1);
    assert_eq!(yes[0].id, "c-c2");
    assert!(next.get_node(&yes[0].target).unwrap().is_placeholder());
    assert!(invariants::check(&next).is_empty());
}
