use proof_core::{ProofStep, StepId};
use proof_graph::{EdgeKind, GraphAnalyzer, GraphView, LABEL_MAX_CHARS};

#[test]
fn view_marks_cycle_nodes_and_types_edges() {
    let steps = vec![
        ProofStep::new(1).with_claim("Base"),
        ProofStep::new(2).with_claim("Loop a").depends_on(1).depends_on(3),
        ProofStep::new(3).with_claim("Loop b").depends_on(2),
    ];
    let result = GraphAnalyzer::new().analyze(&steps);
    let view = GraphView::build(&steps, &result);

    assert_eq!(view.nodes.len(), 3);
    assert_eq!(view.edges.len(), 3);
    assert!(view.edges.iter().all(|edge| edge.kind == EdgeKind::Implies));
    assert_eq!(
        view.error_nodes(),
        vec![&StepId::Index(2), &StepId::Index(3)]
    );
    assert!(!view.nodes[0].error);
    assert_eq!(view.nodes[0].depth, 1);
}

#[test]
fn view_truncates_long_labels() {
    let long = "x".repeat(LABEL_MAX_CHARS + 10);
    let steps = vec![ProofStep::new(1).with_claim(long)];
    let result = GraphAnalyzer::new().analyze(&steps);
    let view = GraphView::build(&steps, &result);
    assert_eq!(view.nodes[0].label.len(), LABEL_MAX_CHARS + 3);
    assert!(view.nodes[0].label.ends_with("..."));

    let json = serde_json::to_value(&view).expect("serialize");
    assert!(json["edges"].as_array().unwrap().is_empty());
}

#[test]
fn edges_serialize_with_type_field() {
    let steps = vec![ProofStep::new(1), ProofStep::new(2).depends_on(1)];
    let result = GraphAnalyzer::new().analyze(&steps);
    let view = GraphView::build(&steps, &result);
    let json = serde_json::to_value(&view).expect("serialize");
    assert_eq!(json["edges"][0]["type"], "implies");
    assert_eq!(json["edges"][0]["source"], 1);
    assert_eq!(json["edges"][0]["target"], 2);
}

#[test]
fn implies_is_the_only_edge_kind() {
    let kind: EdgeKind = serde_json::from_str("\"implies\"").expect("implies");
    assert_eq!(kind, EdgeKind::Implies);
    for other in ["\"uses\"", "\"contradicts\""] {
        assert!(serde_json::from_str::<EdgeKind>(other).is_err());
    }
}
