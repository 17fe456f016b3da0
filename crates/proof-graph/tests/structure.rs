use proof_core::{ProofStep, StepId};
use proof_graph::{GraphAnalyzer, BOTTLENECK_IN_DEGREE};

fn fan_out(dependents: i64) -> Vec<ProofStep> {
    let mut steps = vec![ProofStep::new(1).with_claim("Critical step")];
    for id in 2..=dependents + 1 {
        steps.push(ProofStep::new(id).with_claim("From 1").depends_on(1));
    }
    steps
}

#[test]
fn wide_fan_out_is_a_bottleneck() {
    let result = GraphAnalyzer::new().analyze(&fan_out(4));
    assert_eq!(BOTTLENECK_IN_DEGREE, 3);
    assert_eq!(result.bottlenecks, 1);
    assert_eq!(result.depth, 2);
}

#[test]
fn narrow_fan_out_is_not_a_bottleneck() {
    let result = GraphAnalyzer::new().analyze(&fan_out(2));
    assert_eq!(result.bottlenecks, 0);
}

#[test]
fn repeated_dependency_counts_once() {
    let steps = vec![
        ProofStep::new(1),
        ProofStep::new(2).depends_on(1).depends_on(1).depends_on(1),
    ];
    let result = GraphAnalyzer::new().analyze(&steps);
    assert_eq!(result.bottlenecks, 0);
}

#[test]
fn unknown_nodes_can_be_bottlenecks() {
    let steps = vec![
        ProofStep::new(1).depends_on("lemma"),
        ProofStep::new(2).depends_on("lemma"),
        ProofStep::new(3).depends_on("lemma"),
    ];
    let result = GraphAnalyzer::new().analyze(&steps);
    assert_eq!(result.bottlenecks, 1);
}

#[test]
fn topological_order_puts_dependencies_first() {
    let steps = vec![
        ProofStep::new(3).depends_on(2),
        ProofStep::new(1),
        ProofStep::new(2).depends_on(1),
    ];
    let result = GraphAnalyzer::new().analyze(&steps);
    let order = result.topological_order.expect("acyclic");
    assert_eq!(order.len(), 3);
    let position = |id: i64| order.iter().position(|entry| *entry == StepId::Index(id));
    assert!(position(1) < position(2));
    assert!(position(2) < position(3));
}

#[test]
fn critical_path_follows_longest_chain() {
    let steps = vec![
        ProofStep::new(1),
        ProofStep::new(2).depends_on(1),
        ProofStep::new(3).depends_on(2),
        ProofStep::new(4).depends_on(1),
    ];
    let result = GraphAnalyzer::new().analyze(&steps);
    assert_eq!(
        result.critical_path,
        vec![StepId::Index(1), StepId::Index(2), StepId::Index(3)]
    );
    assert_eq!(result.critical_path.len(), result.depth);
}

#[test]
fn edgeless_graph_critical_path_is_single_node() {
    let steps = vec![ProofStep::new(1), ProofStep::new(2)];
    let result = GraphAnalyzer::new().analyze(&steps);
    assert_eq!(result.critical_path.len(), 1);
}

#[test]
fn result_serializes_null_order_for_cycles() {
    let steps = vec![
        ProofStep::new(1).depends_on(2),
        ProofStep::new(2).depends_on(1),
    ];
    let result = GraphAnalyzer::new().analyze(&steps);
    let json = serde_json::to_value(&result).expect("serialize");
    assert!(json["topological_order"].is_null());
    assert_eq!(json["errors"][0]["kind"], "circular");
    assert_eq!(json["errors"][0]["severity"], "critical");
}

#[test]
fn unknown_dependencies_stay_off_the_critical_path() {
    let steps = vec![ProofStep::new(1).depends_on(99)];
    let result = GraphAnalyzer::new().analyze(&steps);
    assert_eq!(result.depth, 1);
    assert_eq!(result.critical_path, vec![StepId::Index(1)]);

    let steps = vec![
        ProofStep::new(1).depends_on("axiom"),
        ProofStep::new(2).depends_on(1),
    ];
    let result = GraphAnalyzer::new().analyze(&steps);
    assert_eq!(result.critical_path, vec![StepId::Index(1), StepId::Index(2)]);
    assert_eq!(result.critical_path.len(), result.depth);
}
