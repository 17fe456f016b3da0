use proof_core::{ProofStep, StepId};
use proof_graph::GraphAnalyzer;

fn chain(len: i64) -> Vec<ProofStep> {
    (1..=len)
        .map(|id| {
            let step = ProofStep::new(id).with_claim(format!("step {id}"));
            if id == 1 {
                step
            } else {
                step.depends_on(id - 1)
            }
        })
        .collect()
}

#[test]
fn empty_proof_has_zero_depth() {
    let result = GraphAnalyzer::new().analyze(&[]);
    assert_eq!(result.depth, 0);
    assert_eq!(result.cycles, 0);
    assert_eq!(result.bottlenecks, 0);
    assert!(result.critical_path.is_empty());
    assert_eq!(result.topological_order, Some(Vec::new()));
}

#[test]
fn independent_steps_have_depth_one() {
    let steps: Vec<_> = (1..=4i64).map(ProofStep::new).collect();
    let result = GraphAnalyzer::new().analyze(&steps);
    assert_eq!(result.depth, 1);
    assert!(result.step_depths.iter().all(|entry| entry.depth == 1));
}

#[test]
fn chain_depth_equals_length() {
    for len in 1..=12 {
        let result = GraphAnalyzer::new().analyze(&chain(len));
        assert_eq!(result.depth, len as usize);
        assert_eq!(result.depth_of(&StepId::Index(len)), len as usize);
    }
}

#[test]
fn unknown_dependencies_do_not_add_depth() {
    let steps = vec![ProofStep::new(1).depends_on("axiom-7")];
    let result = GraphAnalyzer::new().analyze(&steps);
    assert_eq!(result.depth, 1);
    assert_eq!(result.cycles, 0);
}

#[test]
fn diamond_depth_takes_longest_branch() {
    let steps = vec![
        ProofStep::new(1),
        ProofStep::new(2).depends_on(1),
        ProofStep::new(3).depends_on(2),
        ProofStep::new(4).depends_on(1).depends_on(3),
    ];
    let result = GraphAnalyzer::new().analyze(&steps);
    assert_eq!(result.depth, 4);
    assert_eq!(result.depth_of(&StepId::Index(4)), 4);
}

#[test]
fn analyzer_keeps_no_state_between_calls() {
    let analyzer = GraphAnalyzer::new();
    let deep = analyzer.analyze(&chain(6));
    let shallow = analyzer.analyze(&chain(2));
    assert_eq!(deep.depth, 6);
    assert_eq!(shallow.depth, 2);
}

#[test]
fn long_chains_do_not_exhaust_the_stack() {
    let result = GraphAnalyzer::new().analyze(&chain(20_000));
    assert_eq!(result.depth, 20_000);
    assert_eq!(result.cycles, 0);
    assert_eq!(result.critical_path.len(), 20_000);
    assert_eq!(result.topological_order.map(|order| order.len()), Some(20_000));
}

#[test]
fn long_ring_reports_one_cycle() {
    let mut steps = chain(20_000);
    steps[0] = steps[0].clone().depends_on(20_000i64);
    let result = GraphAnalyzer::new().analyze(&steps);
    assert_eq!(result.cycles, 1);
    assert_eq!(result.errors[0].path.len(), 20_001);
    assert!(result.critical_path.is_empty());
}
