use proof_core::{ProofStep, StepId};
use proof_graph::{ErrorKind, GraphAnalyzer, Severity};

#[test]
fn mutual_dependency_is_a_cycle() {
    let steps = vec![
        ProofStep::new(1).depends_on(2),
        ProofStep::new(2).depends_on(1),
    ];
    let result = GraphAnalyzer::new().analyze(&steps);
    assert_eq!(result.cycles, 1);
    assert!(result.topological_order.is_none());
    assert!(result.critical_path.is_empty());

    let error = &result.errors[0];
    assert_eq!(error.kind, ErrorKind::Circular);
    assert_eq!(error.severity, Severity::Critical);
    assert_eq!(
        error.path,
        vec![StepId::Index(1), StepId::Index(2), StepId::Index(1)]
    );
    assert_eq!(error.step_id, StepId::Index(1));
    assert_eq!(error.message, "Circular reasoning detected: 1 -> 2 -> 1");
}

#[test]
fn self_loop_counts_as_cycle() {
    let steps = vec![ProofStep::new("a").depends_on("a")];
    let result = GraphAnalyzer::new().analyze(&steps);
    assert_eq!(result.cycles, 1);
    assert_eq!(
        result.errors[0].path,
        vec![StepId::from("a"), StepId::from("a")]
    );
    assert_eq!(result.depth, 1);
}

#[test]
fn cycle_path_starts_at_back_edge_target() {
    let steps = vec![
        ProofStep::new(1),
        ProofStep::new(2).depends_on(1).depends_on(4),
        ProofStep::new(3).depends_on(2),
        ProofStep::new(4).depends_on(3),
    ];
    let result = GraphAnalyzer::new().analyze(&steps);
    assert_eq!(result.cycles, 1);
    assert_eq!(
        result.errors[0].path,
        vec![
            StepId::Index(2),
            StepId::Index(3),
            StepId::Index(4),
            StepId::Index(2)
        ]
    );
    let members = result.cycle_members();
    assert!(!members.contains(&StepId::Index(1)));
    assert!(members.contains(&StepId::Index(4)));
}

#[test]
fn disjoint_cycles_are_all_reported() {
    let steps = vec![
        ProofStep::new(1).depends_on(2),
        ProofStep::new(2).depends_on(1),
        ProofStep::new(3).depends_on(4),
        ProofStep::new(4).depends_on(3),
    ];
    let result = GraphAnalyzer::new().analyze(&steps);
    assert_eq!(result.cycles, 2);
    assert_eq!(result.errors.len(), 2);
}

#[test]
fn cyclic_depth_terminates() {
    let steps = vec![
        ProofStep::new(1).depends_on(3),
        ProofStep::new(2).depends_on(1),
        ProofStep::new(3).depends_on(2),
    ];
    let result = GraphAnalyzer::new().analyze(&steps);
    assert!(result.depth >= 1);
    assert!(result.depth <= 3);
}
