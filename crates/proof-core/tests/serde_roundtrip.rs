use proof_core::{
    from_json_slice, stable_hash_string, to_canonical_json_bytes, Domain, ProofInput, ProofStep,
    StepId,
};

#[test]
fn proof_input_accepts_mixed_identifiers() {
    let json = r#"{
        "domain": "logic",
        "steps": [
            {"id": 1, "claim": "Assume p"},
            {"id": "lemma", "claim": "p implies q", "dependencies": [1]},
            {"id": 3, "equation": {"lhs": "x", "rhs": "x"}, "domain": "algebra"}
        ]
    }"#;
    let proof: ProofInput = from_json_slice(json.as_bytes()).expect("parse");
    assert_eq!(proof.domain(), Domain::Logic);
    assert_eq!(proof.steps[0].id, StepId::Index(1));
    assert_eq!(proof.steps[1].id, StepId::Label("lemma".into()));
    assert_eq!(proof.steps[1].dependencies, vec![StepId::Index(1)]);
    assert!(proof.steps[0].dependencies.is_empty());
    assert_eq!(proof.steps[2].domain, Some(Domain::Algebra));
}

#[test]
fn proof_input_round_trips_through_canonical_json() {
    let proof = ProofInput::new(
        vec![
            ProofStep::new(1).with_claim("Assume x = 1").with_equation("x", "1"),
            ProofStep::new(2).with_claim("Then 2x = 2").depends_on(1),
        ],
        Domain::Algebra,
    );
    let bytes = to_canonical_json_bytes(&proof).expect("serialize");
    let decoded: ProofInput = from_json_slice(&bytes).expect("deserialize");
    assert_eq!(decoded, proof);
    assert_eq!(
        stable_hash_string(&proof).unwrap(),
        stable_hash_string(&decoded).unwrap()
    );
}

#[test]
fn step_ids_match_numbers() {
    assert!(StepId::Index(4).matches_number(4));
    assert!(StepId::Label(" 4 ".into()).matches_number(4));
    assert!(!StepId::Label("4a".into()).matches_number(4));
    assert!(!StepId::Index(-4).matches_number(4));
}

#[test]
fn domains_parse_case_insensitively() {
    assert_eq!("Topology".parse::<Domain>().unwrap(), Domain::Topology);
    let err = "geometry".parse::<Domain>().unwrap_err();
    assert_eq!(err.code(), "unknown-domain");
}
