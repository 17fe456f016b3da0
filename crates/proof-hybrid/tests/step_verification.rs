use proof_core::{Domain, Equation, ErrorInfo, ProofError, ProofStep};
use proof_hybrid::{
    ConfigOrigin, FallbackPolicy, HybridVerifier, StaticConfigSource, SymbolicVerifier,
    UnavailableConfigSource, VerificationConfig,
};

struct Broken;

impl SymbolicVerifier for Broken {
    fn verify(&self, _equation: &Equation, _domain: Domain) -> Result<bool, ProofError> {
        Err(ProofError::Symbolic(ErrorInfo::new("backend-down", "solver crashed")))
    }
}

#[test]
fn narrative_step_is_valid_without_check() {
    let mut verifier = HybridVerifier::new();
    let step = ProofStep::new(1).with_claim("Let x be a real number");
    let result = verifier.verify_step(&step, Domain::Algebra).expect("verify");
    assert!(result.symbolic.valid);
    assert!(!result.symbolic.checked);
    assert!(result.passed);
    assert_eq!(result.lii.index, 100);
}

#[test]
fn valid_equation_combines_weights() {
    let mut verifier = HybridVerifier::new();
    let step = ProofStep::new(2)
        .with_claim("Since x is real, x + 5 = 5 + x")
        .with_equation("x + 5", "5 + x");
    let result = verifier.verify_step(&step, Domain::Algebra).expect("verify");
    assert!(result.symbolic.valid && result.symbolic.checked);
    let expected = 0.7 * 100.0 + 0.3 * f64::from(result.consensus.mean);
    assert!((result.combined_score - expected).abs() < 1e-9);
    assert!(result.passed);
}

#[test]
fn wrong_equation_fails_the_step() {
    let mut verifier = HybridVerifier::new();
    let step = ProofStep::new(3)
        .with_claim("Therefore 2x = 2")
        .with_equation("2x", "2");
    let result = verifier.verify_step(&step, Domain::Algebra).expect("verify");
    assert!(!result.symbolic.valid);
    assert!(!result.passed);
    assert!(result.combined_score < 70.0);
    assert_eq!(result.lii.index, 40);
}

#[test]
fn verifier_errors_become_invalid_steps() {
    let mut verifier = HybridVerifier::new().with_symbolic_verifier(Broken);
    let step = ProofStep::new(4).with_claim("x = x").with_equation("x", "x");
    let result = verifier.verify_step(&step, Domain::Algebra).expect("verify");
    assert!(!result.symbolic.valid);
    assert!(result.symbolic.error.as_deref().unwrap_or("").contains("solver crashed"));
}

#[test]
fn step_domain_overrides_default() {
    let mut verifier = HybridVerifier::new();
    let step = ProofStep::new(5).with_claim("Open sets are closed under union").with_domain(Domain::Topology);
    assert_eq!(verifier.verify_step(&step, Domain::Algebra).expect("verify").domain, Domain::Topology);
    let bare = ProofStep::new(6).with_claim("Hence p implies q");
    assert_eq!(verifier.verify_step(&bare, Domain::Logic).expect("verify").domain, Domain::Logic);
}

#[test]
fn custom_threshold_is_respected() {
    let strict = VerificationConfig {
        pass_threshold: 100.0,
        ..VerificationConfig::default()
    };
    let mut verifier = HybridVerifier::new().with_config_source(StaticConfigSource::new(strict));
    let step = ProofStep::new(1).with_claim("Let x be a real number");
    assert!(!verifier.verify_step(&step, Domain::Algebra).expect("verify").passed);
    assert!(matches!(verifier.config_origin(), Some(ConfigOrigin::Source { .. })));
}

#[test]
fn unreachable_config_uses_defaults_and_reports_it() {
    let mut verifier = HybridVerifier::new().with_config_source(UnavailableConfigSource::new("timeout"));
    assert!(verifier.config_origin().is_none());
    let step = ProofStep::new(1).with_claim("Let x be a real number");
    verifier.verify_step(&step, Domain::Algebra).expect("fallback verify");
    assert!(verifier.config_origin().map_or(false, ConfigOrigin::is_fallback));
}

#[test]
fn strict_policy_propagates_config_failure() {
    let mut verifier = HybridVerifier::new()
        .with_config_source(UnavailableConfigSource::new("timeout"))
        .with_fallback_policy(FallbackPolicy::Fail);
    let step = ProofStep::new(1).with_claim("Let x be a real number");
    assert!(verifier.verify_step(&step, Domain::Algebra).is_err());
}

#[test]
fn deeply_nested_equation_is_an_invalid_step() {
    let mut verifier = HybridVerifier::new();
    let lhs = format!("{}x{}", "(".repeat(5_000), ")".repeat(5_000));
    let step = ProofStep::new(1).with_claim("Hence x = x").with_equation(lhs, "x");
    let result = verifier.verify_step(&step, Domain::Algebra).expect("verify");
    assert!(!result.symbolic.valid);
    assert!(result.symbolic.checked);
    assert!(result
        .symbolic
        .error
        .as_deref()
        .map_or(false, |error| error.contains("expression-too-deep")));
    assert!(!result.passed);
}
