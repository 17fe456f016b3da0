use std::fs;

use proof_hybrid::{
    resolve_config, ConfigOrigin, ConfigSource, FallbackPolicy, FileConfigSource,
    StaticConfigSource, UnavailableConfigSource, VerificationConfig,
};
use tempfile::tempdir;

fn custom() -> VerificationConfig {
    VerificationConfig {
        symbolic_weight: 0.5,
        semantic_weight: 0.5,
        pass_threshold: 60.0,
    }
}

#[test]
fn defaults_match_documented_weights() {
    let config = VerificationConfig::default();
    assert_eq!(config.symbolic_weight, 0.7);
    assert_eq!(config.semantic_weight, 0.3);
    assert_eq!(config.pass_threshold, 70.0);
    assert!(config.validate().is_ok());
}

#[test]
fn missing_fields_take_defaults() {
    let config: VerificationConfig = serde_json::from_str(r#"{"pass_threshold": 55}"#).expect("parse");
    assert_eq!(config.symbolic_weight, 0.7);
    assert_eq!(config.pass_threshold, 55.0);
}

#[test]
fn file_sources_read_each_format() {
    let dir = tempdir().expect("tempdir");
    let expected = custom();
    let files = [
        ("weights.yaml", serde_yaml::to_string(&expected).expect("yaml")),
        ("weights.toml", toml::to_string(&expected).expect("toml")),
        ("weights.json", serde_json::to_string(&expected).expect("json")),
    ];
    for (name, contents) in files {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("write");
        let source = FileConfigSource::new(&path);
        assert_eq!(source.fetch().expect(name), expected);
        let (config, origin) = resolve_config(&source, FallbackPolicy::Fail).expect("resolve");
        assert_eq!(config, expected);
        assert_eq!(origin, ConfigOrigin::Source { name: source.describe() });
    }
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("weights.ini");
    fs::write(&path, "symbolic_weight = 0.5").expect("write");
    let err = FileConfigSource::new(&path).fetch().unwrap_err();
    assert_eq!(err.code(), "unsupported-format");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().expect("tempdir");
    let err = FileConfigSource::new(dir.path().join("absent.yaml")).fetch().unwrap_err();
    assert_eq!(err.code(), "io");
}

#[test]
fn unavailable_source_falls_back_visibly() {
    let source = UnavailableConfigSource::new("connection refused");
    let (config, origin) = resolve_config(&source, FallbackPolicy::UseDefaults).expect("fallback");
    assert_eq!(config, VerificationConfig::default());
    assert!(origin.is_fallback());
    match origin {
        ConfigOrigin::Fallback { reason } => assert!(reason.contains("connection refused")),
        other => panic!("unexpected origin {other:?}"),
    }
}

#[test]
fn strict_policy_surfaces_failure() {
    let err = resolve_config(&UnavailableConfigSource::default(), FallbackPolicy::Fail).unwrap_err();
    assert_eq!(err.code(), "source-unavailable");
}

#[test]
fn invalid_values_count_as_source_failure() {
    let bad = StaticConfigSource::new(VerificationConfig {
        symbolic_weight: 1.5,
        ..VerificationConfig::default()
    });
    assert_eq!(
        resolve_config(&bad, FallbackPolicy::Fail).unwrap_err().code(),
        "invalid-weight"
    );
    let (_, origin) = resolve_config(&bad, FallbackPolicy::UseDefaults).expect("fallback");
    assert!(origin.is_fallback());

    let nan = VerificationConfig {
        pass_threshold: f64::NAN,
        ..VerificationConfig::default()
    };
    assert_eq!(nan.validate().unwrap_err().code(), "invalid-threshold");
}
