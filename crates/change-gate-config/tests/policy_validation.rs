// crates/change-gate-config/tests/policy_validation.rs
// ============================================================================
// Module: Policy Validation Tests
// Description: Parsing and field-level validation of policy documents.
// Purpose: Ensure malformed policies are rejected with precise field paths.
// ============================================================================

//! Policy document parsing and validation tests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use change_gate_config::parse_policy_document;
use change_gate_core::GateKind;
use change_gate_core::PolicyValidationError;
use change_gate_core::RiskTier;

/// Complete, well-formed policy document used as a baseline.
const GOOD_POLICY: &str = r#"
version = "2026.1"

[risk_tiers.1]
max_files = 10
max_loc = 400
coverage_threshold = 0.9
mutation_threshold = 0.8
contracts_required = true
manual_review_required = true

[risk_tiers.2]
max_files = 25
max_loc = 1000
coverage_threshold = 0.8
mutation_threshold = 0.7
contracts_required = true

[risk_tiers.3]
max_files = 50
max_loc = 2000
coverage_threshold = 0.6
mutation_threshold = 0.5
contracts_required = false

[risk_tiers.experimental]
max_files = 15
max_loc = 600
coverage_threshold = 0.4
mutation_threshold = 0.3
"#;

#[test]
fn well_formed_document_parses_into_a_policy() -> Result<(), PolicyValidationError> {
    let policy = parse_policy_document(GOOD_POLICY)?;
    assert_eq!(policy.version, "2026.1");
    assert!(!policy.is_default);
    let tier2 = policy.tier(RiskTier::Tier2).ok_or(PolicyValidationError::MissingTier {
        tier: RiskTier::Tier2,
    })?;
    assert_eq!(tier2.max_files, 25);
    assert_eq!(tier2.max_loc, 1000);
    assert!((tier2.min_branch - 0.8).abs() < f64::EPSILON);
    assert!(tier2.requires_contracts);
    Ok(())
}

#[test]
fn missing_version_is_rejected() {
    let text = GOOD_POLICY.replace("version = \"2026.1\"", "");
    let result = parse_policy_document(&text);
    assert_eq!(result.err(), Some(PolicyValidationError::MissingField {
        field: "version".to_string(),
    }));
}

#[test]
fn missing_mandatory_tier_is_rejected() {
    let text = GOOD_POLICY.replace("[risk_tiers.2]", "[risk_tiers.ignored_2]");
    let result = parse_policy_document(&text);
    // The rename makes tier 2 both unknown and missing; the unknown key wins.
    assert!(matches!(
        result,
        Err(PolicyValidationError::InvalidField {
            ..
        } | PolicyValidationError::MissingTier {
            tier: RiskTier::Tier2,
        })
    ));
}

#[test]
fn omitted_tier_two_table_is_a_missing_tier() {
    let text = r#"
version = "2026.1"

[risk_tiers.1]
max_files = 10
max_loc = 400

[risk_tiers.3]
max_files = 50
max_loc = 2000
"#;
    let result = parse_policy_document(text);
    assert_eq!(result.err(), Some(PolicyValidationError::MissingTier {
        tier: RiskTier::Tier2,
    }));
}

#[test]
fn missing_experimental_tier_falls_back_to_the_default() -> Result<(), PolicyValidationError> {
    let text = r#"
version = "2026.1"

[risk_tiers.1]
max_files = 10
max_loc = 400

[risk_tiers.2]
max_files = 25
max_loc = 1000

[risk_tiers.3]
max_files = 50
max_loc = 2000
"#;
    let policy = parse_policy_document(text)?;
    let experimental =
        policy
            .tier(RiskTier::Experimental)
            .ok_or(PolicyValidationError::MissingTier {
                tier: RiskTier::Experimental,
            })?;
    assert_eq!(experimental.max_files, 15);
    assert_eq!(experimental.max_loc, 600);
    assert!((experimental.min_branch - 0.4).abs() < f64::EPSILON);
    Ok(())
}

#[test]
fn non_numeric_budget_names_the_field() {
    let text = GOOD_POLICY.replace("max_files = 25", "max_files = \"many\"");
    let result = parse_policy_document(&text);
    match result {
        Err(PolicyValidationError::InvalidField {
            field,
            ..
        }) => assert_eq!(field, "risk_tiers.2.max_files"),
        other => panic!("expected an invalid-field error, got {other:?}"),
    }
}

#[test]
fn negative_budget_is_rejected() {
    let text = GOOD_POLICY.replace("max_loc = 2000", "max_loc = -5");
    let result = parse_policy_document(&text);
    match result {
        Err(PolicyValidationError::InvalidField {
            field,
            ..
        }) => assert_eq!(field, "risk_tiers.3.max_loc"),
        other => panic!("expected an invalid-field error, got {other:?}"),
    }
}

#[test]
fn threshold_outside_the_unit_interval_is_rejected() {
    let text = GOOD_POLICY.replace("coverage_threshold = 0.8", "coverage_threshold = 1.5");
    let result = parse_policy_document(&text);
    match result {
        Err(PolicyValidationError::InvalidField {
            field,
            ..
        }) => assert_eq!(field, "risk_tiers.2.coverage_threshold"),
        other => panic!("expected an invalid-field error, got {other:?}"),
    }
}

#[test]
fn unknown_tier_key_is_rejected() {
    let text = format!("{GOOD_POLICY}\n[risk_tiers.4]\nmax_files = 1\nmax_loc = 1\n");
    let result = parse_policy_document(&text);
    match result {
        Err(PolicyValidationError::InvalidField {
            field,
            ..
        }) => assert_eq!(field, "risk_tiers.4"),
        other => panic!("expected an invalid-field error, got {other:?}"),
    }
}

#[test]
fn invalid_toml_syntax_is_reported_as_syntax() {
    let result = parse_policy_document("version = ");
    assert!(matches!(result, Err(PolicyValidationError::Syntax(_))));
}

#[test]
fn omitted_thresholds_fall_back_to_tier_defaults() -> Result<(), PolicyValidationError> {
    let text = r#"
version = "2026.1"

[risk_tiers.1]
max_files = 8
max_loc = 300

[risk_tiers.2]
max_files = 25
max_loc = 1000

[risk_tiers.3]
max_files = 50
max_loc = 2000
"#;
    let policy = parse_policy_document(text)?;
    let tier1 = policy.tier(RiskTier::Tier1).ok_or(PolicyValidationError::MissingTier {
        tier: RiskTier::Tier1,
    })?;
    assert_eq!(tier1.max_files, 8);
    assert!((tier1.min_branch - 0.9).abs() < f64::EPSILON);
    assert!((tier1.min_mutation - 0.8).abs() < f64::EPSILON);
    assert!(tier1.requires_contracts);
    Ok(())
}

#[test]
fn gate_toggles_and_waiver_approval_are_carried_through() -> Result<(), PolicyValidationError> {
    let text = format!(
        "{GOOD_POLICY}\n\
         [gates.mutation]\nenabled = false\ndescription = \"tooling outage\"\n\n\
         [waiver_approval]\nrequired_approvers = 2\n"
    );
    let policy = parse_policy_document(&text)?;
    assert!(!policy.gate_enabled(GateKind::Mutation));
    assert!(policy.gate_enabled(GateKind::Coverage));
    assert_eq!(policy.required_waiver_approvers(), 2);
    Ok(())
}
