// crates/change-gate-config/tests/e2e_gate_flow.rs
// ============================================================================
// Module: End-to-End Gate Flow Tests
// Description: Full enforcement flow over on-disk policy and waiver documents.
// Purpose: Exercise the store, ledger, and enforcer against a real directory.
// ============================================================================

//! End-to-end gate enforcement over a temporary project directory.

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

use std::fs;
use std::path::Path;

use change_gate_config::FsPolicySource;
use change_gate_config::FsWaiverSource;
use change_gate_core::BudgetUsage;
use change_gate_core::GateEnforcer;
use change_gate_core::GateKind;
use change_gate_core::GateReading;
use change_gate_core::GateRequest;
use change_gate_core::GateValue;
use change_gate_core::PolicyStore;
use change_gate_core::RiskTier;
use change_gate_core::Timestamp;
use change_gate_core::WaiverId;
use change_gate_core::WaiverLedger;

/// Evaluation instant used throughout these tests.
const NOW: Timestamp = Timestamp::from_unix_seconds(1_770_000_000);

/// Policy document written into the temporary project.
const POLICY: &str = r#"
version = "e2e-1"

[risk_tiers.1]
max_files = 10
max_loc = 400

[risk_tiers.2]
max_files = 25
max_loc = 1000
coverage_threshold = 0.8
mutation_threshold = 0.7

[risk_tiers.3]
max_files = 50
max_loc = 2000
"#;

/// Active coverage waiver that expires a day after `NOW`.
const COVERAGE_WAIVER: &str = r#"
status = "active"
reason = "generated bindings are invisible to the coverage tool"
gates = ["coverage"]
expires_at = 1770086400
approvers = ["lead@example.com"]
"#;

/// Delta-only waiver granting ten extra files without waiving any gate.
const BUDGET_WAIVER: &str = r#"
status = "active"
reason = "mechanical rename touches every call site"
gates = []
expires_at = 1770086400
approvers = ["lead@example.com"]

[delta]
max_files = 10
max_loc = 0
"#;

/// Stale waiver whose expiry predates `NOW` despite its active status.
const STALE_WAIVER: &str = r#"
status = "active"
reason = "expired carve-out"
gates = ["coverage"]
expires_at = 1769000000
approvers = ["lead@example.com"]
"#;

/// Writes the policy and named waivers into a fresh project directory.
fn project_with(waivers: &[(&str, &str)]) -> tempfile::TempDir {
    let root = tempfile::tempdir().expect("tempdir");
    let policy_path = FsPolicySource::policy_path(root.path());
    fs::create_dir_all(policy_path.parent().expect("config dir")).expect("create config dir");
    fs::write(policy_path, POLICY).expect("write policy");
    let waivers_dir = FsWaiverSource::waivers_dir(root.path());
    fs::create_dir_all(&waivers_dir).expect("create waivers dir");
    for (id, text) in waivers {
        fs::write(waivers_dir.join(format!("{id}.toml")), text).expect("write waiver");
    }
    root
}

/// Builds an enforcer over the filesystem sources.
fn enforcer() -> GateEnforcer<FsPolicySource, FsWaiverSource> {
    GateEnforcer::new(
        PolicyStore::new(FsPolicySource::new()),
        WaiverLedger::new(FsWaiverSource::new()),
    )
}

/// Builds a tier-2 request against the given project root.
fn request(root: &Path, value: GateValue) -> GateRequest {
    GateRequest {
        tier: RiskTier::Tier2,
        value,
        project_root: root.to_path_buf(),
        experimental: false,
        waiver_ids: Vec::new(),
        now: NOW,
    }
}

#[test]
fn coverage_below_the_policy_threshold_fails_with_detail() {
    let project = project_with(&[]);
    let enforcer = enforcer();
    let verdict = enforcer
        .enforce_gate(GateKind::Coverage, &request(project.path(), GateValue::Ratio(0.79)))
        .expect("enforcement should not error");
    assert!(!verdict.passed);
    assert!(!verdict.waived);
    assert_eq!(verdict.threshold, Some(GateReading::Ratio(0.8)));
    assert!(
        verdict.messages.iter().any(|message| message.contains("0.8")),
        "messages were: {:?}",
        verdict.messages
    );
}

#[test]
fn coverage_at_the_threshold_passes_inclusively() {
    let project = project_with(&[]);
    let enforcer = enforcer();
    let verdict = enforcer
        .enforce_gate(GateKind::Coverage, &request(project.path(), GateValue::Ratio(0.8)))
        .expect("enforcement should not error");
    assert!(verdict.passed);
    assert!(!verdict.waived);
}

#[test]
fn valid_on_disk_waiver_short_circuits_the_coverage_gate() {
    let project = project_with(&[("w-cov", COVERAGE_WAIVER)]);
    let enforcer = enforcer();
    let verdict = enforcer
        .enforce_gate(GateKind::Coverage, &request(project.path(), GateValue::Ratio(0.1)))
        .expect("enforcement should not error");
    assert!(verdict.passed);
    assert!(verdict.waived);
    let grant = verdict.waiver.expect("waiver grant should be attached");
    assert_eq!(grant.waiver_id, WaiverId::new("w-cov"));
    assert_eq!(grant.reason, "generated bindings are invisible to the coverage tool");
}

#[test]
fn stale_waiver_on_disk_does_not_short_circuit() {
    let project = project_with(&[("w-stale", STALE_WAIVER)]);
    let enforcer = enforcer();
    let verdict = enforcer
        .enforce_gate(GateKind::Coverage, &request(project.path(), GateValue::Ratio(0.1)))
        .expect("enforcement should not error");
    assert!(!verdict.passed);
    assert!(!verdict.waived);
    assert!(verdict.waiver.is_none());
}

#[test]
fn waiver_scoped_to_coverage_leaves_mutation_enforced() {
    let project = project_with(&[("w-cov", COVERAGE_WAIVER)]);
    let enforcer = enforcer();
    let verdict = enforcer
        .enforce_gate(GateKind::Mutation, &request(project.path(), GateValue::Ratio(0.1)))
        .expect("enforcement should not error");
    assert!(!verdict.passed);
    assert!(!verdict.waived);
}

#[test]
fn budget_waiver_delta_raises_the_effective_budget() {
    let project = project_with(&[("w-budget", BUDGET_WAIVER)]);
    let enforcer = enforcer();
    let usage = BudgetUsage {
        files: 30,
        loc: 900,
    };
    let mut over_budget = request(project.path(), GateValue::Usage(usage));
    let baseline = enforcer
        .enforce_gate(GateKind::Budget, &over_budget)
        .expect("enforcement should not error");
    assert!(!baseline.passed, "30 files exceeds the unwaived budget of 25");

    over_budget.waiver_ids = vec![WaiverId::new("w-budget")];
    let widened = enforcer
        .enforce_gate(GateKind::Budget, &over_budget)
        .expect("enforcement should not error");
    assert!(widened.passed, "the delta raises the files budget to 35");
}

#[test]
fn missing_policy_document_falls_back_to_the_builtin_default() {
    let root = tempfile::tempdir().expect("tempdir");
    let enforcer = enforcer();
    // Built-in tier 2 coverage floor is also 0.8.
    let verdict = enforcer
        .enforce_gate(GateKind::Coverage, &request(root.path(), GateValue::Ratio(0.75)))
        .expect("enforcement should not error");
    assert!(!verdict.passed);
    assert_eq!(verdict.threshold, Some(GateReading::Ratio(0.8)));
}
