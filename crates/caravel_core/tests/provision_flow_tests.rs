//! End-to-end tests for the provisioning pipeline, driven entirely
//! through scripted process and prompt doubles.

use std::sync::Arc;

use caravel_cloud::{DomainBinding, VPN_CLIENT_CONFIG_FILE};
use caravel_core::{
    ProvisionOrchestrator, ReferenceArchitecture, RunOutcome, SessionSettings, Stage, StepError,
};
use caravel_iac::{IacError, MODULE_FILE, VARS_FILE};
use caravel_prompt::{GateId, ScriptedPrompter};
use caravel_runner::{MockResponse, MockRunner};
use tempfile::tempdir;

const RAW_OUTPUTS: &str = r#"{
    "resource_group_name": {"value": "demo-rg"},
    "app_service_name": {"value": "demo-app"},
    "firewall_pip": {"value": "20.1.2.3"},
    "bot_service_name": {"value": "demo-bot"},
    "vnet_gateway_name": {"value": "demo-gw"},
    "app_service_default_hostname": {"value": "demo-app.azurewebsites.net"}
}"#;

fn domain_settings(dir: &std::path::Path) -> SessionSettings {
    SessionSettings::new("demo", ReferenceArchitecture::SecureAml, dir).with_domain(
        DomainBinding::new("bot.example.com", "/certs/bot.pfx", "pfx-secret"),
    )
}

fn identity_responses() -> Vec<MockResponse> {
    vec![
        MockResponse::success("sub-123\n"), // account list
        MockResponse::success("sub-123\n"), // account show
    ]
}

#[tokio::test]
async fn test_full_run_completes_with_domain_chain() {
    let dir = tempdir().unwrap();

    let mut responses = identity_responses();
    responses.extend(vec![
        MockResponse::success(""),                // terraform init
        MockResponse::success(""),                // terraform plan
        MockResponse::success(""),                // terraform apply
        MockResponse::success(RAW_OUTPUTS),       // terraform output -json
        MockResponse::success("TOKEN42\n"),       // webapp show (verification id)
        MockResponse::success(""),                // hostname add
        MockResponse::success(""),                // ssl upload
        MockResponse::success("AA11BB22\n"),      // ssl list
        MockResponse::success(""),                // ssl bind
        MockResponse::success(""),                // bot update
        MockResponse::success("<VpnProfile/>\n"), // vpn-client generate
    ]);
    let runner = MockRunner::new().with_responses(responses);
    let prompter = ScriptedPrompter::new()
        .with_confirm("apply-infrastructure", true)
        .with_confirm("dns-records-created", true);

    let report = ProvisionOrchestrator::new(
        Arc::new(runner.clone()),
        Arc::new(prompter.clone()),
        domain_settings(dir.path()),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.stage, Stage::Complete);
    assert_eq!(report.outputs.len(), 6);
    assert_eq!(report.outputs.field_str("resource_group_name").unwrap(), "demo-rg");

    // Both artifacts were rendered before the engine ran.
    assert!(dir.path().join(VARS_FILE).exists());
    assert!(dir.path().join(MODULE_FILE).exists());
    let tfvars = std::fs::read_to_string(dir.path().join(VARS_FILE)).unwrap();
    assert!(tfvars.contains("sub-123"));
    assert!(tfvars.contains("demo"));

    // The VPN profile landed at the fixed export path.
    let vpn = std::fs::read_to_string(dir.path().join(VPN_CLIENT_CONFIG_FILE)).unwrap();
    assert_eq!(vpn.trim(), "<VpnProfile/>");

    // Every control-plane call interpolated values from the captured
    // outputs, not placeholders.
    let az_calls = runner.calls_to("az");
    assert_eq!(az_calls.len(), 9); // 2 identity + 7 post-provision
    for call in &az_calls[2..] {
        assert!(call.args.contains(&"demo-rg".to_string()), "{:?}", call.args);
    }
    assert!(az_calls[7]
        .args
        .contains(&"https://bot.example.com/api/messages".to_string()));
    assert!(az_calls[8].args.contains(&"demo-gw".to_string()));

    // Both gates were asked, in order.
    let asked = prompter.asked();
    assert_eq!(asked.len(), 2);
    assert_eq!(asked[0].name(), "apply-infrastructure");
    assert_eq!(asked[1].name(), "dns-records-created");
}

#[tokio::test]
async fn test_declined_apply_gate_halts_cleanly() {
    let dir = tempdir().unwrap();

    let mut responses = identity_responses();
    responses.extend(vec![
        MockResponse::success(""), // terraform init
        MockResponse::success(""), // terraform plan
    ]);
    let runner = MockRunner::new().with_responses(responses);
    let prompter = ScriptedPrompter::new().with_confirm("apply-infrastructure", false);

    let report = ProvisionOrchestrator::new(
        Arc::new(runner.clone()),
        Arc::new(prompter.clone()),
        domain_settings(dir.path()),
    )
    .run()
    .await
    .unwrap();

    // A declined checkpoint is a clean halt, not a failure.
    assert_eq!(
        report.outcome,
        RunOutcome::HaltedByUser {
            gate: GateId::ApplyInfrastructure
        }
    );
    assert_eq!(report.stage, Stage::Planned);
    assert!(report.user_halted());
    assert!(report.outputs.is_empty());

    // Apply and the output query never ran.
    let terraform_calls = runner.calls_to("terraform");
    assert_eq!(terraform_calls.len(), 2);
    assert_eq!(terraform_calls[0].args[0], "init");
    assert_eq!(terraform_calls[1].args[0], "plan");

    // Zero control-plane calls beyond identity resolution.
    assert_eq!(runner.calls_to("az").len(), 2);

    // Only the apply gate was asked.
    assert_eq!(prompter.ask_count(), 1);
}

#[tokio::test]
async fn test_declined_dns_gate_reports_gate_and_keeps_outputs() {
    let dir = tempdir().unwrap();

    let mut responses = identity_responses();
    responses.extend(vec![
        MockResponse::success(""),          // init
        MockResponse::success(""),          // plan
        MockResponse::success(""),          // apply
        MockResponse::success(RAW_OUTPUTS), // output -json
        MockResponse::success("TOKEN42\n"), // webapp show
    ]);
    let runner = MockRunner::new().with_responses(responses);
    let prompter = ScriptedPrompter::new()
        .with_confirm("apply-infrastructure", true)
        .with_confirm("dns-records-created", false);

    let report = ProvisionOrchestrator::new(
        Arc::new(runner.clone()),
        Arc::new(prompter),
        domain_settings(dir.path()),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(
        report.outcome,
        RunOutcome::HaltedByUser {
            gate: GateId::DnsRecordsCreated
        }
    );
    assert_eq!(report.stage, Stage::OutputsCaptured);
    assert_eq!(report.outputs.len(), 6);

    // No binding step ran after the declined gate.
    assert_eq!(runner.calls_to("az").len(), 3); // identity + verification id
}

#[tokio::test]
async fn test_failed_init_aborts_before_apply_gate() {
    let dir = tempdir().unwrap();

    let mut responses = identity_responses();
    responses.push(MockResponse::failure(1, "backend unreachable")); // init
    let runner = MockRunner::new().with_responses(responses);
    let prompter = ScriptedPrompter::new();

    let failure = ProvisionOrchestrator::new(
        Arc::new(runner.clone()),
        Arc::new(prompter.clone()),
        domain_settings(dir.path()),
    )
    .run()
    .await
    .unwrap_err();

    assert_eq!(failure.stage, Stage::ArtifactsWritten);
    assert!(matches!(
        failure.source,
        StepError::Iac(IacError::InitFailed(1))
    ));

    // The run never reached the gate or any later engine call.
    assert_eq!(prompter.ask_count(), 0);
    assert_eq!(runner.calls_to("terraform").len(), 1);
}

#[tokio::test]
async fn test_missing_outputs_fail_the_post_provision_chain() {
    let dir = tempdir().unwrap();

    let mut responses = identity_responses();
    responses.extend(vec![
        MockResponse::success(""),              // init
        MockResponse::success(""),              // plan
        MockResponse::success(""),              // apply
        MockResponse::failure(1, "no outputs"), // output -json degrades to empty
    ]);
    let runner = MockRunner::new().with_responses(responses);
    let prompter = ScriptedPrompter::new().with_confirm("apply-infrastructure", true);

    let failure = ProvisionOrchestrator::new(
        Arc::new(runner.clone()),
        Arc::new(prompter),
        domain_settings(dir.path()),
    )
    .run()
    .await
    .unwrap_err();

    // The chain failed fast on the first missing field, before any
    // control-plane call was issued.
    assert_eq!(failure.stage, Stage::OutputsCaptured);
    assert!(matches!(failure.source, StepError::Configure(_)));
    assert_eq!(runner.calls_to("az").len(), 2);
}

#[tokio::test]
async fn test_run_without_domain_skips_chain_and_completes() {
    let dir = tempdir().unwrap();

    let mut responses = identity_responses();
    responses.extend(vec![
        MockResponse::success(""),          // init
        MockResponse::success(""),          // plan
        MockResponse::success(""),          // apply
        MockResponse::success(RAW_OUTPUTS), // output -json
    ]);
    let runner = MockRunner::new().with_responses(responses);
    let prompter = ScriptedPrompter::new().with_confirm("apply-infrastructure", true);

    let settings = SessionSettings::new("demo", ReferenceArchitecture::SecureAml, dir.path());
    let report = ProvisionOrchestrator::new(Arc::new(runner.clone()), Arc::new(prompter), settings)
        .run()
        .await
        .unwrap();

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.stage, Stage::Complete);
    assert_eq!(report.outputs.len(), 6);

    // No control-plane call beyond identity resolution.
    assert_eq!(runner.calls_to("az").len(), 2);
}
