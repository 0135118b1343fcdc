//! The fixed provisioning pipeline.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use caravel_cloud::{
    AzureControlPlane, ConfigureOutcome, ConfigureStep, IdentityResolver,
    PostProvisionConfigurator,
};
use caravel_iac::{ArtifactWriter, ProvisioningOutputs, TerraformCli, VARS_FILE};
use caravel_prompt::{CheckpointGate, GateId, Prompter};
use caravel_runner::ProcessRunner;

use crate::context::SessionSettings;
use crate::error::{CoreResult, ProvisionFailure};
use crate::stage::Stage;

/// How a run ended, short of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum RunOutcome {
    /// The full pipeline ran to the end.
    Completed,
    /// The operator declined a checkpoint; the guarded branch was skipped.
    HaltedByUser { gate: GateId },
}

/// Summary of a provisioning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub project_name: String,
    /// Last stage the run reached
    pub stage: Stage,
    pub outcome: RunOutcome,
    /// Outputs captured after apply (empty if apply never ran)
    pub outputs: ProvisioningOutputs,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Check if the run was halted by an operator decision.
    pub fn user_halted(&self) -> bool {
        matches!(self.outcome, RunOutcome::HaltedByUser { .. })
    }
}

/// Drives the fixed pipeline:
///
/// Resolve Identity → Write IaC Artifacts → Init → Plan → Gate(apply?) →
/// [Apply → Capture Outputs → Post-Configure → Gate(domain done?) →
/// remaining binding steps].
///
/// Fully sequential; the only cancellation points are the two gates.
pub struct ProvisionOrchestrator {
    settings: SessionSettings,
    resolver: IdentityResolver,
    writer: ArtifactWriter,
    terraform: TerraformCli,
    configurator: PostProvisionConfigurator,
    gate: CheckpointGate,
}

impl ProvisionOrchestrator {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        prompter: Arc<dyn Prompter>,
        settings: SessionSettings,
    ) -> Self {
        let resolver = IdentityResolver::new(runner.clone(), prompter.clone())
            .with_login_tenant(settings.login_tenant.clone());
        let writer = ArtifactWriter::new(&settings.working_dir);
        let terraform = TerraformCli::new(runner.clone(), &settings.working_dir);
        let configurator = PostProvisionConfigurator::new(
            AzureControlPlane::new(runner),
            &settings.working_dir,
        );
        let gate = CheckpointGate::new(prompter);

        Self {
            settings,
            resolver,
            writer,
            terraform,
            configurator,
            gate,
        }
    }

    /// Run the pipeline to completion, a clean user halt, or failure.
    pub async fn run(mut self) -> CoreResult<RunReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let mut stage = Stage::Idle;

        info!(
            "Starting provisioning run {} for '{}' ({})",
            run_id, self.settings.project_name, self.settings.architecture
        );

        let subscription = self
            .resolver
            .resolve()
            .await
            .map_err(|e| ProvisionFailure::new(stage, e))?;
        stage = advance(stage, Stage::IdentityResolved);

        self.writer
            .write(
                &subscription,
                &self.settings.project_name,
                self.settings.architecture.module_source(),
            )
            .map_err(|e| ProvisionFailure::new(stage, e))?;
        stage = advance(stage, Stage::ArtifactsWritten);

        self.terraform
            .init()
            .await
            .map_err(|e| ProvisionFailure::new(stage, e))?;
        stage = advance(stage, Stage::Initialized);

        self.terraform
            .plan(VARS_FILE)
            .await
            .map_err(|e| ProvisionFailure::new(stage, e))?;
        stage = advance(stage, Stage::Planned);

        let approved = self
            .gate
            .ask(
                GateId::ApplyInfrastructure,
                "The plan above will create billable cloud resources. Apply it?",
            )
            .map_err(|e| ProvisionFailure::new(stage, e))?;
        if !approved {
            info!("Apply checkpoint declined; halting before any changes");
            return Ok(self.report(
                run_id,
                stage,
                RunOutcome::HaltedByUser {
                    gate: GateId::ApplyInfrastructure,
                },
                ProvisioningOutputs::empty(),
                started_at,
            ));
        }

        self.terraform
            .apply(VARS_FILE)
            .await
            .map_err(|e| ProvisionFailure::new(stage, e))?;
        stage = advance(stage, Stage::Applied);

        let outputs = self.terraform.read_outputs().await;
        stage = advance(stage, Stage::OutputsCaptured);

        if let Some(binding) = self.settings.domain.clone() {
            match self
                .configurator
                .run(&mut self.gate, &binding, &outputs)
                .await
            {
                Ok(ConfigureOutcome::Completed) => {
                    for next in [
                        Stage::DomainConfigured,
                        Stage::CertificateBound,
                        Stage::EndpointUpdated,
                        Stage::VpnExported,
                    ] {
                        stage = advance(stage, next);
                    }
                }
                Ok(ConfigureOutcome::HaltedAtDnsGate) => {
                    return Ok(self.report(
                        run_id,
                        stage,
                        RunOutcome::HaltedByUser {
                            gate: GateId::DnsRecordsCreated,
                        },
                        outputs,
                        started_at,
                    ));
                }
                Err(e) => {
                    return Err(ProvisionFailure::new(stage_reached(e.step, stage), e));
                }
            }
        } else {
            debug!("No custom domain requested; skipping post-provision chain");
        }

        stage = advance(stage, Stage::Complete);
        info!("Provisioning run {} complete", run_id);
        Ok(self.report(run_id, stage, RunOutcome::Completed, outputs, started_at))
    }

    fn report(
        &self,
        run_id: Uuid,
        stage: Stage,
        outcome: RunOutcome,
        outputs: ProvisioningOutputs,
        started_at: DateTime<Utc>,
    ) -> RunReport {
        RunReport {
            run_id,
            project_name: self.settings.project_name.clone(),
            stage,
            outcome,
            outputs,
            started_at,
            finished_at: Utc::now(),
        }
    }
}

fn advance(current: Stage, next: Stage) -> Stage {
    debug_assert!(
        current.can_transition_to(next),
        "illegal stage transition {} -> {}",
        current,
        next
    );
    debug!("Stage {} -> {}", current, next);
    next
}

/// The stage a run had reached when a post-provision step failed.
fn stage_reached(step: ConfigureStep, before: Stage) -> Stage {
    match step {
        ConfigureStep::VerificationToken | ConfigureStep::DnsGate | ConfigureStep::BindHostname => {
            before
        }
        ConfigureStep::UploadCertificate
        | ConfigureStep::ResolveThumbprint
        | ConfigureStep::BindCertificate => Stage::DomainConfigured,
        ConfigureStep::UpdateEndpoint => Stage::CertificateBound,
        ConfigureStep::ExportVpnProfile => Stage::EndpointUpdated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caravel_prompt::{Answer, Answers, PromptResult, Question};
    use caravel_runner::{MockResponse, MockRunner};

    mockall::mock! {
        pub GatePrompter {}

        impl Prompter for GatePrompter {
            fn ask(&self, questions: &[Question]) -> PromptResult<Answers>;
        }
    }

    fn settings(dir: &std::path::Path) -> SessionSettings {
        SessionSettings::new(
            "demo",
            crate::context::ReferenceArchitecture::SecureAml,
            dir,
        )
    }

    #[tokio::test]
    async fn test_apply_gate_question_asked_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let runner = MockRunner::new().with_responses(vec![
            MockResponse::success("sub-123\n"), // account list
            MockResponse::success("sub-123\n"), // account show
            MockResponse::success(""),          // init
            MockResponse::success(""),          // plan
        ]);

        let mut prompter = MockGatePrompter::new();
        prompter
            .expect_ask()
            .times(1)
            .withf(|questions| {
                questions.len() == 1 && questions[0].name() == "apply-infrastructure"
            })
            .returning(|questions| {
                let mut answers = Answers::new();
                answers.insert(questions[0].name(), Answer::Bool(false));
                Ok(answers)
            });

        let orchestrator = ProvisionOrchestrator::new(
            Arc::new(runner),
            Arc::new(prompter),
            settings(dir.path()),
        );

        let report = orchestrator.run().await.unwrap();
        assert!(report.user_halted());
        assert_eq!(report.stage, Stage::Planned);
    }

    #[test]
    fn test_stage_reached_mapping() {
        let before = Stage::OutputsCaptured;
        assert_eq!(
            stage_reached(ConfigureStep::VerificationToken, before),
            Stage::OutputsCaptured
        );
        assert_eq!(
            stage_reached(ConfigureStep::ResolveThumbprint, before),
            Stage::DomainConfigured
        );
        assert_eq!(
            stage_reached(ConfigureStep::ExportVpnProfile, before),
            Stage::EndpointUpdated
        );
    }
}
