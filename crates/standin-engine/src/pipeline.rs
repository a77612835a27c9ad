// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The decision pipeline: a fixed-order stage machine.
//!
//! Stages run in a fixed order with one conditional branch after the
//! directness stage. The transition function is pure over the accumulated
//! run state, so routing is testable without any provider. Every stage is
//! fail-open: missing analysis degrades to its conservative fallback and the
//! run always reaches `Done`.
//!
//! ```text
//! GatherContext -> GatherStyle -> EvaluateUrgency -> AnalyzeDirectness
//!        --(bypass)--------------------------------> GenerateResponse -> Done
//!        |-(respond)-> CheckSensitivity ----^
//!        |-(skip)--------------------------------------------------------> Done
//! ```

use tracing::{debug, info};

use standin_core::types::{
    ChatMessage, DirectnessAssessment, SensitivityAssessment, UrgencyAssessment, UrgencyLevel,
};

use crate::analysis::Analyzer;
use crate::context::{format_channel_context, format_style_examples, ContextAssembler};
use crate::prompts::{
    directness_request, generation_request, sensitivity_request, urgency_request, Persona,
};
use crate::responder::{contains_bypass_keyword, pick_evasive_response, BYPASS_TEST_RESPONSE};

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    GatherContext,
    GatherStyle,
    EvaluateUrgency,
    AnalyzeDirectness,
    CheckSensitivity,
    GenerateResponse,
    Done,
}

/// Routing decision taken after the directness stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Respond after screening for sensitivity.
    Respond,
    /// Respond immediately, skipping the sensitivity screen (bypass keyword).
    RespondDirect,
    /// Do not respond.
    Skip,
}

/// Accumulated state of one pipeline run.
#[derive(Debug, Default)]
pub struct PipelineRun {
    pub channel_context: String,
    pub style_examples: String,
    pub urgency: Option<UrgencyAssessment>,
    pub directness: Option<DirectnessAssessment>,
    pub sensitivity: Option<SensitivityAssessment>,
    pub bypass: bool,
    pub response: Option<String>,
}

/// Final outcome handed to the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    /// Reply text, or `None` when the run decided not to respond.
    pub response: Option<String>,
    pub urgency: UrgencyLevel,
    pub bypass: bool,
}

/// Decide the route after the directness stage.
///
/// A reply is owed when the message is direct and needs one, or when it is
/// at least medium urgency and needs one.
pub fn route_after_directness(
    directness: &DirectnessAssessment,
    urgency: &UrgencyAssessment,
    bypass: bool,
) -> RouteDecision {
    if bypass {
        return RouteDecision::RespondDirect;
    }
    if !directness.requires_response {
        return RouteDecision::Skip;
    }
    let urgent = matches!(
        urgency.urgency_level,
        UrgencyLevel::Medium | UrgencyLevel::High
    );
    if directness.is_direct || urgent {
        RouteDecision::Respond
    } else {
        RouteDecision::Skip
    }
}

/// Pure transition function over the accumulated run state.
pub fn next_stage(stage: Stage, run: &PipelineRun) -> Stage {
    match stage {
        Stage::GatherContext => Stage::GatherStyle,
        Stage::GatherStyle => Stage::EvaluateUrgency,
        Stage::EvaluateUrgency => Stage::AnalyzeDirectness,
        Stage::AnalyzeDirectness => {
            let directness = run
                .directness
                .clone()
                .unwrap_or_else(|| crate::analysis::directness_fallback("stage skipped"));
            let urgency = run
                .urgency
                .clone()
                .unwrap_or_else(|| crate::analysis::urgency_fallback("stage skipped"));
            match route_after_directness(&directness, &urgency, run.bypass) {
                RouteDecision::Respond => Stage::CheckSensitivity,
                RouteDecision::RespondDirect => Stage::GenerateResponse,
                RouteDecision::Skip => Stage::Done,
            }
        }
        Stage::CheckSensitivity => Stage::GenerateResponse,
        Stage::GenerateResponse => Stage::Done,
        Stage::Done => Stage::Done,
    }
}

/// Runs the stage machine for one message.
pub struct Pipeline {
    context: ContextAssembler,
    analyzer: Analyzer,
    persona: Persona,
    bypass_keyword: String,
}

impl Pipeline {
    pub fn new(
        context: ContextAssembler,
        analyzer: Analyzer,
        persona: Persona,
        bypass_keyword: String,
    ) -> Self {
        Self {
            context,
            analyzer,
            persona,
            bypass_keyword,
        }
    }

    /// Run every stage for `message` and return the outcome.
    pub async fn run(&self, message: &ChatMessage) -> PipelineOutcome {
        let mut run = PipelineRun::default();
        let mut stage = Stage::GatherContext;

        while stage != Stage::Done {
            self.execute(stage, message, &mut run).await;
            let next = next_stage(stage, &run);
            debug!(?stage, ?next, "stage complete");
            stage = next;
        }

        let urgency = run
            .urgency
            .as_ref()
            .map(|u| u.urgency_level)
            .unwrap_or_default();
        info!(
            provider_message_id = %message.provider_message_id,
            responded = run.response.is_some(),
            %urgency,
            bypass = run.bypass,
            "pipeline run finished"
        );

        PipelineOutcome {
            response: run.response,
            urgency,
            bypass: run.bypass,
        }
    }

    async fn execute(&self, stage: Stage, message: &ChatMessage, run: &mut PipelineRun) {
        match stage {
            Stage::GatherContext => {
                let channel_messages = self.context.channel_context(message).await;
                run.channel_context = format_channel_context(&channel_messages);
            }
            Stage::GatherStyle => {
                let style_examples = self.context.style_examples().await;
                run.style_examples = format_style_examples(&style_examples);
            }
            Stage::EvaluateUrgency => {
                let request = urgency_request(&self.persona, message, &run.channel_context);
                run.urgency = Some(self.analyzer.assess_urgency(request).await);
            }
            Stage::AnalyzeDirectness => {
                if contains_bypass_keyword(&message.text, &self.bypass_keyword) {
                    run.bypass = true;
                    run.directness = Some(DirectnessAssessment {
                        is_direct: true,
                        urgency: UrgencyLevel::High,
                        requires_response: true,
                        reasoning: "bypass keyword".to_string(),
                    });
                } else {
                    let request =
                        directness_request(&self.persona, message, &run.channel_context);
                    run.directness = Some(self.analyzer.assess_directness(request).await);
                }
            }
            Stage::CheckSensitivity => {
                let request = sensitivity_request(&self.persona, message, &run.channel_context);
                run.sensitivity = Some(self.analyzer.assess_sensitivity(request).await);
            }
            Stage::GenerateResponse => {
                run.response = self.generate(message, run).await;
            }
            Stage::Done => {}
        }
    }

    async fn generate(&self, message: &ChatMessage, run: &PipelineRun) -> Option<String> {
        if run.bypass {
            return Some(BYPASS_TEST_RESPONSE.to_string());
        }
        if let Some(sensitivity) = &run.sensitivity {
            if sensitivity.requires_evasion() {
                info!(
                    provider_message_id = %message.provider_message_id,
                    sensitivity_level = %sensitivity.sensitivity_level,
                    "sensitive topic, sending deferral"
                );
                return Some(pick_evasive_response());
            }
        }
        let urgency = run
            .urgency
            .clone()
            .unwrap_or_else(|| crate::analysis::urgency_fallback("stage skipped"));
        let request = generation_request(
            &self.persona,
            message,
            &run.channel_context,
            &run.style_examples,
            &urgency,
        );
        self.analyzer.generate(request).await
    }
}
