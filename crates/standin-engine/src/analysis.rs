// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed JSON extraction from model output, with per-stage fallbacks.
//!
//! Every analysis stage speaks a small JSON contract. Models sometimes wrap
//! the object in prose or fences, so extraction scans for the outermost
//! object before parsing. A stage that cannot produce a typed result falls
//! back to a conservative default; the cause (no provider, timeout, provider
//! error, unparseable output) is kept distinct in logs and in the fallback's
//! reasoning.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use standin_core::types::{
    DirectnessAssessment, SensitivityAssessment, SensitivityLevel, UrgencyAssessment, UrgencyLevel,
};
use standin_core::{CompletionProvider, CompletionRequest};

/// Why a stage fell back to its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackCause {
    /// No completion provider is configured.
    NoProvider,
    /// The provider call exceeded the stage timeout.
    Timeout,
    /// The provider returned an error.
    ProviderError(String),
    /// The provider answered but no JSON object could be parsed from it.
    ParseError(String),
}

impl std::fmt::Display for FallbackCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackCause::NoProvider => write!(f, "analysis unavailable: no provider configured"),
            FallbackCause::Timeout => write!(f, "analysis timed out"),
            FallbackCause::ProviderError(e) => write!(f, "provider error: {e}"),
            FallbackCause::ParseError(e) => write!(f, "unparseable model output: {e}"),
        }
    }
}

/// Extract the outermost JSON object from model output.
///
/// Returns the substring from the first `{` to the last `}`, which tolerates
/// leading prose and markdown fences around the object.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse a stage contract out of raw model output.
pub fn parse_stage_output<T: DeserializeOwned>(text: &str) -> Result<T, FallbackCause> {
    let object = extract_json_object(text)
        .ok_or_else(|| FallbackCause::ParseError("no JSON object in output".to_string()))?;
    serde_json::from_str(object).map_err(|e| FallbackCause::ParseError(e.to_string()))
}

/// Runs analysis-stage completions and maps failures to typed fallbacks.
pub struct Analyzer {
    provider: Option<Arc<dyn CompletionProvider>>,
    timeout: Duration,
}

impl Analyzer {
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// One bounded completion call, or the cause why it produced nothing.
    async fn call(&self, request: CompletionRequest) -> Result<String, FallbackCause> {
        let provider = self.provider.as_ref().ok_or(FallbackCause::NoProvider)?;
        match tokio::time::timeout(self.timeout, provider.complete(request)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(FallbackCause::ProviderError(e.to_string())),
            Err(_) => Err(FallbackCause::Timeout),
        }
    }

    async fn call_json<T: DeserializeOwned>(
        &self,
        stage: &str,
        request: CompletionRequest,
    ) -> Result<T, FallbackCause> {
        let text = self.call(request).await?;
        match parse_stage_output(&text) {
            Ok(value) => {
                debug!(stage, "stage output parsed");
                Ok(value)
            }
            Err(cause) => {
                warn!(stage, %cause, raw = %text, "stage output rejected");
                Err(cause)
            }
        }
    }

    /// Urgency stage. Falls back to low urgency with the cause recorded.
    pub async fn assess_urgency(&self, request: CompletionRequest) -> UrgencyAssessment {
        match self.call_json("urgency", request).await {
            Ok(assessment) => assessment,
            Err(cause) => {
                warn!(stage = "urgency", %cause, "falling back to default assessment");
                urgency_fallback(&cause.to_string())
            }
        }
    }

    /// Directness stage. Falls back to "not direct, no response needed".
    pub async fn assess_directness(&self, request: CompletionRequest) -> DirectnessAssessment {
        match self.call_json("directness", request).await {
            Ok(assessment) => assessment,
            Err(cause) => {
                warn!(stage = "directness", %cause, "falling back to default assessment");
                directness_fallback(&cause.to_string())
            }
        }
    }

    /// Sensitivity stage. Falls back to "not sensitive".
    pub async fn assess_sensitivity(&self, request: CompletionRequest) -> SensitivityAssessment {
        match self.call_json("sensitivity", request).await {
            Ok(assessment) => assessment,
            Err(cause) => {
                warn!(stage = "sensitivity", %cause, "falling back to default assessment");
                sensitivity_fallback(&cause.to_string())
            }
        }
    }

    /// Generation stage: raw completion text, no JSON contract.
    ///
    /// Returns `None` when no reply can be generated; the caller decides
    /// whether that skips delivery.
    pub async fn generate(&self, request: CompletionRequest) -> Option<String> {
        match self.call(request).await {
            Ok(text) => Some(text.trim().to_string()),
            Err(cause) => {
                warn!(stage = "generation", %cause, "no reply generated");
                None
            }
        }
    }
}

/// Conservative urgency default: low, with the cause as the only factor.
pub fn urgency_fallback(cause: &str) -> UrgencyAssessment {
    UrgencyAssessment {
        urgency_level: UrgencyLevel::Low,
        urgency_score: 0.1,
        urgency_factors: vec![cause.to_string()],
        reasoning: cause.to_string(),
    }
}

/// Conservative directness default: never respond on missing analysis.
pub fn directness_fallback(cause: &str) -> DirectnessAssessment {
    DirectnessAssessment {
        is_direct: false,
        urgency: UrgencyLevel::Low,
        requires_response: false,
        reasoning: cause.to_string(),
    }
}

/// Conservative sensitivity default: not sensitive.
///
/// Missing sensitivity analysis must not block an already-made respond
/// decision, so the default is permissive rather than evasive.
pub fn sensitivity_fallback(cause: &str) -> SensitivityAssessment {
    SensitivityAssessment {
        is_sensitive: false,
        sensitivity_level: SensitivityLevel::Low,
        sensitivity_factors: vec![],
        reasoning: cause.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_object_from_fenced_output() {
        let text = "Sure, here you go:\n```json\n{\"is_direct\": true}\n```\nanything else?";
        assert_eq!(extract_json_object(text), Some("{\"is_direct\": true}"));
    }

    #[test]
    fn extraction_fails_without_braces() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn parses_urgency_contract() {
        let text = r#"{"urgency_level": "high", "urgency_score": 0.92,
                       "urgency_factors": ["deploy blocked"], "reasoning": "prod impact"}"#;
        let parsed: UrgencyAssessment = parse_stage_output(text).unwrap();
        assert_eq!(parsed.urgency_level, UrgencyLevel::High);
        assert_eq!(parsed.urgency_score, 0.92);
        assert_eq!(parsed.urgency_factors, vec!["deploy blocked"]);
    }

    #[test]
    fn parse_failure_reports_cause() {
        let err = parse_stage_output::<UrgencyAssessment>("{\"urgency_level\": \"loud\"}")
            .unwrap_err();
        assert!(matches!(err, FallbackCause::ParseError(_)));
    }

    #[test]
    fn fallbacks_are_conservative() {
        let urgency = urgency_fallback("analysis timed out");
        assert_eq!(urgency.urgency_level, UrgencyLevel::Low);
        assert_eq!(urgency.urgency_score, 0.1);
        assert_eq!(urgency.urgency_factors, vec!["analysis timed out"]);

        let directness = directness_fallback("no provider configured");
        assert!(!directness.is_direct);
        assert!(!directness.requires_response);

        let sensitivity = sensitivity_fallback("no provider configured");
        assert!(!sensitivity.is_sensitive);
        assert!(!sensitivity.requires_evasion());
    }

    #[tokio::test]
    async fn analyzer_without_provider_returns_fallbacks() {
        let analyzer = Analyzer::new(None, Duration::from_secs(1));
        let request = CompletionRequest {
            system: "s".into(),
            user: "u".into(),
        };

        let urgency = analyzer.assess_urgency(request.clone()).await;
        assert_eq!(urgency.urgency_level, UrgencyLevel::Low);
        assert!(urgency.reasoning.contains("no provider"));

        let directness = analyzer.assess_directness(request.clone()).await;
        assert!(!directness.requires_response);

        assert!(analyzer.generate(request).await.is_none());
    }
}
