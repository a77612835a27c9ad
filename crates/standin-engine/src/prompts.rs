// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt construction for the pipeline's analysis and generation stages.
//!
//! The three analysis prompts demand strict JSON; the parse layer in
//! `analysis` handles models that wrap it in prose anyway.

use standin_core::types::{ChatMessage, UrgencyAssessment, UrgencyLevel};
use standin_core::CompletionRequest;

/// Who the responder writes as.
#[derive(Debug, Clone)]
pub struct Persona {
    pub name: String,
    pub role: String,
    pub company: Option<String>,
}

impl Persona {
    fn identity(&self) -> String {
        match &self.company {
            Some(company) => format!("{}, {} at {}", self.name, self.role, company),
            None => format!("{}, {}", self.name, self.role),
        }
    }
}

fn sender_label(message: &ChatMessage) -> &str {
    message.user_name.as_deref().unwrap_or(&message.user_id)
}

fn channel_label(message: &ChatMessage) -> &str {
    message.channel_name.as_deref().unwrap_or(&message.channel_id)
}

/// Urgency evaluation request.
pub fn urgency_request(
    persona: &Persona,
    message: &ChatMessage,
    channel_context: &str,
) -> CompletionRequest {
    let system = format!(
        "You assess the urgency of workplace chat messages sent to {identity}. \
         Weigh: business impact, how quickly a reply is expected, whether other \
         people are blocked waiting, how critical the channel is, the type of \
         request, and the sender's role. \
         Reply with strict JSON only, no prose: \
         {{\"urgency_level\": \"low\"|\"medium\"|\"high\", \
         \"urgency_score\": <0.0-1.0>, \
         \"urgency_factors\": [\"...\"], \
         \"reasoning\": \"...\"}}",
        identity = persona.identity(),
    );
    let user = format!(
        "Channel: #{channel}\nSender: {sender}\n\nRecent conversation:\n{channel_context}\n\n\
         Message to assess:\n{text}",
        channel = channel_label(message),
        sender = sender_label(message),
        text = message.text,
    );
    CompletionRequest { system, user }
}

/// Directness / requires-response analysis request.
pub fn directness_request(
    persona: &Persona,
    message: &ChatMessage,
    channel_context: &str,
) -> CompletionRequest {
    let system = format!(
        "You decide whether a workplace chat message is addressed to {identity} \
         and whether it needs a reply from them. A message is direct when it \
         mentions them, asks them something, or clearly expects their input. \
         Reply with strict JSON only, no prose: \
         {{\"is_direct\": true|false, \
         \"urgency\": \"low\"|\"medium\"|\"high\", \
         \"requires_response\": true|false, \
         \"reasoning\": \"...\"}}",
        identity = persona.identity(),
    );
    let user = format!(
        "Channel: #{channel}\nSender: {sender}\n\nRecent conversation:\n{channel_context}\n\n\
         Message to analyze:\n{text}",
        channel = channel_label(message),
        sender = sender_label(message),
        text = message.text,
    );
    CompletionRequest { system, user }
}

/// Sensitivity classification request.
///
/// Screens the surrounding conversation along with the message itself; a
/// bland message can still land in the middle of a heated thread.
pub fn sensitivity_request(
    persona: &Persona,
    message: &ChatMessage,
    channel_context: &str,
) -> CompletionRequest {
    let system = format!(
        "You screen workplace chat messages sent to {identity} for sensitive \
         topics: personnel matters, compensation, legal exposure, confidential \
         business decisions, conflicts between people. \
         Reply with strict JSON only, no prose: \
         {{\"is_sensitive\": true|false, \
         \"sensitivity_level\": \"low\"|\"medium\"|\"high\", \
         \"sensitivity_factors\": [\"...\"], \
         \"reasoning\": \"...\"}}",
        identity = persona.identity(),
    );
    let user = format!(
        "Recent conversation:\n{channel_context}\n\nMessage to screen:\n{text}",
        text = message.text,
    );
    CompletionRequest { system, user }
}

/// Reply generation request.
///
/// The system prompt pins the voice to the persona and bans assistant-like
/// phrasing; the urgency level modulates tone.
pub fn generation_request(
    persona: &Persona,
    message: &ChatMessage,
    channel_context: &str,
    style_examples: &str,
    urgency: &UrgencyAssessment,
) -> CompletionRequest {
    let tone = match urgency.urgency_level {
        UrgencyLevel::High => "Reply promptly and concretely; commit to a next step.",
        UrgencyLevel::Medium => "Reply helpfully but without dramatics.",
        UrgencyLevel::Low => "Reply briefly and casually; no pressure.",
    };
    let system = format!(
        "You are {identity}, replying in your own workplace chat. Write exactly \
         as you do in the style examples: same length, same register, first \
         person. Never sound like an assistant: no greetings-plus-offer-of-help, \
         no bullet lists, no signatures, never mention being an AI or a bot. \
         {tone}",
        identity = persona.identity(),
    );
    let user = format!(
        "Recent conversation in #{channel}:\n{channel_context}\n\n\
         Examples of how you write:\n{style_examples}\n\n\
         Urgency assessment: {level} ({score:.2}) - {reasoning}\n\n\
         {sender} wrote:\n{text}\n\nYour reply:",
        channel = channel_label(message),
        level = urgency.urgency_level,
        score = urgency.urgency_score,
        reasoning = urgency.reasoning,
        sender = sender_label(message),
        text = message.text,
    );
    CompletionRequest { system, user }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persona() -> Persona {
        Persona {
            name: "Madim".into(),
            role: "CTO".into(),
            company: Some("Acme".into()),
        }
    }

    fn message() -> ChatMessage {
        ChatMessage {
            provider_message_id: "m1".into(),
            team_id: "T1".into(),
            channel_id: "C1".into(),
            channel_name: Some("incidents".into()),
            user_id: "U9".into(),
            user_name: Some("Priya".into()),
            text: "prod deploy is failing, can you look?".into(),
            kind: "message".into(),
            subtype: None,
            ts: "1700000000.000100".into(),
            thread_ts: None,
            client_msg_id: None,
            is_bot: false,
            is_ai_generated: false,
            created_at: "2026-01-15T10:00:00.000Z".into(),
        }
    }

    #[test]
    fn urgency_prompt_names_the_rubric_and_contract() {
        let req = urgency_request(&persona(), &message(), "No prior messages.");
        assert!(req.system.contains("Madim, CTO at Acme"));
        assert!(req.system.contains("blocked"));
        assert!(req.system.contains("urgency_level"));
        assert!(req.user.contains("#incidents"));
        assert!(req.user.contains("Priya"));
        assert!(req.user.contains("prod deploy is failing"));
    }

    #[test]
    fn generation_prompt_embeds_all_blocks() {
        let urgency = UrgencyAssessment {
            urgency_level: UrgencyLevel::High,
            urgency_score: 0.9,
            urgency_factors: vec!["deploy blocked".into()],
            reasoning: "production impact".into(),
        };
        let req = generation_request(
            &persona(),
            &message(),
            "[Priya]: the deploy broke",
            "Example of your style (2026-01-10): on it, give me 5",
            &urgency,
        );
        assert!(req.system.contains("never mention being an AI"));
        assert!(req.system.contains("promptly"));
        assert!(req.user.contains("[Priya]: the deploy broke"));
        assert!(req.user.contains("on it, give me 5"));
        assert!(req.user.contains("high (0.90)"));
    }

    #[test]
    fn identity_without_company_omits_it() {
        let p = Persona {
            name: "Dana".into(),
            role: "VP".into(),
            company: None,
        };
        let req = sensitivity_request(&p, &message(), "No prior messages.");
        assert!(req.system.contains("Dana, VP"));
        assert!(!req.system.contains(" at "));
    }

    #[test]
    fn sensitivity_prompt_screens_the_conversation_too() {
        let req = sensitivity_request(
            &persona(),
            &message(),
            "[Priya]: I'm done covering for him\n[Sam]: take it offline",
        );
        assert!(req.user.contains("I'm done covering for him"));
        assert!(req.user.contains("Message to screen:\nprod deploy is failing"));
    }
}
