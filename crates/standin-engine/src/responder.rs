// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned responses: the bypass-keyword acknowledgement and the evasive
//! deferral pool used when a message is sensitive.

use rand::seq::SliceRandom;

/// Fixed acknowledgement for bypass-keyword test messages.
pub const BYPASS_TEST_RESPONSE: &str =
    "Test received, everything is wired up and running 👌";

/// Short non-committal deferrals for sensitive topics.
///
/// All of them buy time without taking a position; delivery still happens
/// so the silence itself does not leak that the topic was flagged.
pub const EVASIVE_RESPONSES: [&str; 10] = [
    "Let's talk about it later 👍",
    "I'll take a look at that later",
    "Let me think about it and get back to you",
    "Better to discuss that in person",
    "I'll review it and come back to you",
    "Can we pick this up later today?",
    "Let me check a couple of things first",
    "I'd rather go over that one on a call",
    "Give me a bit, I'll get back to you on that",
    "Noted, let me come back to you on this one",
];

/// Pick one deferral uniformly at random.
pub fn pick_evasive_response() -> String {
    let mut rng = rand::thread_rng();
    EVASIVE_RESPONSES
        .choose(&mut rng)
        .copied()
        .unwrap_or(EVASIVE_RESPONSES[0])
        .to_string()
}

/// Case-insensitive substring check for the bypass keyword.
pub fn contains_bypass_keyword(text: &str, keyword: &str) -> bool {
    !keyword.is_empty() && text.to_lowercase().contains(&keyword.to_lowercase())
}
