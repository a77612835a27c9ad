// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack request signature verification.
//!
//! Slack signs each webhook POST with HMAC-SHA256 over
//! `v0:{timestamp}:{body}` and sends the hex digest in
//! `X-Slack-Signature` as `v0=<hex>`. Requests older than five minutes
//! are rejected before any signature math to blunt replays.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted skew between the signed timestamp and our clock.
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

/// Check the signed timestamp against `now_epoch` (unix seconds).
///
/// Unparseable timestamps fail closed.
pub fn timestamp_in_window(timestamp: &str, now_epoch: i64) -> bool {
    timestamp
        .parse::<i64>()
        .map(|t| (now_epoch - t).abs() <= TIMESTAMP_TOLERANCE_SECS)
        .unwrap_or(false)
}

/// Verify a `v0=` signature over the raw request body.
///
/// Uses the HMAC's own constant-time comparison.
pub fn verify_signature(secret: &str, timestamp: &str, body: &str, signature: &str) -> bool {
    let Some(hex_digest) = signature.strip_prefix("v0=") else {
        return false;
    };
    let Ok(expected) = hex::decode(hex_digest) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(format!("v0:{timestamp}:{body}").as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// Produce a valid `v0=` signature. Test helper for handler tests.
#[cfg(test)]
pub fn sign(secret: &str, timestamp: &str, body: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac accepts any key size");
    mac.update(format!("v0:{timestamp}:{body}").as_bytes());
    format!("v0={}", hex::encode(mac.finalize().into_bytes()))
}
