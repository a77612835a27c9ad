// SPDX-FileCopyrightText: 2026 Standin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User directory: users.info lookups with caching and mention resolution.
//!
//! Two caches: resolved profiles, and ids Slack reported as unknown. The
//! not-found cache stops us from re-asking the API for deleted users on
//! every message they are mentioned in.

use std::sync::OnceLock;

use dashmap::{DashMap, DashSet};
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

const SLACK_API_BASE: &str = "https://slack.com/api";

fn user_mention_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<@([A-Z0-9]+)>").expect("valid literal regex"))
}

fn channel_mention_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<#([A-Z0-9]+)\|([^>]+)>").expect("valid literal regex"))
}

/// A cached slice of a Slack user record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub profile: ProfileFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFields {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
}

impl UserProfile {
    /// Best human-facing name, in priority order, falling back to the id.
    pub fn best_display_name(&self) -> &str {
        let candidates = [
            self.profile.first_name.as_deref(),
            self.name.as_deref(),
            self.profile.display_name.as_deref(),
            self.real_name.as_deref(),
        ];
        candidates
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Deserialize)]
struct UsersInfoResponse {
    ok: bool,
    #[serde(default)]
    user: Option<UserProfile>,
    #[serde(default)]
    error: Option<String>,
}

/// users.info lookups with per-process caching.
pub struct UserDirectory {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
    cache: DashMap<String, UserProfile>,
    not_found: DashSet<String>,
}

impl UserDirectory {
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: SLACK_API_BASE.to_string(),
            cache: DashMap::new(),
            not_found: DashSet::new(),
        }
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Look up a user's profile, hitting the API at most once per id.
    ///
    /// Returns `None` when the user is unknown, the token is missing, or
    /// the API call fails; failures are logged, never raised.
    pub async fn profile(&self, user_id: &str) -> Option<UserProfile> {
        if let Some(hit) = self.cache.get(user_id) {
            return Some(hit.clone());
        }
        if self.not_found.contains(user_id) {
            return None;
        }
        let token = self.token.as_ref()?;

        let url = format!("{}/users.info", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[("user", user_id)])
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                warn!(user_id, error = %e, "users.info request failed");
                return None;
            }
        };

        let body: UsersInfoResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                warn!(user_id, error = %e, "users.info response unreadable");
                return None;
            }
        };

        if !body.ok {
            let error = body.error.unwrap_or_default();
            if error == "user_not_found" {
                debug!(user_id, "user unknown, caching not-found");
                self.not_found.insert(user_id.to_string());
            } else {
                warn!(user_id, error = %error, "users.info returned an error");
            }
            return None;
        }

        let profile = body.user?;
        self.cache.insert(user_id.to_string(), profile.clone());
        Some(profile)
    }

    /// Best display name for a user, or `None` when unresolvable.
    pub async fn display_name(&self, user_id: &str) -> Option<String> {
        self.profile(user_id)
            .await
            .map(|p| p.best_display_name().to_string())
    }

    /// Replace `<@UID>` and `<#CID|name>` mentions with readable names.
    ///
    /// Unresolvable user mentions are left untouched.
    pub async fn resolve_mentions(&self, text: &str) -> String {
        let mut resolved = text.to_string();

        let user_ids: Vec<String> = user_mention_re()
            .captures_iter(text)
            .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
            .collect();
        for user_id in user_ids {
            if let Some(name) = self.display_name(&user_id).await {
                resolved = resolved.replace(&format!("<@{user_id}>"), &format!("@{name}"));
            }
        }

        channel_mention_re()
            .replace_all(&resolved, "#$2")
            .into_owned()
    }
}
