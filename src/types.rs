//! Core types and structures for invite-forge

use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{InviteForgeError, Result};

/// Placeholder substituted with the candidate code in the lookup URL template
pub const CODE_PLACEHOLDER: &str = "{code}";

/// The public invite lookup endpoint
pub const DEFAULT_INVITE_URL: &str =
    "https://discord.com/api/v9/invites/{code}?with_counts=true&with_expiration=true";

/// Default rate-limit backoff in seconds
pub const DEFAULT_TIMEOUT_DELAY_SECS: u64 = 5;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Default user agent for lookup requests
pub const DEFAULT_USER_AGENT: &str = concat!("invite-forge/", env!("CARGO_PKG_VERSION"));

/// Community the invite points into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub nsfw: bool,
}

/// Creator of the invite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inviter {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
}

/// A confirmed invite, as returned by the lookup endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
    pub code: String,
    /// `None` for invites that never expire
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub guild: Option<Guild>,
    #[serde(default)]
    pub inviter: Option<Inviter>,
}

impl Invite {
    /// Whether the invite's community is flagged as sensitive
    pub fn is_nsfw(&self) -> bool {
        self.guild.as_ref().is_some_and(|g| g.nsfw)
    }
}

/// Order in which proxy transports are cycled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxySelection {
    #[default]
    InOrder,
    Reverse,
    Random,
}

impl std::fmt::Display for ProxySelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProxySelection::InOrder => write!(f, "in_order"),
            ProxySelection::Reverse => write!(f, "reverse"),
            ProxySelection::Random => write!(f, "random"),
        }
    }
}

impl FromStr for ProxySelection {
    type Err = InviteForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "in_order" | "inorder" | "order" => Ok(Self::InOrder),
            "reverse" | "reversed" => Ok(Self::Reverse),
            "random" | "shuffle" => Ok(Self::Random),
            other => Err(InviteForgeError::validation(format!(
                "unknown proxy selection '{}', expected 'in_order', 'reverse' or 'random'",
                other
            ))),
        }
    }
}

/// Run configuration, built once at startup and passed to the generator and engine
#[derive(Debug, Clone)]
pub struct BruteConfig {
    /// Lookup URL containing exactly one `{code}` placeholder
    pub invite_url: String,
    /// Proxy endpoints; empty means direct egress
    pub proxies: Vec<Url>,
    pub proxy_selection: ProxySelection,
    /// How long a rate-limited path rests before reuse
    pub timeout_delay: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Number of candidate codes to generate
    pub code_count: usize,
    /// Inclusive lower bound on code length
    pub min_length: usize,
    /// Exclusive upper bound on code length
    pub max_length: usize,
}

impl Default for BruteConfig {
    fn default() -> Self {
        Self {
            invite_url: DEFAULT_INVITE_URL.to_string(),
            proxies: Vec::new(),
            proxy_selection: ProxySelection::InOrder,
            timeout_delay: Duration::from_secs(DEFAULT_TIMEOUT_DELAY_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            code_count: 10,
            min_length: 5,
            max_length: 10,
        }
    }
}

impl BruteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_invite_url(mut self, url: impl Into<String>) -> Self {
        self.invite_url = url.into();
        self
    }

    pub fn with_proxies(mut self, proxies: Vec<Url>) -> Self {
        self.proxies = proxies;
        self
    }

    pub fn with_proxy_selection(mut self, selection: ProxySelection) -> Self {
        self.proxy_selection = selection;
        self
    }

    pub fn with_timeout_delay(mut self, delay: Duration) -> Self {
        self.timeout_delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_code_count(mut self, count: usize) -> Self {
        self.code_count = count;
        self
    }

    pub fn with_length_range(mut self, min_length: usize, max_length: usize) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    /// Check the settings that would otherwise fail mid-run
    pub fn validate(&self) -> Result<()> {
        let placeholders = self.invite_url.matches(CODE_PLACEHOLDER).count();
        if placeholders != 1 {
            return Err(crate::config_error!(
                "invite url must contain exactly one {} placeholder, found {}",
                CODE_PLACEHOLDER,
                placeholders
            ));
        }

        if self.max_length <= self.min_length {
            return Err(crate::validation_error!(
                "max_length ({}) must be greater than min_length ({})",
                self.max_length,
                self.min_length
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(crate::config_error!("request timeout must be non-zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_selection_parse() {
        assert_eq!("in_order".parse::<ProxySelection>().unwrap(), ProxySelection::InOrder);
        assert_eq!("Reverse".parse::<ProxySelection>().unwrap(), ProxySelection::Reverse);
        assert_eq!("random".parse::<ProxySelection>().unwrap(), ProxySelection::Random);
        assert_eq!("in-order".parse::<ProxySelection>().unwrap(), ProxySelection::InOrder);
        assert!("sideways".parse::<ProxySelection>().is_err());
    }

    #[test]
    fn test_proxy_selection_display_roundtrips() {
        for selection in [ProxySelection::InOrder, ProxySelection::Reverse, ProxySelection::Random] {
            assert_eq!(selection.to_string().parse::<ProxySelection>().unwrap(), selection);
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = BruteConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.proxies.is_empty());
        assert_eq!(config.timeout_delay, Duration::from_secs(DEFAULT_TIMEOUT_DELAY_SECS));
    }

    #[test]
    fn test_config_rejects_bad_placeholder_count() {
        let config = BruteConfig::new().with_invite_url("https://example.com/invites/");
        assert!(matches!(config.validate(), Err(InviteForgeError::Config { .. })));

        let config = BruteConfig::new().with_invite_url("https://example.com/{code}/{code}");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_empty_length_range() {
        let config = BruteConfig::new().with_length_range(6, 6);
        assert!(matches!(config.validate(), Err(InviteForgeError::Validation { .. })));
    }

    #[test]
    fn test_invite_decodes_lookup_payload() {
        let body = r#"{
            "code": "paevz3qZ",
            "type": 0,
            "expires_at": null,
            "created_at": "2023-04-01T10:20:30.123000+00:00",
            "guild": {"id": "1234", "name": "Rustaceans", "nsfw": false, "nsfw_level": 0},
            "inviter": {"id": "99", "username": "ferris", "discriminator": "0"},
            "approximate_member_count": 42
        }"#;

        let invite: Invite = serde_json::from_str(body).unwrap();
        assert_eq!(invite.code, "paevz3qZ");
        assert!(invite.expires_at.is_none());
        assert!(invite.created_at.is_some());
        assert_eq!(invite.guild.as_ref().unwrap().name, "Rustaceans");
        assert_eq!(invite.inviter.as_ref().unwrap().username, "ferris");
        assert!(!invite.is_nsfw());
    }

    #[test]
    fn test_invite_without_inviter() {
        let body = r#"{"code": "abc12", "guild": {"id": "1", "name": "n", "nsfw": true}}"#;
        let invite: Invite = serde_json::from_str(body).unwrap();
        assert!(invite.inviter.is_none());
        assert!(invite.is_nsfw());
    }
}
