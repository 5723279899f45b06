//! Outbound transports: one HTTP client per proxy endpoint, each with its own cooldown
//!
//! Handles are built from a shared [`TransportConfig`] template. Every handle
//! owns a field-by-field copy of that template, so rebinding one handle's
//! proxy never leaks into another.

mod pool;

pub use pool::{build_transports, build_transports_with, parse_proxy, parse_proxy_list};

use reqwest::{Client, Proxy, Url};
use std::time::Duration;

use crate::error::{InviteForgeError, Result};
use crate::types::{BruteConfig, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT};

/// Plain settings an HTTP client is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Egress proxy; `None` is direct egress
    pub proxy: Option<Url>,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub pool_idle_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl TransportConfig {
    /// Template derived from the run configuration (no proxy bound)
    pub fn from_brute_config(config: &BruteConfig) -> Self {
        Self {
            proxy: None,
            request_timeout: config.request_timeout,
            user_agent: config.user_agent.clone(),
            ..Self::default()
        }
    }

    /// Copy of this template bound to `proxy`
    pub fn with_proxy(&self, proxy: Url) -> Self {
        Self {
            proxy: Some(proxy),
            ..self.clone()
        }
    }

    /// Build a reqwest client for these settings
    pub fn build_client(&self) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(self.request_timeout)
            .user_agent(self.user_agent.as_str())
            .pool_idle_timeout(self.pool_idle_timeout);

        if let Some(proxy) = &self.proxy {
            let proxy = Proxy::all(proxy.as_str()).map_err(|e| {
                InviteForgeError::config(format!("invalid proxy '{}': {}", proxy, e))
            })?;
            builder = builder.proxy(proxy);
        }

        Ok(builder.build()?)
    }
}

/// One egress path plus its rate-limit cooldown flag
///
/// Only the engine that owns a batch flips the cooldown; handles are never
/// shared between concurrent batches.
#[derive(Debug, Clone)]
pub struct TransportHandle {
    config: TransportConfig,
    client: Client,
    on_cooldown: bool,
}

impl TransportHandle {
    /// Create a handle, building its client from `config`
    pub fn new(config: TransportConfig) -> Result<Self> {
        let client = config.build_client()?;
        Ok(Self {
            config,
            client,
            on_cooldown: false,
        })
    }

    /// Proxy this handle sends through
    pub fn proxy(&self) -> Option<&Url> {
        self.config.proxy.as_ref()
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn is_on_cooldown(&self) -> bool {
        self.on_cooldown
    }

    /// Rebind this handle to another proxy and rebuild its client
    pub fn bind_proxy(&mut self, proxy: Url) -> Result<()> {
        let config = self.config.with_proxy(proxy);
        self.client = config.build_client()?;
        self.config = config;
        Ok(())
    }

    pub(crate) fn start_cooldown(&mut self) {
        self.on_cooldown = true;
    }

    pub(crate) fn clear_cooldown(&mut self) {
        self.on_cooldown = false;
    }
}

impl std::fmt::Display for TransportHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.config.proxy {
            Some(proxy) => write!(f, "{}", proxy),
            None => write!(f, "direct"),
        }
    }
}
