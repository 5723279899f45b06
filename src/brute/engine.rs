//! Sequential brute-force engine with per-transport cooldown

use std::time::{Duration, Instant};

use super::{
    InviteLookup, LookupResponse, ReqwestLookup, STATUS_FOUND, STATUS_NOT_FOUND,
    STATUS_RATE_LIMITED,
};
use crate::error::{InviteForgeError, Result};
use crate::transport::{build_transports, TransportConfig, TransportHandle};
use crate::types::{BruteConfig, Invite, CODE_PLACEHOLDER};

/// Counters for one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Lookups sent, including the one that aborted the batch
    pub requests: u64,
    pub found: u64,
    /// Codes recorded absent, rate-limited ones included
    pub absent: u64,
    pub rate_limited: u64,
    /// Times the engine slept out a cooldown
    pub cooldown_waits: u64,
}

/// Progress snapshot handed to the progress callback after each code
#[derive(Debug, Clone)]
pub struct BatchProgress {
    pub current: usize,
    pub total: usize,
    pub found: u64,
    pub rate_limited: u64,
}

/// Result of a batch: one slot per attempted code, in input order
///
/// `error` is set when the batch stopped early. `invites` then holds
/// everything gathered before the failure and is shorter than the input,
/// except for an unexpected status, whose code still gets its `None` slot.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub invites: Vec<Option<Invite>>,
    pub error: Option<InviteForgeError>,
    pub stats: BatchStats,
}

impl BatchOutcome {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            invites: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    fn push_absent(&mut self) {
        self.invites.push(None);
        self.stats.absent += 1;
    }

    fn push_found(&mut self, invite: Invite) {
        self.invites.push(Some(invite));
        self.stats.found += 1;
    }

    /// Whether every input code was attempted
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Confirmed invites, in input order
    pub fn found(&self) -> impl Iterator<Item = &Invite> {
        self.invites.iter().flatten()
    }
}

/// Brute-force engine over a transport pool
pub struct InviteBrute<L> {
    lookup: L,
    invite_url: String,
    transports: Vec<TransportHandle>,
    timeout_delay: Duration,
    cursor: usize,
}

impl InviteBrute<ReqwestLookup> {
    /// Build the engine, its transport pool and HTTP lookup from the run configuration
    pub fn from_config(config: &BruteConfig) -> Result<Self> {
        config.validate()?;

        let template = TransportConfig::from_brute_config(config);
        let transports = build_transports(&config.proxies, config.proxy_selection, &template)?;
        let lookup = ReqwestLookup::new(&template)?;

        Ok(Self::new(
            lookup,
            config.invite_url.clone(),
            transports,
            config.timeout_delay,
        ))
    }
}

impl<L: InviteLookup> InviteBrute<L> {
    /// Create an engine; an empty `transports` means direct egress with a global cooldown
    pub fn new(
        lookup: L,
        invite_url: impl Into<String>,
        transports: Vec<TransportHandle>,
        timeout_delay: Duration,
    ) -> Self {
        Self {
            lookup,
            invite_url: invite_url.into(),
            transports,
            timeout_delay,
            cursor: 0,
        }
    }

    pub fn transports(&self) -> &[TransportHandle] {
        &self.transports
    }

    pub fn timeout_delay(&self) -> Duration {
        self.timeout_delay
    }

    /// Lookup URL for `code`
    pub fn invite_url(&self, code: &str) -> String {
        self.invite_url.replacen(CODE_PLACEHOLDER, code, 1)
    }

    /// Test every code in order
    pub async fn try_codes<S: AsRef<str>>(&mut self, codes: &[S]) -> BatchOutcome {
        self.try_codes_with_progress(codes, |_| {}).await
    }

    /// Test every code in order, reporting progress after each one
    pub async fn try_codes_with_progress<S, F>(&mut self, codes: &[S], mut on_progress: F) -> BatchOutcome
    where
        S: AsRef<str>,
        F: FnMut(&BatchProgress),
    {
        let start = Instant::now();
        let mut outcome = BatchOutcome::with_capacity(codes.len());

        for (index, code) in codes.iter().enumerate() {
            let code = code.as_ref();
            let slot = self.acquire_slot(&mut outcome.stats).await;
            let url = self.invite_url(code);

            outcome.stats.requests += 1;
            let response = match self.lookup.fetch(&url, slot.map(|i| &self.transports[i])).await {
                Ok(response) => response,
                Err(err) => {
                    if err.is_transport_failure() {
                        tracing::warn!(code = %code, transport = %self.describe(slot), error = %err, "Egress path failed, aborting batch");
                    } else {
                        tracing::warn!(code = %code, error = %err, "Lookup failed, aborting batch");
                    }
                    outcome.error = Some(err);
                    break;
                }
            };

            if let Err(err) = self.record(code, slot, response, &mut outcome).await {
                tracing::warn!(code = %code, error = %err, "Aborting batch");
                outcome.error = Some(err);
                break;
            }

            on_progress(&BatchProgress {
                current: index + 1,
                total: codes.len(),
                found: outcome.stats.found,
                rate_limited: outcome.stats.rate_limited,
            });
        }

        tracing::info!(
            attempted = outcome.invites.len(),
            total = codes.len(),
            found = outcome.stats.found,
            rate_limited = outcome.stats.rate_limited,
            cooldown_waits = outcome.stats.cooldown_waits,
            elapsed_ms = %start.elapsed().as_millis(),
            aborted = outcome.error.is_some(),
            "Batch finished"
        );

        outcome
    }

    /// Pick the transport at the cursor, resting it first if it is cooling down
    async fn acquire_slot(&mut self, stats: &mut BatchStats) -> Option<usize> {
        if self.transports.is_empty() {
            return None;
        }
        if self.cursor >= self.transports.len() {
            self.cursor = 0;
        }

        let slot = self.cursor;
        if self.transports[slot].is_on_cooldown() {
            tracing::debug!(
                transport = %self.transports[slot],
                delay_ms = %self.timeout_delay.as_millis(),
                "Waiting out transport cooldown"
            );
            tokio::time::sleep(self.timeout_delay).await;
            stats.cooldown_waits += 1;
            self.transports[slot].clear_cooldown();
        }

        Some(slot)
    }

    /// Record the outcome of one lookup; `Err` aborts the batch
    async fn record(
        &mut self,
        code: &str,
        slot: Option<usize>,
        response: LookupResponse,
        outcome: &mut BatchOutcome,
    ) -> Result<()> {
        tracing::debug!(
            code = %code,
            transport = %self.describe(slot),
            status = response.status,
            "Lookup completed"
        );

        match response.status {
            STATUS_FOUND => {
                let invite: Invite = serde_json::from_str(&response.body).map_err(|e| {
                    InviteForgeError::parse(
                        format!("invalid invite payload for '{}': {}", code, e),
                        Some(response.body.clone()),
                    )
                })?;
                tracing::info!(code = %code, guild = ?invite.guild.as_ref().map(|g| g.name.as_str()), "Invite found");
                outcome.push_found(invite);
            }
            STATUS_NOT_FOUND => outcome.push_absent(),
            STATUS_RATE_LIMITED => {
                outcome.push_absent();
                outcome.stats.rate_limited += 1;
                match slot {
                    Some(slot) => {
                        tracing::warn!(code = %code, transport = %self.transports[slot], "Rate limited, cooling transport");
                        self.transports[slot].start_cooldown();
                    }
                    None => {
                        tracing::warn!(
                            code = %code,
                            delay_ms = %self.timeout_delay.as_millis(),
                            "Rate limited on direct egress, backing off"
                        );
                        tokio::time::sleep(self.timeout_delay).await;
                        outcome.stats.cooldown_waits += 1;
                    }
                }
            }
            status => {
                outcome.push_absent();
                return Err(InviteForgeError::unexpected_status(code, status, response.reason));
            }
        }

        self.advance();
        Ok(())
    }

    fn advance(&mut self) {
        if !self.transports.is_empty() {
            self.cursor = (self.cursor + 1) % self.transports.len();
        }
    }

    fn describe(&self, slot: Option<usize>) -> String {
        slot.map_or_else(|| "direct".to_string(), |i| self.transports[i].to_string())
    }
}
