//! Brute-force invite testing
//!
//! [`InviteBrute`] walks a batch of candidate codes in order, rotating through
//! the transport pool and resting rate-limited paths. The HTTP round trip sits
//! behind [`InviteLookup`] so the engine can be driven by scripted responses.

mod engine;
mod http;

pub use engine::{BatchOutcome, BatchProgress, BatchStats, InviteBrute};
pub use http::{ReqwestLookup, UNKNOWN_REASON};

use crate::error::Result;
use crate::transport::TransportHandle;
use async_trait::async_trait;

/// Status the lookup endpoint returns for an existing invite
pub const STATUS_FOUND: u16 = 200;
/// Status for an unknown code
pub const STATUS_NOT_FOUND: u16 = 404;
/// Status for a rate-limited egress path
pub const STATUS_RATE_LIMITED: u16 = 429;

/// Raw response of one lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResponse {
    pub status: u16,
    /// Canonical reason phrase, e.g. "Not Found"; [`UNKNOWN_REASON`] for non-standard codes
    pub reason: String,
    /// Body text; only read for successful lookups
    pub body: String,
}

impl LookupResponse {
    pub fn new(status: u16, reason: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }
}

/// One GET against the lookup endpoint
#[async_trait]
pub trait InviteLookup: Send + Sync {
    /// Fetch `url` through `transport`, or through direct egress when `None`.
    ///
    /// `Err` means the request never produced an HTTP response.
    async fn fetch(&self, url: &str, transport: Option<&TransportHandle>) -> Result<LookupResponse>;
}
