//! reqwest-backed lookup

use async_trait::async_trait;
use reqwest::Client;

use super::{InviteLookup, LookupResponse, STATUS_FOUND};
use crate::error::Result;
use crate::transport::{TransportConfig, TransportHandle};

/// Reason reported for status codes without a canonical phrase
///
/// reqwest only exposes the standard phrase, so a server's custom reason text is not kept.
pub const UNKNOWN_REASON: &str = "Unknown Status";

/// Lookup over real HTTP; proxied requests use the handle's own client
#[derive(Debug, Clone)]
pub struct ReqwestLookup {
    direct: Client,
}

impl ReqwestLookup {
    /// Create a lookup whose direct-egress client follows `template`
    pub fn new(template: &TransportConfig) -> Result<Self> {
        let direct = TransportConfig {
            proxy: None,
            ..template.clone()
        }
        .build_client()?;
        Ok(Self { direct })
    }
}

#[async_trait]
impl InviteLookup for ReqwestLookup {
    async fn fetch(&self, url: &str, transport: Option<&TransportHandle>) -> Result<LookupResponse> {
        let client = transport.map_or(&self.direct, TransportHandle::client);
        let response = client.get(url).send().await?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or(UNKNOWN_REASON).to_string();
        let body = if status.as_u16() == STATUS_FOUND {
            response.text().await?
        } else {
            String::new()
        };

        Ok(LookupResponse {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brute::InviteBrute;
    use crate::error::InviteForgeError;
    use crate::types::BruteConfig;
    use std::time::{Duration, Instant};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const INVITE_JSON: &str = r#"{"code":"a","expires_at":null,"guild":{"id":"1","name":"Canned","nsfw":false},"inviter":{"id":"2","username":"host","discriminator":"0"}}"#;

    fn reply(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        )
    }

    /// Serve one canned reply per connection, in order; returns the base url
    async fn serve(replies: Vec<String>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            for reply in replies {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                socket.write_all(reply.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_maps_status_reason_and_body() {
        let base = serve(vec![
            reply("200 OK", INVITE_JSON),
            reply("404 Not Found", r#"{"message":"Unknown Invite"}"#),
            reply("599 Custom Thing", ""),
        ])
        .await;
        let lookup = ReqwestLookup::new(&TransportConfig::default()).unwrap();

        let found = lookup.fetch(&format!("{}/invites/a", base), None).await.unwrap();
        assert_eq!(found.status, 200);
        assert_eq!(found.reason, "OK");
        assert_eq!(found.body, INVITE_JSON);

        let missing = lookup.fetch(&format!("{}/invites/b", base), None).await.unwrap();
        assert_eq!(missing.status, 404);
        assert_eq!(missing.reason, "Not Found");
        assert!(missing.body.is_empty());

        let odd = lookup.fetch(&format!("{}/invites/c", base), None).await.unwrap();
        assert_eq!(odd.status, 599);
        assert_eq!(odd.reason, UNKNOWN_REASON);
    }

    #[tokio::test]
    async fn test_engine_over_http_classifies_each_status() {
        let base = serve(vec![
            reply("200 OK", INVITE_JSON),
            reply("404 Not Found", ""),
            reply("429 Too Many Requests", ""),
            reply("599 Custom Thing", ""),
        ])
        .await;

        let delay = Duration::from_millis(30);
        let config = BruteConfig::new()
            .with_invite_url(format!("{}/invites/{{code}}", base))
            .with_timeout_delay(delay);
        let mut brute = InviteBrute::from_config(&config).unwrap();

        let start = Instant::now();
        let outcome = brute.try_codes(&["a", "b", "c", "d"]).await;

        let slots: Vec<bool> = outcome.invites.iter().map(Option::is_some).collect();
        assert_eq!(slots, vec![true, false, false, false]);
        assert_eq!(outcome.invites[0].as_ref().unwrap().code, "a");
        assert_eq!(outcome.stats.rate_limited, 1);
        assert_eq!(outcome.stats.cooldown_waits, 1);
        assert!(start.elapsed() >= delay);

        match outcome.error {
            Some(InviteForgeError::UnexpectedStatus { code, status, reason }) => {
                assert_eq!(code, "d");
                assert_eq!(status, 599);
                assert_eq!(reason, UNKNOWN_REASON);
            }
            other => panic!("expected unexpected status, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refused_connection_is_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let lookup = ReqwestLookup::new(&TransportConfig::default()).unwrap();
        let err = lookup.fetch(&format!("http://{}/invites/a", addr), None).await.unwrap_err();
        assert!(err.is_transport_failure());
        if let InviteForgeError::Network { message, .. } = &err {
            assert!(message.len() > "Connection failed: ".len());
        }
    }
}
