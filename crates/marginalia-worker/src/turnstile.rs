//! Cloudflare Turnstile verification gateway.
//!
//! The gateway owns the request/verdict format and the "is this configured"
//! decision. Moving bytes over the network is left to a [`SiteverifyTransport`]
//! supplied by the host.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::CommentError;

#[derive(Debug, Serialize)]
pub struct SiteverifyRequest<'a> {
    pub secret: &'a str,
    pub response: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remoteip: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct SiteverifyResponse {
    pub success: bool,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

/// Sends a JSON body to the siteverify endpoint and returns the raw reply body.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait SiteverifyTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<String, String>;
}

/// Outcome of one verification. Error codes are kept for diagnostics only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub success: bool,
    pub error_codes: Vec<String>,
}

pub struct TurnstileGateway<'a, T> {
    secret: Option<&'a str>,
    url: &'a str,
    transport: &'a T,
}

impl<'a, T: SiteverifyTransport> TurnstileGateway<'a, T> {
    pub fn new(config: &'a Config, transport: &'a T) -> Self {
        TurnstileGateway {
            secret: config.turnstile_secret.as_deref(),
            url: &config.siteverify_url,
            transport,
        }
    }

    /// Ask Turnstile whether `token` came from a solved challenge.
    ///
    /// Makes no outbound call when the secret is missing.
    pub async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<Verdict, CommentError> {
        let Some(secret) = self.secret else {
            return Err(CommentError::NotConfigured("TURNSTILE_SECRET_KEY"));
        };

        let body = serde_json::to_string(&SiteverifyRequest {
            secret,
            response: token,
            remoteip: remote_ip,
        })
        .map_err(|e| CommentError::Transport(format!("failed to encode siteverify request: {e}")))?;

        let raw = self
            .transport
            .post_json(self.url, body)
            .await
            .map_err(CommentError::Transport)?;

        let parsed: SiteverifyResponse = serde_json::from_str(&raw)
            .map_err(|e| CommentError::Transport(format!("siteverify returned non-JSON: {e}")))?;

        Ok(Verdict {
            success: parsed.success,
            error_codes: parsed.error_codes,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct Recorder {
        reply: Result<String, String>,
        sent: Mutex<Vec<(String, String)>>,
    }

    impl Recorder {
        fn replying(reply: Result<&str, &str>) -> Self {
            Recorder {
                reply: reply.map(str::to_string).map_err(str::to_string),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SiteverifyTransport for Recorder {
        async fn post_json(&self, url: &str, body: String) -> Result<String, String> {
            self.sent.lock().unwrap().push((url.to_string(), body));
            self.reply.clone()
        }
    }

    fn config(secret: Option<&str>) -> Config {
        Config {
            turnstile_secret: secret.map(str::to_string),
            siteverify_url: "https://verify.test/siteverify".to_string(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn missing_secret_makes_no_call() {
        let transport = Recorder::replying(Ok(r#"{"success":true}"#));
        let config = config(None);
        let err = TurnstileGateway::new(&config, &transport)
            .verify("tok", None)
            .await
            .unwrap_err();

        assert!(matches!(err, CommentError::NotConfigured("TURNSTILE_SECRET_KEY")));
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sends_secret_and_token() {
        let transport = Recorder::replying(Ok(r#"{"success":true,"error-codes":[],"hostname":"x"}"#));
        let config = config(Some("shh"));
        let verdict = TurnstileGateway::new(&config, &transport)
            .verify("tok", Some("203.0.113.9"))
            .await
            .unwrap();
        assert!(verdict.success);

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "https://verify.test/siteverify");
        let body: serde_json::Value = serde_json::from_str(&sent[0].1).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"secret": "shh", "response": "tok", "remoteip": "203.0.113.9"})
        );
    }

    #[tokio::test]
    async fn rejection_keeps_error_codes() {
        let transport =
            Recorder::replying(Ok(r#"{"success":false,"error-codes":["timeout-or-duplicate"]}"#));
        let config = config(Some("shh"));
        let verdict = TurnstileGateway::new(&config, &transport)
            .verify("tok", None)
            .await
            .unwrap();
        assert!(!verdict.success);
        assert_eq!(verdict.error_codes, vec!["timeout-or-duplicate".to_string()]);

        let sent = transport.sent.lock().unwrap();
        assert!(!sent[0].1.contains("remoteip"));
    }

    #[tokio::test]
    async fn transport_and_garbage_are_errors() {
        let config = config(Some("shh"));

        let down = Recorder::replying(Err("connection reset"));
        let err = TurnstileGateway::new(&config, &down).verify("tok", None).await.unwrap_err();
        assert!(matches!(err, CommentError::Transport(ref m) if m == "connection reset"));
        assert_eq!(err.status(), 500);

        let html = Recorder::replying(Ok("<html>bad gateway</html>"));
        let err = TurnstileGateway::new(&config, &html).verify("tok", None).await.unwrap_err();
        assert!(matches!(err, CommentError::Transport(_)));
    }
}
