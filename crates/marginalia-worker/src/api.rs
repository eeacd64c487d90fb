//! The `/api/comments` endpoint, independent of the hosting runtime.
//!
//! The host turns its request into an [`ApiRequest`], calls
//! [`CommentsApi::handle`], and renders the returned [`ApiReply`] with
//! [`CORS_HEADERS`]. Every failure comes back as a JSON envelope.

use std::fmt::Display;

use serde_json::Value;

use crate::config::Config;
use crate::error::{CommentError, SubmitRejection};
use crate::pagination::{parse_page_number, Window, DEFAULT_PAGE_PATH};
use crate::store::{self, comment_json, ConnectionProvider};
use crate::submission::{validate, SubmitPayload};
use crate::turnstile::{SiteverifyTransport, TurnstileGateway};
use crate::util::now_ts;

/// Headers attached to every comments reply, written once at render time.
pub const CORS_HEADERS: &[(&str, &str)] = &[
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommentsRoute {
    Preflight,
    List,
    Submit,
    NotAllowed,
}

impl CommentsRoute {
    pub fn for_method(method: &str) -> Self {
        match method.to_ascii_uppercase().as_str() {
            "OPTIONS" => CommentsRoute::Preflight,
            "GET" => CommentsRoute::List,
            "POST" => CommentsRoute::Submit,
            _ => CommentsRoute::NotAllowed,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ApiRequest {
    pub method: String,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
    /// `CF-Connecting-IP`, forwarded to Turnstile when present.
    pub remote_ip: Option<String>,
}

impl ApiRequest {
    fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    /// `None` renders an empty body.
    pub body: Option<Value>,
    /// Operator-facing description of a system fault. Client mistakes leave this empty.
    pub fault: Option<String>,
}

impl ApiReply {
    pub fn json(status: u16, body: Value) -> Self {
        ApiReply {
            status,
            body: Some(body),
            fault: None,
        }
    }

    pub fn empty(status: u16) -> Self {
        ApiReply {
            status,
            body: None,
            fault: None,
        }
    }

    pub fn error(status: u16, message: &str) -> Self {
        ApiReply::json(status, serde_json::json!({ "error": message }))
    }

    /// 500 envelope for a system fault; `details` only when the deployment asks for it.
    pub fn fault(message: &str, err: &CommentError, expose_details: bool) -> Self {
        let body = if expose_details {
            serde_json::json!({ "error": message, "details": err.to_string() })
        } else {
            serde_json::json!({ "error": message })
        };

        ApiReply {
            status: 500,
            body: Some(body),
            fault: Some(format!("{message}: {err}")),
        }
    }

    /// 500 for a host-level failure before the request reached the handler.
    pub fn internal<E: Display>(context: &str, err: &E) -> Self {
        ApiReply {
            fault: Some(format!("{context}: {err}")),
            ..ApiReply::error(500, "Internal server error")
        }
    }

    pub fn method_not_allowed() -> Self {
        ApiReply::error(405, "Method not allowed")
    }
}

pub struct CommentsApi<'a, P, T> {
    config: &'a Config,
    connections: &'a P,
    transport: &'a T,
}

impl<'a, P, T> CommentsApi<'a, P, T>
where
    P: ConnectionProvider,
    T: SiteverifyTransport,
{
    pub fn new(config: &'a Config, connections: &'a P, transport: &'a T) -> Self {
        CommentsApi {
            config,
            connections,
            transport,
        }
    }

    pub async fn handle(&self, req: &ApiRequest) -> ApiReply {
        match CommentsRoute::for_method(&req.method) {
            CommentsRoute::Preflight => ApiReply::empty(200),
            CommentsRoute::List => self.list(req).await,
            CommentsRoute::Submit => self.submit(req).await,
            CommentsRoute::NotAllowed => ApiReply::method_not_allowed(),
        }
    }

    pub async fn list(&self, req: &ApiRequest) -> ApiReply {
        let page = req.query_param("page").unwrap_or(DEFAULT_PAGE_PATH);
        let window = Window::new(parse_page_number(req.query_param("pageNumber")));

        match self.fetch_listing(page, window).await {
            Ok(listed) => {
                let comments: Vec<Value> = listed.comments.iter().map(comment_json).collect();
                ApiReply::json(
                    200,
                    serde_json::json!({
                        "comments": comments,
                        "pagination": listed.pagination,
                    }),
                )
            }
            Err(e) => ApiReply::fault(
                "Failed to fetch comments",
                &CommentError::Store(e),
                self.config.expose_error_details,
            ),
        }
    }

    async fn fetch_listing(&self, page: &str, window: Window) -> Result<store::CommentPage, sea_orm::DbErr> {
        let db = self.connections.connect().await?;
        store::list_page(&db, page, window).await
    }

    pub async fn submit(&self, req: &ApiRequest) -> ApiReply {
        match self.try_submit(req).await {
            Ok(created) => ApiReply::json(
                201,
                serde_json::json!({
                    "success": true,
                    "comment": comment_json(&created),
                }),
            ),
            Err(CommentError::Rejected(rejection)) => ApiReply::error(400, &rejection.to_string()),
            Err(e @ CommentError::NotConfigured(_)) => ApiReply {
                fault: Some(e.to_string()),
                ..ApiReply::error(500, "Server configuration error")
            },
            Err(e) => ApiReply::fault("Failed to post comment", &e, self.config.expose_error_details),
        }
    }

    async fn try_submit(&self, req: &ApiRequest) -> Result<entity::comment::Model, CommentError> {
        let payload = SubmitPayload::from_json(req.body.as_deref().unwrap_or_default())?;
        let valid = validate(payload)?;

        let verdict = TurnstileGateway::new(self.config, self.transport)
            .verify(&valid.turnstile_token, req.remote_ip.as_deref())
            .await?;
        if !verdict.success {
            return Err(SubmitRejection::VerificationFailed.into());
        }

        let db = self.connections.connect().await?;
        let created = store::insert_comment(&db, valid.comment, now_ts()).await?;
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_by_method() {
        assert_eq!(CommentsRoute::for_method("OPTIONS"), CommentsRoute::Preflight);
        assert_eq!(CommentsRoute::for_method("get"), CommentsRoute::List);
        assert_eq!(CommentsRoute::for_method("POST"), CommentsRoute::Submit);
        assert_eq!(CommentsRoute::for_method("DELETE"), CommentsRoute::NotAllowed);
        assert_eq!(CommentsRoute::for_method("PUT"), CommentsRoute::NotAllowed);
    }

    #[test]
    fn fault_details_only_when_exposed() {
        let err = CommentError::Transport("boom".to_string());

        let hidden = ApiReply::fault("Failed to post comment", &err, false);
        assert_eq!(hidden.status, 500);
        assert_eq!(hidden.body, Some(serde_json::json!({ "error": "Failed to post comment" })));
        assert!(hidden.fault.as_deref().unwrap().contains("boom"));

        let shown = ApiReply::fault("Failed to post comment", &err, true);
        assert_eq!(
            shown.body.unwrap()["details"],
            serde_json::json!("verification transport failed: boom")
        );
    }

    #[test]
    fn host_failures_are_json_envelopes() {
        let reply = ApiReply::internal("Failed to read request URL", &"invalid URL");
        assert_eq!(reply.status, 500);
        assert_eq!(reply.body, Some(serde_json::json!({ "error": "Internal server error" })));
        assert_eq!(reply.fault.as_deref(), Some("Failed to read request URL: invalid URL"));
    }

    #[test]
    fn cors_headers_are_permissive() {
        let get = |name: &str| CORS_HEADERS.iter().find(|(k, _)| *k == name).map(|(_, v)| *v);
        assert_eq!(get("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(get("Access-Control-Allow-Methods"), Some("GET, POST, OPTIONS"));
        assert_eq!(get("Access-Control-Allow-Headers"), Some("Content-Type"));
        assert_eq!(get("Content-Type"), Some("application/json"));
    }
}
