use std::fmt::Display;

use worker::{Headers, Response, Result};

use crate::api::{ApiReply, CORS_HEADERS};

fn cors_headers() -> Result<Headers> {
    let headers = Headers::new();
    for (name, value) in CORS_HEADERS {
        headers.set(name, value)?;
    }
    Ok(headers)
}

/// Render a host-independent reply. Headers are attached in one place, once.
pub fn render(reply: ApiReply) -> Result<Response> {
    if let Some(fault) = &reply.fault {
        worker::console_log!("{fault}");
    }

    let resp = match &reply.body {
        Some(body) => Response::from_json(body)?,
        None => Response::empty()?,
    };

    Ok(resp.with_status(reply.status).with_headers(cors_headers()?))
}

pub fn error_response(status: u16, code: &str, message: &str) -> Result<Response> {
    render(ApiReply::json(
        status,
        serde_json::json!({
            "error": message,
            "code": code,
        }),
    ))
}

pub fn internal_error_response<E: Display>(context: &str, err: &E) -> Result<Response> {
    worker::console_log!("{context}: {err}");
    error_response(500, "internal_error", "Internal server error")
}

pub fn not_found() -> Result<Response> {
    render(ApiReply::error(404, "Not found"))
}
