use worker::{Env, Request, Response, Result};

use crate::admin::{extract_bearer_token, AdminAuth};
use crate::worker_wasm::env::env_string;
use crate::worker_wasm::http::error_response;

/// Shared authorization for admin endpoints.
///
/// Returns `Ok(None)` when authorized; otherwise the refusal response.
pub fn ensure_admin_authorized(req: &Request, env: &Env) -> Result<Option<Response>> {
    // An unreadable header is treated like a missing one.
    let header = req.headers().get("Authorization").ok().flatten();
    let presented = extract_bearer_token(header.as_deref());
    let required = env_string(env, "MIGRATIONS_TOKEN");

    let auth = AdminAuth::check(required.as_deref(), presented.as_deref());
    match auth.refusal() {
        None => Ok(None),
        Some((status, code, message)) => {
            if auth == AdminAuth::InvalidToken {
                worker::console_log!("Rejected admin request with an invalid token");
            }
            Ok(Some(error_response(status, code, message)?))
        }
    }
}
