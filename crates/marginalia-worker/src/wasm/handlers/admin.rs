use sea_orm::ConnectionTrait;
use worker::{Env, Request, Response, Result};

use crate::api::ApiReply;
use crate::store::ConnectionProvider;
use crate::worker_wasm::db::D1Connections;
use crate::worker_wasm::env::load_config;
use crate::worker_wasm::http::{internal_error_response, render};

use super::admin_auth::ensure_admin_authorized;

pub async fn handle_db_ping(req: &Request, env: &Env) -> Result<Response> {
    if let Some(resp) = ensure_admin_authorized(req, env)? {
        return Ok(resp);
    }

    let connections = D1Connections::new(env, &load_config(env).database_binding);
    let db = match connections.connect().await {
        Ok(db) => db,
        Err(e) => return internal_error_response("Failed to open database connection", &e),
    };

    if let Err(e) = db.ping().await {
        return internal_error_response("Database ping failed", &e);
    }

    render(ApiReply::json(
        200,
        serde_json::json!({
            "success": true,
            "db": { "ok": true, "backend": format!("{:?}", db.get_database_backend()) }
        }),
    ))
}
