use worker::{Env, Request, Response, Result};

use migration::MigratorTrait;

use crate::admin::migration_steps;
use crate::api::ApiReply;
use crate::store::ConnectionProvider;
use crate::worker_wasm::db::D1Connections;
use crate::worker_wasm::env::load_config;
use crate::worker_wasm::http::{internal_error_response, render};

use super::admin_auth::ensure_admin_authorized;

pub async fn handle_migrations_up(req: &Request, env: &Env) -> Result<Response> {
    if let Some(resp) = ensure_admin_authorized(req, env)? {
        return Ok(resp);
    }

    let connections = D1Connections::new(env, &load_config(env).database_binding);
    let db = match connections.connect().await {
        Ok(db) => db,
        Err(e) => return internal_error_response("Failed to open database connection", &e),
    };

    let url = match req.url() {
        Ok(url) => url,
        Err(e) => return internal_error_response("Failed to read request URL", &e),
    };
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let steps = migration_steps(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    let pending_before = match migration::Migrator::get_pending_migrations(&db).await {
        Ok(p) => p,
        Err(e) => return internal_error_response("Failed to read pending migrations", &e),
    };

    let steps_to_apply = steps.min(pending_before.len().try_into().unwrap_or(u32::MAX));

    if steps_to_apply > 0 {
        if let Err(e) = migration::Migrator::up(&db, Some(steps_to_apply)).await {
            return internal_error_response("Failed to apply migrations", &e);
        }
    }

    let pending_after = match migration::Migrator::get_pending_migrations(&db).await {
        Ok(p) => p,
        Err(e) => return internal_error_response("Failed to read pending migrations", &e),
    };

    let applied_now = pending_before.len().saturating_sub(pending_after.len());

    render(ApiReply::json(
        200,
        serde_json::json!({
            "success": true,
            "migrations": {
                "requested_steps": steps,
                "applied_steps": steps_to_apply,
                "applied_now": applied_now,
                "pending": pending_after.len(),
                "done": pending_after.is_empty(),
                "next": pending_after.first().map(|m| m.name()),
            }
        }),
    ))
}
