use worker::*;

#[path = "wasm/db/mod.rs"]
pub mod db;
#[path = "wasm/env.rs"]
pub mod env;
#[path = "wasm/siteverify.rs"]
pub mod siteverify;
#[path = "wasm/handlers/mod.rs"]
pub mod handlers;
#[path = "wasm/http.rs"]
pub mod http;

use http::{not_found, render};

use crate::api::ApiReply;

#[event(fetch)]
pub async fn fetch(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    console_error_panic_hook::set_once();

    let url = match req.url() {
        Ok(url) => url,
        Err(e) => return render(ApiReply::internal("Failed to read request URL", &e)),
    };
    let path = url.path();

    // The comments route answers its own preflight with 200.
    if path == "/api/comments" {
        return handlers::comments::handle_comments(req, &env).await;
    }

    if req.method() == Method::Options {
        return render(ApiReply::empty(204));
    }

    if req.method() == Method::Get && path == "/health" {
        return render(ApiReply::json(
            200,
            serde_json::json!({
                "ok": true,
                "service": "marginalia",
            }),
        ));
    }

    if req.method() == Method::Post && path == "/v1/admin/migrations/up" {
        return handlers::migrations::handle_migrations_up(&req, &env).await;
    }

    if req.method() == Method::Get && path == "/v1/admin/db/ping" {
        return handlers::admin::handle_db_ping(&req, &env).await;
    }

    not_found()
}
