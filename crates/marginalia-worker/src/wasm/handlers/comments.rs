use worker::{Env, Method, Request, Response, Result};

use crate::api::{ApiReply, ApiRequest, CommentsApi};
use crate::worker_wasm::db::D1Connections;
use crate::worker_wasm::env::load_config;
use crate::worker_wasm::siteverify::WorkerFetch;
use crate::worker_wasm::http::render;

async fn api_request(req: &mut Request) -> std::result::Result<ApiRequest, ApiReply> {
    let query = req
        .url()
        .map_err(|e| ApiReply::internal("Failed to read request URL", &e))?
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    // Only submissions carry a body; an unreadable one is reported as invalid JSON.
    let body = if req.method() == Method::Post {
        req.text().await.ok()
    } else {
        None
    };

    let remote_ip = req
        .headers()
        .get("CF-Connecting-IP")
        .map_err(|e| ApiReply::internal("Failed to read request headers", &e))?;

    Ok(ApiRequest {
        method: req.method().into(),
        query,
        body,
        remote_ip,
    })
}

pub async fn handle_comments(mut req: Request, env: &Env) -> Result<Response> {
    let config = load_config(env);

    let api_req = match api_request(&mut req).await {
        Ok(api_req) => api_req,
        Err(reply) => return render(reply),
    };

    let connections = D1Connections::new(env, &config.database_binding);
    let reply = CommentsApi::new(&config, &connections, &WorkerFetch)
        .handle(&api_req)
        .await;

    render(reply)
}
