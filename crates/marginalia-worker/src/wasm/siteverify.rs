use async_trait::async_trait;
use worker::{Fetch, Headers, Method, Request, RequestInit};

use crate::turnstile::SiteverifyTransport;

/// Siteverify transport over the Workers `fetch` API.
pub struct WorkerFetch;

async fn post(url: &str, body: String) -> worker::Result<String> {
    let headers = Headers::new();
    headers.set("Content-Type", "application/json")?;
    headers.set("Accept", "application/json")?;
    headers.set("User-Agent", "Marginalia/0.1 (Cloudflare Worker)")?;

    let mut init = RequestInit::new();
    init.with_method(Method::Post);
    init.with_headers(headers);
    init.with_body(Some(body.into()));

    let req = Request::new_with_init(url, &init)?;
    let mut resp = Fetch::Request(req).send().await?;
    resp.text().await
}

#[async_trait(?Send)]
impl SiteverifyTransport for WorkerFetch {
    async fn post_json(&self, url: &str, body: String) -> Result<String, String> {
        post(url, body).await.map_err(|e| e.to_string())
    }
}
