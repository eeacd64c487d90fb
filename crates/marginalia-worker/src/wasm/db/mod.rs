use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::channel::oneshot;
use sea_orm::{
    Database, DatabaseConnection, DbBackend, DbErr, ProxyDatabaseTrait, ProxyExecResult, ProxyRow, RuntimeErr,
    Statement,
};
use serde_json::{Map, Value as Json};
use worker::wasm_bindgen::JsValue;
use worker::wasm_bindgen_futures::spawn_local;
use worker::{D1PreparedStatement, Env};

use crate::d1::{bind_params, proxy_row};
use crate::store::ConnectionProvider;

fn js_value(json: &Json) -> JsValue {
    match json {
        Json::Null => JsValue::NULL,
        Json::Bool(b) => JsValue::from_bool(*b),
        Json::Number(n) => JsValue::from_f64(n.as_f64().unwrap_or_default()),
        Json::String(s) => JsValue::from_str(s),
        other => JsValue::from_str(&other.to_string()),
    }
}

fn d1_err(err: impl fmt::Display) -> DbErr {
    DbErr::Conn(RuntimeErr::Internal(err.to_string()))
}

/// sea-orm proxy over a D1 binding.
///
/// D1 handles are JS objects and cannot cross an `await` in a `Send` future,
/// so each statement runs on a local task and reports back over a channel.
pub struct D1Proxy {
    env: Env,
    binding: String,
}

// SAFETY: wasm32 Workers run a single thread; the `Env` handle never leaves it.
unsafe impl Send for D1Proxy {}
unsafe impl Sync for D1Proxy {}

impl fmt::Debug for D1Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("D1Proxy").field("binding", &self.binding).finish()
    }
}

fn prepare(env: &Env, binding: &str, statement: Statement) -> worker::Result<D1PreparedStatement> {
    let params: Vec<JsValue> = bind_params(statement.values.as_ref())
        .map_err(|e| worker::Error::RustError(e.to_string()))?
        .iter()
        .map(js_value)
        .collect();

    env.d1(binding)?.prepare(statement.sql).bind(&params)
}

async fn all_rows(env: Env, binding: String, statement: Statement) -> worker::Result<Vec<ProxyRow>> {
    let result = prepare(&env, &binding, statement)?.all().await?;
    if let Some(message) = result.error() {
        return Err(worker::Error::RustError(message));
    }

    let rows = result.results::<Map<String, Json>>()?;
    Ok(rows.into_iter().map(proxy_row).collect())
}

async fn run(env: Env, binding: String, statement: Statement) -> worker::Result<ProxyExecResult> {
    let result = prepare(&env, &binding, statement)?.run().await?;
    if let Some(message) = result.error() {
        return Err(worker::Error::RustError(message));
    }

    let meta = result.meta()?;
    Ok(ProxyExecResult {
        last_insert_id: meta.as_ref().and_then(|m| m.last_row_id).map_or(0, |id| id as u64),
        rows_affected: meta.as_ref().and_then(|m| m.changes).map_or(0, |n| n as u64),
    })
}

async fn forward<T>(task: impl Future<Output = worker::Result<T>>, tx: oneshot::Sender<Result<T, String>>) {
    let _ = tx.send(task.await.map_err(|e| e.to_string()));
}

#[async_trait]
impl ProxyDatabaseTrait for D1Proxy {
    async fn query(&self, statement: Statement) -> Result<Vec<ProxyRow>, DbErr> {
        let (tx, rx) = oneshot::channel();
        spawn_local(forward(all_rows(self.env.clone(), self.binding.clone(), statement), tx));

        rx.await.map_err(d1_err)?.map_err(d1_err)
    }

    async fn execute(&self, statement: Statement) -> Result<ProxyExecResult, DbErr> {
        let (tx, rx) = oneshot::channel();
        spawn_local(forward(run(self.env.clone(), self.binding.clone(), statement), tx));

        rx.await.map_err(d1_err)?.map_err(d1_err)
    }
}

/// Opens a proxy connection over the configured D1 binding, once per request.
pub struct D1Connections {
    env: Env,
    binding: String,
}

impl D1Connections {
    pub fn new(env: &Env, binding: &str) -> Self {
        D1Connections {
            env: env.clone(),
            binding: binding.to_string(),
        }
    }
}

#[async_trait(?Send)]
impl ConnectionProvider for D1Connections {
    async fn connect(&self) -> Result<DatabaseConnection, DbErr> {
        // Fail on a missing binding here rather than on the first statement.
        self.env.d1(&self.binding).map_err(|e| {
            DbErr::Custom(format!("D1 binding `{}` is not available: {e}", self.binding))
        })?;

        let proxy = D1Proxy {
            env: self.env.clone(),
            binding: self.binding.clone(),
        };

        let proxy: Box<dyn ProxyDatabaseTrait> = Box::new(proxy);
        Database::connect_proxy(DbBackend::Sqlite, Arc::new(proxy)).await
    }
}
