//! Value mapping between sea-orm statements and Cloudflare D1.
//!
//! D1 takes positional binds as plain JS values and hands rows back as JSON
//! objects. sea-orm's proxy rows are strictly typed, so every column must come
//! back as the exact `Value` variant its reader expects.

use std::collections::BTreeMap;

use sea_orm::{DbErr, ProxyRow, Value, Values};
use serde_json::{Map, Number, Value as Json};

/// Columns decoded as 32-bit integers; every other integer is an `i64`.
///
/// `id` is the comment primary key, `num_items` the alias sea-orm gives
/// `COUNT(*)` on SQLite.
const INT32_COLUMNS: &[&str] = &["id", "num_items"];

/// Largest integer a JS number holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn opt<T: Into<Json>>(value: Option<T>) -> Json {
    value.map(Into::into).unwrap_or(Json::Null)
}

fn bind_value(value: &Value) -> Result<Json, DbErr> {
    let json = match value.clone() {
        // D1 has no boolean column type.
        Value::Bool(v) => opt(v.map(i64::from)),
        Value::TinyInt(v) => opt(v),
        Value::SmallInt(v) => opt(v),
        Value::Int(v) => opt(v),
        Value::BigInt(v) => opt(v),
        Value::TinyUnsigned(v) => opt(v),
        Value::SmallUnsigned(v) => opt(v),
        Value::Unsigned(v) => opt(v),
        Value::BigUnsigned(v) => opt(v),
        Value::Float(v) => opt(v.map(f64::from)),
        Value::Double(v) => opt(v),
        Value::String(v) => opt(v.map(|s| *s)),
        Value::Char(v) => opt(v.map(String::from)),
        Value::Json(v) => opt(v.map(|j| j.to_string())),
        other => return Err(DbErr::Custom(format!("unsupported D1 bind value: {other:?}"))),
    };

    Ok(json)
}

/// Positional parameters for a D1 prepared statement.
pub fn bind_params(values: Option<&Values>) -> Result<Vec<Json>, DbErr> {
    values
        .map(|v| v.0.iter().map(bind_value).collect())
        .unwrap_or_else(|| Ok(Vec::new()))
}

fn integer(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER)
            .map(|f| f as i64)
    })
}

fn column_value(column: &str, json: Json) -> Value {
    match json {
        // The only nullable column in the schema is text.
        Json::Null => Value::String(None),
        Json::Bool(b) => Value::Bool(Some(b)),
        Json::Number(n) => match integer(&n) {
            Some(i) if INT32_COLUMNS.contains(&column) => match i32::try_from(i) {
                Ok(small) => Value::Int(Some(small)),
                Err(_) => Value::BigInt(Some(i)),
            },
            Some(i) => Value::BigInt(Some(i)),
            None => Value::Double(n.as_f64()),
        },
        Json::String(s) => Value::String(Some(Box::new(s))),
        other => Value::Json(Some(Box::new(other))),
    }
}

/// One D1 result row as a sea-orm proxy row.
pub fn proxy_row(object: Map<String, Json>) -> ProxyRow {
    let values: BTreeMap<String, Value> = object
        .into_iter()
        .map(|(column, json)| {
            let value = column_value(&column, json);
            (column, value)
        })
        .collect();

    ProxyRow { values }
}
