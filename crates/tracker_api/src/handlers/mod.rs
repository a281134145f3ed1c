//! Route handlers grouped by resource family.

pub mod dashboard;
pub mod entities;
pub mod health;
pub mod links;

use serde_json::{json, Value};

/// `{ "message": "<label> <verb> successfully" }`.
pub(crate) fn message(label: &str, verb: &str) -> Value {
    json!({ "message": format!("{label} {verb} successfully") })
}
