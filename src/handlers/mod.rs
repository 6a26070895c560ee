//! HTTP handlers for the company and job endpoints.

pub mod company;
pub mod job;

use crate::error::AppError;
use serde_json::{Map, Value};

/// Require a JSON object body and hand back its map.
pub(crate) fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

pub(crate) fn parse_int_param(key: &str, raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("{} must be an integer", key)))
}
