//! Job CRUD handlers: body validation, filter parsing, model calls.

use crate::error::AppError;
use crate::handlers::{body_to_map, parse_int_param};
use crate::models::job::{Job, JobFilters, NewJob};
use crate::response::{success_many, success_one, success_one_ok};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid job id: {}", raw)))
}

fn parse_bool_param(key: &str, raw: &str) -> Result<bool, AppError> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(AppError::BadRequest(format!("{} must be true or false", key)))
    }
}

fn parse_filters(params: &HashMap<String, String>) -> Result<JobFilters, AppError> {
    let mut filters = JobFilters::default();
    for (key, raw) in params {
        match key.as_str() {
            "minSalary" => filters.min_salary = Some(parse_int_param(key, raw)?),
            "hasEquity" => filters.has_equity = Some(parse_bool_param(key, raw)?),
            "title" => filters.title = Some(raw.clone()),
            _ => return Err(AppError::BadRequest(format!("unknown filter: {}", key))),
        }
    }
    Ok(filters)
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let filters = parse_filters(&params)?;
    let jobs = Job::find_all(&state.pool, &filters).await?;
    Ok(success_many(jobs))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let body = body_to_map(body)?;
    state.schemas.job_create.validate(&body)?;
    let input: NewJob = serde_json::from_value(Value::Object(body))
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let job = Job::create(&state.pool, &input).await?;
    Ok(success_one(job))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let detail = Job::get(&state.pool, id).await?;
    Ok(success_one_ok(detail))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let body = body_to_map(body)?;
    state.schemas.job_update.validate(&body)?;
    let job = Job::update(&state.pool, id, &body).await?;
    Ok(success_one_ok(job))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    Job::remove(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_each_filter() {
        let filters = parse_filters(&params(&[
            ("minSalary", "200"),
            ("hasEquity", "true"),
            ("title", "eng"),
        ]))
        .unwrap();
        assert_eq!(filters.min_salary, Some(200));
        assert_eq!(filters.has_equity, Some(true));
        assert_eq!(filters.title.as_deref(), Some("eng"));
    }

    #[test]
    fn rejects_unknown_filter_keys() {
        let err = parse_filters(&params(&[("salary", "200")])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn has_equity_must_be_boolean_text() {
        assert!(parse_filters(&params(&[("hasEquity", "FALSE")])).is_ok());
        let err = parse_filters(&params(&[("hasEquity", "banana")])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn job_ids_must_be_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("nan"), Err(AppError::BadRequest(_))));
    }
}
