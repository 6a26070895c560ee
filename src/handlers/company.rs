//! Company CRUD handlers: body validation, filter parsing, model calls.

use crate::error::AppError;
use crate::handlers::{body_to_map, parse_int_param};
use crate::models::company::{Company, CompanyFilters, NewCompany};
use crate::response::{success_many, success_one, success_one_ok};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

fn parse_filters(params: &HashMap<String, String>) -> Result<CompanyFilters, AppError> {
    let mut filters = CompanyFilters::default();
    for (key, raw) in params {
        match key.as_str() {
            "minEmployees" => filters.min_employees = Some(parse_int_param(key, raw)?),
            "maxEmployees" => filters.max_employees = Some(parse_int_param(key, raw)?),
            "name" => filters.name = Some(raw.clone()),
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
    let companies = Company::find_all(&state.pool, &filters).await?;
    Ok(success_many(companies))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let body = body_to_map(body)?;
    state.schemas.company_create.validate(&body)?;
    let input: NewCompany = serde_json::from_value(Value::Object(body))
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let company = Company::create(&state.pool, &input).await?;
    Ok(success_one(company))
}

pub async fn get(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let detail = Company::get(&state.pool, &handle).await?;
    Ok(success_one_ok(detail))
}

pub async fn update(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let body = body_to_map(body)?;
    state.schemas.company_update.validate(&body)?;
    let company = Company::update(&state.pool, &handle, &body).await?;
    Ok(success_one_ok(company))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<StatusCode, AppError> {
    Company::remove(&state.pool, &handle).await?;
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
        let filters =
            parse_filters(&params(&[("minEmployees", "2"), ("maxEmployees", "10"), ("name", "c")]))
                .unwrap();
        assert_eq!(filters.min_employees, Some(2));
        assert_eq!(filters.max_employees, Some(10));
        assert_eq!(filters.name.as_deref(), Some("c"));
    }

    #[test]
    fn rejects_unknown_filter_keys() {
        let err = parse_filters(&params(&[("nope", "1")])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn rejects_non_integer_bounds() {
        let err = parse_filters(&params(&[("minEmployees", "two")])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
