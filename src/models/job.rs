//! Job records: create under a company, filtered listing, fetch with company,
//! partial update, delete.

use crate::error::AppError;
use crate::models::company::{self, Company};
use crate::sql::{partial_update, FieldSpec, PgBindValue, WhereClause};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::PgPool;

/// Mutable fields for PATCH. The id and the owning handle are fixed at
/// creation and never in this list.
const UPDATABLE: &[FieldSpec] = &[
    FieldSpec { api_name: "title", column: "title", cast: None },
    FieldSpec { api_name: "salary", column: "salary", cast: Some("int") },
    FieldSpec { api_name: "equity", column: "equity", cast: Some("numeric") },
];

/// equity reads back as text so the API sees the decimal string it sent.
pub(crate) const COLUMNS: &str = "id, title, salary, equity::text AS equity, company_handle";

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<String>,
    pub company_handle: String,
}

/// Partial projection attached to a company's detail view; the owning handle
/// is implied by the parent.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct JobSummary {
    pub id: i64,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<String>,
    pub company_handle: String,
}

/// Job plus its full company record, returned by `get`. The raw handle column
/// is dropped in favor of the nested object.
#[derive(Debug, Serialize)]
pub struct JobDetail {
    pub id: i64,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
}

/// Listing criteria; each is independently optional.
#[derive(Debug, Default)]
pub struct JobFilters {
    pub min_salary: Option<i64>,
    pub has_equity: Option<bool>,
    pub title: Option<String>,
}

/// WHERE clause for the listing filters. Predicates render in fixed order:
/// salary bound, equity flag, then the title match. `hasEquity` filters only
/// when exactly true; false or absent contributes nothing.
pub fn filter_clause(filters: &JobFilters) -> WhereClause {
    let mut clause = WhereClause::default();
    if let Some(min) = filters.min_salary {
        clause.push_cmp("salary", ">=", Value::from(min));
    }
    if filters.has_equity == Some(true) {
        clause.push_raw("equity > 0");
    }
    if let Some(title) = &filters.title {
        clause.push_ilike("title", title);
    }
    clause
}

impl Job {
    /// Insert a new job. The owning company must exist; the id comes back
    /// generated. Two round trips: existence check, then the insert.
    pub async fn create(pool: &PgPool, input: &NewJob) -> Result<Job, AppError> {
        let company =
            sqlx::query_scalar::<_, String>("SELECT handle FROM companies WHERE handle = $1")
                .bind(&input.company_handle)
                .fetch_optional(pool)
                .await?;
        if company.is_none() {
            return Err(AppError::NotFound(format!(
                "no company: {}",
                input.company_handle
            )));
        }
        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3::numeric, $4) RETURNING {COLUMNS}"
        );
        tracing::debug!(sql = %sql, title = %input.title, "create job");
        Ok(sqlx::query_as::<_, Job>(&sql)
            .bind(&input.title)
            .bind(input.salary)
            .bind(&input.equity)
            .bind(&input.company_handle)
            .fetch_one(pool)
            .await?)
    }

    /// All jobs matching the filters, ordered by title.
    pub async fn find_all(pool: &PgPool, filters: &JobFilters) -> Result<Vec<Job>, AppError> {
        let clause = filter_clause(filters);
        let sql = format!("SELECT {COLUMNS} FROM jobs{} ORDER BY title", clause.render());
        tracing::debug!(sql = %sql, params = ?clause.params(), "list jobs");
        let mut query = sqlx::query_as::<_, Job>(&sql);
        for p in clause.params() {
            query = query.bind(PgBindValue::from_json(p));
        }
        Ok(query.fetch_all(pool).await?)
    }

    /// One job with its company attached. Two round trips: the job row, then
    /// the owning company.
    pub async fn get(pool: &PgPool, id: i64) -> Result<JobDetail, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no job: {id}")))?;
        let company_sql = format!(
            "SELECT {} FROM companies WHERE handle = $1",
            company::COLUMNS
        );
        let company = sqlx::query_as::<_, Company>(&company_sql)
            .bind(&job.company_handle)
            .fetch_optional(pool)
            .await?;
        Ok(JobDetail {
            id: job.id,
            title: job.title,
            salary: job.salary,
            equity: job.equity,
            company,
        })
    }

    /// Partial update from the fields present in `body`. Fails bad-request on
    /// an empty field set before touching storage, not-found when no row
    /// matches the id.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        body: &Map<String, Value>,
    ) -> Result<Job, AppError> {
        let set = partial_update(body, UPDATABLE)?;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {COLUMNS}",
            set.joined(),
            set.next_placeholder(),
        );
        tracing::debug!(sql = %sql, params = ?set.params, "update job");
        let mut query = sqlx::query_as::<_, Job>(&sql);
        for p in &set.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        query
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no job: {id}")))
    }

    pub async fn remove(pool: &PgPool, id: i64) -> Result<(), AppError> {
        let deleted =
            sqlx::query_scalar::<_, i64>("DELETE FROM jobs WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        match deleted {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("no job: {id}"))),
        }
    }
}
