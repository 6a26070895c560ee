//! Company records: create, filtered listing, fetch with jobs, partial update, delete.

use crate::error::AppError;
use crate::models::job::JobSummary;
use crate::sql::{partial_update, FieldSpec, PgBindValue, WhereClause};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::PgPool;

/// Mutable fields for PATCH, in the order their assignments render. The
/// handle is the primary key and is not in this list.
const UPDATABLE: &[FieldSpec] = &[
    FieldSpec { api_name: "name", column: "name", cast: None },
    FieldSpec { api_name: "description", column: "description", cast: None },
    FieldSpec { api_name: "numEmployees", column: "num_employees", cast: Some("int") },
    FieldSpec { api_name: "logoUrl", column: "logo_url", cast: None },
];

pub(crate) const COLUMNS: &str = "handle, name, description, num_employees, logo_url";

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Company plus its jobs as a partial projection, returned by `get`.
#[derive(Debug, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<JobSummary>,
}

/// Listing criteria; each is independently optional.
#[derive(Debug, Default)]
pub struct CompanyFilters {
    pub min_employees: Option<i64>,
    pub max_employees: Option<i64>,
    pub name: Option<String>,
}

/// WHERE clause for the listing filters. Predicates render in fixed order:
/// employee bounds first, then the name match. Contradictory bounds fail
/// before any fragment is built.
pub fn filter_clause(filters: &CompanyFilters) -> Result<WhereClause, AppError> {
    if let (Some(min), Some(max)) = (filters.min_employees, filters.max_employees) {
        if min > max {
            return Err(AppError::BadRequest(
                "minEmployees cannot exceed maxEmployees".into(),
            ));
        }
    }
    let mut clause = WhereClause::default();
    if let Some(min) = filters.min_employees {
        clause.push_cmp("num_employees", ">=", Value::from(min));
    }
    if let Some(max) = filters.max_employees {
        clause.push_cmp("num_employees", "<=", Value::from(max));
    }
    if let Some(name) = &filters.name {
        clause.push_ilike("name", name);
    }
    Ok(clause)
}

fn unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

impl Company {
    /// Insert a new company. The handle is looked up first so a duplicate gets
    /// a conflict signal; two racing creates are settled by the primary key
    /// constraint, which maps to the same signal.
    pub async fn create(pool: &PgPool, input: &NewCompany) -> Result<Company, AppError> {
        let existing =
            sqlx::query_scalar::<_, String>("SELECT handle FROM companies WHERE handle = $1")
                .bind(&input.handle)
                .fetch_optional(pool)
                .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(format!(
                "duplicate company: {}",
                input.handle
            )));
        }
        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        tracing::debug!(sql = %sql, handle = %input.handle, "create company");
        sqlx::query_as::<_, Company>(&sql)
            .bind(&input.handle)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.num_employees)
            .bind(&input.logo_url)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                if unique_violation(&e) {
                    AppError::Conflict(format!("duplicate company: {}", input.handle))
                } else {
                    AppError::Db(e)
                }
            })
    }

    /// All companies matching the filters, ordered by name. No filters means
    /// the full listing; no match means an empty list, never an error.
    pub async fn find_all(
        pool: &PgPool,
        filters: &CompanyFilters,
    ) -> Result<Vec<Company>, AppError> {
        let clause = filter_clause(filters)?;
        let sql = format!(
            "SELECT {COLUMNS} FROM companies{} ORDER BY name",
            clause.render()
        );
        tracing::debug!(sql = %sql, params = ?clause.params(), "list companies");
        let mut query = sqlx::query_as::<_, Company>(&sql);
        for p in clause.params() {
            query = query.bind(PgBindValue::from_json(p));
        }
        Ok(query.fetch_all(pool).await?)
    }

    /// One company with its jobs, ordered by job id. Two round trips.
    pub async fn get(pool: &PgPool, handle: &str) -> Result<CompanyDetail, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM companies WHERE handle = $1");
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(handle)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no company: {handle}")))?;
        let jobs = sqlx::query_as::<_, JobSummary>(
            "SELECT id, title, salary, equity::text AS equity FROM jobs \
             WHERE company_handle = $1 ORDER BY id",
        )
        .bind(handle)
        .fetch_all(pool)
        .await?;
        Ok(CompanyDetail { company, jobs })
    }

    /// Partial update from the fields present in `body`. Fails bad-request on
    /// an empty field set before touching storage, not-found when no row
    /// matches the handle.
    pub async fn update(
        pool: &PgPool,
        handle: &str,
        body: &Map<String, Value>,
    ) -> Result<Company, AppError> {
        let set = partial_update(body, UPDATABLE)?;
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {COLUMNS}",
            set.joined(),
            set.next_placeholder(),
        );
        tracing::debug!(sql = %sql, params = ?set.params, "update company");
        let mut query = sqlx::query_as::<_, Company>(&sql);
        for p in &set.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        query
            .bind(handle)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no company: {handle}")))
    }

    pub async fn remove(pool: &PgPool, handle: &str) -> Result<(), AppError> {
        let deleted = sqlx::query_scalar::<_, String>(
            "DELETE FROM companies WHERE handle = $1 RETURNING handle",
        )
        .bind(handle)
        .fetch_optional(pool)
        .await?;
        match deleted {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("no company: {handle}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn no_filters_renders_no_where_clause() {
        let clause = filter_clause(&CompanyFilters::default()).unwrap();
        assert_eq!(clause.render(), "");
        assert!(clause.params().is_empty());
    }

    #[test]
    fn filters_compose_in_fixed_order() {
        let filters = CompanyFilters {
            min_employees: Some(2),
            max_employees: Some(10),
            name: Some("net".into()),
        };
        let clause = filter_clause(&filters).unwrap();
        assert_eq!(
            clause.render(),
            " WHERE num_employees >= $1 AND num_employees <= $2 AND name ILIKE $3"
        );
        assert_eq!(clause.params(), &[json!(2), json!(10), json!("%net%")]);
    }

    #[test]
    fn each_filter_stands_alone() {
        let clause = filter_clause(&CompanyFilters {
            max_employees: Some(10),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(clause.render(), " WHERE num_employees <= $1");

        let clause = filter_clause(&CompanyFilters {
            name: Some("c1".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(clause.render(), " WHERE name ILIKE $1");
        assert_eq!(clause.params(), &[json!("%c1%")]);
    }

    #[test]
    fn inverted_employee_bounds_rejected_regardless_of_other_criteria() {
        let filters = CompanyFilters {
            min_employees: Some(10),
            max_employees: Some(2),
            name: Some("ignored".into()),
        };
        assert!(matches!(
            filter_clause(&filters),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn equal_employee_bounds_allowed() {
        let filters = CompanyFilters {
            min_employees: Some(3),
            max_employees: Some(3),
            ..Default::default()
        };
        assert!(filter_clause(&filters).is_ok());
    }

    #[test]
    fn update_set_clause_renames_and_casts() {
        let body = match json!({"numEmployees": 3, "logoUrl": "http://x"}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        let set = partial_update(&body, UPDATABLE).unwrap();
        assert_eq!(
            set.fragments,
            vec![r#""num_employees"=$1::int"#, r#""logo_url"=$2"#]
        );
        assert_eq!(set.next_placeholder(), 3);
    }

    #[test]
    fn update_never_touches_the_handle() {
        let body = match json!({"handle": "new-handle"}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        assert!(matches!(
            partial_update(&body, UPDATABLE),
            Err(AppError::BadRequest(_))
        ));
    }
}
