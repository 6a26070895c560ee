//! Body schemas for the write operations, built once at startup.

use crate::error::AppError;
use crate::service::validation::{BodySchema, FieldRule, FieldType};

/// Decimal string such as "0", ".5", or "0.25".
const EQUITY_PATTERN: &str = r"^(0|0?\.\d+)$";

/// The four write-path schemas, held in AppState for the life of the process.
/// Update schemas omit the primary key and, for jobs, the owning handle, so a
/// patch naming them is rejected as an unknown field.
#[derive(Debug)]
pub struct SchemaRegistry {
    pub company_create: BodySchema,
    pub company_update: BodySchema,
    pub job_create: BodySchema,
    pub job_update: BodySchema,
}

impl SchemaRegistry {
    pub fn new() -> Result<Self, AppError> {
        Ok(SchemaRegistry {
            company_create: BodySchema::new(vec![
                FieldRule::new("handle", FieldType::String).required().length(1, 25),
                FieldRule::new("name", FieldType::String).required().length(1, 60),
                FieldRule::new("description", FieldType::String).required(),
                FieldRule::new("numEmployees", FieldType::Integer).minimum(0),
                FieldRule::new("logoUrl", FieldType::String),
            ]),
            company_update: BodySchema::new(vec![
                FieldRule::new("name", FieldType::String).length(1, 60),
                FieldRule::new("description", FieldType::String),
                FieldRule::new("numEmployees", FieldType::Integer).minimum(0),
                FieldRule::new("logoUrl", FieldType::String),
            ]),
            job_create: BodySchema::new(vec![
                FieldRule::new("title", FieldType::String).required().length(1, 100),
                FieldRule::new("companyHandle", FieldType::String).required(),
                FieldRule::new("salary", FieldType::Integer).minimum(0),
                FieldRule::new("equity", FieldType::String).pattern(EQUITY_PATTERN)?,
            ]),
            job_update: BodySchema::new(vec![
                FieldRule::new("title", FieldType::String).length(1, 100),
                FieldRule::new("salary", FieldType::Integer).minimum(0),
                FieldRule::new("equity", FieldType::String).pattern(EQUITY_PATTERN)?,
            ]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn body(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("test body must be an object"),
        }
    }

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new().unwrap()
    }

    #[test]
    fn company_create_requires_identity_fields() {
        let err = registry()
            .company_create
            .validate(&body(json!({"numEmployees": 10})))
            .unwrap_err();
        let AppError::Validation(messages) = err else {
            panic!("expected validation error");
        };
        assert_eq!(messages.len(), 3);
    }

    #[test]
    fn company_create_accepts_full_payload() {
        let payload = json!({
            "handle": "c1",
            "name": "C1",
            "description": "Desc1",
            "numEmployees": 1,
            "logoUrl": "http://c1.img"
        });
        assert!(registry().company_create.validate(&body(payload)).is_ok());
    }

    #[test]
    fn company_update_rejects_handle_change() {
        let err = registry()
            .company_update
            .validate(&body(json!({"handle": "c1-new", "name": "New"})))
            .unwrap_err();
        let AppError::Validation(messages) = err else {
            panic!("expected validation error");
        };
        assert_eq!(messages, vec!["unknown field: handle"]);
    }

    #[test]
    fn job_create_accepts_equity_strings() {
        for equity in ["0", "0.05", ".5", "0.999"] {
            let payload = json!({"title": "j", "companyHandle": "c1", "equity": equity});
            assert!(
                registry().job_create.validate(&body(payload)).is_ok(),
                "equity {equity} should pass"
            );
        }
    }

    #[test]
    fn job_create_rejects_out_of_range_equity() {
        for equity in ["1", "1.1", "2", "-0.1", "abc"] {
            let payload = json!({"title": "j", "companyHandle": "c1", "equity": equity});
            assert!(
                registry().job_create.validate(&body(payload)).is_err(),
                "equity {equity} should fail"
            );
        }
    }

    #[test]
    fn job_create_rejects_negative_salary() {
        let payload = json!({"title": "j", "companyHandle": "c1", "salary": -1});
        assert!(registry().job_create.validate(&body(payload)).is_err());
    }

    #[test]
    fn job_update_rejects_id_and_owning_handle() {
        let err = registry()
            .job_update
            .validate(&body(json!({"id": 3, "companyHandle": "c2", "title": "t"})))
            .unwrap_err();
        let AppError::Validation(messages) = err else {
            panic!("expected validation error");
        };
        assert_eq!(messages.len(), 2);
    }
}
