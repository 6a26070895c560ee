//! Declarative request-body validation.

use crate::error::AppError;
use regex::Regex;
use serde_json::{Map, Value};

/// Expected JSON type for a body field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
}

/// Constraints for one body field.
#[derive(Debug)]
pub struct FieldRule {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub minimum: Option<i64>,
    pub pattern: Option<Regex>,
}

impl FieldRule {
    pub fn new(name: &'static str, field_type: FieldType) -> Self {
        FieldRule {
            name,
            field_type,
            required: false,
            min_length: None,
            max_length: None,
            minimum: None,
            pattern: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    pub fn minimum(mut self, min: i64) -> Self {
        self.minimum = Some(min);
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Result<Self, AppError> {
        let re = Regex::new(pattern)
            .map_err(|e| AppError::BadRequest(format!("invalid pattern for {}: {}", self.name, e)))?;
        self.pattern = Some(re);
        Ok(self)
    }
}

/// A body schema: ordered field rules. Fields outside the rule set are
/// rejected, so immutable columns stay immutable by omission.
#[derive(Debug)]
pub struct BodySchema {
    fields: Vec<FieldRule>,
}

impl BodySchema {
    pub fn new(fields: Vec<FieldRule>) -> Self {
        BodySchema { fields }
    }

    /// Check `body` against every rule, collecting all failures into one
    /// validation error.
    pub fn validate(&self, body: &Map<String, Value>) -> Result<(), AppError> {
        let mut errors = Vec::new();
        for key in body.keys() {
            if !self.fields.iter().any(|f| f.name == key.as_str()) {
                errors.push(format!("unknown field: {}", key));
            }
        }
        for rule in &self.fields {
            match body.get(rule.name) {
                None | Some(Value::Null) => {
                    if rule.required {
                        errors.push(format!("{} is required", rule.name));
                    }
                }
                Some(v) => check_field(rule, v, &mut errors),
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

fn check_field(rule: &FieldRule, v: &Value, errors: &mut Vec<String>) {
    match rule.field_type {
        FieldType::String => {
            let Some(s) = v.as_str() else {
                errors.push(format!("{} must be a string", rule.name));
                return;
            };
            if let Some(min) = rule.min_length {
                if s.len() < min {
                    errors.push(format!("{} must be at least {} characters", rule.name, min));
                }
            }
            if let Some(max) = rule.max_length {
                if s.len() > max {
                    errors.push(format!("{} must be at most {} characters", rule.name, max));
                }
            }
            if let Some(re) = &rule.pattern {
                if !re.is_match(s) {
                    errors.push(format!("{} does not match required pattern", rule.name));
                }
            }
        }
        FieldType::Integer => {
            let Some(n) = v.as_i64() else {
                errors.push(format!("{} must be an integer", rule.name));
                return;
            };
            if let Some(min) = rule.minimum {
                if n < min {
                    errors.push(format!("{} must be at least {}", rule.name, min));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("test body must be an object"),
        }
    }

    fn schema() -> BodySchema {
        BodySchema::new(vec![
            FieldRule::new("name", FieldType::String).required().length(1, 10),
            FieldRule::new("count", FieldType::Integer).minimum(0),
        ])
    }

    #[test]
    fn passes_a_well_formed_body() {
        assert!(schema().validate(&body(json!({"name": "ok", "count": 3}))).is_ok());
    }

    #[test]
    fn missing_required_field_fails() {
        let err = schema().validate(&body(json!({"count": 3}))).unwrap_err();
        let AppError::Validation(messages) = err else {
            panic!("expected validation error");
        };
        assert_eq!(messages, vec!["name is required"]);
    }

    #[test]
    fn null_counts_as_missing_for_required() {
        assert!(schema().validate(&body(json!({"name": null}))).is_err());
    }

    #[test]
    fn null_is_accepted_for_optional_fields() {
        assert!(schema()
            .validate(&body(json!({"name": "ok", "count": null})))
            .is_ok());
    }

    #[test]
    fn wrong_types_are_reported() {
        let err = schema()
            .validate(&body(json!({"name": 5, "count": "three"})))
            .unwrap_err();
        let AppError::Validation(messages) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            messages,
            vec!["name must be a string", "count must be an integer"]
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = schema()
            .validate(&body(json!({"name": "ok", "extra": 1})))
            .unwrap_err();
        let AppError::Validation(messages) = err else {
            panic!("expected validation error");
        };
        assert_eq!(messages, vec!["unknown field: extra"]);
    }

    #[test]
    fn length_and_minimum_bounds_enforced() {
        let err = schema()
            .validate(&body(json!({"name": "far-too-long-name", "count": -1})))
            .unwrap_err();
        let AppError::Validation(messages) = err else {
            panic!("expected validation error");
        };
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn all_failures_are_collected() {
        let err = schema()
            .validate(&body(json!({"count": -1, "extra": true})))
            .unwrap_err();
        let AppError::Validation(messages) = err else {
            panic!("expected validation error");
        };
        assert_eq!(messages.len(), 3);
    }

    #[test]
    fn pattern_mismatch_is_reported() {
        let rule = FieldRule::new("code", FieldType::String)
            .pattern(r"^[a-z]+$")
            .unwrap();
        let schema = BodySchema::new(vec![rule]);
        assert!(schema.validate(&body(json!({"code": "abc"}))).is_ok());
        assert!(schema.validate(&body(json!({"code": "ABC"}))).is_err());
    }
}
