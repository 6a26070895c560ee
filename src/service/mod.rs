//! Request validation: declarative schemas evaluated before model operations.

pub mod schemas;
mod validation;

pub use schemas::SchemaRegistry;
pub use validation::{BodySchema, FieldRule, FieldType};
