//! Job board REST backend: companies and jobs over PostgreSQL.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use error::AppError;
pub use models::{Company, Job};
pub use routes::{common_routes, company_routes, job_routes};
pub use service::SchemaRegistry;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables};
