//! Shared application state for all routes.

use crate::service::SchemaRegistry;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Body schemas, built once at startup.
    pub schemas: Arc<SchemaRegistry>,
}
