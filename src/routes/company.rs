//! Company routes.

use crate::handlers::company::{create, get as get_company, list, remove, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn company_routes(state: AppState) -> Router {
    Router::new()
        .route("/companies", get(list).post(create))
        .route(
            "/companies/:handle",
            get(get_company).patch(update).delete(remove),
        )
        .with_state(state)
}
