//! Job routes.

use crate::handlers::job::{create, get as get_job, list, remove, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn job_routes(state: AppState) -> Router {
    Router::new()
        .route("/jobs", get(list).post(create))
        .route("/jobs/:id", get(get_job).patch(update).delete(remove))
        .with_state(state)
}
