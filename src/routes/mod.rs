//! Routers for the HTTP surface.

mod common;
mod company;
mod job;

pub use common::common_routes;
pub use company::company_routes;
pub use job::job_routes;
