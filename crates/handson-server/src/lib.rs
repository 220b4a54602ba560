//! HandsOn server — HTTP API, agent tools and command line.

pub mod cli;
pub mod routes;
pub mod state;
pub mod tools;

pub use routes::build_router;
pub use state::{build_pipeline, AppState};
