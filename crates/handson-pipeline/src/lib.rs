//! HandsOn Pipeline — activity recognition, matching, filtering and generation.
//!
//! Every entry point is sequential: each model call is awaited before the
//! next chunk is sent.

pub mod filter;
pub mod generator;
pub mod matcher;
pub mod pipeline;
pub mod prompts;
pub mod recognizer;
pub mod reply;
pub mod report;
pub mod store;

#[cfg(test)]
mod testing;

pub use matcher::{names_match, normalize_name};
pub use pipeline::{filter, spawn_filter, FilterRequest, MatchRequest, Pipeline, GENERATED_FILE, MATCHED_FILE};
pub use report::{PipelineReport, ReportStatus, INVALID_TWO_PATHS};
