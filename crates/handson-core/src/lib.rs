//! HandsOn Core — activity data model, configuration, error types.

pub mod activity;
pub mod config;
pub mod error;

pub use activity::{Activity, MatchRecord, PageRef, PageTextMap};
pub use config::{DataPaths, HandsOnConfig, PipelineOptions};
pub use error::{Error, Result};
