//! # ReviewRadar Common Library
//!
//! Shared code for the ReviewRadar client crates:
//! - Analysis result schema and payload normalization
//! - Event types (SessionEvent enum) and the EventBus
//! - Configuration loading and API base URL resolution
//! - Common error type

pub mod config;
pub mod error;
pub mod events;
pub mod schema;

pub use error::{Error, Result};
pub use schema::{AnalysisResult, Insight, SchemaError, SourcedComment, Subscores};
