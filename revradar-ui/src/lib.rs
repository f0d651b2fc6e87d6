//! revradar-ui library interface
//!
//! Search/analysis orchestration for the ReviewRadar front end: request
//! dispatch, the fallback reveal, the session state machine and
//! similar-product chaining. Exposed as a library for integration testing
//! and for the terminal front end in `main.rs` (flow in [`front_end`]).

pub mod config;
pub mod error;
pub mod front_end;
pub mod models;
pub mod report;
pub mod services;

pub use crate::error::DispatchError;
pub use crate::models::{SearchSession, SessionState};
pub use crate::services::{
    AnalysisBackend, AnalysisSession, FallbackRevealController, HttpAnalysisBackend, RequestDispatcher,
    ScheduledTask, SimilarProductChainer,
};
