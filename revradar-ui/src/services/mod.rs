//! Services for revradar-ui
//!
//! - `analysis_client`: backend seam, HTTP implementation and the request dispatcher
//! - `fallback_reveal`: two-phase reveal for results without review data
//! - `session_orchestrator`: the AnalysisSession state machine
//! - `similar_products`: similar-product chaining
//! - `scheduled_task`: revocable one-shot timers

pub mod analysis_client;
pub mod fallback_reveal;
pub mod scheduled_task;
pub mod session_orchestrator;
pub mod similar_products;

pub use analysis_client::{AnalysisBackend, HttpAnalysisBackend, RequestDispatcher};
pub use fallback_reveal::{FallbackRevealController, RevealPlan};
pub use scheduled_task::ScheduledTask;
pub use session_orchestrator::{AnalysisSession, RevealTiming};
pub use similar_products::SimilarProductChainer;
