//! Fallback reveal for results without review data
//!
//! When the backend found no reviews (`rating == 0` and no comments), it
//! still returns a general-purpose AI summary. Rather than flashing an
//! empty-data view, the result is revealed in two phases:
//!
//! 1. A zeroed interim result is published immediately (StagingFallback).
//! 2. After a single settle delay the authoritative result replaces it
//!    (SettledFallback).
//!
//! Results with review data are published directly with no delay.

use crate::services::scheduled_task::ScheduledTask;
use revradar_common::events::RevealPhase;
use revradar_common::AnalysisResult;
use std::future::Future;
use std::time::Duration;

/// Delay between the interim and the authoritative fallback publish
pub const FALLBACK_SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// How a received result should be revealed
#[derive(Debug, Clone, PartialEq)]
pub enum RevealPlan {
    /// Publish as-is
    Direct(AnalysisResult),
    /// Publish `interim` now, `authoritative` after the settle delay
    Staged {
        interim: AnalysisResult,
        authoritative: AnalysisResult,
    },
}

impl RevealPlan {
    /// Phase of the first publish under this plan
    pub fn initial_phase(&self) -> RevealPhase {
        match self {
            RevealPlan::Direct(_) => RevealPhase::Direct,
            RevealPlan::Staged { .. } => RevealPhase::StagingFallback,
        }
    }
}

/// Decides direct vs. staged reveal and owns the settle timing
#[derive(Debug, Clone, Copy)]
pub struct FallbackRevealController {
    settle_delay: Duration,
}

impl FallbackRevealController {
    pub fn new(settle_delay: Duration) -> Self {
        Self { settle_delay }
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Plan the reveal of an authoritative result
    pub fn plan(&self, result: AnalysisResult) -> RevealPlan {
        if result.has_no_review_data() {
            tracing::debug!("No review data in result, staging fallback reveal");
            RevealPlan::Staged {
                interim: result.zeroed_interim(),
                authoritative: result,
            }
        } else {
            RevealPlan::Direct(result)
        }
    }

    /// Schedule the settle publish; dropping the handle revokes it
    pub fn stage<F>(&self, on_settle: F) -> ScheduledTask
    where
        F: Future<Output = ()> + Send + 'static,
    {
        ScheduledTask::spawn(self.settle_delay, on_settle)
    }
}

impl Default for FallbackRevealController {
    fn default() -> Self {
        Self::new(FALLBACK_SETTLE_DELAY)
    }
}
