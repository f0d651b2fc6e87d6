//! Similar-product chaining
//!
//! Selecting a suggested product asks the renderer to scroll back to the
//! top, then re-enters the search cycle with that product as the query
//! once the scroll has had time to settle.
//!
//! At most one chained search is pending. Selecting again replaces it and
//! restarts the delay; a manual submission in the meantime revokes it.

use crate::error::DispatchError;
use crate::services::analysis_client::RequestDispatcher;
use crate::services::scheduled_task::ScheduledTask;
use crate::services::session_orchestrator::AnalysisSession;
use chrono::Utc;
use revradar_common::events::SessionEvent;
use std::time::Duration;
use tracing::{debug, info};

/// Scroll settle delay before a chained search is submitted
pub const CHAIN_DELAY: Duration = Duration::from_millis(500);

/// Chained search waiting for its delay to elapse
pub(crate) struct PendingChain {
    pub(crate) generation: u64,
    pub(crate) product_name: String,
    /// Held only to keep the timer alive; dropping revokes it
    _timer: ScheduledTask,
}

/// Turns a similar-product selection into a new search cycle
#[derive(Clone)]
pub struct SimilarProductChainer {
    session: AnalysisSession,
}

impl SimilarProductChainer {
    pub fn new(session: AnalysisSession) -> Self {
        Self { session }
    }

    /// Select a suggested product
    ///
    /// Emits `ScrollToTop` immediately and submits `product_name` after the
    /// chain delay.
    ///
    /// # Errors
    /// `DispatchError::Validation` for a blank name; nothing is emitted or
    /// scheduled.
    pub async fn select(&self, product_name: &str) -> Result<(), DispatchError> {
        RequestDispatcher::validate_query(product_name)?;
        self.session.schedule_chain(product_name).await;
        Ok(())
    }

    /// Product whose chained search is still waiting, if any
    pub async fn pending_product(&self) -> Option<String> {
        let core = self.session.inner.core.lock().await;
        core.pending_chain.as_ref().map(|chain| chain.product_name.clone())
    }
}

impl AnalysisSession {
    pub(crate) async fn schedule_chain(&self, product_name: &str) {
        let mut core = self.inner.core.lock().await;
        let session_id = self.inner.session_id;

        self.emit(SessionEvent::ScrollToTop {
            session_id,
            timestamp: Utc::now(),
        });

        core.chain_generation += 1;
        let generation = core.chain_generation;

        let session = self.clone();
        let timer = ScheduledTask::spawn(self.inner.chain_delay, async move {
            session.fire_chain(generation).await;
        });

        let previous = core.pending_chain.replace(PendingChain {
            generation,
            product_name: product_name.to_string(),
            _timer: timer,
        });
        if let Some(previous) = previous {
            debug!(
                session_id = %session_id,
                replaced = %previous.product_name,
                "Replaced pending chained search"
            );
        }

        info!(
            session_id = %session_id,
            product = product_name,
            delay_ms = self.inner.chain_delay.as_millis() as u64,
            "Chained search scheduled"
        );

        self.emit(SessionEvent::ChainScheduled {
            session_id,
            product_name: product_name.to_string(),
            delay_ms: self.inner.chain_delay.as_millis() as u64,
            timestamp: Utc::now(),
        });
    }

    async fn fire_chain(&self, generation: u64) {
        let mut core = self.inner.core.lock().await;

        // Revoked or replaced between the timer firing and taking the lock
        let pending = match core.pending_chain.take() {
            Some(chain) if chain.generation == generation => chain,
            other => {
                core.pending_chain = other;
                return;
            }
        };

        info!(
            session_id = %self.inner.session_id,
            product = %pending.product_name,
            "Submitting chained search"
        );
        self.begin_submission(&mut core, &pending.product_name);
    }
}
