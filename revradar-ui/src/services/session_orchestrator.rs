//! Analysis session orchestrator
//!
//! Owns the [`SearchSession`] of one view and is the only component that
//! mutates it. Every transition happens under a single async lock, so
//! dispatch completions and timer callbacks are applied one at a time in
//! the order they acquire the lock.
//!
//! # Transitions
//! - `submit(query)`: any state → Loading. Bumps the sequence token, revokes
//!   the pending fallback settle and chain timers, then dispatches.
//! - dispatch success → Success (direct or staged fallback reveal)
//! - dispatch failure → Error
//!
//! Completions carry the sequence of the submission that issued them. A
//! completion whose sequence is no longer current is discarded without
//! touching the session; the in-flight request itself is never aborted.

use crate::error::DispatchError;
use crate::models::SearchSession;
use crate::services::analysis_client::{AnalysisBackend, RequestDispatcher};
use crate::services::fallback_reveal::{FallbackRevealController, RevealPlan, FALLBACK_SETTLE_DELAY};
use crate::services::scheduled_task::ScheduledTask;
use crate::services::similar_products::{PendingChain, CHAIN_DELAY};
use chrono::Utc;
use revradar_common::events::{EventBus, RevealPhase, SessionEvent};
use revradar_common::AnalysisResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Fixed delays used by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTiming {
    /// Interim → authoritative delay for fallback reveals
    pub settle_delay: Duration,
    /// Similar-product selection → chained submission delay
    pub chain_delay: Duration,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            settle_delay: FALLBACK_SETTLE_DELAY,
            chain_delay: CHAIN_DELAY,
        }
    }
}

/// Mutable state guarded by the session lock
pub(crate) struct SessionCore {
    pub(crate) session: SearchSession,
    /// Pending fallback settle publish, revoked on drop
    pub(crate) fallback_timer: Option<ScheduledTask>,
    /// Pending chained submission, revoked on drop
    pub(crate) pending_chain: Option<PendingChain>,
    /// Identifies the most recently scheduled chain
    pub(crate) chain_generation: u64,
}

pub(crate) struct SessionInner {
    pub(crate) dispatcher: RequestDispatcher,
    pub(crate) fallback: FallbackRevealController,
    pub(crate) chain_delay: Duration,
    pub(crate) event_bus: EventBus,
    pub(crate) session_id: Uuid,
    state_tx: watch::Sender<SearchSession>,
    pub(crate) core: Mutex<SessionCore>,
}

/// Search/analysis session state machine
///
/// Cheap to clone; clones drive the same session.
#[derive(Clone)]
pub struct AnalysisSession {
    pub(crate) inner: Arc<SessionInner>,
}

impl AnalysisSession {
    /// Create an Idle session with the standard delays
    pub fn new(backend: Arc<dyn AnalysisBackend>, event_bus: EventBus) -> Self {
        Self::with_timing(backend, event_bus, RevealTiming::default())
    }

    pub fn with_timing(backend: Arc<dyn AnalysisBackend>, event_bus: EventBus, timing: RevealTiming) -> Self {
        let session = SearchSession::new();
        let session_id = session.session_id();
        let (state_tx, _) = watch::channel(session.clone());

        Self {
            inner: Arc::new(SessionInner {
                dispatcher: RequestDispatcher::new(backend),
                fallback: FallbackRevealController::new(timing.settle_delay),
                chain_delay: timing.chain_delay,
                event_bus,
                session_id,
                state_tx,
                core: Mutex::new(SessionCore {
                    session,
                    fallback_timer: None,
                    pending_chain: None,
                    chain_generation: 0,
                }),
            }),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.inner.session_id
    }

    /// Latest published session state
    pub fn snapshot(&self) -> SearchSession {
        self.inner.state_tx.borrow().clone()
    }

    /// Read-only view that updates on every published transition
    pub fn watch(&self) -> watch::Receiver<SearchSession> {
        self.inner.state_tx.subscribe()
    }

    /// Subscribe to session events (scroll requests, reveal progress, ...)
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.event_bus.subscribe()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }

    /// Submit a search, superseding whatever the session was doing
    ///
    /// Returns the new sequence token. The session is already Loading when
    /// this returns; the analysis itself completes in the background.
    ///
    /// # Errors
    /// `DispatchError::Validation` if `query` is blank. The session is left
    /// untouched and no request is made.
    pub async fn submit(&self, query: &str) -> Result<u64, DispatchError> {
        if let Err(err) = RequestDispatcher::validate_query(query) {
            debug!(session_id = %self.inner.session_id, "Ignoring blank search query");
            return Err(err);
        }

        let mut core = self.inner.core.lock().await;
        Ok(self.begin_submission(&mut core, query))
    }

    /// Enter Loading and dispatch; `query` must already be validated
    pub(crate) fn begin_submission(&self, core: &mut SessionCore, query: &str) -> u64 {
        // Revoke timers from the previous cycle
        if core.fallback_timer.take().is_some() {
            debug!(session_id = %self.inner.session_id, "Revoked pending fallback settle");
        }
        if let Some(chain) = core.pending_chain.take() {
            debug!(
                session_id = %self.inner.session_id,
                product = %chain.product_name,
                "Revoked pending chained search"
            );
        }

        let sequence = core.session.begin(query);

        info!(
            session_id = %self.inner.session_id,
            sequence,
            query,
            "Search submitted"
        );

        self.emit(SessionEvent::SearchStarted {
            session_id: self.inner.session_id,
            sequence,
            query: query.to_string(),
            timestamp: Utc::now(),
        });
        self.publish(core);

        let session = self.clone();
        let query = query.to_string();
        tokio::spawn(async move {
            let outcome = session.inner.dispatcher.submit(&query).await;
            session.complete(sequence, outcome).await;
        });

        sequence
    }

    /// Apply a dispatch outcome, unless it has been superseded
    async fn complete(&self, sequence: u64, outcome: Result<AnalysisResult, DispatchError>) {
        let mut core = self.inner.core.lock().await;

        if !core.session.is_awaiting(sequence) {
            let current_sequence = core.session.sequence();
            debug!(
                session_id = %self.inner.session_id,
                sequence,
                current_sequence,
                "Discarding stale completion"
            );
            self.emit(SessionEvent::StaleCompletionDiscarded {
                session_id: self.inner.session_id,
                sequence,
                current_sequence,
                timestamp: Utc::now(),
            });
            return;
        }

        match outcome {
            Ok(result) => {
                let plan = self.inner.fallback.plan(result);
                let phase = plan.initial_phase();

                match plan {
                    RevealPlan::Direct(result) => {
                        core.session.succeed(result, phase);
                    }
                    RevealPlan::Staged { interim, authoritative } => {
                        core.session.succeed(interim, phase);
                        let session = self.clone();
                        core.fallback_timer = Some(self.inner.fallback.stage(async move {
                            session.settle_fallback(sequence, authoritative).await;
                        }));
                    }
                }

                info!(
                    session_id = %self.inner.session_id,
                    sequence,
                    phase = %phase,
                    "Analysis published"
                );
                self.emit_reveal(sequence, phase);
            }
            Err(err) => {
                warn!(
                    session_id = %self.inner.session_id,
                    sequence,
                    error = %err,
                    "Analysis failed"
                );
                let message = err.user_message();
                core.session.fail(message.clone());
                self.emit(SessionEvent::SearchFailed {
                    session_id: self.inner.session_id,
                    sequence,
                    message,
                    timestamp: Utc::now(),
                });
            }
        }

        self.publish(&core);
    }

    /// Second phase of a fallback reveal
    async fn settle_fallback(&self, sequence: u64, authoritative: AnalysisResult) {
        let mut core = self.inner.core.lock().await;

        if core.session.sequence() != sequence
            || core.session.reveal_phase() != Some(RevealPhase::StagingFallback)
        {
            debug!(
                session_id = %self.inner.session_id,
                sequence,
                "Fallback settle superseded"
            );
            return;
        }

        core.fallback_timer = None;
        core.session.succeed(authoritative, RevealPhase::SettledFallback);

        info!(session_id = %self.inner.session_id, sequence, "Fallback reveal settled");
        self.emit_reveal(sequence, RevealPhase::SettledFallback);
        self.publish(&core);
    }

    fn emit_reveal(&self, sequence: u64, phase: RevealPhase) {
        self.emit(SessionEvent::RevealPublished {
            session_id: self.inner.session_id,
            sequence,
            phase,
            timestamp: Utc::now(),
        });
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        self.inner.event_bus.emit_lossy(event);
    }

    fn publish(&self, core: &SessionCore) {
        // send_replace updates the value even when no renderer is watching
        self.inner.state_tx.send_replace(core.session.clone());
    }
}
