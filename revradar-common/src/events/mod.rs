//! Event types for the ReviewRadar event system
//!
//! Provides the session event definitions and the EventBus used to signal
//! renderers (scroll requests, reveal progress, failures).

mod session_types;

pub use session_types::{RevealPhase, SessionStatus};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Session event types
///
/// Broadcast via EventBus. Renderers subscribe; only the session
/// orchestration emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// New submission accepted, session is Loading
    SearchStarted {
        session_id: Uuid,
        /// Sequence token assigned to this submission
        sequence: u64,
        query: String,
        timestamp: DateTime<Utc>,
    },

    /// A result was published to the session
    ///
    /// Emitted twice for a fallback reveal (StagingFallback, then
    /// SettledFallback), once otherwise.
    RevealPublished {
        session_id: Uuid,
        sequence: u64,
        phase: RevealPhase,
        timestamp: DateTime<Utc>,
    },

    /// Submission failed, session is in Error
    SearchFailed {
        session_id: Uuid,
        sequence: u64,
        /// User-facing message recorded on the session
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// A superseded request completed and was ignored
    StaleCompletionDiscarded {
        session_id: Uuid,
        /// Sequence of the completing request
        sequence: u64,
        /// Sequence the session had moved on to
        current_sequence: u64,
        timestamp: DateTime<Utc>,
    },

    /// Renderer should smooth-scroll back to the top of the view
    ScrollToTop {
        session_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// A similar product was selected and will be searched after a delay
    ChainScheduled {
        session_id: Uuid,
        product_name: String,
        delay_ms: u64,
        timestamp: DateTime<Utc>,
    },
}

impl SessionEvent {
    /// Event type name, matching the serialized `type` tag
    pub fn event_type(&self) -> &'static str {
        match self {
            SessionEvent::SearchStarted { .. } => "SearchStarted",
            SessionEvent::RevealPublished { .. } => "RevealPublished",
            SessionEvent::SearchFailed { .. } => "SearchFailed",
            SessionEvent::StaleCompletionDiscarded { .. } => "StaleCompletionDiscarded",
            SessionEvent::ScrollToTop { .. } => "ScrollToTop",
            SessionEvent::ChainScheduled { .. } => "ChainScheduled",
        }
    }
}

/// Central event distribution bus
///
/// Thin wrapper over a tokio broadcast channel. Cloning shares the channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events to buffer before lagging receivers drop old events
    ///
    /// # Examples
    ///
    /// ```
    /// use revradar_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(64);
    /// assert_eq!(event_bus.subscriber_count(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: SessionEvent,
    ) -> Result<usize, broadcast::error::SendError<SessionEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
