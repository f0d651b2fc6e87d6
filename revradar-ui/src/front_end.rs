//! Terminal front-end flow
//!
//! Drives one `analyze` invocation: submit, print every published
//! snapshot until the session comes to rest, optionally chain into a
//! suggested product, and report the final outcome. The binary only
//! wires configuration and output streams around [`run_analyze`].

use crate::error::DispatchError;
use crate::models::SearchSession;
use crate::report;
use crate::services::{AnalysisSession, SimilarProductChainer};
use revradar_common::events::{RevealPhase, SessionEvent, SessionStatus};
use std::io::Write;
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tracing::info;

/// How snapshots are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain-text report
    Text,
    /// One JSON object per line
    Json,
}

/// Why an `analyze` run did not end in Success
#[derive(Debug, Error)]
pub enum FrontEndError {
    /// Submission or selection refused before dispatch
    #[error("{}", .0.user_message())]
    Rejected(DispatchError),

    /// The search ended in the Error state
    #[error("{0}")]
    SearchFailed(String),

    /// `--follow N` points past the suggestions (N is 1-based)
    #[error("No similar product #{index} to follow")]
    NoSuchSuggestion { index: usize },

    #[error("Session closed")]
    SessionClosed,

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to encode session snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// True once nothing further will be published without a new submission
pub fn is_at_rest(session: &SearchSession) -> bool {
    match session.status() {
        SessionStatus::Error => true,
        SessionStatus::Success => session.reveal_phase() != Some(RevealPhase::StagingFallback),
        SessionStatus::Idle | SessionStatus::Loading => false,
    }
}

/// Suggested product at 1-based `index` of a settled session
///
/// A failed session reports its own error rather than a missing suggestion.
pub fn follow_target(session: &SearchSession, index: usize) -> Result<String, FrontEndError> {
    if let Some(message) = session.error_message() {
        return Err(FrontEndError::SearchFailed(message.to_string()));
    }

    session
        .result()
        .and_then(|result| index.checked_sub(1).and_then(|i| result.similar_products.get(i)))
        .cloned()
        .ok_or(FrontEndError::NoSuchSuggestion { index })
}

/// Run one search (plus an optional chained follow) to rest
///
/// Returns the final Success snapshot. An Error state ends the run with
/// `FrontEndError::SearchFailed` carrying the session's message.
pub async fn run_analyze<W: Write>(
    session: &AnalysisSession,
    query: &str,
    follow: Option<usize>,
    format: OutputFormat,
    out: &mut W,
) -> Result<SearchSession, FrontEndError> {
    let chainer = SimilarProductChainer::new(session.clone());
    let mut states = session.watch();
    let mut events = session.events();

    session.submit(query).await.map_err(FrontEndError::Rejected)?;
    let mut settled = print_until_settled(&mut states, format, out).await?;

    if let Some(index) = follow {
        let product = follow_target(&settled, index)?;

        chainer.select(&product).await.map_err(FrontEndError::Rejected)?;
        wait_for_scroll(&mut events).await?;
        info!(product = %product, index, "Following similar product");

        settled = print_until_settled(&mut states, format, out).await?;
    }

    match settled.error_message() {
        Some(message) => Err(FrontEndError::SearchFailed(message.to_string())),
        None => Ok(settled),
    }
}

/// Write every observed snapshot until the session is at rest
pub async fn print_until_settled<W: Write>(
    states: &mut watch::Receiver<SearchSession>,
    format: OutputFormat,
    out: &mut W,
) -> Result<SearchSession, FrontEndError> {
    loop {
        states.changed().await.map_err(|_| FrontEndError::SessionClosed)?;
        let snapshot = states.borrow_and_update().clone();

        match format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&snapshot)?)?,
            OutputFormat::Text => writeln!(out, "{}", report::render_session(&snapshot))?,
        }

        if is_at_rest(&snapshot) {
            return Ok(snapshot);
        }
    }
}

async fn wait_for_scroll(events: &mut broadcast::Receiver<SessionEvent>) -> Result<(), FrontEndError> {
    loop {
        match events.recv().await {
            Ok(SessionEvent::ScrollToTop { .. }) => return Ok(()),
            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => return Err(FrontEndError::SessionClosed),
        }
    }
}
