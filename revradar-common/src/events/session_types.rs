//! Session-related type definitions
//!
//! Supporting types for the search/analysis session lifecycle.

use serde::{Deserialize, Serialize};

/// Session status enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub enum SessionStatus {
    /// No search submitted yet
    Idle,
    /// Analysis request in flight
    Loading,
    /// Result published
    Success,
    /// Last submission failed
    Error,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Idle => write!(f, "Idle"),
            SessionStatus::Loading => write!(f, "Loading"),
            SessionStatus::Success => write!(f, "Success"),
            SessionStatus::Error => write!(f, "Error"),
        }
    }
}

/// How a successful result is being revealed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub enum RevealPhase {
    /// Reviews found, result shown as received
    Direct,
    /// No reviews found, zeroed interim result shown while general info "generates"
    StagingFallback,
    /// No reviews found, authoritative result shown after the settle delay
    SettledFallback,
}

impl RevealPhase {
    /// True for both fallback phases
    pub fn is_fallback(&self) -> bool {
        matches!(self, RevealPhase::StagingFallback | RevealPhase::SettledFallback)
    }
}

impl std::fmt::Display for RevealPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RevealPhase::Direct => write!(f, "Direct"),
            RevealPhase::StagingFallback => write!(f, "StagingFallback"),
            RevealPhase::SettledFallback => write!(f, "SettledFallback"),
        }
    }
}
