//! Plain-text session report
//!
//! Renders a [`SearchSession`] snapshot for the terminal front end. Reads
//! the session only.

use crate::models::{SearchSession, SessionState};
use revradar_common::events::RevealPhase;
use revradar_common::schema::MAX_SCORE;
use revradar_common::{AnalysisResult, Insight};
use std::fmt::Write;

/// Five-star bar, rounded to the nearest half star
pub fn star_bar(score: f64) -> String {
    let halves = (score.clamp(0.0, MAX_SCORE) * 2.0).round() as usize;
    let full = halves / 2;
    let half = halves % 2;
    let empty = MAX_SCORE as usize - full - half;

    format!("{}{}{}", "★".repeat(full), "⯪".repeat(half), "☆".repeat(empty))
}

/// Render the whole session
pub fn render_session(session: &SearchSession) -> String {
    match session.state() {
        SessionState::Idle => "Enter a product name to analyze reviews.".to_string(),
        SessionState::Loading => format!("Analyzing \"{}\"...", session.query()),
        SessionState::Error { message } => format!("Error: {}", message),
        SessionState::Success { result, reveal_phase } => render_result(session.query(), result, *reveal_phase),
    }
}

fn render_result(query: &str, result: &AnalysisResult, phase: RevealPhase) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "== {} ==", query);

    if phase == RevealPhase::StagingFallback {
        let _ = writeln!(out, "No Reddit reviews found. Generating general product info...");
        return out;
    }

    if phase.is_fallback() {
        let _ = writeln!(out, "No Reddit reviews found; showing general product info.");
    } else {
        let _ = writeln!(out, "Rating: {} {:.1}/5", star_bar(result.rating), result.rating);
        for (label, value) in result.subscores.labeled() {
            let _ = writeln!(out, "  {:<13}{} {:.1}", label, star_bar(value), value);
        }
    }

    if !result.summary.is_empty() {
        let _ = writeln!(out, "\nSummary:\n{}", result.summary.trim());
    }

    if !result.comments.is_empty() {
        let _ = writeln!(out, "\nTop comments:");
        for (index, comment) in result.comments.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", index + 1, comment.text.trim());
            let _ = writeln!(out, "     {}", comment.source_url);
        }
    }

    write_insights(&mut out, "Pros", &result.pros);
    write_insights(&mut out, "Cons", &result.cons);

    if !result.similar_products.is_empty() {
        let _ = writeln!(out, "\nSimilar products:");
        for (index, product) in result.similar_products.iter().enumerate() {
            let _ = writeln!(out, "  [{}] {}", index + 1, product);
        }
    }

    out
}

fn write_insights(out: &mut String, heading: &str, insights: &[Insight]) {
    if insights.is_empty() {
        return;
    }

    let _ = writeln!(out, "\n{}:", heading);
    for insight in insights {
        match &insight.source_url {
            Some(url) => {
                let _ = writeln!(out, "  - {} ({})", insight.text, url);
            }
            None => {
                let _ = writeln!(out, "  - {}", insight.text);
            }
        }
    }
}
