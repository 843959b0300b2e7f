//! Submission window state machine.
//!
//! A survey is `UPCOMING`, `OPEN` or `CLOSED` as a pure function of its
//! window bounds, the manual-close override, and a clock reading. The rule
//! is evaluated client-side for rendering only; every mutating handler
//! re-evaluates it with a fresh `Utc::now()` and rejects out-of-window
//! writes authoritatively.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::schema::{SubmissionWindow, SurveyDefinition};

/// Valid window state strings on the wire.
pub const STATE_UPCOMING: &str = "UPCOMING";
pub const STATE_OPEN: &str = "OPEN";
pub const STATE_CLOSED: &str = "CLOSED";

/// All valid window state strings.
pub const VALID_WINDOW_STATES: &[&str] = &[STATE_UPCOMING, STATE_OPEN, STATE_CLOSED];

/// The submission state of a survey at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WindowState {
    Upcoming,
    Open,
    Closed,
}

impl WindowState {
    /// Convert from a wire string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATE_UPCOMING => Ok(Self::Upcoming),
            STATE_OPEN => Ok(Self::Open),
            STATE_CLOSED => Ok(Self::Closed),
            _ => Err(format!(
                "Invalid window state '{s}'. Must be one of: {}",
                VALID_WINDOW_STATES.join(", ")
            )),
        }
    }

    /// Convert to the wire string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => STATE_UPCOMING,
            Self::Open => STATE_OPEN,
            Self::Closed => STATE_CLOSED,
        }
    }
}

/// Evaluate the window state for the given instant.
///
/// Precedence: manual close wins over everything; then the opening bound,
/// then the closing bound. A missing bound passes its check, and the
/// comparisons are inclusive, so a window is open at exactly its bounds.
pub fn window_state(
    manually_closed: bool,
    window: &SubmissionWindow,
    now: DateTime<Utc>,
) -> WindowState {
    if manually_closed {
        return WindowState::Closed;
    }
    if let Some(opens_at) = window.opens_at {
        if now < opens_at {
            return WindowState::Upcoming;
        }
    }
    if let Some(closes_at) = window.closes_at {
        if now > closes_at {
            return WindowState::Closed;
        }
    }
    WindowState::Open
}

impl SurveyDefinition {
    /// Evaluate this survey's window state at `now`.
    pub fn window_state(&self, now: DateTime<Utc>) -> WindowState {
        window_state(self.manually_closed, &self.window, now)
    }
}

/// Build the authoritative rejection for a non-open window.
///
/// The message carries the actual window bounds so the caller can surface
/// it verbatim to the end user.
pub fn window_closed_error(state: WindowState, window: &SubmissionWindow) -> CoreError {
    let message = match state {
        WindowState::Upcoming => format!(
            "Submission period has not started (window {} ~ {})",
            format_bound(window.opens_at),
            format_bound(window.closes_at),
        ),
        _ => format!(
            "Submission period has ended (window {} ~ {})",
            format_bound(window.opens_at),
            format_bound(window.closes_at),
        ),
    };
    CoreError::WindowClosed(message)
}

fn format_bound(bound: Option<DateTime<Utc>>) -> String {
    match bound {
        Some(instant) => instant.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => "-".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
