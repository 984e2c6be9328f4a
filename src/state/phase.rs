/// Crawl phase definitions
///
/// A crawl moves `Idle → Running → {Completed, Exhausted, Cancelled}` and
/// never leaves a terminal phase.
use serde::Serialize;
use std::fmt;

/// Represents the lifecycle phase of a single crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlPhase {
    /// State created, loop not started
    Idle,

    /// Loop is dispatching and collecting fetches
    Running,

    // ===== Terminal States =====
    /// Frontier emptied before the budget was reached
    Completed,

    /// Budget reached with URLs still waiting in the frontier
    Exhausted,

    /// Stopped by cancellation (deadline, Ctrl-C) before finishing
    Cancelled,
}

impl CrawlPhase {
    /// Returns true if this is a terminal phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Exhausted | Self::Cancelled)
    }

    /// Returns true if moving from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::Exhausted)
                | (Self::Running, Self::Cancelled)
        )
    }

    /// Converts the phase to its report/database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Exhausted => "exhausted",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a phase from its string representation
    ///
    /// Returns None if the string doesn't match any known phase.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "idle" => Some(Self::Idle),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "exhausted" => Some(Self::Exhausted),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns all phases
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::Idle,
            Self::Running,
            Self::Completed,
            Self::Exhausted,
            Self::Cancelled,
        ]
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
