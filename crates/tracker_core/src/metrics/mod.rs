//! Derived project metrics: actual progress, expected progress, status.
//!
//! # Responsibility
//! - Blend task and milestone completion into one project percentage.
//! - Project where progress should be at a given instant.
//! - Classify a project as ahead of, on, or behind schedule.
//!
//! # Invariants
//! - Every function here is pure apart from the wall-clock wrappers
//!   (`calculate_expected_progress`, `get_project_status`).
//! - No function fails. Missing task fields fall back to documented
//!   defaults; unparseable dates flow through the arithmetic as NaN.
//! - Percentages round half up (`floor(x + 0.5)`), never re-clamped.

use crate::model::milestone::Milestone;
use crate::model::task::Task;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

mod expected;
mod progress;
mod status;

pub use expected::{calculate_expected_progress, calculate_expected_progress_at};
pub use progress::calculate_project_progress;
pub use status::{classify_progress, get_project_status, get_project_status_at, ProjectStatus};

pub(crate) const MS_PER_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;

/// Task fields read by the metrics.
pub trait TaskSample {
    fn start_date(&self) -> &str;
    fn end_date(&self) -> &str;
    /// Planned length in days. Absent, zero or NaN weighs as 1.
    fn duration(&self) -> Option<f64>;
    /// Completion in `[0, 100]`. Absent or NaN counts as 0.
    fn progress(&self) -> Option<f64>;
}

/// Milestone fields read by the metrics.
pub trait MilestoneSample {
    /// `1` means complete; every other value is incomplete.
    fn complete(&self) -> i64;
}

impl TaskSample for Task {
    fn start_date(&self) -> &str {
        &self.fields.start_date
    }

    fn end_date(&self) -> &str {
        &self.fields.end_date
    }

    fn duration(&self) -> Option<f64> {
        self.fields.duration
    }

    fn progress(&self) -> Option<f64> {
        self.fields.progress
    }
}

impl MilestoneSample for Milestone {
    fn complete(&self) -> i64 {
        self.fields.complete
    }
}

/// Free-standing task snapshot for callers without persisted rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskSnapshot {
    pub start_date: String,
    pub end_date: String,
    pub duration: Option<f64>,
    pub progress: Option<f64>,
}

impl TaskSnapshot {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            duration: None,
            progress: None,
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }
}

impl TaskSample for TaskSnapshot {
    fn start_date(&self) -> &str {
        &self.start_date
    }

    fn end_date(&self) -> &str {
        &self.end_date
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn progress(&self) -> Option<f64> {
        self.progress
    }
}

/// Free-standing milestone snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MilestoneSnapshot {
    pub complete: i64,
}

impl MilestoneSnapshot {
    pub fn complete() -> Self {
        Self { complete: 1 }
    }

    pub fn incomplete() -> Self {
        Self { complete: 0 }
    }
}

impl MilestoneSample for MilestoneSnapshot {
    fn complete(&self) -> i64 {
        self.complete
    }
}

/// All derived values for one project at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectMetrics {
    pub progress: i64,
    pub expected_progress: i64,
    pub status: ProjectStatus,
}

/// Computes progress, expected progress and status against `now`.
pub fn project_metrics_at<T: TaskSample, M: MilestoneSample>(
    tasks: &[T],
    milestones: &[M],
    now: DateTime<Utc>,
) -> ProjectMetrics {
    ProjectMetrics {
        progress: calculate_project_progress(tasks, milestones),
        expected_progress: calculate_expected_progress_at(tasks, milestones, now),
        status: get_project_status_at(tasks, milestones, now),
    }
}

/// `min(max(value, min), max)` with NaN passing through unchanged.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return value;
    }
    value.max(min).min(max)
}

/// Rounds half up: `2.5 -> 3`, `-2.5 -> -2`. NaN stays NaN.
pub(crate) fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Percentage of milestones marked complete, `None` when there are none.
pub(crate) fn milestone_completion<M: MilestoneSample>(milestones: &[M]) -> Option<f64> {
    if milestones.is_empty() {
        return None;
    }
    let completed = milestones.iter().filter(|m| m.complete() == 1).count();
    Some(completed as f64 / milestones.len() as f64 * 100.0)
}

/// Blends the two components: the mean when both exist, otherwise whichever
/// exists, otherwise 0. Result is rounded half up.
pub(crate) fn blend(task_component: Option<f64>, milestone_component: Option<f64>) -> f64 {
    match (task_component, milestone_component) {
        (None, None) => 0.0,
        (None, Some(milestone)) => round_half_up(milestone),
        (Some(task), None) => round_half_up(task),
        (Some(task), Some(milestone)) => round_half_up((task + milestone) / 2.0),
    }
}

/// Epoch milliseconds for a stored date, NaN when it does not parse.
///
/// `YYYY-MM-DD` is UTC midnight; full RFC 3339 timestamps are also accepted.
pub(crate) fn date_millis(value: &str) -> f64 {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return midnight.and_utc().timestamp_millis() as f64;
        }
    }
    match DateTime::parse_from_rfc3339(value) {
        Ok(instant) => instant.timestamp_millis() as f64,
        Err(_) => f64::NAN,
    }
}

/// Rounded percentage as an integer. NaN (only reachable through degenerate
/// date windows) reads as 0.
pub(crate) fn to_percent(value: f64) -> i64 {
    if value.is_nan() {
        0
    } else {
        value as i64
    }
}

#[cfg(test)]
mod tests {
    use super::{blend, clamp, date_millis, round_half_up, MS_PER_DAY};

    #[test]
    fn clamp_bounds_and_keeps_nan() {
        assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-0.2, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.25, 0.0, 1.0), 0.25);
        assert!(clamp(f64::NAN, 0.0, 1.0).is_nan());
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.4999), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(66.666), 67.0);
    }

    #[test]
    fn blend_prefers_present_components() {
        assert_eq!(blend(None, None), 0.0);
        assert_eq!(blend(Some(33.3), None), 33.0);
        assert_eq!(blend(None, Some(50.0)), 50.0);
        assert_eq!(blend(Some(25.0), Some(50.0)), 38.0);
    }

    #[test]
    fn date_only_strings_are_utc_midnight() {
        let day = date_millis("1970-01-02");
        assert_eq!(day, MS_PER_DAY);
        assert_eq!(date_millis("1970-01-01T12:00:00Z"), MS_PER_DAY / 2.0);
        assert!(date_millis("not a date").is_nan());
    }
}
