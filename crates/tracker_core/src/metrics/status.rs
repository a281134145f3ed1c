//! Schedule status classification.

use super::expected::expected_value_at;
use super::{calculate_project_progress, MilestoneSample, TaskSample};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Ratio of actual to expected progress at or above which a project is ahead.
pub const AHEAD_RATIO: f64 = 1.0;
/// Ratio at or above which a project is still on track.
pub const ON_TRACK_RATIO: f64 = 0.8;

/// Derived schedule status of one project. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "No data")]
    NoData,
    #[serde(rename = "Not started")]
    NotStarted,
    #[serde(rename = "Ahead")]
    Ahead,
    #[serde(rename = "On track")]
    OnTrack,
    #[serde(rename = "Behind")]
    Behind,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoData => "No data",
            Self::NotStarted => "Not started",
            Self::Ahead => "Ahead",
            Self::OnTrack => "On track",
            Self::Behind => "Behind",
        }
    }
}

impl Display for ProjectStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status as of the current wall-clock instant.
pub fn get_project_status<T: TaskSample, M: MilestoneSample>(
    tasks: &[T],
    milestones: &[M],
) -> ProjectStatus {
    get_project_status_at(tasks, milestones, Utc::now())
}

/// Status as of `now`.
pub fn get_project_status_at<T: TaskSample, M: MilestoneSample>(
    tasks: &[T],
    milestones: &[M],
    now: DateTime<Utc>,
) -> ProjectStatus {
    if tasks.is_empty() && milestones.is_empty() {
        return ProjectStatus::NoData;
    }

    let actual = calculate_project_progress(tasks, milestones) as f64;
    let expected = expected_value_at(tasks, milestones, now);
    classify_progress(actual, expected)
}

/// Classifies an actual/expected pair of percentages.
///
/// A zero expectation means nothing was due yet: any progress is ahead.
/// NaN expectations fail every threshold and classify as behind.
pub fn classify_progress(actual: f64, expected: f64) -> ProjectStatus {
    if expected == 0.0 {
        return if actual > 0.0 {
            ProjectStatus::Ahead
        } else {
            ProjectStatus::NotStarted
        };
    }

    let ratio = actual / expected;
    if ratio >= AHEAD_RATIO {
        ProjectStatus::Ahead
    } else if ratio >= ON_TRACK_RATIO {
        ProjectStatus::OnTrack
    } else {
        ProjectStatus::Behind
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_progress, get_project_status_at, ProjectStatus};
    use crate::metrics::{calculate_expected_progress_at, MilestoneSnapshot, TaskSnapshot};
    use chrono::{TimeZone, Utc};

    #[test]
    fn thresholds_are_inclusive_at_the_lower_bound() {
        assert_eq!(classify_progress(80.0, 100.0), ProjectStatus::OnTrack);
        assert_eq!(classify_progress(79.0, 100.0), ProjectStatus::Behind);
        assert_eq!(classify_progress(50.0, 50.0), ProjectStatus::Ahead);
    }

    #[test]
    fn nan_expectation_is_behind() {
        assert_eq!(classify_progress(40.0, f64::NAN), ProjectStatus::Behind);
    }

    #[test]
    fn zero_length_window_at_its_start_is_behind() {
        let tasks = [
            TaskSnapshot::new("2024-01-01", "2024-01-01"),
            TaskSnapshot::new("2024-01-01", "2024-01-11"),
        ];
        let milestones: &[MilestoneSnapshot] = &[];
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(calculate_expected_progress_at(&tasks, milestones, now), 0);
        assert_eq!(
            get_project_status_at(&tasks, milestones, now),
            ProjectStatus::Behind
        );
    }

    #[test]
    fn labels_serialize_as_display_text() {
        assert_eq!(
            serde_json::to_string(&ProjectStatus::OnTrack).unwrap(),
            "\"On track\""
        );
        assert_eq!(ProjectStatus::NotStarted.to_string(), "Not started");
    }
}
