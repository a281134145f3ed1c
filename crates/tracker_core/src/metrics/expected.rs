//! Expected (time-based) project progress.
//!
//! Each task contributes the share of its date window that has elapsed,
//! weighted by window length. The milestone component is the completion
//! ratio, the same figure actual progress uses: milestones carry no
//! time-based projection.

use super::{
    blend, clamp, date_millis, milestone_completion, to_percent, MilestoneSample, TaskSample,
    MS_PER_DAY,
};
use chrono::{DateTime, Utc};

/// Expected progress as of the current wall-clock instant.
pub fn calculate_expected_progress<T: TaskSample, M: MilestoneSample>(
    tasks: &[T],
    milestones: &[M],
) -> i64 {
    calculate_expected_progress_at(tasks, milestones, Utc::now())
}

/// Expected progress as of `now`.
pub fn calculate_expected_progress_at<T: TaskSample, M: MilestoneSample>(
    tasks: &[T],
    milestones: &[M],
    now: DateTime<Utc>,
) -> i64 {
    to_percent(expected_value_at(tasks, milestones, now))
}

/// Rounded expected percentage before integer conversion; may be NaN.
pub(super) fn expected_value_at<T: TaskSample, M: MilestoneSample>(
    tasks: &[T],
    milestones: &[M],
    now: DateTime<Utc>,
) -> f64 {
    let now_ms = now.timestamp_millis() as f64;
    blend(
        expected_task_progress(tasks, now_ms),
        milestone_completion(milestones),
    )
}

fn expected_task_progress<T: TaskSample>(tasks: &[T], now_ms: f64) -> Option<f64> {
    if tasks.is_empty() {
        return None;
    }

    let mut total_duration = 0.0;
    let mut weighted_expected_sum = 0.0;
    for task in tasks {
        let start = date_millis(task.start_date());
        let end = date_millis(task.end_date());
        let duration = (end - start) / MS_PER_DAY;

        let fraction = if now_ms < start {
            0.0
        } else if now_ms > end {
            1.0
        } else {
            let elapsed = (now_ms - start) / MS_PER_DAY;
            clamp(elapsed / duration, 0.0, 1.0)
        };

        total_duration += duration;
        weighted_expected_sum += fraction * duration;
    }

    // NaN totals (unparseable dates) fail this guard and read as 0.
    Some(if total_duration > 0.0 {
        weighted_expected_sum / total_duration * 100.0
    } else {
        0.0
    })
}

#[cfg(test)]
mod tests {
    use super::calculate_expected_progress_at;
    use crate::metrics::{MilestoneSnapshot, TaskSnapshot};
    use chrono::{DateTime, TimeZone, Utc};

    const NO_MILESTONES: &[MilestoneSnapshot] = &[];
    const NO_TASKS: &[TaskSnapshot] = &[];

    fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn future_task_expects_nothing() {
        let tasks = [TaskSnapshot::new("2024-03-01", "2024-03-11")];
        let now = at(2024, 2, 1, 0);
        assert_eq!(calculate_expected_progress_at(&tasks, NO_MILESTONES, now), 0);
    }

    #[test]
    fn past_task_expects_everything() {
        let tasks = [TaskSnapshot::new("2024-03-01", "2024-03-11")];
        let now = at(2024, 4, 1, 0);
        assert_eq!(calculate_expected_progress_at(&tasks, NO_MILESTONES, now), 100);
    }

    #[test]
    fn running_task_expects_elapsed_share() {
        let tasks = [TaskSnapshot::new("2024-03-01", "2024-03-11")];
        let now = at(2024, 3, 4, 12);
        // 3.5 of 10 days elapsed.
        assert_eq!(calculate_expected_progress_at(&tasks, NO_MILESTONES, now), 35);
    }

    #[test]
    fn longer_windows_weigh_more() {
        let tasks = [
            TaskSnapshot::new("2024-01-01", "2024-01-31"),
            TaskSnapshot::new("2024-03-01", "2024-03-11"),
        ];
        let now = at(2024, 2, 15, 0);
        // 30 days fully expected, 10 days not started: 30 / 40.
        assert_eq!(calculate_expected_progress_at(&tasks, NO_MILESTONES, now), 75);
    }

    #[test]
    fn task_duration_field_is_ignored() {
        let tasks = [TaskSnapshot::new("2024-03-01", "2024-03-11").with_duration(99.0)];
        let now = at(2024, 3, 6, 0);
        assert_eq!(calculate_expected_progress_at(&tasks, NO_MILESTONES, now), 50);
    }

    #[test]
    fn milestones_use_completion_ratio() {
        let milestones = [
            MilestoneSnapshot::complete(),
            MilestoneSnapshot::incomplete(),
            MilestoneSnapshot::incomplete(),
            MilestoneSnapshot::incomplete(),
        ];
        let now = at(2030, 1, 1, 0);
        assert_eq!(calculate_expected_progress_at(NO_TASKS, &milestones, now), 25);
    }

    #[test]
    fn unparseable_date_zeroes_task_component() {
        let tasks = [
            TaskSnapshot::new("2024-01-01", "2024-01-31"),
            TaskSnapshot::new("soon", "2024-03-11"),
        ];
        let now = at(2024, 6, 1, 0);
        assert_eq!(calculate_expected_progress_at(&tasks, NO_MILESTONES, now), 0);
    }

    #[test]
    fn zero_length_windows_hit_the_zero_total_guard() {
        let tasks = [TaskSnapshot::new("2024-01-01", "2024-01-01")];
        let now = at(2024, 6, 1, 0);
        assert_eq!(calculate_expected_progress_at(&tasks, NO_MILESTONES, now), 0);
    }
}
