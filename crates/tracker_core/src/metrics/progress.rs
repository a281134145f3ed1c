//! Actual project progress.

use super::{blend, milestone_completion, to_percent, MilestoneSample, TaskSample};

/// Weighted completion of a project, blending tasks and milestones.
///
/// Tasks are weighted by duration (absent/zero duration weighs 1); the
/// milestone component is the share of complete milestones. With both
/// present the result is their mean; with neither it is 0.
pub fn calculate_project_progress<T: TaskSample, M: MilestoneSample>(
    tasks: &[T],
    milestones: &[M],
) -> i64 {
    to_percent(blend(task_progress(tasks), milestone_completion(milestones)))
}

fn task_progress<T: TaskSample>(tasks: &[T]) -> Option<f64> {
    if tasks.is_empty() {
        return None;
    }

    let mut total_duration = 0.0;
    let mut weighted_sum = 0.0;
    for task in tasks {
        let weight = or_default(task.duration(), 1.0);
        let progress = or_default(task.progress(), 0.0);
        total_duration += weight;
        weighted_sum += (progress / 100.0) * weight;
    }

    Some(if total_duration > 0.0 {
        weighted_sum / total_duration * 100.0
    } else {
        0.0
    })
}

/// Absent, zero and NaN all take the fallback.
fn or_default(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v != 0.0 && !v.is_nan() => v,
        _ => fallback,
    }
}
