//! Task record.
//!
//! `duration` and `progress` are nullable in storage. The metrics layer
//! reads an absent (or zero) duration as 1 day and an absent progress as 0.

use super::{ensure_date, EntityId, JsonFields, ValidationError, ValidationResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Writable task fields shared by create and full-replace update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInput {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    /// Planned length in days.
    pub duration: Option<f64>,
    /// Completion percentage in `[0, 100]`.
    pub progress: Option<f64>,
    pub project_id: Option<EntityId>,
    pub description: Option<String>,
}

/// Persisted task row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: EntityId,
    #[serde(flatten)]
    pub fields: TaskInput,
}

impl TaskInput {
    /// Parses and validates a JSON request body.
    ///
    /// A body without `duration` gets one derived from its date window.
    pub fn from_json(value: &Value) -> ValidationResult<Self> {
        let fields = JsonFields::new(value)?;
        let name = fields.string("name")?;
        let start_date = fields.date("start_date")?;
        let end_date = fields.date("end_date")?;
        let duration = match fields.optional_number("duration")? {
            Some(duration) => duration,
            None => derive_duration_days(&start_date, &end_date)
                .ok_or(ValidationError::InvalidField("duration"))?,
        };
        let progress = fields.number("progress")?;
        let project_id = fields.id("project_id")?;
        let description = fields.description()?;

        let input = Self {
            name,
            start_date,
            end_date,
            duration: Some(duration),
            progress: Some(progress),
            project_id: Some(project_id),
            description,
        };
        input.validate()?;
        Ok(input)
    }

    /// Checks write invariants before persistence.
    pub fn validate(&self) -> ValidationResult<()> {
        ensure_date("start_date", &self.start_date)?;
        ensure_date("end_date", &self.end_date)?;
        if let Some(progress) = self.progress {
            if !(0.0..=100.0).contains(&progress) {
                return Err(ValidationError::ProgressOutOfRange);
            }
        }
        Ok(())
    }
}

/// Whole days between two `YYYY-MM-DD` dates, never negative.
///
/// Returns `None` when either date does not parse.
pub fn derive_duration_days(start_date: &str, end_date: &str) -> Option<f64> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").ok()?;
    let end = NaiveDate::parse_from_str(end_date, "%Y-%m-%d").ok()?;
    let days = (end - start).num_days().max(0);
    Some(days as f64)
}
