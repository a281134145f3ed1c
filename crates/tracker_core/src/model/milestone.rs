//! Milestone record, stored as a "deliverable".

use super::{ensure_date, EntityId, JsonFields, ValidationResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Writable milestone fields shared by create and full-replace update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneInput {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    /// `1` when complete; any other value counts as incomplete.
    pub complete: i64,
    pub owner: String,
    pub project_id: Option<EntityId>,
    pub description: Option<String>,
}

/// Persisted milestone row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub deliverable_id: EntityId,
    #[serde(flatten)]
    pub fields: MilestoneInput,
}

impl Milestone {
    pub fn is_complete(&self) -> bool {
        self.fields.complete == 1
    }
}

impl MilestoneInput {
    /// Parses and validates a JSON request body.
    pub fn from_json(value: &Value) -> ValidationResult<Self> {
        let fields = JsonFields::new(value)?;
        Ok(Self {
            name: fields.string("name")?,
            start_date: fields.date("start_date")?,
            end_date: fields.date("end_date")?,
            complete: fields.id("complete")?,
            owner: fields.string("owner")?,
            project_id: Some(fields.id("project_id")?),
            description: fields.description()?,
        })
    }

    pub fn validate(&self) -> ValidationResult<()> {
        ensure_date("start_date", &self.start_date)?;
        ensure_date("end_date", &self.end_date)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Milestone, MilestoneInput};
    use serde_json::json;

    #[test]
    fn float_complete_flag_counts_as_complete() {
        let input = MilestoneInput::from_json(&json!({
            "name": "Beta",
            "start_date": "2024-02-01",
            "end_date": "2024-02-01",
            "complete": 1.0,
            "owner": "qa",
            "project_id": 2.0,
        }))
        .unwrap();
        assert_eq!(input.project_id, Some(2));

        let milestone = Milestone {
            deliverable_id: 1,
            fields: input,
        };
        assert!(milestone.is_complete());
    }
}
