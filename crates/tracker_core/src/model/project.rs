//! Project record.

use super::{ensure_date, EntityId, JsonFields, ValidationResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Writable project fields shared by create and full-replace update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInput {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub owner: String,
    pub description: Option<String>,
}

/// Persisted project row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: EntityId,
    #[serde(flatten)]
    pub fields: ProjectInput,
}

impl ProjectInput {
    /// Parses and validates a JSON request body.
    pub fn from_json(value: &Value) -> ValidationResult<Self> {
        let fields = JsonFields::new(value)?;
        Ok(Self {
            name: fields.string("name")?,
            start_date: fields.date("start_date")?,
            end_date: fields.date("end_date")?,
            owner: fields.string("owner")?,
            description: fields.description()?,
        })
    }

    /// Checks write invariants before persistence.
    pub fn validate(&self) -> ValidationResult<()> {
        ensure_date("start_date", &self.start_date)?;
        ensure_date("end_date", &self.end_date)?;
        Ok(())
    }
}
