//! Team and resource records.

use super::{EntityId, JsonFields, ValidationResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInput {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: EntityId,
    #[serde(flatten)]
    pub fields: TeamInput,
}

impl TeamInput {
    pub fn from_json(value: &Value) -> ValidationResult<Self> {
        let fields = JsonFields::new(value)?;
        Ok(Self {
            name: fields.string("name")?,
            description: fields.description()?,
        })
    }
}

/// A person or capacity unit belonging to one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceInput {
    pub name: String,
    /// Available load, e.g. hours per week.
    pub capacity: f64,
    pub role: String,
    pub team_id: EntityId,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub resource_id: EntityId,
    #[serde(flatten)]
    pub fields: ResourceInput,
}

impl ResourceInput {
    pub fn from_json(value: &Value) -> ValidationResult<Self> {
        let fields = JsonFields::new(value)?;
        Ok(Self {
            name: fields.string("name")?,
            capacity: fields.number("capacity")?,
            role: fields.string("role")?,
            team_id: fields.id("team_id")?,
            description: fields.description()?,
        })
    }
}
