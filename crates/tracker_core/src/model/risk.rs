//! Risk record.
//!
//! Scores are impact x likelihood products on the register's 1..5 scales.
//! `pre_*` values describe the risk before mitigation, `post_*` after.

use super::{ensure_date, EntityId, JsonFields, ValidationResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskInput {
    pub name: String,
    pub description: Option<String>,
    pub pre_impact: f64,
    pub post_impact: f64,
    pub pre_likelihood: f64,
    pub post_likelihood: f64,
    pub pre_score: f64,
    pub post_score: f64,
    pub preparedness: f64,
    /// Date the risk was raised.
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub risk_id: EntityId,
    #[serde(flatten)]
    pub fields: RiskInput,
}

impl RiskInput {
    /// Parses and validates a JSON request body.
    ///
    /// An omitted `pre_score` becomes `pre_impact * pre_likelihood` and an
    /// omitted `post_score` becomes 0.
    pub fn from_json(value: &Value) -> ValidationResult<Self> {
        let fields = JsonFields::new(value)?;
        let name = fields.string("name")?;
        let pre_impact = fields.number("pre_impact")?;
        let post_impact = fields.number("post_impact")?;
        let pre_likelihood = fields.number("pre_likelihood")?;
        let post_likelihood = fields.number("post_likelihood")?;
        let pre_score = fields
            .optional_number("pre_score")?
            .unwrap_or(pre_impact * pre_likelihood);
        let post_score = fields.optional_number("post_score")?.unwrap_or(0.0);
        let preparedness = fields.number("preparedness")?;
        let date = fields.date("date")?;
        let description = fields.description()?;

        Ok(Self {
            name,
            description,
            pre_impact,
            post_impact,
            pre_likelihood,
            post_likelihood,
            pre_score,
            post_score,
            preparedness,
            date,
        })
    }

    pub fn validate(&self) -> ValidationResult<()> {
        ensure_date("date", &self.date)
    }
}
