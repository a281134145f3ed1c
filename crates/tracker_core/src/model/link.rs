//! Junction records between entities.
//!
//! # Responsibility
//! - Describe the pair-only junction tables through one `LinkKind` table.
//! - Describe task/milestone dependencies, which carry a type and lag.
//!
//! # Invariants
//! - A junction row is identified by its two ids; there is no surrogate key.
//! - A dependency never points from an item to itself.

use super::{EntityId, JsonFields, ValidationError, ValidationResult};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Pair-only junction tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Resource assigned to a task.
    Assignment,
    /// Task contributing to a milestone.
    MilestoneTask,
    /// Risk attached to a task.
    TaskRisk,
    /// Risk attached to a project.
    ProjectRisk,
}

impl LinkKind {
    pub const ALL: [LinkKind; 4] = [
        Self::Assignment,
        Self::MilestoneTask,
        Self::TaskRisk,
        Self::ProjectRisk,
    ];

    pub fn table(self) -> &'static str {
        match self {
            Self::Assignment => "assignments",
            Self::MilestoneTask => "deliverable_tasks",
            Self::TaskRisk => "task_risks",
            Self::ProjectRisk => "project_risks",
        }
    }

    /// Key columns in `(left, right)` order.
    pub fn columns(self) -> (&'static str, &'static str) {
        match self {
            Self::Assignment => ("task_id", "resource_id"),
            Self::MilestoneTask => ("deliverable_id", "task_id"),
            Self::TaskRisk => ("task_id", "risk_id"),
            Self::ProjectRisk => ("project_id", "risk_id"),
        }
    }

    /// Human-readable record name used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Assignment => "Assignment",
            Self::MilestoneTask => "Deliverable task",
            Self::TaskRisk => "Task risk",
            Self::ProjectRisk => "Project risk",
        }
    }
}

/// One row of a pair-only junction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub kind: LinkKind,
    pub left: EntityId,
    pub right: EntityId,
}

impl Link {
    pub fn new(kind: LinkKind, left: EntityId, right: EntityId) -> Self {
        Self { kind, left, right }
    }

    /// Reads both key columns of `kind` from a JSON request body.
    pub fn from_json(kind: LinkKind, value: &Value) -> ValidationResult<Self> {
        let fields = JsonFields::new(value)?;
        let (left_column, right_column) = kind.columns();
        Ok(Self {
            kind,
            left: fields.id(left_column)?,
            right: fields.id(right_column)?,
        })
    }
}

/// Serializes with the table's own column names, e.g. `{task_id, resource_id}`.
impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (left_column, right_column) = self.kind.columns();
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(left_column, &self.left)?;
        map.serialize_entry(right_column, &self.right)?;
        map.end()
    }
}

/// Which items a dependency connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyScope {
    Task,
    Milestone,
}

impl DependencyScope {
    pub fn table(self) -> &'static str {
        match self {
            Self::Task => "task_dependencies",
            Self::Milestone => "deliverable_dependencies",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Task => "Task dependency",
            Self::Milestone => "Deliverable dependency",
        }
    }
}

/// Directed scheduling edge: `target` depends on `source`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub source_id: EntityId,
    pub target_id: EntityId,
    /// Scheduling relation, conventionally `FS`, `SS`, `FF` or `SF`.
    pub dependency_type: String,
    /// Offset in days applied after the relation is satisfied.
    pub lag: f64,
}

impl Dependency {
    pub fn from_json(value: &Value) -> ValidationResult<Self> {
        let fields = JsonFields::new(value)?;
        let dependency = Self {
            source_id: fields.id("source_id")?,
            target_id: fields.id("target_id")?,
            dependency_type: fields.string("dependency_type")?,
            lag: fields.number("lag")?,
        };
        dependency.validate()?;
        Ok(dependency)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if self.source_id == self.target_id {
            return Err(ValidationError::SelfDependency);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Dependency, Link, LinkKind};
    use crate::model::ValidationError;
    use serde_json::json;

    #[test]
    fn link_serializes_with_table_columns() {
        let link = Link::new(LinkKind::MilestoneTask, 3, 9);
        assert_eq!(
            serde_json::to_value(link).unwrap(),
            json!({ "deliverable_id": 3, "task_id": 9 })
        );
    }

    #[test]
    fn link_reads_kind_specific_columns() {
        let link = Link::from_json(LinkKind::ProjectRisk, &json!({ "project_id": 1, "risk_id": 2 }))
            .unwrap();
        assert_eq!((link.left, link.right), (1, 2));

        let err = Link::from_json(LinkKind::ProjectRisk, &json!({ "task_id": 1, "risk_id": 2 }))
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidField("project_id"));
    }

    #[test]
    fn self_dependency_is_rejected() {
        let err = Dependency::from_json(&json!({
            "source_id": 4,
            "target_id": 4,
            "dependency_type": "FS",
            "lag": 0,
        }))
        .unwrap_err();
        assert_eq!(err, ValidationError::SelfDependency);
    }
}
