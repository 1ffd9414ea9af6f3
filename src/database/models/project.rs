use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

use super::{text_column, ParseStatusError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    OnHold,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "ACTIVE",
            ProjectStatus::Completed => "COMPLETED",
            ProjectStatus::OnHold => "ON_HOLD",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(ProjectStatus::Active),
            "COMPLETED" => Ok(ProjectStatus::Completed),
            "ON_HOLD" => Ok(ProjectStatus::OnHold),
            other => Err(ParseStatusError {
                kind: "project",
                value: other.to_string(),
            }),
        }
    }
}

text_column!(ProjectStatus);

/// A project owned directly by one organization
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Project {
    pub id: i64,
    #[serde(skip_serializing)]
    pub organization_id: i64,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Project representation with its task counters
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ProjectSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub project: Project,
    pub task_count: i64,
    pub completed_tasks: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// Partial update: `None` leaves the field unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub due_date: Option<NaiveDate>,
}

impl ProjectPatch {
    pub fn apply(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(due_date) = self.due_date {
            project.due_date = Some(due_date);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        Project {
            id: 1,
            organization_id: 7,
            name: "Website".to_string(),
            description: String::new(),
            status: ProjectStatus::Active,
            due_date: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut p = project();
        ProjectPatch {
            status: Some(ProjectStatus::OnHold),
            ..Default::default()
        }
        .apply(&mut p);

        assert_eq!(p.name, "Website");
        assert_eq!(p.status, ProjectStatus::OnHold);
        assert_eq!(p.organization_id, 7);
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [ProjectStatus::Active, ProjectStatus::Completed, ProjectStatus::OnHold] {
            assert_eq!(status.as_str().parse::<ProjectStatus>().unwrap(), status);
        }
        assert!("ARCHIVED".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn summary_serializes_flat_without_owner() {
        let summary = ProjectSummary {
            project: project(),
            task_count: 3,
            completed_tasks: 1,
        };
        let v = serde_json::to_value(&summary).unwrap();
        assert_eq!(v["name"], "Website");
        assert_eq!(v["status"], "ACTIVE");
        assert_eq!(v["task_count"], 3);
        assert!(v.get("organization_id").is_none());
    }
}
