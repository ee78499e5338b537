use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::milestone::Milestone;
use super::source::TheoreticalSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_and_aim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coding: Option<CodingInfo>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub theoretical_background: Vec<TheoreticalSource>,
}

impl Project {
    pub fn milestone(&self, milestone_id: &str) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == milestone_id)
    }

    pub fn source(&self, source_id: &str) -> Option<&TheoreticalSource> {
        self.theoretical_background.iter().find(|s| s.id == source_id)
    }

    pub fn task_count(&self) -> usize {
        self.milestones.iter().map(|m| m.tasks.len()).sum()
    }

    pub fn completed_task_count(&self) -> usize {
        self.milestones
            .iter()
            .flat_map(|m| m.tasks.iter())
            .filter(|t| t.completed)
            .count()
    }

    /// Re-derives task completion flags from their status.
    pub fn normalize(&mut self) {
        for milestone in &mut self.milestones {
            for task in &mut milestone.tasks {
                task.normalize();
            }
        }
    }
}

/// Repository link and free-form notes about the project's code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectInput {
    pub title: String,
    pub description: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub plan_and_aim: Option<String>,
}

/// Shallow patch over a project. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub plan_and_aim: Option<String>,
    pub results: Option<String>,
    pub notes: Option<String>,
    pub coding: Option<CodingInfo>,
    pub milestones: Option<Vec<Milestone>>,
    pub theoretical_background: Option<Vec<TheoreticalSource>>,
}

impl UpdateProjectInput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.plan_and_aim.is_none()
            && self.results.is_none()
            && self.notes.is_none()
            && self.coding.is_none()
            && self.milestones.is_none()
            && self.theoretical_background.is_none()
    }

    pub fn apply_to(self, project: &mut Project) {
        if let Some(title) = self.title {
            project.title = title;
        }
        if let Some(description) = self.description {
            project.description = Some(description);
        }
        if let Some(plan_and_aim) = self.plan_and_aim {
            project.plan_and_aim = Some(plan_and_aim);
        }
        if let Some(results) = self.results {
            project.results = Some(results);
        }
        if let Some(notes) = self.notes {
            project.notes = Some(notes);
        }
        if let Some(coding) = self.coding {
            project.coding = Some(coding);
        }
        if let Some(milestones) = self.milestones {
            project.milestones = milestones;
        }
        if let Some(sources) = self.theoretical_background {
            project.theoretical_background = sources;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Task, TaskStatus};

    fn sample() -> Project {
        let now = Utc::now();
        Project {
            id: "p1".into(),
            title: "Sample".into(),
            description: None,
            user_id: "u1".into(),
            created_at: now,
            updated_at: now,
            plan_and_aim: None,
            results: None,
            notes: None,
            coding: None,
            milestones: Vec::new(),
            theoretical_background: Vec::new(),
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("theoreticalBackground").is_some());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn deserializes_without_nested_collections() {
        let json = r#"{
            "id": "1",
            "title": "Bare",
            "userId": "u",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z"
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert!(project.milestones.is_empty());
        assert!(project.theoretical_background.is_empty());
    }

    #[test]
    fn patch_only_touches_provided_fields() {
        let mut project = sample();
        project.notes = Some("keep me".into());

        UpdateProjectInput {
            title: Some("Renamed".into()),
            ..Default::default()
        }
        .apply_to(&mut project);

        assert_eq!(project.title, "Renamed");
        assert_eq!(project.notes.as_deref(), Some("keep me"));
    }

    #[test]
    fn normalize_fixes_inconsistent_tasks() {
        let mut project = sample();
        project.milestones.push(crate::models::Milestone {
            id: "m1".into(),
            title: "M".into(),
            status: Default::default(),
            due_date: None,
            description: None,
            tasks: vec![Task {
                id: "t1".into(),
                description: "d".into(),
                status: TaskStatus::Done,
                completed: false,
                due_date: None,
                comments: None,
            }],
        });

        project.normalize();
        assert!(project.milestones[0].tasks[0].completed);
        assert_eq!(project.completed_task_count(), 1);
    }
}
