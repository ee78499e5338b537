//! Read-only aggregates across all projects.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::models::*;

pub const RECENT_PROJECT_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: usize,
    pub total_milestones: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Newest first.
    pub recent_projects: Vec<ProjectSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub milestone_count: usize,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl DashboardStats {
    pub fn from_projects(projects: &[Project]) -> Self {
        let mut recent: Vec<&Project> = projects.iter().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Self {
            total_projects: projects.len(),
            total_milestones: projects.iter().map(|p| p.milestones.len()).sum(),
            total_tasks: projects.iter().map(Project::task_count).sum(),
            completed_tasks: projects.iter().map(Project::completed_task_count).sum(),
            recent_projects: recent
                .into_iter()
                .take(RECENT_PROJECT_LIMIT)
                .map(|p| ProjectSummary {
                    id: p.id.clone(),
                    title: p.title.clone(),
                    description: p.description.clone(),
                    milestone_count: p.milestones.len(),
                    created_at: p.created_at,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneEntry {
    pub project_id: String,
    pub project_title: String,
    #[serde(flatten)]
    pub milestone: Milestone,
}

/// Milestones across projects, split by completion and ordered by due date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MilestoneOverview {
    pub upcoming: Vec<MilestoneEntry>,
    pub completed: Vec<MilestoneEntry>,
}

impl MilestoneOverview {
    pub fn from_projects(projects: &[Project]) -> Self {
        let mut entries: Vec<MilestoneEntry> = projects
            .iter()
            .flat_map(|p| {
                p.milestones.iter().map(|m| MilestoneEntry {
                    project_id: p.id.clone(),
                    project_title: p.title.clone(),
                    milestone: m.clone(),
                })
            })
            .collect();
        entries.sort_by(|a, b| by_due_date(&a.milestone.due_date, &b.milestone.due_date));

        let (completed, upcoming) = entries
            .into_iter()
            .partition(|e| e.milestone.status == MilestoneStatus::Completed);
        Self {
            upcoming,
            completed,
        }
    }
}

// Undated milestones sort last.
fn by_due_date(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEntry {
    pub project_id: String,
    pub project_title: String,
    #[serde(flatten)]
    pub source: TheoreticalSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceGroup {
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub count: usize,
    pub sources: Vec<SourceEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceOverview {
    pub total: usize,
    /// Largest group first.
    pub by_type: Vec<SourceGroup>,
}

impl SourceOverview {
    pub fn from_projects(projects: &[Project]) -> Self {
        let mut groups: HashMap<SourceType, Vec<SourceEntry>> = HashMap::new();
        for project in projects {
            for source in &project.theoretical_background {
                groups.entry(source.source_type).or_default().push(SourceEntry {
                    project_id: project.id.clone(),
                    project_title: project.title.clone(),
                    source: source.clone(),
                });
            }
        }

        let mut by_type: Vec<SourceGroup> = groups
            .into_iter()
            .map(|(source_type, sources)| SourceGroup {
                source_type,
                count: sources.len(),
                sources,
            })
            .collect();
        by_type.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.source_type.as_str().cmp(b.source_type.as_str()))
        });

        Self {
            total: by_type.iter().map(|g| g.count).sum(),
            by_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use chrono::{Duration, Utc};

    #[test]
    fn stats_match_seed() {
        let projects = seed::default_projects(Utc::now());
        let stats = DashboardStats::from_projects(&projects);

        assert_eq!(stats.total_projects, 1);
        assert_eq!(stats.total_milestones, 2);
        assert_eq!(stats.total_tasks, 4);
        assert_eq!(stats.completed_tasks, 2);
        assert_eq!(stats.recent_projects.len(), 1);
    }

    #[test]
    fn recent_projects_are_newest_first_and_capped() {
        let base = Utc::now();
        let projects: Vec<Project> = (0..5)
            .map(|i| {
                let mut p = seed::default_projects(base + Duration::seconds(i)).remove(0);
                p.id = i.to_string();
                p
            })
            .collect();

        let stats = DashboardStats::from_projects(&projects);
        let ids: Vec<&str> = stats.recent_projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "3", "2"]);
    }

    #[test]
    fn milestones_split_by_completion() {
        let projects = seed::default_projects(Utc::now());
        let overview = MilestoneOverview::from_projects(&projects);

        assert_eq!(overview.completed.len(), 1);
        assert_eq!(overview.completed[0].milestone.id, "m1");
        assert_eq!(overview.upcoming.len(), 1);
        assert_eq!(overview.upcoming[0].project_id, "1");
    }

    #[test]
    fn undated_milestones_sort_last() {
        let mut projects = seed::default_projects(Utc::now());
        projects[0].milestones[0].status = MilestoneStatus::NotStarted;
        projects[0].milestones[0].due_date = None;

        let overview = MilestoneOverview::from_projects(&projects);
        let ids: Vec<&str> = overview.upcoming.iter().map(|e| e.milestone.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m1"]);
    }

    #[test]
    fn sources_grouped_by_type() {
        let mut projects = seed::default_projects(Utc::now());
        projects[0].theoretical_background.push(TheoreticalSource {
            id: "tb3".into(),
            source_type: SourceType::Paper,
            title: "Another paper".into(),
            url: None,
            notes: None,
        });

        let overview = SourceOverview::from_projects(&projects);
        assert_eq!(overview.total, 3);
        assert_eq!(overview.by_type[0].source_type, SourceType::Paper);
        assert_eq!(overview.by_type[0].count, 2);
        assert_eq!(overview.by_type[1].count, 1);
    }
}
