//! Default collection written into an empty slot.

use chrono::{DateTime, Duration, Utc};

use crate::models::*;

pub const DEFAULT_USER_ID: &str = "default-user-id";

pub fn default_projects(now: DateTime<Utc>) -> Vec<Project> {
    vec![example_project(now)]
}

fn example_project(now: DateTime<Utc>) -> Project {
    Project {
        id: "1".into(),
        title: "Example Research Project".into(),
        description: Some(
            "This is an example project created for demonstration purposes.".into(),
        ),
        user_id: DEFAULT_USER_ID.into(),
        created_at: now,
        updated_at: now,
        plan_and_aim: Some("To demonstrate the features of the Research Tracking System.".into()),
        milestones: vec![
            Milestone {
                id: "m1".into(),
                title: "Literature Review".into(),
                status: MilestoneStatus::Completed,
                due_date: Some((now - Duration::days(7)).to_rfc3339()),
                description: Some("Review existing literature on the topic.".into()),
                tasks: vec![
                    task("t1", "Identify key papers", TaskStatus::Done),
                    task("t2", "Summarize findings", TaskStatus::Done),
                ],
            },
            Milestone {
                id: "m2".into(),
                title: "Methodology Design".into(),
                status: MilestoneStatus::InProgress,
                due_date: Some((now + Duration::days(14)).to_rfc3339()),
                description: None,
                tasks: vec![
                    task("t3", "Define experiment setup", TaskStatus::InProgress),
                    task("t4", "Select measurement tools", TaskStatus::ToDo),
                ],
            },
        ],
        theoretical_background: vec![
            TheoreticalSource {
                id: "tb1".into(),
                source_type: SourceType::Paper,
                title: "Foundational Paper on Subject X".into(),
                url: Some("http://example.com/paper1".into()),
                notes: None,
            },
            TheoreticalSource {
                id: "tb2".into(),
                source_type: SourceType::Book,
                title: "Comprehensive Book on Methodology Y".into(),
                url: None,
                notes: Some("Chapters 3 and 5 are most relevant.".into()),
            },
        ],
        coding: Some(CodingInfo {
            repo_url: Some("http://github.com/example/repo".into()),
            notes: Some("Main simulation code.".into()),
        }),
        results: Some("Initial results show promising trends...".into()),
        notes: Some("Need to double-check the calculations in the methodology section.".into()),
    }
}

fn task(id: &str, description: &str, status: TaskStatus) -> Task {
    Task {
        id: id.into(),
        description: description.into(),
        status,
        completed: status.is_done(),
        due_date: None,
        comments: None,
    }
}
