use serde::{Deserialize, Serialize};

/// A task within a milestone.
///
/// `status` is authoritative; `completed` always mirrors `status == Done`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl Task {
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.completed = status.is_done();
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.set_status(TaskStatus::from_completion(completed));
    }

    pub fn normalize(&mut self) {
        self.completed = self.status.is_done();
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
    #[serde(rename = "Updated")]
    Updated,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
            Self::Updated => "Updated",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "To Do" => Some(Self::ToDo),
            "In Progress" => Some(Self::InProgress),
            "Done" => Some(Self::Done),
            "Updated" => Some(Self::Updated),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Status implied by toggling a task's completion checkbox.
    pub fn from_completion(completed: bool) -> Self {
        if completed {
            Self::Done
        } else {
            Self::InProgress
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    pub description: String,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    pub due_date: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskInput {
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    /// Ignored when `status` is also present.
    pub completed: Option<bool>,
    pub due_date: Option<String>,
    pub comments: Option<String>,
}

impl UpdateTaskInput {
    pub fn apply_to(self, task: &mut Task) {
        if let Some(description) = self.description {
            task.description = description;
        }
        match (self.status, self.completed) {
            (Some(status), _) => task.set_status(status),
            (None, Some(completed)) => task.set_completed(completed),
            (None, None) => {}
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(comments) = self.comments {
            task.comments = Some(comments);
        }
    }
}
