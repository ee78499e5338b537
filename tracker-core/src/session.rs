//! Editing session for one open project.
//!
//! Additions and edits call the repository first and patch the displayed
//! project with the returned entity; deletions hide the entity first and
//! roll back if the repository reports it missing. Either way the session
//! then reloads the project from the store to reconcile.

use crate::models::*;
use crate::repository::ProjectRepository;
use crate::view::ViewState;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

pub struct ProjectSession {
    repo: ProjectRepository,
    project_id: String,
    view: ViewState<Project>,
}

impl ProjectSession {
    pub fn open(repo: ProjectRepository, project_id: &str) -> SessionResult<Self> {
        let project = repo
            .get_by_id(project_id)
            .ok_or_else(|| SessionError::NotFound(format!("Project {} not found", project_id)))?;
        Ok(Self {
            repo,
            project_id: project_id.to_string(),
            view: ViewState::new(project),
        })
    }

    pub fn project(&self) -> &Project {
        self.view.current()
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Direct access for callers that resolve reloads on their own schedule.
    pub fn view_mut(&mut self) -> &mut ViewState<Project> {
        &mut self.view
    }

    /// Re-reads the project from the store. Returns whether the view changed.
    pub fn reload(&mut self) -> bool {
        let ticket = self.view.request_reload();
        match self.repo.get_by_id(&self.project_id) {
            Some(fresh) => self.view.resolve_reload(ticket, fresh),
            None => {
                tracing::warn!(project_id = %self.project_id, "Project vanished during reload");
                false
            }
        }
    }

    pub fn update_project(&mut self, input: UpdateProjectInput) -> SessionResult<Project> {
        if let Some(title) = &input.title {
            require(title, "Project title is required")?;
        }
        let result = self.repo.update(&self.project_id, input);
        self.commit(result, "Failed to update project", |p, updated| *p = updated)
    }

    pub fn add_milestone(&mut self, input: CreateMilestoneInput) -> SessionResult<Milestone> {
        require(&input.title, "Milestone title is required")?;
        let result = self.repo.add_milestone(&self.project_id, input);
        self.commit(result, "Failed to add milestone", |p, milestone| {
            p.milestones.push(milestone)
        })
    }

    pub fn update_milestone(
        &mut self,
        milestone_id: &str,
        input: UpdateMilestoneInput,
    ) -> SessionResult<Milestone> {
        if let Some(title) = &input.title {
            require(title, "Milestone title is required")?;
        }
        let result = self
            .repo
            .update_milestone(&self.project_id, milestone_id, input);
        self.commit(result, "Failed to update milestone", |p, updated| {
            if let Some(m) = p.milestones.iter_mut().find(|m| m.id == updated.id) {
                *m = updated;
            }
        })
    }

    pub fn delete_milestone(&mut self, milestone_id: &str) -> SessionResult<()> {
        self.remove(
            |p| p.milestones.retain(|m| m.id != milestone_id),
            |repo, pid| repo.delete_milestone(pid, milestone_id),
            "Failed to delete milestone",
        )
    }

    pub fn add_task(&mut self, milestone_id: &str, input: CreateTaskInput) -> SessionResult<Task> {
        require(&input.description, "Task description is required")?;
        let result = self.repo.add_task(&self.project_id, milestone_id, input);
        self.commit(result, "Failed to add task", |p, task| {
            if let Some(m) = p.milestones.iter_mut().find(|m| m.id == milestone_id) {
                m.tasks.push(task);
            }
        })
    }

    pub fn update_task(
        &mut self,
        milestone_id: &str,
        task_id: &str,
        input: UpdateTaskInput,
    ) -> SessionResult<Task> {
        if let Some(description) = &input.description {
            require(description, "Task description is required")?;
        }
        let result = self
            .repo
            .update_task(&self.project_id, milestone_id, task_id, input);
        self.commit(result, "Failed to update task", |p, task| {
            replace_task(p, milestone_id, task)
        })
    }

    pub fn set_task_completion(
        &mut self,
        milestone_id: &str,
        task_id: &str,
        completed: bool,
    ) -> SessionResult<Task> {
        let result = self
            .repo
            .set_task_completion(&self.project_id, milestone_id, task_id, completed);
        self.commit(result, "Failed to update task", |p, task| {
            replace_task(p, milestone_id, task)
        })
    }

    pub fn delete_task(&mut self, milestone_id: &str, task_id: &str) -> SessionResult<()> {
        self.remove(
            |p| {
                if let Some(m) = p.milestones.iter_mut().find(|m| m.id == milestone_id) {
                    m.tasks.retain(|t| t.id != task_id);
                }
            },
            |repo, pid| repo.delete_task(pid, milestone_id, task_id),
            "Failed to delete task",
        )
    }

    pub fn add_source(&mut self, input: CreateSourceInput) -> SessionResult<TheoreticalSource> {
        require(&input.title, "Source title is required")?;
        let result = self.repo.add_theoretical_source(&self.project_id, input);
        self.commit(result, "Failed to add source", |p, source| {
            p.theoretical_background.push(source)
        })
    }

    pub fn update_source(
        &mut self,
        source_id: &str,
        input: UpdateSourceInput,
    ) -> SessionResult<TheoreticalSource> {
        if let Some(title) = &input.title {
            require(title, "Source title is required")?;
        }
        let result = self
            .repo
            .update_theoretical_source(&self.project_id, source_id, input);
        self.commit(result, "Failed to update source", |p, updated| {
            if let Some(s) = p
                .theoretical_background
                .iter_mut()
                .find(|s| s.id == updated.id)
            {
                *s = updated;
            }
        })
    }

    pub fn delete_source(&mut self, source_id: &str) -> SessionResult<()> {
        self.remove(
            |p| p.theoretical_background.retain(|s| s.id != source_id),
            |repo, pid| repo.delete_theoretical_source(pid, source_id),
            "Failed to delete source",
        )
    }

    fn commit<R: Clone>(
        &mut self,
        result: Option<R>,
        failure: &str,
        patch: impl FnOnce(&mut Project, R),
    ) -> SessionResult<R> {
        let Some(value) = result else {
            tracing::warn!(project_id = %self.project_id, "{}", failure);
            return Err(SessionError::NotFound(format!("{}. Please try again.", failure)));
        };

        let shown = value.clone();
        let _ = self.view.apply_optimistic(|p| patch(p, shown));
        self.reload();
        Ok(value)
    }

    fn remove(
        &mut self,
        patch: impl FnOnce(&mut Project),
        op: impl FnOnce(&ProjectRepository, &str) -> bool,
        failure: &str,
    ) -> SessionResult<()> {
        let optimistic = self.view.apply_optimistic(patch);

        if !op(&self.repo, &self.project_id) {
            self.view.rollback(optimistic);
            tracing::warn!(project_id = %self.project_id, "{}", failure);
            return Err(SessionError::NotFound(format!("{}. Please try again.", failure)));
        }

        self.reload();
        Ok(())
    }
}

fn require(value: &str, message: &str) -> SessionResult<()> {
    if value.trim().is_empty() {
        return Err(SessionError::Validation(message.to_string()));
    }
    Ok(())
}

fn replace_task(project: &mut Project, milestone_id: &str, task: Task) {
    let slot = project
        .milestones
        .iter_mut()
        .find(|m| m.id == milestone_id)
        .and_then(|m| m.tasks.iter_mut().find(|t| t.id == task.id));
    if let Some(slot) = slot {
        *slot = task;
    }
}
