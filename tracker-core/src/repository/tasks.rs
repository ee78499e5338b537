use crate::models::*;

use super::ProjectRepository;

impl ProjectRepository {
    pub fn add_task(
        &self,
        project_id: &str,
        milestone_id: &str,
        input: CreateTaskInput,
    ) -> Option<Task> {
        let status = input.status.unwrap_or_default();
        let task = Task {
            id: self.store.clock().next_id("t-"),
            description: input.description,
            status,
            completed: status.is_done(),
            due_date: input.due_date,
            comments: input.comments,
        };

        let (_, task) = self.modify(project_id, |project| {
            let milestone = project.milestones.iter_mut().find(|m| m.id == milestone_id)?;
            milestone.tasks.push(task.clone());
            Some(task)
        })?;
        Some(task)
    }

    /// Applies a patch to a task. A status in the patch decides completion;
    /// a bare `completed` is mapped to a status first.
    pub fn update_task(
        &self,
        project_id: &str,
        milestone_id: &str,
        task_id: &str,
        input: UpdateTaskInput,
    ) -> Option<Task> {
        self.modify_task(project_id, milestone_id, task_id, |task| input.apply_to(task))
    }

    /// Checkbox toggle: `true` marks the task Done, `false` moves it back
    /// to In Progress.
    pub fn set_task_completion(
        &self,
        project_id: &str,
        milestone_id: &str,
        task_id: &str,
        completed: bool,
    ) -> Option<Task> {
        self.modify_task(project_id, milestone_id, task_id, |task| {
            task.set_completed(completed)
        })
    }

    pub fn delete_task(&self, project_id: &str, milestone_id: &str, task_id: &str) -> bool {
        self.modify(project_id, |project| {
            let milestone = project.milestones.iter_mut().find(|m| m.id == milestone_id)?;
            let before = milestone.tasks.len();
            milestone.tasks.retain(|t| t.id != task_id);
            (milestone.tasks.len() < before).then_some(())
        })
        .is_some()
    }

    fn modify_task(
        &self,
        project_id: &str,
        milestone_id: &str,
        task_id: &str,
        f: impl FnOnce(&mut Task),
    ) -> Option<Task> {
        let (_, updated) = self.modify(project_id, |project| {
            let task = project
                .milestones
                .iter_mut()
                .find(|m| m.id == milestone_id)?
                .tasks
                .iter_mut()
                .find(|t| t.id == task_id)?;
            f(task);
            Some(task.clone())
        })?;
        Some(updated)
    }
}
