use crate::models::*;

use super::ProjectRepository;

impl ProjectRepository {
    pub fn add_milestone(&self, project_id: &str, input: CreateMilestoneInput) -> Option<Milestone> {
        let milestone = Milestone {
            id: self.store.clock().next_id("m-"),
            title: input.title,
            status: input.status.unwrap_or_default(),
            due_date: input.due_date,
            description: input.description,
            tasks: Vec::new(),
        };

        let (_, milestone) = self.modify(project_id, |project| {
            project.milestones.push(milestone.clone());
            Some(milestone)
        })?;
        Some(milestone)
    }

    pub fn update_milestone(
        &self,
        project_id: &str,
        milestone_id: &str,
        input: UpdateMilestoneInput,
    ) -> Option<Milestone> {
        let (_, updated) = self.modify(project_id, |project| {
            let milestone = project.milestones.iter_mut().find(|m| m.id == milestone_id)?;
            input.apply_to(milestone);
            Some(milestone.clone())
        })?;
        Some(updated)
    }

    /// Removes a milestone together with its tasks.
    pub fn delete_milestone(&self, project_id: &str, milestone_id: &str) -> bool {
        self.modify(project_id, |project| {
            let before = project.milestones.len();
            project.milestones.retain(|m| m.id != milestone_id);
            (project.milestones.len() < before).then_some(())
        })
        .is_some()
    }
}

#[cfg(test)]
mod tests {
    use crate::models::*;
    use crate::repository::ProjectRepository;

    fn setup() -> (ProjectRepository, String) {
        let repo = ProjectRepository::in_memory();
        let project = repo.create(CreateProjectInput {
            title: "P".into(),
            description: None,
            user_id: "u1".into(),
            plan_and_aim: None,
        });
        (repo, project.id)
    }

    fn milestone(title: &str) -> CreateMilestoneInput {
        CreateMilestoneInput {
            title: title.into(),
            status: None,
            due_date: None,
            description: None,
        }
    }

    #[test]
    fn add_defaults_status_and_persists() {
        let (repo, pid) = setup();
        let before = repo.get_by_id(&pid).unwrap().updated_at;

        let m = repo.add_milestone(&pid, milestone("Lit Review")).unwrap();

        assert_eq!(m.status, MilestoneStatus::NotStarted);
        assert!(m.id.starts_with("m-"));
        let project = repo.get_by_id(&pid).unwrap();
        assert_eq!(project.milestones, vec![m]);
        assert!(project.updated_at > before);
    }

    #[test]
    fn add_to_missing_project_returns_none() {
        let (repo, _) = setup();
        assert!(repo.add_milestone("nope", milestone("x")).is_none());
    }

    #[test]
    fn update_merges_fields_and_keeps_tasks() {
        let (repo, pid) = setup();
        let m = repo.add_milestone(&pid, milestone("Draft")).unwrap();
        repo.add_task(
            &pid,
            &m.id,
            CreateTaskInput {
                description: "t".into(),
                status: None,
                due_date: None,
                comments: None,
            },
        )
        .unwrap();

        let updated = repo
            .update_milestone(
                &pid,
                &m.id,
                UpdateMilestoneInput {
                    status: Some(MilestoneStatus::Completed),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, "Draft");
        assert_eq!(updated.status, MilestoneStatus::Completed);
        assert_eq!(updated.tasks.len(), 1);
        assert!(repo
            .update_milestone(&pid, "nope", UpdateMilestoneInput::default())
            .is_none());
    }

    #[test]
    fn delete_removes_exactly_one_milestone() {
        let (repo, pid) = setup();
        let keep = repo.add_milestone(&pid, milestone("Keep")).unwrap();
        let drop = repo.add_milestone(&pid, milestone("Drop")).unwrap();

        assert!(repo.delete_milestone(&pid, &drop.id));

        let project = repo.get_by_id(&pid).unwrap();
        assert_eq!(project.milestones, vec![keep]);
    }

    #[test]
    fn delete_missing_leaves_project_unchanged() {
        let (repo, pid) = setup();
        repo.add_milestone(&pid, milestone("Keep")).unwrap();
        let before = repo.get_by_id(&pid).unwrap();

        assert!(!repo.delete_milestone(&pid, "nope"));
        assert!(!repo.delete_milestone("nope", "nope"));
        assert_eq!(repo.get_by_id(&pid).unwrap(), before);
    }
}
