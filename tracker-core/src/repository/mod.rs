//! Typed CRUD over projects and their nested collections.
//!
//! Every operation starts from the latest snapshot in the store. Project
//! updates and nested mutations edit a copy of the project under the
//! store's lock and write it back whole, so the record is either replaced
//! or left untouched, and a project deleted in the meantime stays deleted.
//! Missing ids are reported as `None` or `false`, never as errors.

mod milestones;
mod sources;
mod tasks;

use std::sync::Arc;

use crate::dashboard::{DashboardStats, MilestoneOverview, SourceOverview};
use crate::models::*;
use crate::store::StoreAdapter;

#[derive(Clone)]
pub struct ProjectRepository {
    store: Arc<StoreAdapter>,
}

impl ProjectRepository {
    pub fn new(store: Arc<StoreAdapter>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(StoreAdapter::in_memory()))
    }

    pub fn store(&self) -> &StoreAdapter {
        &self.store
    }

    pub fn get_all(&self) -> Vec<Project> {
        self.store.load()
    }

    pub fn get_by_id(&self, id: &str) -> Option<Project> {
        self.store.load().into_iter().find(|p| p.id == id)
    }

    pub fn create(&self, input: CreateProjectInput) -> Project {
        let clock = self.store.clock();
        let now = clock.now();
        let project = Project {
            id: clock.next_id(""),
            title: input.title,
            description: input.description,
            user_id: input.user_id,
            created_at: now,
            updated_at: now,
            plan_and_aim: input.plan_and_aim,
            results: None,
            notes: None,
            coding: None,
            milestones: Vec::new(),
            theoretical_background: Vec::new(),
        };

        self.store.save_project(&project);
        tracing::info!(project_id = %project.id, title = %project.title, "Created project");
        project
    }

    pub fn update(&self, id: &str, input: UpdateProjectInput) -> Option<Project> {
        let (project, ()) = self.modify(id, |project| {
            input.apply_to(project);
            Some(())
        })?;
        tracing::debug!(project_id = %id, "Updated project");
        Some(project)
    }

    pub fn delete(&self, id: &str) -> bool {
        let removed = self.store.remove_project(id);
        if removed {
            tracing::info!(project_id = %id, "Deleted project");
        }
        removed
    }

    pub fn dashboard(&self) -> DashboardStats {
        DashboardStats::from_projects(&self.get_all())
    }

    pub fn milestone_overview(&self) -> MilestoneOverview {
        MilestoneOverview::from_projects(&self.get_all())
    }

    pub fn source_overview(&self) -> SourceOverview {
        SourceOverview::from_projects(&self.get_all())
    }

    /// Edits the stored project in one step. When `f` succeeds, task flags
    /// are recomputed and `updated_at` moves past its stored value before
    /// the project is written back.
    fn modify<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Project) -> Option<R>,
    ) -> Option<(Project, R)> {
        let clock = self.store.clock();
        self.store.modify_project(id, |project| {
            let out = f(project)?;
            project.normalize();
            project.updated_at = clock.now_after(project.updated_at);
            Some((project.clone(), out))
        })
    }
}
