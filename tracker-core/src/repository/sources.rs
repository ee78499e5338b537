use crate::models::*;

use super::ProjectRepository;

impl ProjectRepository {
    pub fn add_theoretical_source(
        &self,
        project_id: &str,
        input: CreateSourceInput,
    ) -> Option<TheoreticalSource> {
        let source = TheoreticalSource {
            id: self.store.clock().next_id("ts-"),
            source_type: input.source_type,
            title: input.title,
            url: input.url,
            notes: input.notes,
        };

        let (_, source) = self.modify(project_id, |project| {
            project.theoretical_background.push(source.clone());
            Some(source)
        })?;
        Some(source)
    }

    pub fn update_theoretical_source(
        &self,
        project_id: &str,
        source_id: &str,
        input: UpdateSourceInput,
    ) -> Option<TheoreticalSource> {
        let (_, updated) = self.modify(project_id, |project| {
            let source = project
                .theoretical_background
                .iter_mut()
                .find(|s| s.id == source_id)?;
            input.apply_to(source);
            Some(source.clone())
        })?;
        Some(updated)
    }

    pub fn delete_theoretical_source(&self, project_id: &str, source_id: &str) -> bool {
        self.modify(project_id, |project| {
            let sources = &mut project.theoretical_background;
            let before = sources.len();
            sources.retain(|s| s.id != source_id);
            (sources.len() < before).then_some(())
        })
        .is_some()
    }
}
