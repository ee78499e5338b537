//! Relational slot backed by SQLite.
//!
//! Projects and their nested collections are stored in normalized tables,
//! one row per entity, ordered by `position`. Saving a single project
//! replaces only that project's rows.

use std::fs;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::*;

use super::schema::{INITIALIZED_KEY, SCHEMA};
use super::{Slot, StoreError, StoreResult};

pub const DEFAULT_DB_NAME: &str = "projects.db";

pub struct SqliteSlot {
    conn: Connection,
    label: String,
}

impl SqliteSlot {
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::init(conn, format!("sqlite:{}", path.display()))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?, "sqlite::memory:".into())
    }

    fn init(conn: Connection, label: String) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, label })
    }

    fn is_initialized(&self) -> StoreResult<bool> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM slot_meta WHERE key = ?1",
                params![INITIALIZED_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.is_some())
    }

    fn read_projects(&self) -> StoreResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, user_id, plan_and_aim, results, notes,
                    has_coding, coding_repo_url, coding_notes, created_at, updated_at
             FROM projects ORDER BY position",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ProjectRow {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    description: row.get(2)?,
                    user_id: row.get(3)?,
                    plan_and_aim: row.get(4)?,
                    results: row.get(5)?,
                    notes: row.get(6)?,
                    has_coding: row.get(7)?,
                    coding_repo_url: row.get(8)?,
                    coding_notes: row.get(9)?,
                    created_at: row.get(10)?,
                    updated_at: row.get(11)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut projects = Vec::with_capacity(rows.len());
        for row in rows {
            let mut project = row.into_project()?;
            project.milestones = self.read_milestones(&project.id)?;
            project.theoretical_background = self.read_sources(&project.id)?;
            projects.push(project);
        }
        Ok(projects)
    }

    fn read_milestones(&self, project_id: &str) -> StoreResult<Vec<Milestone>> {
        let mut stmt = self.conn.prepare(
            "SELECT position, id, title, status, due_date, description
             FROM milestones WHERE project_id = ?1 ORDER BY position",
        )?;
        let rows = stmt
            .query_map(params![project_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut milestones = Vec::with_capacity(rows.len());
        for (position, id, title, status, due_date, description) in rows {
            let status = MilestoneStatus::from_str(&status)
                .ok_or_else(|| StoreError::Corrupt(format!("milestone status {:?}", status)))?;
            milestones.push(Milestone {
                tasks: self.read_tasks(project_id, position)?,
                id,
                title,
                status,
                due_date,
                description,
            });
        }
        Ok(milestones)
    }

    fn read_tasks(&self, project_id: &str, milestone_position: i64) -> StoreResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description, status, completed, due_date, comments
             FROM tasks WHERE project_id = ?1 AND milestone_position = ?2
             ORDER BY position",
        )?;
        let rows = stmt
            .query_map(params![project_id, milestone_position], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, bool>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, description, status, completed, due_date, comments)| {
                let status = TaskStatus::from_str(&status)
                    .ok_or_else(|| StoreError::Corrupt(format!("task status {:?}", status)))?;
                Ok(Task {
                    id,
                    description,
                    status,
                    completed,
                    due_date,
                    comments,
                })
            })
            .collect()
    }

    fn read_sources(&self, project_id: &str) -> StoreResult<Vec<TheoreticalSource>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, source_type, title, url, notes
             FROM theoretical_sources WHERE project_id = ?1 ORDER BY position",
        )?;
        let rows = stmt
            .query_map(params![project_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, source_type, title, url, notes)| {
                let source_type = SourceType::from_str(&source_type).ok_or_else(|| {
                    StoreError::Corrupt(format!("source type {:?}", source_type))
                })?;
                Ok(TheoreticalSource {
                    id,
                    source_type,
                    title,
                    url,
                    notes,
                })
            })
            .collect()
    }
}

impl Slot for SqliteSlot {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn read(&self) -> StoreResult<Option<Vec<Project>>> {
        if !self.is_initialized()? {
            return Ok(None);
        }
        self.read_projects().map(Some)
    }

    fn write(&mut self, projects: &[Project]) -> StoreResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM projects", [])?;
        for (position, project) in projects.iter().enumerate() {
            insert_project(&tx, position as i64, project)?;
        }
        mark_initialized(&tx)?;
        tx.commit()?;
        Ok(())
    }

    fn put(&mut self, projects: &[Project], project: &Project) -> StoreResult<()> {
        if !self.is_initialized()? {
            return self.write(projects);
        }

        let tx = self.conn.transaction()?;
        let existing: Option<i64> = tx
            .query_row(
                "SELECT position FROM projects WHERE id = ?1",
                params![project.id],
                |row| row.get(0),
            )
            .optional()?;
        let position = match existing {
            Some(position) => position,
            None => tx.query_row(
                "SELECT COALESCE(MAX(position) + 1, 0) FROM projects",
                [],
                |row| row.get(0),
            )?,
        };

        tx.execute("DELETE FROM projects WHERE id = ?1", params![project.id])?;
        insert_project(&tx, position, project)?;
        tx.commit()?;
        Ok(())
    }

    fn remove(&mut self, projects: &[Project], id: &str) -> StoreResult<()> {
        if !self.is_initialized()? {
            return self.write(projects);
        }
        self.conn
            .execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        Ok(())
    }
}

struct ProjectRow {
    id: String,
    title: String,
    description: Option<String>,
    user_id: String,
    plan_and_aim: Option<String>,
    results: Option<String>,
    notes: Option<String>,
    has_coding: bool,
    coding_repo_url: Option<String>,
    coding_notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl ProjectRow {
    fn into_project(self) -> StoreResult<Project> {
        let coding = self.has_coding.then(|| CodingInfo {
            repo_url: self.coding_repo_url,
            notes: self.coding_notes,
        });
        Ok(Project {
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            id: self.id,
            title: self.title,
            description: self.description,
            user_id: self.user_id,
            plan_and_aim: self.plan_and_aim,
            results: self.results,
            notes: self.notes,
            coding,
            milestones: Vec::new(),
            theoretical_background: Vec::new(),
        })
    }
}

fn insert_project(conn: &Connection, position: i64, project: &Project) -> StoreResult<()> {
    let coding = project.coding.as_ref();
    conn.execute(
        "INSERT INTO projects (id, position, title, description, user_id, plan_and_aim,
                               results, notes, has_coding, coding_repo_url, coding_notes,
                               created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            project.id,
            position,
            project.title,
            project.description,
            project.user_id,
            project.plan_and_aim,
            project.results,
            project.notes,
            coding.is_some(),
            coding.and_then(|c| c.repo_url.as_deref()),
            coding.and_then(|c| c.notes.as_deref()),
            format_timestamp(&project.created_at),
            format_timestamp(&project.updated_at),
        ],
    )?;

    for (m_pos, milestone) in project.milestones.iter().enumerate() {
        let m_pos = m_pos as i64;
        conn.execute(
            "INSERT INTO milestones (project_id, position, id, title, status, due_date, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                project.id,
                m_pos,
                milestone.id,
                milestone.title,
                milestone.status.as_str(),
                milestone.due_date,
                milestone.description,
            ],
        )?;

        for (t_pos, task) in milestone.tasks.iter().enumerate() {
            conn.execute(
                "INSERT INTO tasks (project_id, milestone_position, position, id, description,
                                    status, completed, due_date, comments)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    project.id,
                    m_pos,
                    t_pos as i64,
                    task.id,
                    task.description,
                    task.status.as_str(),
                    task.completed,
                    task.due_date,
                    task.comments,
                ],
            )?;
        }
    }

    for (s_pos, source) in project.theoretical_background.iter().enumerate() {
        conn.execute(
            "INSERT INTO theoretical_sources (project_id, position, id, source_type, title, url, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                project.id,
                s_pos as i64,
                source.id,
                source.source_type.as_str(),
                source.title,
                source.url,
                source.notes,
            ],
        )?;
    }

    Ok(())
}

fn mark_initialized(conn: &Connection) -> StoreResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO slot_meta (key, value) VALUES (?1, ?2)",
        params![INITIALIZED_KEY, format_timestamp(&Utc::now())],
    )?;
    Ok(())
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_timestamp(s: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("timestamp {:?}: {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use tempfile::TempDir;

    fn project(id: &str, title: &str) -> Project {
        let mut p = seed::default_projects(Utc::now()).remove(0);
        p.id = id.into();
        p.title = title.into();
        p
    }

    #[test]
    fn fresh_database_reads_as_absent() {
        let slot = SqliteSlot::open_in_memory().unwrap();
        assert!(slot.read().unwrap().is_none());
    }

    #[test]
    fn write_and_read_round_trip() {
        let mut slot = SqliteSlot::open_in_memory().unwrap();
        let projects = vec![project("a", "First"), project("b", "Second")];

        slot.write(&projects).unwrap();

        assert_eq!(slot.read().unwrap().unwrap(), projects);
    }

    #[test]
    fn emptied_slot_stays_initialized() {
        let mut slot = SqliteSlot::open_in_memory().unwrap();
        slot.write(&[project("a", "First")]).unwrap();
        slot.write(&[]).unwrap();

        assert_eq!(slot.read().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn put_replaces_one_project_and_keeps_order() {
        let mut slot = SqliteSlot::open_in_memory().unwrap();
        let mut projects = vec![project("a", "First"), project("b", "Second")];
        slot.write(&projects).unwrap();

        projects[0].title = "First (edited)".into();
        projects[0].milestones.truncate(1);
        slot.put(&projects, &projects[0]).unwrap();

        let read = slot.read().unwrap().unwrap();
        assert_eq!(read[0].id, "a");
        assert_eq!(read[0].title, "First (edited)");
        assert_eq!(read[0].milestones.len(), 1);
        assert_eq!(read[1].milestones.len(), 2);
    }

    #[test]
    fn put_appends_new_projects_after_existing_ones() {
        let mut slot = SqliteSlot::open_in_memory().unwrap();
        let mut projects = vec![project("a", "First"), project("b", "Second")];
        slot.write(&projects).unwrap();

        projects.remove(0);
        slot.remove(&projects, "a").unwrap();
        let added = project("c", "Third");
        projects.push(added.clone());
        slot.put(&projects, &added).unwrap();

        let ids: Vec<String> = slot.read().unwrap().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn remove_cascades_nested_rows() {
        let mut slot = SqliteSlot::open_in_memory().unwrap();
        slot.write(&[project("a", "First")]).unwrap();
        slot.remove(&[], "a").unwrap();

        let tasks: i64 = slot
            .conn
            .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))
            .unwrap();
        let sources: i64 = slot
            .conn
            .query_row("SELECT COUNT(*) FROM theoretical_sources", [], |row| row.get(0))
            .unwrap();
        assert_eq!(tasks, 0);
        assert_eq!(sources, 0);
    }

    #[test]
    fn survives_reopening() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join(DEFAULT_DB_NAME);
        let projects = vec![project("a", "First")];

        {
            let mut slot = SqliteSlot::open(&path).unwrap();
            slot.write(&projects).unwrap();
        }

        let slot = SqliteSlot::open(&path).unwrap();
        assert_eq!(slot.read().unwrap().unwrap(), projects);
    }
}
