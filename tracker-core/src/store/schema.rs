pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS slot_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    position INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    user_id TEXT NOT NULL,
    plan_and_aim TEXT,
    results TEXT,
    notes TEXT,
    has_coding INTEGER NOT NULL DEFAULT 0,
    coding_repo_url TEXT,
    coding_notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS milestones (
    project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    id TEXT NOT NULL,
    title TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'Not Started' CHECK (status IN ('Not Started', 'In Progress', 'Completed')),
    due_date TEXT,
    description TEXT,
    PRIMARY KEY (project_id, position)
);

CREATE TABLE IF NOT EXISTS tasks (
    project_id TEXT NOT NULL,
    milestone_position INTEGER NOT NULL,
    position INTEGER NOT NULL,
    id TEXT NOT NULL,
    description TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'To Do' CHECK (status IN ('To Do', 'In Progress', 'Done', 'Updated')),
    completed INTEGER NOT NULL DEFAULT 0,
    due_date TEXT,
    comments TEXT,
    PRIMARY KEY (project_id, milestone_position, position),
    FOREIGN KEY (project_id, milestone_position)
        REFERENCES milestones(project_id, position) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS theoretical_sources (
    project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    id TEXT NOT NULL,
    source_type TEXT NOT NULL CHECK (source_type IN ('paper', 'book')),
    title TEXT NOT NULL,
    url TEXT,
    notes TEXT,
    PRIMARY KEY (project_id, position)
);

CREATE INDEX IF NOT EXISTS idx_projects_position ON projects(position);
CREATE INDEX IF NOT EXISTS idx_projects_user ON projects(user_id);
"#;

/// Marks a slot that has been written at least once, so an emptied
/// collection is not mistaken for a fresh database.
pub const INITIALIZED_KEY: &str = "initialized";
