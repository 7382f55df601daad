//! Canonical schema for the wemanageall database.
//!
//! Pure data definition: every statement carries an IF NOT EXISTS guard (or
//! an equivalent catalog probe) so statement-level re-application is benign.
//! The runner in [`crate::runner`] decides HOW the script is applied.

/// The `session` table layout is fixed by the deployed web session plumbing
/// and must not be "improved": `sid` text primary key under the named
/// constraint `session_pkey`, `sess` as `json` (not `jsonb`), `expire` as
/// `timestamp(6)` without time zone.
pub const SESSION_TABLE_DDL: &str = r#"CREATE TABLE IF NOT EXISTS "session" (
    sid TEXT NOT NULL COLLATE "default",
    sess JSON NOT NULL,
    expire TIMESTAMP(6) NOT NULL,
    CONSTRAINT session_pkey PRIMARY KEY (sid)
)"#;

/// Expiry index used by session reads and the expired-session sweep.
pub const SESSION_EXPIRE_INDEX_DDL: &str =
    r#"CREATE INDEX IF NOT EXISTS "IDX_session_expire" ON "session" (expire)"#;

/// Name of the session primary-key constraint, checked after rebuilds.
pub const SESSION_PKEY_NAME: &str = "session_pkey";

/// Name of the session expiry index, checked after rebuilds.
pub const SESSION_EXPIRE_INDEX_NAME: &str = "IDX_session_expire";

/// The baseline one-intention-per-day constraint. Dropped by the
/// `0003_drop_intention_unique` migration.
pub const INTENTION_UNIQUE_CONSTRAINT: &str = "daily_intentions_user_id_entry_date_key";

/// Tables a healthy database must contain, in creation order.
/// Verification after `init` checks exactly this list.
pub const CORE_TABLES: &[&str] = &[
    "users",
    "session",
    "roles",
    "core_values",
    "focus_areas",
    "goals",
    "tasks",
    "journal_entries",
    "daily_intentions",
    "projects",
    "project_phases",
    "project_tasks",
    "project_milestones",
    "project_notes",
    "lists",
    "list_items",
    "waitlist",
    "schema_migrations",
];

/// Drop order for `reset`: children before parents, with CASCADE as a
/// second line of defense for anything the order misses.
pub const RESET_ORDER: &[&str] = &[
    "list_items",
    "lists",
    "project_notes",
    "project_milestones",
    "project_tasks",
    "project_phases",
    "projects",
    "daily_intentions",
    "journal_entries",
    "tasks",
    "goals",
    "focus_areas",
    "core_values",
    "roles",
    "waitlist",
    "session",
    "schema_migrations",
    "users",
];

/// DROP statements for `reset`, one per table in [`RESET_ORDER`].
pub fn reset_statements() -> Vec<String> {
    RESET_ORDER.iter().map(|t| format!(r#"DROP TABLE IF EXISTS "{t}" CASCADE"#)).collect()
}

/// The full schema as one splittable SQL script.
///
/// Later-life column additions use catalog-probing DO blocks instead of
/// plain ALTER TABLE so the script stays re-runnable on databases created
/// from earlier revisions.
pub fn base_schema() -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    email TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    display_name TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

{SESSION_TABLE_DDL};

{SESSION_EXPIRE_INDEX_DDL};

CREATE TABLE IF NOT EXISTS roles (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS core_values (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS focus_areas (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    color TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS goals (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    focus_area_id BIGINT REFERENCES focus_areas(id) ON DELETE SET NULL,
    title TEXT NOT NULL,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'active',
    target_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_goals_user ON goals (user_id);

CREATE TABLE IF NOT EXISTS tasks (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    goal_id BIGINT REFERENCES goals(id) ON DELETE SET NULL,
    title TEXT NOT NULL,
    is_done BOOLEAN NOT NULL DEFAULT FALSE,
    due_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_tasks_user ON tasks (user_id);

CREATE TABLE IF NOT EXISTS journal_entries (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    entry_date DATE NOT NULL,
    content TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_journal_user_date ON journal_entries (user_id, entry_date);

CREATE TABLE IF NOT EXISTS daily_intentions (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    entry_date DATE NOT NULL,
    content TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT {INTENTION_UNIQUE_CONSTRAINT} UNIQUE (user_id, entry_date)
);

CREATE INDEX IF NOT EXISTS idx_intentions_user_date ON daily_intentions (user_id, entry_date);

CREATE TABLE IF NOT EXISTS projects (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'active',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS project_phases (
    id BIGSERIAL PRIMARY KEY,
    project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    position INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS project_tasks (
    id BIGSERIAL PRIMARY KEY,
    project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    phase_id BIGINT REFERENCES project_phases(id) ON DELETE SET NULL,
    title TEXT NOT NULL,
    is_done BOOLEAN NOT NULL DEFAULT FALSE,
    due_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_project_tasks_project ON project_tasks (project_id);

CREATE TABLE IF NOT EXISTS project_milestones (
    id BIGSERIAL PRIMARY KEY,
    project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    due_date DATE,
    reached_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS project_notes (
    id BIGSERIAL PRIMARY KEY,
    project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    body TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS lists (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    share_code TEXT UNIQUE,
    is_shared BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_lists_share_code ON lists (share_code);

CREATE TABLE IF NOT EXISTS list_items (
    id BIGSERIAL PRIMARY KEY,
    list_id BIGINT NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    is_done BOOLEAN NOT NULL DEFAULT FALSE,
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_list_items_list ON list_items (list_id);

DO $$ BEGIN
    IF NOT EXISTS (
        SELECT 1 FROM information_schema.columns
        WHERE table_name = 'list_items' AND column_name = 'tag'
    ) THEN
        ALTER TABLE list_items ADD COLUMN tag TEXT;
    END IF;
END $$;

CREATE TABLE IF NOT EXISTS waitlist (
    id BIGSERIAL PRIMARY KEY,
    email TEXT UNIQUE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#
    )
}
