//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Site-Census
//! report database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per archived crawl
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    seed TEXT NOT NULL,
    base_domain TEXT NOT NULL,
    started_at TEXT,
    finished_at TEXT,
    outcome TEXT NOT NULL,
    config_hash TEXT,
    total_pages INTEGER NOT NULL DEFAULT 0,
    total_links INTEGER NOT NULL DEFAULT 0,
    internal_pages INTEGER NOT NULL DEFAULT 0,
    subdomains INTEGER NOT NULL DEFAULT 0,
    external_hosts INTEGER NOT NULL DEFAULT 0,
    external_link_occurrences INTEGER NOT NULL DEFAULT 0,
    rejected_links INTEGER NOT NULL DEFAULT 0,
    broken_links INTEGER NOT NULL DEFAULT 0
);

-- Visited pages (final URLs)
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    url TEXT NOT NULL,
    UNIQUE(run_id, url)
);

CREATE INDEX IF NOT EXISTS idx_pages_run ON pages(run_id);

-- Subdomain and external hosts
CREATE TABLE IF NOT EXISTS hosts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    host TEXT NOT NULL,
    scope TEXT NOT NULL CHECK (scope IN ('subdomain', 'external')),
    UNIQUE(run_id, host, scope)
);

CREATE INDEX IF NOT EXISTS idx_hosts_run_scope ON hosts(run_id, scope);

-- Distinct document URLs
CREATE TABLE IF NOT EXISTS file_links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    extension TEXT NOT NULL,
    url TEXT NOT NULL,
    UNIQUE(run_id, extension, url)
);

CREATE INDEX IF NOT EXISTS idx_file_links_run ON file_links(run_id);

-- Document occurrences per extension
CREATE TABLE IF NOT EXISTS file_extensions (
    run_id INTEGER NOT NULL REFERENCES runs(id),
    extension TEXT NOT NULL,
    occurrences INTEGER NOT NULL,
    PRIMARY KEY (run_id, extension)
);

-- Failed fetches
CREATE TABLE IF NOT EXISTS broken_links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    url TEXT NOT NULL,
    status_code INTEGER,
    reason TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_broken_links_run ON broken_links(run_id);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
