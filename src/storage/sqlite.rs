//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::output::CrawlReport;
use crate::state::CrawlPhase;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{HostScope, RunRecord};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const RUN_COLUMNS: &str = "id, seed, base_domain, started_at, finished_at, outcome, config_hash,
     total_pages, total_links, internal_pages, subdomains, external_hosts,
     external_link_occurrences, rejected_links, broken_links";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn query_strings(&self, sql: &str, run_id: i64) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params![run_id], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<String>, _>>()?)
    }
}

/// Maps a `runs` row selected with `RUN_COLUMNS`
fn run_from_row(row: &Row<'_>) -> rusqlite::Result<(RunRecord, String)> {
    let outcome: String = row.get(5)?;
    let count = |idx: usize| -> rusqlite::Result<u64> { Ok(row.get::<_, i64>(idx)?.max(0) as u64) };

    let record = RunRecord {
        id: row.get(0)?,
        seed: row.get(1)?,
        base_domain: row.get(2)?,
        started_at: row.get(3)?,
        finished_at: row.get(4)?,
        // Replaced by the caller once the stored string is checked
        outcome: CrawlPhase::Completed,
        config_hash: row.get(6)?,
        total_pages: count(7)?,
        total_links: count(8)?,
        internal_pages: count(9)?,
        subdomains: count(10)?,
        external_hosts: count(11)?,
        external_link_occurrences: count(12)?,
        rejected_links: count(13)?,
        broken_links: count(14)?,
    };

    Ok((record, outcome))
}

fn with_outcome((mut record, outcome): (RunRecord, String)) -> StorageResult<RunRecord> {
    record.outcome = CrawlPhase::from_str_opt(&outcome)
        .ok_or_else(|| StorageError::InvalidRecord(format!("unknown outcome '{}'", outcome)))?;
    Ok(record)
}

impl Storage for SqliteStorage {
    // ===== Writing =====

    fn save_report(&mut self, report: &CrawlReport) -> StorageResult<i64> {
        let stats = &report.statistics;
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO runs (seed, base_domain, started_at, finished_at, outcome, config_hash,
             total_pages, total_links, internal_pages, subdomains, external_hosts,
             external_link_occurrences, rejected_links, broken_links)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                report.seed,
                report.base_domain,
                report.started_at.map(|t| t.to_rfc3339()),
                report.finished_at.map(|t| t.to_rfc3339()),
                stats.outcome.as_str(),
                report.config_hash,
                stats.total_pages as i64,
                stats.total_links as i64,
                stats.internal_pages as i64,
                stats.subdomains as i64,
                stats.external_links as i64,
                stats.external_link_occurrences as i64,
                stats.rejected_links as i64,
                stats.broken_links as i64,
            ],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut insert_page =
                tx.prepare("INSERT OR IGNORE INTO pages (run_id, url) VALUES (?1, ?2)")?;
            for url in &report.visited {
                insert_page.execute(params![run_id, url])?;
            }

            let mut insert_host = tx.prepare(
                "INSERT OR IGNORE INTO hosts (run_id, host, scope) VALUES (?1, ?2, ?3)",
            )?;
            for host in &report.subdomains {
                insert_host.execute(params![run_id, host, HostScope::Subdomain.to_db_string()])?;
            }
            for host in &report.external_resources {
                insert_host.execute(params![run_id, host, HostScope::External.to_db_string()])?;
            }

            let mut insert_extension = tx.prepare(
                "INSERT INTO file_extensions (run_id, extension, occurrences) VALUES (?1, ?2, ?3)",
            )?;
            let mut insert_file = tx.prepare(
                "INSERT OR IGNORE INTO file_links (run_id, extension, url) VALUES (?1, ?2, ?3)",
            )?;
            for (extension, links) in &stats.file_links {
                insert_extension.execute(params![run_id, extension, links.count as i64])?;
                for url in &links.urls {
                    insert_file.execute(params![run_id, extension, url])?;
                }
            }

            let mut insert_broken = tx.prepare(
                "INSERT INTO broken_links (run_id, url, status_code, reason) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for broken in &report.broken {
                insert_broken.execute(params![run_id, broken.url, broken.status_code, broken.reason])?;
            }
        }

        tx.commit()?;

        tracing::debug!(
            "Saved run {} ({} pages, {} hosts)",
            run_id,
            report.visited.len(),
            report.subdomains.len() + report.external_resources.len()
        );

        Ok(run_id)
    }

    // ===== Run Queries =====

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        let sql = format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS);
        let row = self
            .conn
            .query_row(&sql, params![run_id], run_from_row)
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))?;

        with_outcome(row)
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let sql = format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS);
        self.conn
            .query_row(&sql, [], run_from_row)
            .optional()?
            .map(with_outcome)
            .transpose()
    }

    fn list_runs(&self) -> StorageResult<Vec<RunRecord>> {
        let sql = format!("SELECT {} FROM runs ORDER BY id", RUN_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], run_from_row)?;

        let mut runs = Vec::new();
        for row in rows {
            runs.push(with_outcome(row?)?);
        }
        Ok(runs)
    }

    // ===== Run Contents =====

    fn get_pages(&self, run_id: i64) -> StorageResult<Vec<String>> {
        self.query_strings(
            "SELECT url FROM pages WHERE run_id = ?1 ORDER BY url",
            run_id,
        )
    }

    fn get_hosts(&self, run_id: i64, scope: HostScope) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT host FROM hosts WHERE run_id = ?1 AND scope = ?2 ORDER BY host")?;
        let rows = stmt.query_map(params![run_id, scope.to_db_string()], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<String>, _>>()?)
    }

    fn get_file_links(&self, run_id: i64) -> StorageResult<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT extension, url FROM file_links WHERE run_id = ?1 ORDER BY extension, id",
        )?;
        let rows = stmt.query_map(params![run_id], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<Result<Vec<(String, String)>, _>>()?)
    }

    fn count_file_links_by_extension(&self, run_id: i64) -> StorageResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT extension, occurrences FROM file_extensions WHERE run_id = ?1 ORDER BY extension",
        )?;
        let rows = stmt.query_map(params![run_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?.max(0) as u64))
        })?;
        Ok(rows.collect::<Result<Vec<(String, u64)>, _>>()?)
    }
}
