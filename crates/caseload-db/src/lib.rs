// Copyright 2026 Caseload Contributors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use caseload_app::{Category, Record, RecordId, sample_records};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const APP_NAME: &str = "caseload";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[(
    "records",
    &[
        "position",
        "category",
        "id",
        "body",
        "created_at",
        "updated_at",
    ],
)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RequiredIndex {
    name: &'static str,
    create_sql: &'static str,
}

const REQUIRED_INDEXES: &[RequiredIndex] = &[RequiredIndex {
    name: "idx_records_category_position",
    create_sql: "CREATE INDEX IF NOT EXISTS idx_records_category_position ON records (category, position);",
}];

/// SQLite-backed record storage. Each record is one row: its category and id
/// for addressing, the typed record serialized as JSON in `body`, and a
/// monotonic `position` that fixes display order before pagination.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    pub fn bootstrap(&self) -> Result<()> {
        if has_user_tables(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(include_str!("sql/schema.sql"))
                .context("create schema")?;
        }

        ensure_required_indexes(&self.conn)?;
        Ok(())
    }

    pub fn list_records(&self, category: Category) -> Result<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(
                "
                SELECT body
                FROM records
                WHERE category = ?
                ORDER BY position ASC
                ",
            )
            .context("prepare records query")?;
        let rows = stmt
            .query_map(params![category.as_str()], |row| row.get::<_, String>(0))
            .context("query records")?;
        let bodies = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("collect records")?;

        bodies.iter().map(|body| decode_record(body)).collect()
    }

    pub fn get_record(&self, category: Category, id: &RecordId) -> Result<Option<Record>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM records WHERE category = ? AND id = ?",
                params![category.as_str(), id.as_str()],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("load record {}", id.as_str()))?;

        body.as_deref().map(decode_record).transpose()
    }

    pub fn insert_record(&self, record: &Record) -> Result<()> {
        let now = now_rfc3339()?;
        let body = encode_record(record)?;
        self.conn
            .execute(
                "
                INSERT INTO records (category, id, body, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?)
                ",
                params![
                    record.category().as_str(),
                    record.id().as_str(),
                    body,
                    now,
                    now,
                ],
            )
            .with_context(|| format!("insert record {}", record.id().as_str()))?;
        Ok(())
    }

    /// Replaces the stored body. Returns false when no row matched.
    pub fn update_record(&self, record: &Record) -> Result<bool> {
        let now = now_rfc3339()?;
        let body = encode_record(record)?;
        let rows_affected = self
            .conn
            .execute(
                "
                UPDATE records
                SET body = ?, updated_at = ?
                WHERE category = ? AND id = ?
                ",
                params![
                    body,
                    now,
                    record.category().as_str(),
                    record.id().as_str(),
                ],
            )
            .with_context(|| format!("update record {}", record.id().as_str()))?;
        Ok(rows_affected > 0)
    }

    /// Removes a record. Returns false when no row matched.
    pub fn delete_record(&self, category: Category, id: &RecordId) -> Result<bool> {
        let rows_affected = self
            .conn
            .execute(
                "DELETE FROM records WHERE category = ? AND id = ?",
                params![category.as_str(), id.as_str()],
            )
            .with_context(|| format!("delete record {}", id.as_str()))?;
        Ok(rows_affected > 0)
    }

    pub fn record_count(&self, category: Category) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM records WHERE category = ?",
                params![category.as_str()],
                |row| row.get(0),
            )
            .with_context(|| format!("count {} records", category.as_str()))?;
        Ok(count as usize)
    }

    pub fn category_counts(&self) -> Result<Vec<(Category, usize)>> {
        Category::ALL
            .iter()
            .map(|category| Ok((*category, self.record_count(*category)?)))
            .collect()
    }

    /// Loads the fixture rows, skipping ids that already exist. Returns the
    /// number of records inserted.
    pub fn seed_demo_data(&self) -> Result<usize> {
        let mut inserted = 0;
        for record in sample_records() {
            if self.get_record(record.category(), record.id())?.is_some() {
                continue;
            }
            self.insert_record(&record)?;
            inserted += 1;
        }
        Ok(inserted)
    }
}

fn encode_record(record: &Record) -> Result<String> {
    serde_json::to_string(record)
        .with_context(|| format!("serialize record {}", record.id().as_str()))
}

fn decode_record(body: &str) -> Result<Record> {
    serde_json::from_str(body).context("deserialize stored record")
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("CASELOAD_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set CASELOAD_DB_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("caseload.db"))
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    let as_path = Path::new(path);
    if as_path.is_dir() {
        bail!("database path {path:?} is a directory; point at a file instead");
    }
    if let Some(parent) = as_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        bail!(
            "database directory {} does not exist; create it and retry",
            parent.display()
        );
    }

    Ok(())
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "
            SELECT COUNT(*)
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ",
            [],
            |row| row.get(0),
        )
        .context("count user tables")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    for (table, required_columns) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            bail!(
                "database is missing required table `{table}`; use a caseload-compatible database or migrate first"
            );
        }

        let columns = table_columns(conn, table)?;
        let missing: Vec<&str> = required_columns
            .iter()
            .copied()
            .filter(|column| !columns.contains(*column))
            .collect();

        if !missing.is_empty() {
            bail!(
                "table `{table}` is missing required columns: {}; run migration before launching",
                missing.join(", ")
            );
        }
    }

    Ok(())
}

fn ensure_required_indexes(conn: &Connection) -> Result<()> {
    for index in REQUIRED_INDEXES {
        conn.execute_batch(index.create_sql)
            .with_context(|| format!("ensure required index `{}`", index.name))?;
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "
            SELECT EXISTS(
              SELECT 1
              FROM sqlite_master
              WHERE type = 'table' AND name = ?
            )
            ",
            params![table],
            |row| row.get::<_, i64>(0),
        )
        .with_context(|| format!("check table existence for {table}"))?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query column info for {table}"))?;

    let names = rows
        .collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))?;
    Ok(names)
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current timestamp")
}

#[cfg(test)]
mod tests {
    use super::{Store, validate_db_path};
    use anyhow::Result;
    use caseload_app::Category;

    #[test]
    fn bootstrap_is_idempotent() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        store.bootstrap()?;

        assert_eq!(store.record_count(Category::Clients)?, 0);
        Ok(())
    }

    #[test]
    fn demo_seed_skips_existing_rows() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;

        assert_eq!(store.seed_demo_data()?, Category::ALL.len());
        assert_eq!(store.seed_demo_data()?, 0);
        Ok(())
    }

    #[test]
    fn uri_like_db_path_is_rejected() {
        let error = validate_db_path("postgres://localhost/caseload")
            .expect_err("URI path should be rejected");
        assert!(error.to_string().contains("filesystem path"));
    }
}
