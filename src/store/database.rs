//! Favorites database operations
//!
//! One long-lived connection per store. Mutating statements open a
//! transaction lazily; nothing is durable until `commit()` runs.

use std::path::Path;

use rusqlite::{params, Connection, Params};
use tracing::{debug, info};

use crate::error::{FavoritesError, Result};

pub const TABLE_NAME: &str = "paths";

/// Column layout of the `paths` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// path, identifier, fixed
    Basic,
    /// path, identifier, fixed, category
    Extended,
}

impl Schema {
    fn columns(&self) -> &'static str {
        match self {
            Schema::Basic => "path TEXT NOT NULL, identifier TEXT NOT NULL, fixed INTEGER NOT NULL",
            Schema::Extended => {
                "path TEXT NOT NULL, identifier TEXT NOT NULL, fixed INTEGER NOT NULL, category TEXT"
            }
        }
    }

    fn select_sql(&self) -> &'static str {
        match self {
            Schema::Basic => "SELECT path, identifier, fixed FROM paths",
            Schema::Extended => "SELECT path, identifier, fixed, category FROM paths",
        }
    }
}

/// One row of the `paths` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRow {
    pub path: String,
    pub identifier: String,
    pub fixed: bool,
    pub category: Option<String>,
}

impl PathRow {
    pub fn new(path: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            identifier: identifier.into(),
            fixed: false,
            category: None,
        }
    }
}

pub struct PathStore {
    conn: Connection,
    schema: Schema,
}

impl PathStore {
    /// Open (or create) the database file at `db_path`.
    pub fn open(db_path: &Path, schema: Schema) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| FavoritesError::from_io(parent, e))?;
        }
        let conn = Connection::open(db_path)?;
        // Avoid "database is locked" if another process briefly holds it
        conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
        debug!(db_path = %db_path.display(), "Opened favorites database");
        Ok(Self { conn, schema })
    }

    pub fn open_in_memory(schema: Schema) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, schema })
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    /// Create the `paths` table if it doesn't exist.
    pub fn create_table(&self) -> Result<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            TABLE_NAME,
            self.schema.columns()
        );
        self.conn.execute(&sql, [])?;
        Ok(())
    }

    /// Add the `category` column to a table created by the basic schema.
    ///
    /// Existing rows keep a NULL category. Returns whether anything changed.
    pub fn migrate_schema(&self) -> Result<bool> {
        if self.schema != Schema::Extended {
            return Ok(false);
        }

        let table_exists: bool = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [TABLE_NAME],
                |row| row.get::<_, i64>(0),
            )
            .map(|count| count > 0)?;
        if !table_exists {
            return Ok(false);
        }

        let has_category: bool = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('paths') WHERE name='category'",
                [],
                |row| row.get::<_, i64>(0),
            )
            .map(|count| count > 0)?;
        if has_category {
            return Ok(false);
        }

        self.conn
            .execute("ALTER TABLE paths ADD COLUMN category TEXT", [])?;
        info!("Migrated favorites table: added category column");
        Ok(true)
    }

    /// Run a mutating statement inside the pending transaction.
    pub fn execute<P: Params>(&mut self, sql: &str, params: P) -> Result<usize> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN")?;
        }
        let changed = self.conn.execute(sql, params)?;
        debug!(sql, changed, "Executed favorites statement");
        Ok(changed)
    }

    /// Make every statement since the last commit durable.
    pub fn commit(&mut self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    /// Whether uncommitted statements are pending.
    pub fn has_pending_changes(&self) -> bool {
        !self.conn.is_autocommit()
    }

    /// All rows in insertion order.
    pub fn rows(&self) -> Result<Vec<PathRow>> {
        let mut stmt = self.conn.prepare(self.schema.select_sql())?;
        let with_category = self.schema == Schema::Extended;
        let rows = stmt
            .query_map([], |row| {
                Ok(PathRow {
                    path: row.get(0)?,
                    identifier: row.get(1)?,
                    fixed: row.get::<_, i64>(2)? != 0,
                    category: if with_category { row.get(3)? } else { None },
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn insert(&mut self, row: &PathRow) -> Result<()> {
        match self.schema {
            Schema::Basic => self.execute(
                "INSERT INTO paths(path, identifier, fixed) VALUES(?1, ?2, ?3)",
                params![row.path, row.identifier, row.fixed as i64],
            )?,
            Schema::Extended => self.execute(
                "INSERT INTO paths(path, identifier, fixed, category) VALUES(?1, ?2, ?3, ?4)",
                params![row.path, row.identifier, row.fixed as i64, row.category],
            )?,
        };
        Ok(())
    }

    pub fn delete(&mut self, identifier: &str) -> Result<usize> {
        self.execute("DELETE FROM paths WHERE identifier=?1", [identifier])
    }

    pub fn set_identifier(&mut self, old: &str, new: &str) -> Result<usize> {
        self.execute(
            "UPDATE paths SET identifier=?1 WHERE identifier=?2",
            [new, old],
        )
    }

    pub fn set_fixed(&mut self, identifier: &str, fixed: bool) -> Result<usize> {
        self.execute(
            "UPDATE paths SET fixed=?1 WHERE identifier=?2",
            params![fixed as i64, identifier],
        )
    }

    /// Move every row of category `old` to `new`.
    ///
    /// With `include_uncategorized`, rows whose category is NULL or empty are
    /// moved as well (they are displayed under the default category).
    pub fn set_category(&mut self, old: &str, new: &str, include_uncategorized: bool) -> Result<usize> {
        if self.schema != Schema::Extended {
            return Err(FavoritesError::Unsupported("Categories"));
        }
        if include_uncategorized {
            self.execute(
                "UPDATE paths SET category=?1 WHERE category=?2 OR category IS NULL OR category=''",
                [new, old],
            )
        } else {
            self.execute("UPDATE paths SET category=?1 WHERE category=?2", [new, old])
        }
    }

    /// Commit anything pending and close the connection.
    pub fn close(mut self) -> Result<()> {
        self.commit()?;
        self.conn.close().map_err(|(_, e)| FavoritesError::Store(e))
    }
}
