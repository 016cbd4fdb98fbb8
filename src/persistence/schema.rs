//! The physical schema: four relations, whatever shape the logical tables take.
//!
//! - `tables`  one record per logical table
//! - `columns` typed field descriptors, owned by a table
//! - `rows`    ordered records, owned by a table
//! - `cells`   at most one value per (row, column)
//!
//! Dependents are removed with `ON DELETE CASCADE`. Every statement uses
//! `IF NOT EXISTS`, so running [`init`] on each open is safe.

use log::info;
use rusqlite::Connection;

pub(crate) const RELATIONS: [&str; 4] = ["tables", "columns", "rows", "cells"];

pub(crate) fn init(conn: &Connection) -> rusqlite::Result<()> {
    // Off by default in SQLite; cascades and parent checks depend on it.
    conn.pragma_update(None, "foreign_keys", "ON")?;

    // ROWS is a window-frame keyword, so the relation name is always quoted.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS tables (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          name TEXT NOT NULL,
          created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS columns (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          table_id INTEGER NOT NULL REFERENCES tables(id) ON DELETE CASCADE,
          name TEXT NOT NULL,
          type TEXT NOT NULL,
          options TEXT NOT NULL DEFAULT 'null',
          created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS "rows" (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          table_id INTEGER NOT NULL REFERENCES tables(id) ON DELETE CASCADE,
          position INTEGER NOT NULL,
          created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS cells (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          row_id INTEGER NOT NULL REFERENCES "rows"(id) ON DELETE CASCADE,
          column_id INTEGER NOT NULL REFERENCES columns(id) ON DELETE CASCADE,
          value TEXT,
          updated_at TEXT NOT NULL,
          UNIQUE (row_id, column_id)
        );

        CREATE INDEX IF NOT EXISTS idx_columns_table ON columns(table_id);
        CREATE INDEX IF NOT EXISTS idx_rows_table_position ON "rows"(table_id, position);
        CREATE INDEX IF NOT EXISTS idx_cells_column ON cells(column_id);
        "#,
    )?;

    info!("schema ready: {}", RELATIONS.join(", "));
    Ok(())
}

pub(crate) fn relation_count(conn: &Connection) -> rusqlite::Result<usize> {
    //! Number of the engine's relations present in the database file.

    let mut stmt = conn.prepare(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('tables', 'columns', 'rows', 'cells')",
    )?;
    let count: i64 = stmt.query_row([], |r| r.get(0))?;
    Ok(count as usize)
}
