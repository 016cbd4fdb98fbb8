use std::fmt::Display;

use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

use crate::{
    error::Result,
    persistence::{
        cell::Cell,
        ids::{ColumnId, RowId, TableId},
        store::StoreHandle,
    },
};

/// An ordered record container, owned by exactly one table.
///
/// `position` decides the order rows are listed and projected in. Positions
/// need not be contiguous or unique; rows sharing a position come out in the
/// order they were created.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: RowId,
    pub table_id: TableId,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

const SELECT_ROWS: &str = r#"SELECT id, table_id, position, created_at FROM "rows""#;

impl Row {
    pub fn create<H: StoreHandle>(
        handle: &H,
        table_id: TableId,
        position: Option<i64>,
    ) -> Result<Row> {
        //! Add a row to `table_id`.
        //!
        //! Without an explicit position the row goes to the current row count
        //! of the table. The count is read inside the insert statement itself.
        //! After deletions the count can be lower than the highest position in
        //! use, so an appended row may share a position with an older one.

        let created_at = Utc::now();

        let row = handle.with_connection(|conn| {
            conn.execute(
                r#"
                INSERT INTO "rows" (table_id, position, created_at)
                VALUES (?1, COALESCE(?2, (SELECT COUNT(*) FROM "rows" WHERE table_id = ?1)), ?3)
                "#,
                params![table_id, position, created_at],
            )?;

            let id = RowId(conn.last_insert_rowid());
            Ok(conn.query_row(
                &format!("{} WHERE id = ?1", SELECT_ROWS),
                params![id],
                Self::from_sql_row,
            )?)
        })?;

        debug!(
            "created row {} at position {} on table {}",
            row.id, row.position, table_id
        );
        Ok(row)
    }

    pub fn get<H: StoreHandle>(handle: &H, id: RowId) -> Result<Option<Row>> {
        handle.with_connection(|conn| {
            Ok(conn
                .query_row(
                    &format!("{} WHERE id = ?1", SELECT_ROWS),
                    params![id],
                    Self::from_sql_row,
                )
                .optional()?)
        })
    }

    pub fn get_by_table<H: StoreHandle>(handle: &H, table_id: TableId) -> Result<Vec<Row>> {
        //! All rows of a table by ascending position, ties broken by id.

        handle.with_connection(|conn| Self::select_by_table(conn, table_id))
    }

    pub fn set_cell<H, T>(&self, handle: &H, column_id: ColumnId, value: &T) -> Result<Cell>
    where
        H: StoreHandle,
        T: Serialize + ?Sized,
    {
        Cell::set(handle, self.id, column_id, value)
    }

    pub fn get_cell<H: StoreHandle>(&self, handle: &H, column_id: ColumnId) -> Result<Option<Cell>> {
        Cell::get(handle, self.id, column_id)
    }

    pub fn get_all_cells<H: StoreHandle>(&self, handle: &H) -> Result<Vec<Cell>> {
        Cell::get_by_row(handle, self.id)
    }

    pub fn delete<H: StoreHandle>(self, handle: &H) -> Result<bool> {
        //! Remove the row and, through the cascade, its cells.
        //!
        //! Returns whether the row still existed.

        let removed = handle.with_connection(|conn| {
            Ok(conn.execute(r#"DELETE FROM "rows" WHERE id = ?1"#, params![self.id])?)
        })?;

        debug!("deleted row {} ({} removed)", self.id, removed);
        Ok(removed > 0)
    }

    pub(crate) fn select_by_table(conn: &Connection, table_id: TableId) -> Result<Vec<Row>> {
        let mut stmt = conn.prepare(&format!(
            "{} WHERE table_id = ?1 ORDER BY position ASC, id ASC",
            SELECT_ROWS
        ))?;
        let rows = stmt.query_map(params![table_id], Self::from_sql_row)?;

        Ok(rows.collect::<rusqlite::Result<Vec<Row>>>()?)
    }

    pub(crate) fn count_by_table(conn: &Connection, table_id: TableId) -> Result<i64> {
        Ok(conn.query_row(
            r#"SELECT COUNT(*) FROM "rows" WHERE table_id = ?1"#,
            params![table_id],
            |r| r.get(0),
        )?)
    }

    fn from_sql_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
        Ok(Row {
            id: r.get(0)?,
            table_id: r.get(1)?,
            position: r.get(2)?,
            created_at: r.get(3)?,
        })
    }
}

impl Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {} @ {}", self.id, self.position)
    }
}
