use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

use crate::{
    error::Result,
    persistence::{
        ids::{CellId, ColumnId, RowId, TableId},
        store::StoreHandle,
        value::{self, Value},
    },
};

/// The value bound to one (row, column) pair.
///
/// A pair is absent until its first [`Cell::set`], present afterwards, and
/// gone for good once its row or column is deleted. Ids are never reused, so
/// a deleted pair cannot come back.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub id: CellId,
    pub row_id: RowId,
    pub column_id: ColumnId,
    pub value: Value,
    pub updated_at: DateTime<Utc>,
}

type RawCell = (CellId, RowId, ColumnId, Option<String>, DateTime<Utc>);

const SELECT_CELLS: &str = "SELECT id, row_id, column_id, value, updated_at FROM cells";

impl Cell {
    pub fn set<H, T>(handle: &H, row_id: RowId, column_id: ColumnId, value: &T) -> Result<Cell>
    where
        H: StoreHandle,
        T: Serialize + ?Sized,
    {
        //! Insert or overwrite the value of a (row, column) pair.
        //!
        //! The write is one `INSERT .. ON CONFLICT DO UPDATE` statement keyed on
        //! the unique (row_id, column_id) pair, so two writers can never both
        //! insert. `None` and unit serialize to null and are stored as null.

        let value = value::to_value(value)?;
        let encoded = value::encode_nullable(&value)?;
        let updated_at = Utc::now();

        let id = handle.with_connection(|conn| {
            conn.execute(
                r#"
                INSERT INTO cells (row_id, column_id, value, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(row_id, column_id) DO UPDATE SET
                  value = excluded.value,
                  updated_at = excluded.updated_at
                "#,
                params![row_id, column_id, encoded, updated_at],
            )?;

            let id: CellId = conn.query_row(
                "SELECT id FROM cells WHERE row_id = ?1 AND column_id = ?2",
                params![row_id, column_id],
                |r| r.get(0),
            )?;
            Ok(id)
        })?;

        debug!("set cell {} (row {}, column {})", id, row_id, column_id);

        Ok(Cell {
            id,
            row_id,
            column_id,
            value,
            updated_at,
        })
    }

    pub fn insert<H, T>(handle: &H, row_id: RowId, column_id: ColumnId, value: &T) -> Result<Cell>
    where
        H: StoreHandle,
        T: Serialize + ?Sized,
    {
        //! Plain insert, without the upsert. A second insert for the same pair
        //! fails with [`crate::EavError::ConstraintViolation`].

        let value = value::to_value(value)?;
        let encoded = value::encode_nullable(&value)?;
        let updated_at = Utc::now();

        let id = handle.with_connection(|conn| {
            conn.execute(
                "INSERT INTO cells (row_id, column_id, value, updated_at) VALUES (?1, ?2, ?3, ?4)",
                params![row_id, column_id, encoded, updated_at],
            )?;
            Ok(CellId(conn.last_insert_rowid()))
        })?;

        debug!("inserted cell {} (row {}, column {})", id, row_id, column_id);

        Ok(Cell {
            id,
            row_id,
            column_id,
            value,
            updated_at,
        })
    }

    pub fn get<H: StoreHandle>(
        handle: &H,
        row_id: RowId,
        column_id: ColumnId,
    ) -> Result<Option<Cell>> {
        handle.with_connection(|conn| {
            let raw = conn
                .query_row(
                    &format!("{} WHERE row_id = ?1 AND column_id = ?2", SELECT_CELLS),
                    params![row_id, column_id],
                    Self::read_raw,
                )
                .optional()?;

            raw.map(Self::decode).transpose()
        })
    }

    pub fn get_by_row<H: StoreHandle>(handle: &H, row_id: RowId) -> Result<Vec<Cell>> {
        handle.with_connection(|conn| Self::select_where(conn, "row_id = ?1", row_id.get()))
    }

    pub fn get_by_column<H: StoreHandle>(handle: &H, column_id: ColumnId) -> Result<Vec<Cell>> {
        handle.with_connection(|conn| Self::select_where(conn, "column_id = ?1", column_id.get()))
    }

    pub(crate) fn values_by_table(
        conn: &Connection,
        table_id: TableId,
    ) -> Result<HashMap<(RowId, ColumnId), Value>> {
        //! Every stored value of a table, keyed by its (row, column) pair.

        let mut stmt = conn.prepare(
            r#"
            SELECT cells.row_id, cells.column_id, cells.value
            FROM cells
            JOIN "rows" ON "rows".id = cells.row_id
            WHERE "rows".table_id = ?1
            "#,
        )?;
        let raws = stmt.query_map(params![table_id], |r| {
            Ok((
                r.get::<_, RowId>(0)?,
                r.get::<_, ColumnId>(1)?,
                r.get::<_, Option<String>>(2)?,
            ))
        })?;

        let mut values = HashMap::new();
        for raw in raws {
            let (row_id, column_id, blob) = raw?;
            values.insert((row_id, column_id), value::decode(blob)?);
        }
        Ok(values)
    }

    fn select_where(conn: &Connection, filter: &str, id: i64) -> Result<Vec<Cell>> {
        let mut stmt = conn.prepare(&format!("{} WHERE {}", SELECT_CELLS, filter))?;
        let raws = stmt.query_map(params![id], Self::read_raw)?;

        let mut cells = Vec::new();
        for raw in raws {
            cells.push(Self::decode(raw?)?);
        }
        Ok(cells)
    }

    fn read_raw(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawCell> {
        Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?))
    }

    fn decode(raw: RawCell) -> Result<Cell> {
        let (id, row_id, column_id, blob, updated_at) = raw;

        Ok(Cell {
            id,
            row_id,
            column_id,
            value: value::decode(blob)?,
            updated_at,
        })
    }
}
