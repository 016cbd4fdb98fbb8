use std::fmt::Display;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::debug;
use rusqlite::{OptionalExtension, params};
use serde::Serialize;

use crate::{
    error::Result,
    persistence::{
        cell::Cell,
        column::Column,
        column_type::ColumnType,
        ids::{ColumnId, TableId},
        row::Row,
        store::{Store, StoreHandle},
        value::Value,
    },
};

/// Field holding the row id in every projected [`Record`].
pub const ROW_ID_FIELD: &str = "_rowId";

/// Field holding the row position in every projected [`Record`].
pub const POSITION_FIELD: &str = "_position";

/// One projected row: `_rowId`, `_position`, then one field per column in
/// column creation order.
pub type Record = IndexMap<String, Value>;

/// The user facing aggregate. A table owns its columns and rows and projects
/// their cells into flat records.
///
/// A [`Table`] is a plain snapshot of the `tables` record. Every operation
/// takes the [`StoreHandle`] to run against, which is either the store or an
/// open transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Table {
    pub fn create<H: StoreHandle>(handle: &H, name: &str) -> Result<Table> {
        //! Create an empty table. Names need not be unique.

        let created_at = Utc::now();

        let id = handle.with_connection(|conn| {
            conn.execute(
                "INSERT INTO tables (name, created_at) VALUES (?1, ?2)",
                params![name, created_at],
            )?;
            Ok(TableId(conn.last_insert_rowid()))
        })?;

        debug!("created table {} '{}'", id, name);

        Ok(Table {
            id,
            name: name.to_string(),
            created_at,
        })
    }

    pub fn get<H: StoreHandle>(handle: &H, id: TableId) -> Result<Option<Table>> {
        handle.with_connection(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, name, created_at FROM tables WHERE id = ?1",
                    params![id],
                    Self::from_sql_row,
                )
                .optional()?)
        })
    }

    pub fn get_all<H: StoreHandle>(handle: &H) -> Result<Vec<Table>> {
        handle.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT id, name, created_at FROM tables")?;
            let tables = stmt.query_map([], Self::from_sql_row)?;

            Ok(tables.collect::<rusqlite::Result<Vec<Table>>>()?)
        })
    }

    pub fn add_column<H: StoreHandle>(
        &self,
        handle: &H,
        name: &str,
        column_type: ColumnType,
        options: Value,
    ) -> Result<Column> {
        Column::create(handle, self.id, name, column_type, options)
    }

    pub fn get_columns<H: StoreHandle>(&self, handle: &H) -> Result<Vec<Column>> {
        Column::get_by_table(handle, self.id)
    }

    pub fn add_row<H: StoreHandle>(&self, handle: &H, position: Option<i64>) -> Result<Row> {
        Row::create(handle, self.id, position)
    }

    pub fn add_row_with_cells<T: Serialize>(
        &self,
        store: &Store,
        position: Option<i64>,
        cells: &[(ColumnId, T)],
    ) -> Result<(Row, Vec<Cell>)> {
        //! Create a row and fill its cells as one unit.
        //!
        //! Either the row and all of its cells are stored, or none of them.

        store.transaction(|tx| {
            let row = self.add_row(tx, position)?;

            let mut written = Vec::with_capacity(cells.len());
            for (column_id, value) in cells {
                written.push(row.set_cell(tx, *column_id, value)?);
            }

            Ok((row, written))
        })
    }

    pub fn get_rows<H: StoreHandle>(&self, handle: &H) -> Result<Vec<Row>> {
        Row::get_by_table(handle, self.id)
    }

    pub fn row_count<H: StoreHandle>(&self, handle: &H) -> Result<i64> {
        handle.with_connection(|conn| Row::count_by_table(conn, self.id))
    }

    pub fn get_data<H: StoreHandle>(&self, handle: &H) -> Result<Vec<Record>> {
        //! Project the table into one [`Record`] per row, in row order.
        //!
        //! Pairs without a cell and cells holding null both project to null.
        //! Two columns with the same name share one field, which ends up with
        //! the value of the later column.

        handle.with_connection(|conn| {
            let columns = Column::select_by_table(conn, self.id)?;
            let rows = Row::select_by_table(conn, self.id)?;
            let mut values = Cell::values_by_table(conn, self.id)?;

            let records: Vec<Record> = rows
                .iter()
                .map(|row| {
                    let mut record = Record::with_capacity(columns.len() + 2);
                    record.insert(ROW_ID_FIELD.to_string(), Value::from(row.id.get()));
                    record.insert(POSITION_FIELD.to_string(), Value::from(row.position));

                    for column in &columns {
                        let value = values
                            .remove(&(row.id, column.id))
                            .unwrap_or(Value::Null);
                        record.insert(column.name.clone(), value);
                    }

                    record
                })
                .collect();

            Ok(records)
        })
    }

    pub fn delete<H: StoreHandle>(self, handle: &H) -> Result<bool> {
        //! Delete the table with its columns, rows and cells.

        Self::delete_by_id(handle, self.id)
    }

    pub fn delete_by_id<H: StoreHandle>(handle: &H, id: TableId) -> Result<bool> {
        //! Returns whether a table with this id existed.

        let removed = handle.with_connection(|conn| {
            Ok(conn.execute("DELETE FROM tables WHERE id = ?1", params![id])?)
        })?;

        debug!("deleted table {} ({} removed)", id, removed);
        Ok(removed > 0)
    }

    fn from_sql_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Table> {
        Ok(Table {
            id: r.get(0)?,
            name: r.get(1)?,
            created_at: r.get(2)?,
        })
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
