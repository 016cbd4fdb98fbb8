use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    error::Result,
    persistence::{
        column_type::ColumnType,
        ids::{ColumnId, TableId},
        store::StoreHandle,
        value::{self, Value},
    },
};

/// A typed field descriptor, owned by exactly one table.
///
/// Columns have no update and no delete of their own. They go away when the
/// owning table is deleted, taking their cells with them.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub id: ColumnId,
    pub table_id: TableId,
    pub name: String,
    pub column_type: ColumnType,
    /// Free-form settings for the column. Stored as a JSON blob and handed back
    /// as a structured value.
    pub options: Value,
    pub created_at: DateTime<Utc>,
}

type RawColumn = (ColumnId, TableId, String, String, String, DateTime<Utc>);

const SELECT_COLUMNS: &str =
    "SELECT id, table_id, name, type, options, created_at FROM columns";

impl Column {
    pub fn create<H: StoreHandle>(
        handle: &H,
        table_id: TableId,
        name: &str,
        column_type: ColumnType,
        options: Value,
    ) -> Result<Column> {
        //! Record a new column under `table_id`.
        //!
        //! The type is stored as given; an unknown parent table is a
        //! constraint violation.

        let encoded_options = value::encode(&options)?;
        let created_at = Utc::now();

        let id = handle.with_connection(|conn| {
            conn.execute(
                "INSERT INTO columns (table_id, name, type, options, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![table_id, name, column_type.tag(), encoded_options, created_at],
            )?;
            Ok(ColumnId(conn.last_insert_rowid()))
        })?;

        debug!("created column {} '{}' ({}) on table {}", id, name, column_type, table_id);

        Ok(Column {
            id,
            table_id,
            name: name.to_string(),
            column_type,
            options,
            created_at,
        })
    }

    pub fn get<H: StoreHandle>(handle: &H, id: ColumnId) -> Result<Option<Column>> {
        handle.with_connection(|conn| {
            let raw = conn
                .query_row(
                    &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                    params![id],
                    Self::read_raw,
                )
                .optional()?;

            raw.map(Self::decode).transpose()
        })
    }

    pub fn get_by_table<H: StoreHandle>(handle: &H, table_id: TableId) -> Result<Vec<Column>> {
        //! All columns of a table, oldest first.

        handle.with_connection(|conn| Self::select_by_table(conn, table_id))
    }

    pub(crate) fn select_by_table(conn: &Connection, table_id: TableId) -> Result<Vec<Column>> {
        let mut stmt = conn.prepare(&format!(
            "{} WHERE table_id = ?1 ORDER BY id",
            SELECT_COLUMNS
        ))?;
        let raws = stmt.query_map(params![table_id], Self::read_raw)?;

        let mut columns = Vec::new();
        for raw in raws {
            columns.push(Self::decode(raw?)?);
        }
        Ok(columns)
    }

    fn read_raw(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawColumn> {
        Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?))
    }

    fn decode(raw: RawColumn) -> Result<Column> {
        let (id, table_id, name, tag, options, created_at) = raw;

        Ok(Column {
            id,
            table_id,
            name,
            column_type: ColumnType::from(tag.as_str()),
            options: value::decode(Some(options))?,
            created_at,
        })
    }
}
