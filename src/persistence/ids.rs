//! Typed identifiers for the four relations.
//!
//! Every id is the SQLite rowid of its relation. The relations are declared
//! with `AUTOINCREMENT`, so an id is never handed out twice, even after the
//! record it named was deleted.

use std::fmt::Display;

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub i64);

        impl $name {
            pub const ENTITY: &'static str = $entity;

            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                $name(id)
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.0))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                i64::column_result(value).map($name)
            }
        }
    };
}

record_id!(
    /// Identity of a [`super::Table`].
    TableId,
    "table"
);
record_id!(
    /// Identity of a [`super::Column`].
    ColumnId,
    "column"
);
record_id!(
    /// Identity of a [`super::Row`].
    RowId,
    "row"
);
record_id!(CellId, "cell");
