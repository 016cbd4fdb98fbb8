//! Persistence maps open-ended, user defined tables onto four fixed relations
//! (entity-attribute-value):
//! - Table (a named container, the user facing aggregate)
//! - Column (typed field descriptor, fixed to one table)
//! - Row (ordered record, fixed to one table)
//! - Cell (the value of one row in one column, at most one per pair)
//!
//! Everything goes through an explicit [`Store`] handle; there is no shared
//! global connection.

//  All modules of this lib
mod cell;
mod column;
mod column_type;
mod ids;
mod row;
mod schema;
mod store;
mod table;
mod value;

//  External API
pub use cell::Cell;
pub use column::Column;
pub use column_type::ColumnType;
pub use ids::{CellId, ColumnId, RowId, TableId};
pub use row::Row;
pub use store::{Store, StoreHandle, StoreTransaction};
pub use table::{POSITION_FIELD, ROW_ID_FIELD, Record, Table};
pub use value::Value;
