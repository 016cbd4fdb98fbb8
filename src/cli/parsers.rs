//! The command line definition, and the parsing of the loosely typed values
//! users type on it.

use clap::{Parser, Subcommand};

use crate::persistence::{ColumnType, Value};

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "A flexible table store on top of SQLite", long_about = None)]
#[command(version)]
pub struct CliParser {
    /// SQLite database file, or `:memory:`. Overrides TESSERA_DATABASE.
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Create a new table.
    CreateTable { name: String },

    /// List all tables.
    Tables,

    /// Add a column to a table.
    AddColumn {
        table: i64,
        name: String,
        /// text, number, boolean, date, reference:<table id> or any custom tag.
        #[arg(value_name = "TYPE", value_parser = parse_column_type)]
        column_type: ColumnType,
        /// Column options as JSON.
        #[arg(long, value_parser = parse_value)]
        options: Option<Value>,
    },

    /// List the columns of a table.
    Columns { table: i64 },

    /// Add a row to a table, appended unless a position is given.
    AddRow {
        table: i64,
        #[arg(long, allow_negative_numbers = true)]
        position: Option<i64>,
    },

    /// Set the value of a cell. Values that are not JSON are taken as text.
    SetCell {
        row: i64,
        column: i64,
        #[arg(value_parser = parse_value, allow_hyphen_values = true)]
        value: Value,
    },

    /// Print the value of a cell.
    GetCell { row: i64, column: i64 },

    /// Delete a row and its cells.
    DeleteRow { row: i64 },

    /// Delete a table with everything in it.
    DropTable { table: i64 },

    /// Print a table as a grid.
    Show { table: i64 },

    /// Build a small sample table and print it.
    Demo,
}

pub fn parse_value(raw: &str) -> Result<Value, String> {
    //! Read a value typed on the command line.
    //!
    //! Valid JSON is taken as is (`30`, `true`, `null`, `[1, 2]`); anything
    //! else becomes a string, so `Alice` needs no quoting.

    Ok(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
}

fn parse_column_type(raw: &str) -> Result<ColumnType, String> {
    if raw.trim().is_empty() {
        return Err("the column type cannot be empty".to_string());
    }
    Ok(ColumnType::from(raw.trim()))
}
