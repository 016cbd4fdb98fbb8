//! Runs the parsed command line against a store.
//!
//! Tessera command line syntax:
//!
//! - tessera create-table <name>
//! - tessera add-column <table> <name> <type> [--options <json>]
//! - tessera add-row <table> [--position <n>]
//! - tessera set-cell <row> <column> <value>
//! - tessera show <table>
//!
//! See `tessera --help` for the rest.

use std::fmt::Display;

use serde_json::json;

use crate::cli::grid;
use crate::cli::messages::{highlight_argument, system_message};
use crate::cli::parsers::CliCommand;
use crate::error::{EavError, Result};
use crate::persistence::{Cell, ColumnId, ColumnType, Row, RowId, Store, Table, TableId, Value};

/// Every command needs an executor to be run. The executor owns nothing but
/// the command; the store is borrowed for the duration of the run.
pub struct CommandExecutor<'a> {
    command: CliCommand,
    store: &'a Store,
}

/// What a command wants shown once it completes: a line of feedback, a
/// rendered grid, or both.
#[derive(Debug, Default)]
pub struct CommandResult {
    pub message: Option<String>,
    pub grid: Option<String>,
}

impl CommandResult {
    fn message(message: String) -> CommandResult {
        CommandResult {
            message: Some(message),
            grid: None,
        }
    }
}

impl Display for CommandResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(message) = &self.message {
            writeln!(f, "{}", system_message("tessera", message.clone()))?;
        }
        if let Some(grid) = &self.grid {
            writeln!(f, "{}", grid)?;
        }
        Ok(())
    }
}

impl<'a> CommandExecutor<'a> {
    pub fn new(command: CliCommand, store: &'a Store) -> CommandExecutor<'a> {
        CommandExecutor { command, store }
    }

    pub fn execute(self) -> Result<CommandResult> {
        let store = self.store;

        match self.command {
            CliCommand::CreateTable { name } => {
                let table = Table::create(store, &name)?;
                Ok(CommandResult::message(format!(
                    "Created table {} with id {}.",
                    highlight_argument(&table.name),
                    highlight_argument(&table.id.to_string())
                )))
            }
            CliCommand::Tables => {
                let tables = Table::get_all(store)?;
                let lines: Vec<String> = tables
                    .iter()
                    .map(|table| format!("{:>4}  {}", table.id, table.name))
                    .collect();
                Ok(CommandResult::message(if lines.is_empty() {
                    "No tables yet.".to_string()
                } else {
                    lines.join("\n")
                }))
            }
            CliCommand::AddColumn {
                table,
                name,
                column_type,
                options,
            } => {
                let table = require_table(store, table)?;
                let column = table.add_column(
                    store,
                    &name,
                    column_type,
                    options.unwrap_or(Value::Null),
                )?;
                Ok(CommandResult::message(format!(
                    "Added column {} ({}) with id {} to {}.",
                    highlight_argument(&column.name),
                    column.column_type,
                    highlight_argument(&column.id.to_string()),
                    table
                )))
            }
            CliCommand::Columns { table } => {
                let table = require_table(store, table)?;
                let lines: Vec<String> = table
                    .get_columns(store)?
                    .iter()
                    .map(|column| {
                        format!(
                            "{:>4}  {} ({}) {}",
                            column.id, column.name, column.column_type, column.options
                        )
                    })
                    .collect();
                Ok(CommandResult::message(lines.join("\n")))
            }
            CliCommand::AddRow { table, position } => {
                let table = require_table(store, table)?;
                let row = table.add_row(store, position)?;
                Ok(CommandResult::message(format!(
                    "Added row {} at position {} to {}.",
                    highlight_argument(&row.id.to_string()),
                    row.position,
                    table
                )))
            }
            CliCommand::SetCell { row, column, value } => {
                let row = require_row(store, row)?;
                let cell = row.set_cell(store, ColumnId(column), &value)?;
                Ok(CommandResult::message(format!(
                    "Cell {} is now {}.",
                    highlight_argument(&cell.id.to_string()),
                    cell.value
                )))
            }
            CliCommand::GetCell { row, column } => {
                let cell = Cell::get(store, RowId(row), ColumnId(column))?;
                Ok(CommandResult::message(match cell {
                    Some(cell) => format!("{} (updated {})", cell.value, cell.updated_at),
                    None => "null (never set)".to_string(),
                }))
            }
            CliCommand::DeleteRow { row } => {
                let row = require_row(store, row)?;
                let id = row.id;
                row.delete(store)?;
                Ok(CommandResult::message(format!(
                    "Deleted row {}.",
                    highlight_argument(&id.to_string())
                )))
            }
            CliCommand::DropTable { table } => {
                let table = require_table(store, table)?;
                let name = table.to_string();
                table.delete(store)?;
                Ok(CommandResult::message(format!(
                    "Dropped table {}.",
                    highlight_argument(&name)
                )))
            }
            CliCommand::Show { table } => {
                let table = require_table(store, table)?;
                Ok(CommandResult {
                    message: Some(format!("{}", table)),
                    grid: Some(render_table(store, &table)?),
                })
            }
            CliCommand::Demo => run_demo(store),
        }
    }
}

fn require_table(store: &Store, id: i64) -> Result<Table> {
    Table::get(store, TableId(id))?.ok_or(EavError::NotFound {
        entity: TableId::ENTITY,
        id,
    })
}

fn require_row(store: &Store, id: i64) -> Result<Row> {
    Row::get(store, RowId(id))?.ok_or(EavError::NotFound {
        entity: RowId::ENTITY,
        id,
    })
}

fn render_table(store: &Store, table: &Table) -> Result<String> {
    let columns = table.get_columns(store)?;
    let records = table.get_data(store)?;
    Ok(grid::render(&columns, &records))
}

fn run_demo(store: &Store) -> Result<CommandResult> {
    //! Build a "Users" table with a few rows and a "Teams" table they refer to.

    let teams = Table::create(store, "Teams")?;
    let team_name = teams.add_column(store, "Name", ColumnType::Text, Value::Null)?;
    let (core_team, _) = teams.add_row_with_cells(store, None, &[(team_name.id, json!("Core"))])?;

    let users = Table::create(store, "Users")?;
    let name = users.add_column(store, "Name", ColumnType::Text, Value::Null)?;
    let age = users.add_column(store, "Age", ColumnType::Number, json!({ "min": 0 }))?;
    let active = users.add_column(store, "Active", ColumnType::Boolean, Value::Null)?;
    let team = users.add_column(store, "Team", ColumnType::reference(teams.id), Value::Null)?;

    let people = [
        ("Alice", json!(30), json!(true)),
        ("Bob", json!(41), json!(false)),
        ("Chen", Value::Null, json!(true)),
    ];

    for (person, years, is_active) in people {
        users.add_row_with_cells(
            store,
            None,
            &[
                (name.id, json!(person)),
                (age.id, years),
                (active.id, is_active),
                (team.id, json!(core_team.id.get())),
            ],
        )?;
    }

    Ok(CommandResult {
        message: Some(format!("Built demo table {}.", highlight_argument(&users.to_string()))),
        grid: Some(render_table(store, &users)?),
    })
}
