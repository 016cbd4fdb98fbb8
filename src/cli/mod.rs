//! The `tessera` command line: a thin harness that drives the whole table,
//! column, row and cell surface against a store on disk.

use crate::{
    config::{StoreConfig, StorePath},
    error::Result,
    persistence::Store,
};

mod colors;
mod commands;
pub mod grid;
pub mod messages;
pub mod parsers;

pub use commands::{CommandExecutor, CommandResult};
pub use parsers::{CliCommand, CliParser};

pub fn run(parser: CliParser) -> Result<CommandResult> {
    //! Open the configured store, run one command and close the store again.
    //!
    //! `--database` wins over the environment.

    let mut config = StoreConfig::from_env()?;
    if let Some(database) = parser.database.as_deref() {
        config.path = StorePath::parse(database);
    }

    Store::scoped(&config, |store| {
        CommandExecutor::new(parser.command, store).execute()
    })
}
