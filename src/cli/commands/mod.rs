//! One module per `pvault` subcommand.

pub mod create;
pub mod list;
pub mod shell;
