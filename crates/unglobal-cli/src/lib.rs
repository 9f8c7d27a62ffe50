//! Command-line front end for the unglobal migrator.

pub mod migrate;

pub use migrate::{MigrationOutcome, Migrator};
