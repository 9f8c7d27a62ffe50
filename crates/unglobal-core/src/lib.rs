//! Core data model and splitting pipeline for the unglobal migrator.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod ir;
pub mod kind;
pub mod naming;
pub mod paths;
pub mod registry;
pub mod split;

pub use config::MigratorConfig;
pub use error::CoreError;
pub use ir::{SourceFile, Statement, StatementIdAllocator, StatementTag};
pub use registry::PipelineContext;
pub use split::Splitter;
