//! Statement-level source scanner for the unglobal migrator.
//!
//! The pipeline treats statements as opaque: this crate's job is to split a
//! file into top-level statements with faithful comment attachment and to
//! annotate each with the lexical facts (assignment targets, member-access
//! spans, require bindings) the splitter and rewriter run on.

pub mod error;
mod lex;
pub mod statement;

pub use error::ParseError;
pub use statement::parse_source;
