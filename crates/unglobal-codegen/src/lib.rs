//! Phase 2 of the unglobal migrator: turn export units into ES module
//! source. [`imports::ImportResolver`] decides what each unit imports from a
//! frozen binding table; [`rewrite::CodeRewriter`] prints the unit with its
//! namespace references rewritten to the imported local names.

pub mod imports;
pub mod rewrite;

pub use imports::{ImportResolver, ResolvedImports};
pub use rewrite::CodeRewriter;
