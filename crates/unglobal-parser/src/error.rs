use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("{path}:{line}: unterminated {what}")]
    Unterminated {
        path: String,
        line: usize,
        what: &'static str,
    },

    #[error("{path}:{line}: unbalanced '{delimiter}'")]
    Unbalanced {
        path: String,
        line: usize,
        delimiter: char,
    },
}

/// Lexer-internal error carrying a byte offset; `parse_source` turns it into
/// a [`ParseError`] with a path and line number.
#[derive(Debug)]
pub(crate) enum LexError {
    Unterminated { what: &'static str, at: usize },
}
