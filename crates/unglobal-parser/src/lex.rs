//! A small JavaScript token scanner.
//!
//! This is not a full lexer; it produces just enough structure to split a
//! file into top-level statements and to locate identifier chains:
//! identifiers, numbers, string/template/regex literals, comments, and
//! single-byte punctuation. Multi-byte operators come out as adjacent
//! punctuation tokens, which is fine for the pattern matching done on top.

use crate::error::LexError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Num,
    Str,
    Template,
    Regex,
    Punct(u8),
    LineComment,
    BlockComment,
}

#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::LineComment | TokenKind::BlockComment)
    }

    pub fn is_punct(&self, b: u8) -> bool {
        self.kind == TokenKind::Punct(b)
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

/// Keywords after which a `/` starts a regex literal rather than division.
fn regex_allowed_after_keyword(word: &str) -> bool {
    matches!(
        word,
        "return" | "typeof" | "instanceof" | "in" | "of" | "new" | "delete" | "void" | "case"
            | "do" | "else" | "throw"
    )
}

pub fn scan(src: &str) -> Result<Vec<Token>, LexError> {
    let bytes = src.as_bytes();
    let mut tokens: Vec<Token> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        let kind = match b {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                TokenKind::LineComment
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                loop {
                    if i + 1 >= bytes.len() {
                        return Err(LexError::Unterminated {
                            what: "block comment",
                            at: start,
                        });
                    }
                    if bytes[i] == b'*' && bytes[i + 1] == b'/' {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
                TokenKind::BlockComment
            }
            b'/' if regex_allowed(&tokens, src) => {
                i = skip_regex(bytes, i)?;
                TokenKind::Regex
            }
            b'\'' | b'"' => {
                i = skip_string(bytes, i)?;
                TokenKind::Str
            }
            b'`' => {
                i = skip_template(bytes, i)?;
                TokenKind::Template
            }
            _ if is_ident_start(b) => {
                while i < bytes.len() && is_ident_continue(bytes[i]) {
                    i += 1;
                }
                TokenKind::Ident
            }
            _ if b.is_ascii_digit() => {
                i = skip_number(bytes, i);
                TokenKind::Num
            }
            b'.' if bytes.get(i + 1).is_some_and(|n| n.is_ascii_digit()) => {
                i = skip_number(bytes, i + 1);
                TokenKind::Num
            }
            _ => {
                i += 1;
                TokenKind::Punct(b)
            }
        };
        tokens.push(Token {
            kind,
            start,
            end: i,
        });
    }
    Ok(tokens)
}

/// Division/regex disambiguation by the last significant token.
fn regex_allowed(tokens: &[Token], src: &str) -> bool {
    let Some(prev) = tokens.iter().rev().find(|t| !t.is_comment()) else {
        return true;
    };
    match prev.kind {
        TokenKind::Ident => regex_allowed_after_keyword(&src[prev.start..prev.end]),
        TokenKind::Num | TokenKind::Str | TokenKind::Template | TokenKind::Regex => false,
        TokenKind::Punct(b')') | TokenKind::Punct(b']') => false,
        TokenKind::Punct(_) => true,
        _ => false,
    }
}

fn skip_string(bytes: &[u8], start: usize) -> Result<usize, LexError> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => break,
            b if b == quote => return Ok(i + 1),
            _ => i += 1,
        }
    }
    Err(LexError::Unterminated {
        what: "string literal",
        at: start,
    })
}

fn skip_regex(bytes: &[u8], start: usize) -> Result<usize, LexError> {
    let mut i = start + 1;
    let mut in_class = false;
    loop {
        if i >= bytes.len() || bytes[i] == b'\n' {
            return Err(LexError::Unterminated {
                what: "regex literal",
                at: start,
            });
        }
        match bytes[i] {
            b'\\' => i += 2,
            b'[' => {
                in_class = true;
                i += 1;
            }
            b']' => {
                in_class = false;
                i += 1;
            }
            b'/' if !in_class => {
                i += 1;
                break;
            }
            _ => i += 1,
        }
    }
    while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
        i += 1;
    }
    Ok(i)
}

fn skip_template(bytes: &[u8], start: usize) -> Result<usize, LexError> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return Ok(i + 1),
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                i = skip_template_expr(bytes, i + 2, start)?;
            }
            _ => i += 1,
        }
    }
    Err(LexError::Unterminated {
        what: "template literal",
        at: start,
    })
}

/// Skip a `${...}` substitution, honoring nested braces, strings, and
/// templates. `i` points just past the opening brace.
fn skip_template_expr(bytes: &[u8], mut i: usize, start: usize) -> Result<usize, LexError> {
    let mut depth = 1usize;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth -= 1;
                i += 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            b'\'' | b'"' => i = skip_string(bytes, i)?,
            b'`' => i = skip_template(bytes, i)?,
            b'\\' => i += 2,
            _ => i += 1,
        }
    }
    Err(LexError::Unterminated {
        what: "template substitution",
        at: start,
    })
}

fn skip_number(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len()
        && (bytes[i].is_ascii_alphanumeric()
            || bytes[i] == b'.' && bytes.get(i + 1).is_some_and(|n| n.is_ascii_digit()))
    {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        scan(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn scans_identifier_chain() {
        assert_eq!(
            kinds("App.Foo = 1;"),
            vec![
                TokenKind::Ident,
                TokenKind::Punct(b'.'),
                TokenKind::Ident,
                TokenKind::Punct(b'='),
                TokenKind::Num,
                TokenKind::Punct(b';'),
            ]
        );
    }

    #[test]
    fn strings_and_comments_are_opaque() {
        let toks = scan("var s = 'a;b{'; // tail ; comment").unwrap();
        assert_eq!(toks[3].kind, TokenKind::Str);
        assert_eq!(toks.last().unwrap().kind, TokenKind::LineComment);
    }

    #[test]
    fn regex_vs_division() {
        // After '=' a slash starts a regex.
        let toks = scan("var r = /ab;c/g;").unwrap();
        assert!(toks.iter().any(|t| t.kind == TokenKind::Regex));
        // After an identifier it is division.
        let toks = scan("x = a / b;").unwrap();
        assert!(!toks.iter().any(|t| t.kind == TokenKind::Regex));
    }

    #[test]
    fn template_with_substitution() {
        let toks = scan("var t = `a ${x + '}'} b`;").unwrap();
        assert!(toks.iter().any(|t| t.kind == TokenKind::Template));
        assert!(toks.last().unwrap().is_punct(b';'));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(scan("var s = 'oops\n;").is_err());
    }
}
