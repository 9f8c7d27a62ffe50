//! Top-level statement splitting and lexical fact extraction.
//!
//! `parse_source` turns one file into an ordered list of opaque statements
//! with attached leading comments, and records the lexical facts the
//! splitter and rewriter need: assignment-target chains at the statement
//! head, member-access chain heads with byte spans, `require(...)` bindings,
//! and bare `module.exports = X;` re-exports.

use unglobal_core::ir::{
    AssignTarget, LexicalFacts, MemberAccess, RequireBinding, SourceFile, Statement,
    StatementIdAllocator, StatementTag,
};

use crate::error::{LexError, ParseError};
use crate::lex::{scan, Token, TokenKind};

const KEYWORDS: &[&str] = &[
    "var", "let", "const", "function", "class", "return", "if", "else", "for", "while", "do",
    "new", "typeof", "delete", "void", "this", "in", "of", "case", "break", "continue", "switch",
    "try", "catch", "finally", "throw", "instanceof",
];

/// Statements opened by one of these keywords end at their closing brace;
/// everything else needs a semicolon.
const BLOCK_KEYWORDS: &[&str] = &["function", "class", "if", "for", "while", "switch", "try"];

fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

fn line_of(src: &str, at: usize) -> usize {
    src[..at.min(src.len())].bytes().filter(|b| *b == b'\n').count() + 1
}

/// Parse one source file into statements. Printing the statements back with
/// [`Statement::print`] reproduces the input modulo inter-statement
/// whitespace, which is what the rewriter's idempotence rests on.
pub fn parse_source(
    path: &str,
    text: &str,
    ids: &mut StatementIdAllocator,
) -> Result<SourceFile, ParseError> {
    let tokens = scan(text).map_err(|e| match e {
        LexError::Unterminated { what, at } => ParseError::Unterminated {
            path: path.to_string(),
            line: line_of(text, at),
            what,
        },
    })?;

    let mut statements = Vec::new();
    let mut pending_comments: Vec<Token> = Vec::new();
    let mut stmt_tokens: Vec<Token> = Vec::new();
    let mut depth = 0usize;
    let mut index = 0;

    while index < tokens.len() {
        let token = tokens[index];
        if token.is_comment() && stmt_tokens.is_empty() {
            pending_comments.push(token);
            index += 1;
            continue;
        }
        stmt_tokens.push(token);
        let mut close = false;
        if !token.is_comment() {
            match token.kind {
                TokenKind::Punct(b'(') | TokenKind::Punct(b'[') | TokenKind::Punct(b'{') => {
                    depth += 1;
                }
                TokenKind::Punct(b @ b')') | TokenKind::Punct(b @ b']')
                | TokenKind::Punct(b @ b'}') => {
                    depth = depth.checked_sub(1).ok_or(ParseError::Unbalanced {
                        path: path.to_string(),
                        line: line_of(text, token.start),
                        delimiter: b as char,
                    })?;
                    if b == b'}' && depth == 0 && closes_block_statement(text, &stmt_tokens, &tokens[index + 1..]) {
                        close = true;
                    }
                }
                TokenKind::Punct(b';') if depth == 0 => close = true,
                _ => {}
            }
        }
        if close {
            statements.push(build_statement(text, &pending_comments, &stmt_tokens, ids));
            pending_comments.clear();
            stmt_tokens.clear();
        }
        index += 1;
    }

    if depth > 0 {
        return Err(ParseError::Unbalanced {
            path: path.to_string(),
            line: line_of(text, text.len()),
            delimiter: '{',
        });
    }
    if !stmt_tokens.is_empty() {
        statements.push(build_statement(text, &pending_comments, &stmt_tokens, ids));
    } else if !pending_comments.is_empty() {
        // Trailing comments with no statement after them still belong to the
        // file; keep them as a comment-only statement so nothing is dropped.
        let first = pending_comments[0];
        let last = pending_comments[pending_comments.len() - 1];
        statements.push(Statement {
            id: ids.next_id(),
            leading_comments: None,
            text: text[first.start..last.end].to_string(),
            tag: StatementTag::Free,
            facts: LexicalFacts::default(),
        });
    }

    tracing::debug!(path, statements = statements.len(), "parsed source file");
    Ok(SourceFile {
        path: path.to_string(),
        statements,
    })
}

/// A `}` at depth zero ends the statement only for block-keyword statements,
/// and not when a continuation keyword (`else`, `catch`, `finally`, `while`
/// for do-loops) follows.
fn closes_block_statement(text: &str, stmt_tokens: &[Token], rest: &[Token]) -> bool {
    let Some(first) = stmt_tokens.iter().find(|t| !t.is_comment()) else {
        return false;
    };
    if first.kind != TokenKind::Ident {
        return false;
    }
    let word = &text[first.start..first.end];
    if !BLOCK_KEYWORDS.contains(&word) {
        return false;
    }
    if let Some(next) = rest.iter().find(|t| !t.is_comment()) {
        if next.kind == TokenKind::Ident {
            let next_word = &text[next.start..next.end];
            if matches!(next_word, "else" | "catch" | "finally") {
                return false;
            }
        }
    }
    true
}

fn build_statement(
    text: &str,
    comments: &[Token],
    stmt_tokens: &[Token],
    ids: &mut StatementIdAllocator,
) -> Statement {
    let start = stmt_tokens[0].start;
    let end = stmt_tokens[stmt_tokens.len() - 1].end;
    let leading_comments = match (comments.first(), comments.last()) {
        (Some(first), Some(last)) => Some(text[first.start..last.end].to_string()),
        _ => None,
    };

    // Rebase significant tokens to the statement text.
    let significant: Vec<Token> = stmt_tokens
        .iter()
        .filter(|t| !t.is_comment())
        .map(|t| Token {
            kind: t.kind,
            start: t.start - start,
            end: t.end - start,
        })
        .collect();
    let body = &text[start..end];

    Statement {
        id: ids.next_id(),
        leading_comments,
        text: body.to_string(),
        tag: StatementTag::Free,
        facts: extract_facts(body, &significant),
    }
}

fn extract_facts(text: &str, toks: &[Token]) -> LexicalFacts {
    let mut facts = LexicalFacts::default();
    let word = |t: &Token| &text[t.start..t.end];
    let is_plain_ident =
        |t: &Token| t.kind == TokenKind::Ident && !is_keyword(&text[t.start..t.end]);
    // A single '=' that is neither comparison nor arrow nor compound
    // assignment. The lexer emits one token per operator byte, so it is
    // enough to look at the neighboring bytes.
    let is_plain_assign = |t: &Token| {
        t.is_punct(b'=')
            && !matches!(text.as_bytes().get(t.end), Some(b'=') | Some(b'>'))
            && !matches!(
                t.start.checked_sub(1).and_then(|p| text.as_bytes().get(p)),
                Some(b'=') | Some(b'!') | Some(b'<') | Some(b'>') | Some(b'+') | Some(b'-')
                    | Some(b'*') | Some(b'/') | Some(b'%') | Some(b'&') | Some(b'|') | Some(b'^')
                    | Some(b'~')
            )
    };

    // Assignment-target chain at the statement head.
    let mut i = 0;
    while i < toks.len() && is_plain_ident(&toks[i]) {
        if i + 3 < toks.len()
            && toks[i + 1].is_punct(b'.')
            && toks[i + 2].kind == TokenKind::Ident
            && is_plain_assign(&toks[i + 3])
        {
            facts.assign_targets.push(AssignTarget {
                object: Some(word(&toks[i]).to_string()),
                name: word(&toks[i + 2]).to_string(),
                span: (toks[i].start, toks[i + 2].end),
            });
            i += 4;
        } else if i + 1 < toks.len() && is_plain_assign(&toks[i + 1]) {
            facts.assign_targets.push(AssignTarget {
                object: None,
                name: word(&toks[i]).to_string(),
                span: (toks[i].start, toks[i].end),
            });
            i += 2;
        } else {
            break;
        }
    }
    if !facts.assign_targets.is_empty() {
        facts.rhs_offset = toks.get(i).map(|t| t.start).unwrap_or(text.len());
    }

    // Member-access chain heads.
    for j in 0..toks.len() {
        if j + 2 < toks.len()
            && toks[j].kind == TokenKind::Ident
            && !is_keyword(word(&toks[j]))
            && toks[j + 1].is_punct(b'.')
            && toks[j + 2].kind == TokenKind::Ident
            && (j == 0 || !toks[j - 1].is_punct(b'.'))
        {
            let has_tail = j + 4 < toks.len()
                && toks[j + 3].is_punct(b'.')
                && toks[j + 4].kind == TokenKind::Ident;
            facts.member_accesses.push(MemberAccess {
                object: word(&toks[j]).to_string(),
                member: word(&toks[j + 2]).to_string(),
                has_tail,
                start: toks[j].start,
                object_end: toks[j].end,
                member_start: toks[j + 2].start,
            });
        }
    }

    // var X = require('mod');
    let sig_len = toks.len();
    if (sig_len == 7 || sig_len == 8 && toks[7].is_punct(b';'))
        && toks[0].kind == TokenKind::Ident
        && matches!(word(&toks[0]), "var" | "let" | "const")
        && is_plain_ident(&toks[1])
        && is_plain_assign(&toks[2])
        && toks[3].kind == TokenKind::Ident
        && word(&toks[3]) == "require"
        && toks[4].is_punct(b'(')
        && toks[5].kind == TokenKind::Str
        && toks[6].is_punct(b')')
    {
        let raw = word(&toks[5]);
        facts.require_binding = Some(RequireBinding {
            name: word(&toks[1]).to_string(),
            module: raw[1..raw.len() - 1].to_string(),
        });
    }

    // module.exports = <Ident>;
    if facts.assign_targets.len() == 1 {
        let target = &facts.assign_targets[0];
        if target.object.as_deref() == Some("module") && target.name == "exports" {
            let rest = &toks[i..];
            let bare = match rest {
                [ident] | [ident, _] if is_plain_ident(ident) => {
                    rest.len() == 1 || rest[1].is_punct(b';')
                }
                _ => false,
            };
            if bare {
                facts.bare_reexport = Some(word(&rest[0]).to_string());
            }
            // module.exports targets are not namespace exports; drop the
            // target so the splitter cannot mistake it for one.
            facts.assign_targets.clear();
            facts.rhs_offset = 0;
        }
    }

    facts
}
