//! Statement-level intermediate representation.
//!
//! A [`Statement`] is an opaque top-level syntactic unit: its source text,
//! an optional attached leading-comment block, and the lexical facts the
//! scanner extracted from it (assignment targets, member accesses, require
//! bindings). The pipeline never reparses text; everything downstream works
//! off these facts and byte spans into `text`.

use crate::kind::KindDef;

pub type StatementId = u64;

/// Byte span into a statement's `text` field, `[start, end)`.
pub type Span = (usize, usize);

/// Hands out corpus-unique statement identities.
#[derive(Debug, Default)]
pub struct StatementIdAllocator {
    next: StatementId,
}

impl StatementIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> StatementId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Classification assigned to a statement during splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementTag {
    /// Top-level `Root.Name = ...` or `Host.Name = ...` assignment.
    OwnedExport,
    /// Bare `module.exports = Name;` re-export.
    ReExportAlias,
    /// Inline `var Name = require('...')` dependency binding.
    RequireBinding,
    /// Anything else.
    Free,
}

/// One `<object>.` or `<object>.<name> =` assignment target at the head of a
/// statement. `object` is `None` for bare-identifier targets (`A = ...`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignTarget {
    pub object: Option<String>,
    pub name: String,
    /// Span of the target expression (object through name), excluding `=`.
    pub span: Span,
}

/// A member-access chain head `<object>.<member>` found anywhere in a
/// statement. `has_tail` is true when a third level follows
/// (`<object>.<member>.<more>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberAccess {
    pub object: String,
    pub member: String,
    pub has_tail: bool,
    /// Start of the object token.
    pub start: usize,
    /// End of the object token.
    pub object_end: usize,
    /// Start of the member token; deleting `[start, member_start)` removes
    /// the namespace prefix and its dot.
    pub member_start: usize,
}

/// `var <name> = require('<module>')`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireBinding {
    pub name: String,
    pub module: String,
}

/// Lexical facts extracted by the scanner, consumed by the splitter and the
/// rewriter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexicalFacts {
    /// Assignment targets at the statement head, in source order. More than
    /// one means a multi-target chain (`A = B = expr`).
    pub assign_targets: Vec<AssignTarget>,
    /// Offset of the final right-hand side. Meaningless when
    /// `assign_targets` is empty.
    pub rhs_offset: usize,
    /// Every member-access chain head, in source order.
    pub member_accesses: Vec<MemberAccess>,
    pub require_binding: Option<RequireBinding>,
    /// Right-hand identifier of a bare `module.exports = <Ident>;`.
    pub bare_reexport: Option<String>,
}

/// An opaque top-level statement.
#[derive(Debug, Clone)]
pub struct Statement {
    pub id: StatementId,
    /// Leading comment block, verbatim, without the trailing newline that
    /// separated it from the statement.
    pub leading_comments: Option<String>,
    /// Statement source text, comments excluded at the head but included
    /// inside.
    pub text: String,
    pub tag: StatementTag,
    pub facts: LexicalFacts,
}

impl Statement {
    /// Print the statement back to source text. Unchanged statements print
    /// verbatim, which is what makes re-running the rewriter idempotent.
    pub fn print(&self) -> String {
        match &self.leading_comments {
            Some(comments) => format!("{comments}\n{}", self.text),
            None => self.text.clone(),
        }
    }

    /// Whether this statement is a multi-target assignment chain.
    pub fn is_chain(&self) -> bool {
        self.facts.assign_targets.len() > 1
    }

    /// Unfold a multi-target assignment chain into independent single-target
    /// statements, each carrying an identical copy of the right-hand text.
    ///
    /// `App.A = App.B = expr;` becomes `App.A = expr;` and `App.B = expr;`,
    /// so every target gets its own export unit. Facts for the new
    /// statements are rebuilt by span arithmetic: the target contributes one
    /// member access at offset zero, and accesses inside the right-hand side
    /// shift by the difference in prefix length.
    pub fn unfold_chain(&self, ids: &mut StatementIdAllocator) -> Vec<Statement> {
        if !self.is_chain() {
            return vec![self.clone()];
        }
        let rhs = &self.text[self.facts.rhs_offset..];
        self.facts
            .assign_targets
            .iter()
            .enumerate()
            .map(|(i, target)| {
                let target_text = &self.text[target.span.0..target.span.1];
                let text = format!("{target_text} = {rhs}");
                let new_rhs_offset = target_text.len() + 3;
                let shift = new_rhs_offset as isize - self.facts.rhs_offset as isize;

                let mut member_accesses = Vec::new();
                if let Some(object) = &target.object {
                    member_accesses.push(MemberAccess {
                        object: object.clone(),
                        member: target.name.clone(),
                        has_tail: false,
                        start: 0,
                        object_end: object.len(),
                        member_start: object.len() + 1,
                    });
                }
                for access in &self.facts.member_accesses {
                    if access.start >= self.facts.rhs_offset {
                        member_accesses.push(MemberAccess {
                            start: (access.start as isize + shift) as usize,
                            object_end: (access.object_end as isize + shift) as usize,
                            member_start: (access.member_start as isize + shift) as usize,
                            ..access.clone()
                        });
                    }
                }

                Statement {
                    id: ids.next_id(),
                    leading_comments: if i == 0 {
                        self.leading_comments.clone()
                    } else {
                        None
                    },
                    text,
                    tag: StatementTag::Free,
                    facts: LexicalFacts {
                        assign_targets: vec![AssignTarget {
                            object: target.object.clone(),
                            name: target.name.clone(),
                            span: (0, target_text.len()),
                        }],
                        rhs_offset: new_rhs_offset,
                        member_accesses,
                        require_binding: None,
                        bare_reexport: None,
                    },
                }
            })
            .collect()
    }
}

/// One input file: its source-relative path and ordered statements.
/// Immutable once read.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub statements: Vec<Statement>,
}

/// The per-destination-file grouping of statements produced by splitting.
#[derive(Debug, Clone)]
pub struct ExportUnit {
    /// `None` means unclassified.
    pub kind: Option<KindDef>,
    pub export_name: Option<String>,
    pub destination: String,
    /// Path of the source file this unit was first created from.
    pub origin: String,
    pub statements: Vec<Statement>,
}
