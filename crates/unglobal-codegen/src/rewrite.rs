//! Phase 2: print one ES module per export unit.
//!
//! Rewriting is pure span surgery on statement text. The declaring
//! assignment head becomes a `var` binding, namespace prefixes on resolved
//! references are deleted, shorthand external namespaces are normalized to
//! their canonical spelling, and consumed statements (inline requires, bare
//! re-exports) are dropped with their comment blocks carried forward.
//! Statements the rewriter has nothing to say about print verbatim.

use unglobal_core::config::MigratorConfig;
use unglobal_core::ir::{ExportUnit, Span, Statement, StatementTag};
use unglobal_core::registry::BindingTable;

use crate::imports::{well_known_namespace, ResolvedImports};

/// Prints export units against a frozen binding table.
#[derive(Debug)]
pub struct CodeRewriter<'a> {
    config: &'a MigratorConfig,
    bindings: &'a BindingTable,
}

impl<'a> CodeRewriter<'a> {
    pub fn new(config: &'a MigratorConfig, bindings: &'a BindingTable) -> Self {
        Self { config, bindings }
    }

    /// Emit the full module source for `unit`.
    pub fn rewrite(&self, unit: &ExportUnit, imports: &ResolvedImports) -> String {
        let mut out = String::new();
        for req in &imports.requests {
            out.push_str(&format!("import {} from '{}';\n", req.binding, req.path));
        }
        if !imports.requests.is_empty() {
            out.push('\n');
        }

        let mut printed: Vec<String> = Vec::new();
        let mut carried: Option<String> = None;
        for stmt in &unit.statements {
            if is_consumed(stmt) {
                if let Some(comments) = &stmt.leading_comments {
                    carried = Some(join_comments(carried.take(), comments));
                }
                continue;
            }
            let text = self.rewrite_statement(stmt, unit);
            let mut comments = carried.take();
            if let Some(own) = &stmt.leading_comments {
                comments = Some(join_comments(comments, own));
            }
            printed.push(match comments {
                Some(block) => format!("{block}\n{text}"),
                None => text,
            });
        }
        // Comments attached to a trailing consumed statement still survive.
        if let Some(orphan) = carried {
            printed.push(orphan);
        }

        let body = collapse_terminators(&printed.join("\n"));
        if !body.is_empty() {
            out.push_str(&body);
            out.push('\n');
        }
        if let Some(name) = &unit.export_name {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("export default {name};\n"));
        }
        out
    }

    fn rewrite_statement(&self, stmt: &Statement, unit: &ExportUnit) -> String {
        let mut edits: Vec<(Span, String)> = Vec::new();
        let mut head_end = 0usize;

        // The declaring assignment loses its namespace target and becomes a
        // local binding with the unit's export name.
        if stmt.tag == StatementTag::OwnedExport {
            if let (Some(target), Some(name)) =
                (stmt.facts.assign_targets.first(), unit.export_name.as_deref())
            {
                if target.name == name {
                    edits.push((
                        (target.span.0, stmt.facts.rhs_offset),
                        format!("var {name} = "),
                    ));
                    head_end = stmt.facts.rhs_offset;
                }
            }
        }

        for access in &stmt.facts.member_accesses {
            if access.start < head_end {
                continue;
            }
            if access.object == self.config.root_namespace
                || access.object == self.config.host_global
            {
                // Strip the prefix only for names that resolve locally; an
                // unknown member keeps its namespaced spelling verbatim.
                let resolves = unit.export_name.as_deref() == Some(access.member.as_str())
                    || self.bindings.get(&access.member).is_some();
                if resolves {
                    edits.push(((access.start, access.member_start), String::new()));
                }
            } else if let Some(ns) = well_known_namespace(&access.object) {
                if access.object != ns.canonical {
                    edits.push(((access.start, access.object_end), ns.canonical.to_string()));
                }
            }
        }

        let mut text = stmt.text.clone();
        edits.sort_by(|a, b| b.0 .0.cmp(&a.0 .0));
        for ((start, end), replacement) in edits {
            text.replace_range(start..end, &replacement);
        }
        text
    }
}

/// Statements that do not reach the output: inline requires turn into import
/// lines, and the unit's own bare re-export is subsumed by `export default`.
fn is_consumed(stmt: &Statement) -> bool {
    matches!(
        stmt.tag,
        StatementTag::RequireBinding | StatementTag::ReExportAlias
    )
}

fn join_comments(existing: Option<String>, next: &str) -> String {
    match existing {
        Some(existing) => format!("{existing}\n{next}"),
        None => next.to_string(),
    }
}

/// Collapse doubled statement terminators (`;;` at end of line) left behind
/// by empty statements in the legacy source, folding away the blank lines
/// that followed them.
fn collapse_terminators(body: &str) -> String {
    let mut text = body.to_string();
    while let Some(pos) = text.find(";;\n") {
        let mut end = pos + 3;
        while text[end..].starts_with('\n') {
            end += 1;
        }
        text.replace_range(pos + 1..end, "\n");
    }
    text
}
