//! Phase 1: partition a source file's statements into export units.
//!
//! A statement is an export-claim when it assigns a two-part namespace
//! target (`App.Foo = ...`, `window.Foo = ...`) or is a bare
//! `module.exports = Foo;` re-export. Every claim gets its own unit and a
//! binding-table entry. Everything else is a free statement, deferred and
//! appended to the first unit the file claimed; a file with no claims gets
//! an unclassified unit at its own normalized path.

use tracing::debug;

use crate::config::MigratorConfig;
use crate::error::CoreError;
use crate::ir::{ExportUnit, SourceFile, Statement, StatementId, StatementIdAllocator, StatementTag};
use crate::kind::KindTable;
use crate::paths::PathResolver;
use crate::registry::{BindingEntry, PipelineContext};

/// Splits one source file at a time, mutating the shared pipeline context.
#[derive(Debug)]
pub struct Splitter {
    kinds: KindTable,
    resolver: PathResolver,
}

struct Claim {
    name: String,
    tag: StatementTag,
    is_host_global: bool,
}

impl Splitter {
    pub fn new(config: &MigratorConfig) -> Self {
        Self {
            kinds: config.kind_table(),
            resolver: PathResolver::new(&config.source_extension),
        }
    }

    /// Distribute every statement of `file` into export units. After this
    /// returns, each input statement belongs to exactly one unit.
    pub fn split_file(
        &self,
        file: SourceFile,
        ctx: &mut PipelineContext,
        ids: &mut StatementIdAllocator,
    ) -> Result<(), CoreError> {
        let path = file.path;
        let mut deferred: Vec<Statement> = Vec::new();
        let mut first_claimed_dest: Option<String> = None;
        // Identity and landing spot of the file's original first statement,
        // for leading-comment reattachment.
        let mut first_stmt: Option<(StatementId, bool)> = None;
        let mut first_stmt_dest: Option<String> = None;

        for (index, stmt) in file.statements.into_iter().enumerate() {
            // Multi-target chains unfold before claim detection so every
            // target gets its own unit.
            let unfolded = stmt.unfold_chain(ids);
            for (sub, mut stmt) in unfolded.into_iter().enumerate() {
                let is_file_first = index == 0 && sub == 0;

                let Some(claim) = self.claim_of(&stmt, &ctx.config) else {
                    if stmt.facts.require_binding.is_some() {
                        stmt.tag = StatementTag::RequireBinding;
                    } else {
                        stmt.tag = StatementTag::Free;
                    }
                    if is_file_first {
                        first_stmt = Some((stmt.id, true));
                    }
                    deferred.push(stmt);
                    continue;
                };

                stmt.tag = claim.tag;
                let stmt_id = stmt.id;
                let kind = self.kinds.classify(Some(&claim.name), &path).cloned();
                let destination =
                    self.resolver
                        .resolve(Some(&claim.name), kind.as_ref(), &path, &ctx.units)?;
                debug!(name = %claim.name, %destination, "export claim");

                ctx.units.insert(ExportUnit {
                    kind,
                    export_name: Some(claim.name.clone()),
                    destination: destination.clone(),
                    origin: path.clone(),
                    statements: vec![stmt],
                });
                ctx.bindings.insert_once(
                    &claim.name,
                    BindingEntry {
                        destination: destination.clone(),
                        is_host_global: claim.is_host_global,
                    },
                );

                if first_claimed_dest.is_none() {
                    first_claimed_dest = Some(destination.clone());
                }
                if is_file_first {
                    first_stmt = Some((stmt_id, false));
                    first_stmt_dest = Some(destination);
                }
            }
        }

        if !deferred.is_empty() {
            let target = match first_claimed_dest {
                Some(dest) => dest,
                None => {
                    let dest = self.resolver.resolve(None, None, &path, &ctx.units)?;
                    if !ctx.units.contains(&dest) {
                        ctx.units.insert(ExportUnit {
                            kind: None,
                            export_name: None,
                            destination: dest.clone(),
                            origin: path.clone(),
                            statements: vec![],
                        });
                    }
                    dest
                }
            };
            if let Some((_, deferred_first)) = first_stmt {
                if deferred_first {
                    first_stmt_dest = Some(target.clone());
                }
            }
            let unit = ctx
                .units
                .get_mut(&target)
                .ok_or_else(|| CoreError::Internal(format!("missing unit for {target}")))?;
            unit.statements.extend(deferred);
        }

        self.reattach_leading_comments(ctx, first_stmt, first_stmt_dest);
        Ok(())
    }

    /// The comment block of a file's first statement must stay at the top of
    /// whatever module that statement ended up in, even when the statement
    /// itself was deferred behind an export claim.
    fn reattach_leading_comments(
        &self,
        ctx: &mut PipelineContext,
        first_stmt: Option<(StatementId, bool)>,
        first_stmt_dest: Option<String>,
    ) {
        let (Some((first_id, _)), Some(dest)) = (first_stmt, first_stmt_dest) else {
            return;
        };
        let Some(unit) = ctx.units.get_mut(&dest) else {
            return;
        };
        let Some(pos) = unit.statements.iter().position(|s| s.id == first_id) else {
            return;
        };
        if pos == 0 {
            return;
        }
        if let Some(comments) = unit.statements[pos].leading_comments.take() {
            let head = &mut unit.statements[0].leading_comments;
            *head = Some(match head.take() {
                Some(existing) => format!("{comments}\n{existing}"),
                None => comments,
            });
        }
    }

    fn claim_of(&self, stmt: &Statement, config: &MigratorConfig) -> Option<Claim> {
        if let Some(name) = &stmt.facts.bare_reexport {
            return Some(Claim {
                name: name.clone(),
                tag: StatementTag::ReExportAlias,
                is_host_global: false,
            });
        }
        let target = stmt.facts.assign_targets.first()?;
        let object = target.object.as_deref()?;
        if object == config.root_namespace {
            Some(Claim {
                name: target.name.clone(),
                tag: StatementTag::OwnedExport,
                is_host_global: false,
            })
        } else if object == config.host_global {
            Some(Claim {
                name: target.name.clone(),
                tag: StatementTag::OwnedExport,
                is_host_global: true,
            })
        } else {
            None
        }
    }
}
