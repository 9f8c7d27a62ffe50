//! The migration driver: walk a source tree, split every transformable file
//! into export units, then resolve imports and write one module per unit.
//!
//! The two phases are separated by [`PipelineContext::into_parts`]: nothing
//! is written until every file has been split, so import resolution always
//! sees the complete binding table. Files the parser rejects are skipped
//! with a diagnostic; the run keeps going.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};
use walkdir::WalkDir;

use unglobal_codegen::{CodeRewriter, ImportResolver};
use unglobal_core::config::MigratorConfig;
use unglobal_core::diagnostics::{plan_of, ParseFailure, RunReport, UnitPlan, UnresolvedImport};
use unglobal_core::ir::StatementIdAllocator;
use unglobal_core::registry::PipelineContext;
use unglobal_core::split::Splitter;
use unglobal_parser::parse_source;

/// Everything a finished run reports back: counters and diagnostics, plus
/// the destination table for plan output.
#[derive(Debug)]
pub struct MigrationOutcome {
    pub report: RunReport,
    pub plan: Vec<UnitPlan>,
}

/// One migration run over a source tree.
#[derive(Debug)]
pub struct Migrator {
    config: MigratorConfig,
    source_root: PathBuf,
    output_root: PathBuf,
}

impl Migrator {
    pub fn new(config: MigratorConfig, source_root: PathBuf, output_root: PathBuf) -> Self {
        Self {
            config,
            source_root,
            output_root,
        }
    }

    /// Read a TOML configuration file. Missing keys fall back to defaults.
    pub fn load_config(path: &Path) -> Result<MigratorConfig> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Run the full pipeline. With `dry_run` set, nothing is written; the
    /// outcome still carries the complete plan and diagnostics.
    pub fn run(&self, dry_run: bool) -> Result<MigrationOutcome> {
        let mut ctx = PipelineContext::new(self.config.clone());
        let mut ids = StatementIdAllocator::new();
        let splitter = Splitter::new(&self.config);
        let mut report = RunReport::default();
        let mut assets: Vec<(PathBuf, String)> = Vec::new();

        // Sorted traversal keeps first-claim-wins deterministic across runs.
        for entry in WalkDir::new(&self.source_root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(&self.source_root)?
                .to_string_lossy()
                .replace('\\', "/");
            if !self.is_source(&rel) {
                assets.push((entry.path().to_path_buf(), rel));
                continue;
            }

            let text = fs::read_to_string(entry.path())
                .with_context(|| format!("failed to read {rel}"))?;
            match parse_source(&rel, &text, &mut ids) {
                Ok(file) => {
                    splitter.split_file(file, &mut ctx, &mut ids)?;
                    report.files_split += 1;
                }
                Err(err) => {
                    warn!(path = %rel, error = %err, "skipping unparseable file");
                    report.parse_failures.push(ParseFailure {
                        path: rel,
                        message: err.to_string(),
                    });
                }
            }
        }

        // Phase barrier: the binding table is frozen from here on.
        let (units, bindings, config) = ctx.into_parts();
        let plan = plan_of(&units);

        let resolver = ImportResolver::new(&config, &bindings);
        let rewriter = CodeRewriter::new(&config, &bindings);
        for (destination, unit) in units.iter() {
            let imports = resolver.resolve(unit);
            report
                .unresolved_imports
                .extend(imports.unresolved.iter().map(|name| UnresolvedImport {
                    unit: destination.clone(),
                    name: name.clone(),
                }));
            let module = rewriter.rewrite(unit, &imports);
            if !dry_run {
                self.persist(destination, &module)?;
            }
            report.units_written += 1;
        }

        for (source, rel) in &assets {
            if !dry_run {
                let target = self.output_root.join(rel);
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                fs::copy(source, &target)
                    .with_context(|| format!("failed to copy asset {rel}"))?;
            }
            report.assets_copied += 1;
        }

        info!(
            files = report.files_split,
            units = report.units_written,
            assets = report.assets_copied,
            unresolved = report.unresolved_imports.len(),
            "migration complete"
        );
        Ok(MigrationOutcome { report, plan })
    }

    fn is_source(&self, rel: &str) -> bool {
        Path::new(rel).extension().and_then(|ext| ext.to_str())
            == Some(self.config.source_extension.as_str())
    }

    fn persist(&self, destination: &str, module: &str) -> Result<()> {
        let target = self.output_root.join(destination);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&target, module)
            .with_context(|| format!("failed to write module {destination}"))
    }
}
