//! Import resolution for one export unit.
//!
//! Scans a unit's statements for namespace-member accesses and turns them
//! into an ordered, deduplicated set of import requests. Well-known external
//! namespaces come from a small fixed table; root-namespace and host-global
//! accesses resolve through the corpus-wide binding table. References to
//! names with no binding stay in the emitted source and are surfaced as
//! non-fatal diagnostics.

use std::collections::HashSet;

use tracing::warn;
use unglobal_core::config::MigratorConfig;
use unglobal_core::ir::ExportUnit;
use unglobal_core::registry::BindingTable;

/// A well-known external namespace and the module that provides it.
#[derive(Debug)]
pub struct WellKnownNamespace {
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub module: &'static str,
}

/// The fixed table of external namespaces the legacy corpora use.
pub const WELL_KNOWN_NAMESPACES: &[WellKnownNamespace] = &[
    WellKnownNamespace {
        canonical: "Ember",
        aliases: &["Em"],
        module: "ember",
    },
    WellKnownNamespace {
        canonical: "DS",
        aliases: &[],
        module: "ember-data",
    },
];

/// Look up a namespace identifier (canonical or shorthand alias).
pub fn well_known_namespace(name: &str) -> Option<&'static WellKnownNamespace> {
    WELL_KNOWN_NAMESPACES
        .iter()
        .find(|ns| ns.canonical == name || ns.aliases.contains(&name))
}

/// One `import <binding> from '<path>';` to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub binding: String,
    pub path: String,
}

/// The outcome of scanning one unit.
#[derive(Debug, Default)]
pub struct ResolvedImports {
    /// First-seen order, deduplicated by binding name.
    pub requests: Vec<ImportRequest>,
    /// Root-namespace member names with no binding-table entry.
    pub unresolved: Vec<String>,
}

/// Resolves the imports of export units against an immutable binding table.
#[derive(Debug)]
pub struct ImportResolver<'a> {
    config: &'a MigratorConfig,
    bindings: &'a BindingTable,
}

impl<'a> ImportResolver<'a> {
    pub fn new(config: &'a MigratorConfig, bindings: &'a BindingTable) -> Self {
        Self { config, bindings }
    }

    /// Module path for a corpus-internal destination.
    fn internal_path(&self, destination: &str) -> String {
        let stem = destination
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(destination);
        format!("{}/{}", self.config.local_module_name, stem)
    }

    /// Module path for an inline `require('<module>')` binding.
    fn require_path(&self, module: &str) -> String {
        let stem = module.strip_suffix(".js").unwrap_or(module);
        format!("{}/{}", self.config.local_module_name, stem)
    }

    pub fn resolve(&self, unit: &ExportUnit) -> ResolvedImports {
        let mut resolved = ResolvedImports::default();
        let mut seen: HashSet<String> = HashSet::new();
        let mut unresolved_seen: HashSet<String> = HashSet::new();
        let mut push = |resolved: &mut ResolvedImports, binding: &str, path: String| {
            if seen.insert(binding.to_string()) {
                resolved.requests.push(ImportRequest {
                    binding: binding.to_string(),
                    path,
                });
            }
        };

        for stmt in &unit.statements {
            if let Some(require) = &stmt.facts.require_binding {
                push(&mut resolved, &require.name, self.require_path(&require.module));
            }
            for access in &stmt.facts.member_accesses {
                if let Some(ns) = well_known_namespace(&access.object) {
                    push(&mut resolved, ns.canonical, ns.module.to_string());
                    continue;
                }
                if access.object != self.config.root_namespace
                    && access.object != self.config.host_global
                {
                    continue;
                }
                // A unit never imports its own export.
                if unit.export_name.as_deref() == Some(access.member.as_str()) {
                    continue;
                }
                match self.bindings.get(&access.member) {
                    Some(entry) => {
                        let path = self.internal_path(&entry.destination);
                        push(&mut resolved, &access.member, path);
                    }
                    None => {
                        if unresolved_seen.insert(access.member.clone()) {
                            warn!(
                                unit = %unit.destination,
                                name = %access.member,
                                "do not know how to import"
                            );
                            resolved.unresolved.push(access.member.clone());
                        }
                    }
                }
            }
        }
        resolved
    }
}
