//! Corpus-wide registries threaded through both pipeline phases.
//!
//! All shared state lives in an explicit [`PipelineContext`] passed by
//! reference; there is no module-level state. Phase 1 populates the
//! registries through the splitter; [`PipelineContext::into_parts`] then
//! hands phase 2 an immutable binding table, which is the barrier the
//! two-phase discipline requires.

use std::collections::{btree_map, BTreeMap, HashMap};

use crate::config::MigratorConfig;
use crate::ir::ExportUnit;

/// Where an exported name resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingEntry {
    /// Destination module path (with extension).
    pub destination: String,
    /// True when the export was attached to the host global instead of the
    /// root namespace.
    pub is_host_global: bool,
}

/// Map from exported name to resolved destination. Entries are written
/// exactly once, at unit-creation time, and never overwritten.
#[derive(Debug, Default)]
pub struct BindingTable {
    entries: HashMap<String, BindingEntry>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a binding unless the name is already bound. Returns false when
    /// an earlier binding won.
    pub fn insert_once(&mut self, name: &str, entry: BindingEntry) -> bool {
        match self.entries.entry(name.to_string()) {
            std::collections::hash_map::Entry::Occupied(existing) => {
                tracing::debug!(
                    name,
                    kept = %existing.get().destination,
                    ignored = %entry.destination,
                    "duplicate export name, keeping first binding"
                );
                false
            }
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&BindingEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Map from destination path to export unit; the sole source of truth for
/// whether a destination already exists. Ordered so phase 2 output is
/// deterministic.
#[derive(Debug, Default)]
pub struct UnitRegistry {
    units: BTreeMap<String, ExportUnit>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, destination: &str) -> bool {
        self.units.contains_key(destination)
    }

    /// Register a freshly created unit. The caller must have run the
    /// collision policy first; a duplicate destination here is a logic error.
    pub fn insert(&mut self, unit: ExportUnit) {
        debug_assert!(!self.units.contains_key(&unit.destination));
        self.units.insert(unit.destination.clone(), unit);
    }

    pub fn get_mut(&mut self, destination: &str) -> Option<&mut ExportUnit> {
        self.units.get_mut(destination)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ExportUnit> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Shared pipeline state for one run.
#[derive(Debug)]
pub struct PipelineContext {
    pub config: MigratorConfig,
    pub bindings: BindingTable,
    pub units: UnitRegistry,
}

impl PipelineContext {
    pub fn new(config: MigratorConfig) -> Self {
        Self {
            config,
            bindings: BindingTable::new(),
            units: UnitRegistry::new(),
        }
    }

    /// End phase 1: freeze the binding table and hand the units over for
    /// rewriting. Phase 2 only ever sees `&BindingTable`.
    pub fn into_parts(self) -> (UnitRegistry, BindingTable, MigratorConfig) {
        (self.units, self.bindings, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_are_written_once() {
        let mut table = BindingTable::new();
        assert!(table.insert_once(
            "Foo",
            BindingEntry {
                destination: "models/foo.js".to_string(),
                is_host_global: false,
            }
        ));
        assert!(!table.insert_once(
            "Foo",
            BindingEntry {
                destination: "elsewhere/foo.js".to_string(),
                is_host_global: true,
            }
        ));
        let entry = table.get("Foo").unwrap();
        assert_eq!(entry.destination, "models/foo.js");
        assert!(!entry.is_host_global);
    }

    #[test]
    fn registry_iterates_in_destination_order() {
        let mut registry = UnitRegistry::new();
        for dest in ["views/b.js", "models/a.js"] {
            registry.insert(ExportUnit {
                kind: None,
                export_name: None,
                destination: dest.to_string(),
                origin: "x.js".to_string(),
                statements: vec![],
            });
        }
        let order: Vec<_> = registry.iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(order, vec!["models/a.js", "views/b.js"]);
    }
}
