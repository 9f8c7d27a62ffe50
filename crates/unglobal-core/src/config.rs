//! Migration configuration surface.

use serde::{Deserialize, Serialize};

use crate::kind::{KindDef, KindTable};

/// Run configuration. Loadable from a TOML file; every field has a default
/// so a config file only needs the values it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MigratorConfig {
    /// The single global identifier legacy classes were attached to.
    pub root_namespace: String,
    /// The ambient global object used as an alternate attachment point.
    pub host_global: String,
    /// Module name prefix for corpus-internal imports (the app name).
    pub local_module_name: String,
    /// Extension of transformable source files, without the dot.
    pub source_extension: String,
    /// Ordered kind vocabulary. Order is classification priority.
    pub kinds: Vec<KindDef>,
}

impl Default for MigratorConfig {
    fn default() -> Self {
        Self {
            root_namespace: "App".to_string(),
            host_global: "window".to_string(),
            local_module_name: "app".to_string(),
            source_extension: "js".to_string(),
            kinds: KindTable::default().kinds().to_vec(),
        }
    }
}

impl MigratorConfig {
    pub fn kind_table(&self) -> KindTable {
        KindTable::new(self.kinds.clone())
    }
}
