//! Run reporting: non-fatal diagnostics and the machine-readable plan.

use serde::Serialize;

use crate::ir::ExportUnit;
use crate::registry::UnitRegistry;

/// A file the parser rejected. The file's statements are skipped entirely;
/// the run continues.
#[derive(Debug, Clone, Serialize)]
pub struct ParseFailure {
    pub path: String,
    pub message: String,
}

/// A root-namespace reference whose name has no binding-table entry. The
/// emitted code keeps the reference as written.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UnresolvedImport {
    pub unit: String,
    pub name: String,
}

/// Summary of one migration run.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub files_split: usize,
    pub units_written: usize,
    pub assets_copied: usize,
    pub parse_failures: Vec<ParseFailure>,
    pub unresolved_imports: Vec<UnresolvedImport>,
}

/// One row of the destination table printed by dry runs.
#[derive(Debug, Clone, Serialize)]
pub struct UnitPlan {
    pub destination: String,
    pub kind: Option<String>,
    pub export_name: Option<String>,
    pub origin: String,
    pub statements: usize,
}

impl UnitPlan {
    pub fn of(unit: &ExportUnit) -> Self {
        Self {
            destination: unit.destination.clone(),
            kind: unit.kind.as_ref().map(|k| k.name.clone()),
            export_name: unit.export_name.clone(),
            origin: unit.origin.clone(),
            statements: unit.statements.len(),
        }
    }
}

/// The full destination table, in deterministic destination order.
pub fn plan_of(units: &UnitRegistry) -> Vec<UnitPlan> {
    units.iter().map(|(_, unit)| UnitPlan::of(unit)).collect()
}
