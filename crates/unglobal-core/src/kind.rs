//! The kind vocabulary and the export classifier.
//!
//! Kinds drive destination layout: a `controller` lands under `controllers/`,
//! a `model` under `models/`, and so on. The vocabulary is an ordered,
//! extensible list; classification scans it in declared order and the first
//! match wins, so earlier kinds take priority over later ones.

use serde::{Deserialize, Serialize};

/// One entry of the kind vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindDef {
    /// Singular kind name, lowercase (e.g. "controller").
    pub name: String,
    /// Pluralized directory name (e.g. "controllers").
    pub plural: String,
}

impl KindDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            plural: format!("{name}s"),
        }
    }

    /// Title-case form used for class-name matching (e.g. "Controller").
    pub fn title(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            None => String::new(),
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        }
    }
}

/// Ordered kind vocabulary with the classification rules.
#[derive(Debug, Clone)]
pub struct KindTable {
    kinds: Vec<KindDef>,
}

impl Default for KindTable {
    fn default() -> Self {
        Self::new(
            ["model", "serializer", "controller", "view", "mixin", "transform"]
                .into_iter()
                .map(KindDef::new)
                .collect(),
        )
    }
}

impl KindTable {
    pub fn new(kinds: Vec<KindDef>) -> Self {
        Self { kinds }
    }

    pub fn kinds(&self) -> &[KindDef] {
        &self.kinds
    }

    /// Classify an export by name, falling back to its origin path.
    ///
    /// A name matches a kind when it contains the kind's title-case word
    /// anywhere; a path matches when it contains the pluralized directory
    /// name. Name matches always win over path matches. Returns `None` for
    /// unclassified exports.
    ///
    /// The substring test inherits a documented ambiguity from the original
    /// heuristic: a name like `ModelViewer` classifies as `model` even though
    /// the kind word is not a suffix. The priority order is part of the
    /// contract, so this stays as-is.
    pub fn classify(&self, name: Option<&str>, path: &str) -> Option<&KindDef> {
        if let Some(name) = name {
            if let Some(kind) = self.kinds.iter().find(|k| name.contains(&k.title())) {
                return Some(kind);
            }
        }
        self.kinds.iter().find(|k| path.contains(&k.plural))
    }
}
