//! Destination path computation and the collision policy.

use tracing::debug;

use crate::error::CoreError;
use crate::kind::KindDef;
use crate::naming::{kebab_case, kebab_path};
use crate::registry::UnitRegistry;

/// Computes destination paths for export units.
#[derive(Debug, Clone)]
pub struct PathResolver {
    extension: String,
}

impl PathResolver {
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.to_string(),
        }
    }

    /// Compute the natural destination for an export, before collision
    /// handling.
    ///
    /// Classified units land at `<plural>/<kebab-name>.<ext>`, dropping a
    /// trailing kebab segment that equals the kind name
    /// (`WithMixinController` -> `controllers/with-mixin.js`). Unclassified
    /// units keep their origin path, segment-normalized.
    pub fn destination_for(
        &self,
        export_name: Option<&str>,
        kind: Option<&KindDef>,
        origin: &str,
    ) -> String {
        let (kind, name) = match (kind, export_name) {
            (Some(kind), Some(name)) => (kind, name),
            _ => return kebab_path(origin),
        };
        let kebab = kebab_case(name);
        let mut segments: Vec<&str> = kebab.split('-').collect();
        if segments.len() > 1 && segments.last() == Some(&kind.name.as_str()) {
            segments.pop();
        }
        format!("{}/{}.{}", kind.plural, segments.join("-"), self.extension)
    }

    /// Compute a destination and apply the ordered collision fallbacks
    /// against the unit registry.
    ///
    /// A collision only triggers fallbacks when the claim carries an export
    /// name; a nameless claim mapping onto an existing destination is how
    /// free statements join an existing unit. Fallback order: unclassified
    /// claims retry next to their origin file under the export's kebab name,
    /// then any claim retries with a `-x` suffix, then the collision is
    /// fatal rather than overwriting either unit.
    pub fn resolve(
        &self,
        export_name: Option<&str>,
        kind: Option<&KindDef>,
        origin: &str,
        registry: &UnitRegistry,
    ) -> Result<String, CoreError> {
        let mut destination = self.destination_for(export_name, kind, origin);
        let name = match export_name {
            Some(name) if registry.contains(&destination) => name,
            _ => return Ok(destination),
        };

        if kind.is_none() {
            let normalized = kebab_path(origin);
            let dir = match normalized.rsplit_once('/') {
                Some((dir, _)) => format!("{dir}/"),
                None => String::new(),
            };
            destination = format!("{dir}{}.{}", kebab_case(name), self.extension);
            debug!(name, destination, "collision fallback: origin-relative path");
        }
        if registry.contains(&destination) {
            destination = match destination.rsplit_once('.') {
                Some((stem, ext)) => format!("{stem}-x.{ext}"),
                None => format!("{destination}-x"),
            };
            debug!(name, destination, "collision fallback: -x suffix");
        }
        if registry.contains(&destination) {
            return Err(CoreError::DestinationCollision {
                name: name.to_string(),
                destination,
            });
        }
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ExportUnit;

    fn resolver() -> PathResolver {
        PathResolver::new("js")
    }

    fn kind(name: &str) -> KindDef {
        KindDef::new(name)
    }

    fn occupy(registry: &mut UnitRegistry, destination: &str) {
        registry.insert(ExportUnit {
            kind: None,
            export_name: None,
            destination: destination.to_string(),
            origin: "origin.js".to_string(),
            statements: vec![],
        });
    }

    #[test]
    fn classified_destination() {
        let dest = resolver().destination_for(Some("CommentActivity"), Some(&kind("model")), "models/ca.js");
        assert_eq!(dest, "models/comment-activity.js");
    }

    #[test]
    fn trailing_kind_segment_is_dropped() {
        let dest =
            resolver().destination_for(Some("WithMixinController"), Some(&kind("controller")), "x.js");
        assert_eq!(dest, "controllers/with-mixin.js");

        // Only a whole trailing segment drops, and only when something is left.
        let dest = resolver().destination_for(Some("Controller"), Some(&kind("controller")), "x.js");
        assert_eq!(dest, "controllers/controller.js");
    }

    #[test]
    fn unclassified_keeps_normalized_origin() {
        let dest = resolver().destination_for(Some("Router"), None, "router.js");
        assert_eq!(dest, "router.js");
        let dest = resolver().destination_for(None, None, "lib/some_helpers.js");
        assert_eq!(dest, "lib/some-helpers.js");
    }

    #[test]
    fn nameless_claim_joins_existing_destination() {
        let mut registry = UnitRegistry::new();
        occupy(&mut registry, "router.js");
        let dest = resolver().resolve(None, None, "router.js", &registry).unwrap();
        assert_eq!(dest, "router.js");
    }

    #[test]
    fn unclassified_collision_falls_back_to_origin_dir() {
        let mut registry = UnitRegistry::new();
        occupy(&mut registry, "lib/stuff.js");
        let dest = resolver()
            .resolve(Some("SecondThing"), None, "lib/stuff.js", &registry)
            .unwrap();
        assert_eq!(dest, "lib/second-thing.js");
    }

    #[test]
    fn same_kebab_name_gets_suffix() {
        let mut registry = UnitRegistry::new();
        // "DupName" and "dupName" both kebab-case to models/dup-name.js.
        occupy(&mut registry, "models/dup-name.js");
        let dest = resolver()
            .resolve(Some("dupName"), Some(&kind("model")), "models/d.js", &registry)
            .unwrap();
        assert_eq!(dest, "models/dup-name-x.js");
    }

    #[test]
    fn exhausted_fallbacks_are_fatal() {
        let mut registry = UnitRegistry::new();
        occupy(&mut registry, "models/dup-name.js");
        occupy(&mut registry, "models/dup-name-x.js");
        let err = resolver()
            .resolve(Some("DupName"), Some(&kind("model")), "models/d.js", &registry)
            .unwrap_err();
        match err {
            CoreError::DestinationCollision { name, destination } => {
                assert_eq!(name, "DupName");
                assert_eq!(destination, "models/dup-name-x.js");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
