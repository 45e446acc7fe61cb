//! Registry of the overlay layers of one viewer

use std::fmt;

use skyview_core::{NAME_KEY, OverlayKind, OverlayOptions};
use tracing::warn;

use super::record::{OverlayInfo, OverlayRecord};
use super::{OverlayError, OverlayResult};

/// A requested overlay name that was already taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCollision {
    pub requested: String,
    pub resolved: String,
}

impl fmt::Display for NameCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Overlay name `{}` is already in use. Name `{}` will be used instead.",
            self.requested, self.resolved
        )
    }
}

/// Ordered mapping from overlay name to record
///
/// Iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct OverlayRegistry {
    records: Vec<OverlayRecord>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// First free name among `name`, `name_1`, `name_2`, ...
    pub fn make_unique_name(&self, name: &str) -> String {
        let mut unique = name.to_string();
        let mut i = 1;
        while self.contains(&unique) {
            unique = format!("{name}_{i}");
            i += 1;
        }
        unique
    }

    /// Resolve the overlay name and write it back into the options
    ///
    /// Must run before the overlay is built or sent to a viewer, so both
    /// sides agree on the active name.
    pub fn common_overlay_handling(
        &self,
        mut options: OverlayOptions,
        default_name: &str,
    ) -> (OverlayOptions, Option<NameCollision>) {
        let requested = options.name().unwrap_or(default_name).to_string();
        let resolved = self.make_unique_name(&requested);
        options.set_name(resolved.clone());

        let collision = (resolved != requested).then(|| {
            let collision = NameCollision {
                requested,
                resolved,
            };
            warn!("{}", collision);
            collision
        });

        (options, collision)
    }

    /// Register an overlay described by `info`
    pub fn add_overlay(&mut self, info: OverlayInfo) -> OverlayResult<OverlayRecord> {
        let kind: OverlayKind = info.kind.parse()?;
        if info.payload.kind() != kind {
            return Err(OverlayError::PayloadMismatch {
                kind,
                payload: info.payload.kind(),
            });
        }

        let name = info
            .options
            .name()
            .ok_or(OverlayError::MissingName)?
            .to_string();
        if self.contains(&name) {
            return Err(OverlayError::DuplicateName(name));
        }

        let record = OverlayRecord::new(kind, name, info.options, info.payload);
        self.records.push(record.clone());
        Ok(record)
    }

    /// Remove and return the record registered under `name`
    pub fn pop(&mut self, name: &str) -> OverlayResult<OverlayRecord> {
        let pos = self
            .records
            .iter()
            .position(|r| r.name() == name)
            .ok_or_else(|| OverlayError::NotFound(name.to_string()))?;
        Ok(self.records.remove(pos))
    }

    pub fn get(&self, name: &str) -> Option<&OverlayRecord> {
        self.records.iter().find(|r| r.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.name() == name)
    }

    /// Registered names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(OverlayRecord::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverlayRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyview_core::{Marker, OverlayPayload};

    fn marker_info(name: &str) -> OverlayInfo {
        OverlayInfo::new(
            "marker",
            OverlayOptions::new().with(NAME_KEY, name),
            OverlayPayload::Markers {
                markers: vec![Marker::new("M31", "M31", "Andromeda")],
            },
        )
    }

    #[test]
    fn test_make_unique_name() {
        let mut registry = OverlayRegistry::new();
        assert_eq!(registry.make_unique_name("test"), "test");

        registry.add_overlay(marker_info("test")).unwrap();
        assert_eq!(registry.make_unique_name("test"), "test_1");

        registry.add_overlay(marker_info("test_1")).unwrap();
        registry.add_overlay(marker_info("test_2")).unwrap();
        assert_eq!(registry.make_unique_name("test"), "test_3");

        // pure: nothing was registered
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_smallest_free_suffix() {
        let mut registry = OverlayRegistry::new();
        registry.add_overlay(marker_info("test")).unwrap();
        registry.add_overlay(marker_info("test_2")).unwrap();
        assert_eq!(registry.make_unique_name("test"), "test_1");
    }

    #[test]
    fn test_common_overlay_handling() {
        let mut registry = OverlayRegistry::new();

        let (options, collision) =
            registry.common_overlay_handling(OverlayOptions::new(), "catalog_python");
        assert_eq!(options.name(), Some("catalog_python"));
        assert!(collision.is_none());

        registry
            .add_overlay(OverlayInfo::new(
                "catalog",
                options,
                OverlayPayload::Catalog {
                    votable_url: "https://example.org/cat.xml".to_string(),
                },
            ))
            .unwrap();

        let (options, collision) =
            registry.common_overlay_handling(OverlayOptions::new(), "catalog_python");
        assert_eq!(options.name(), Some("catalog_python_1"));
        let collision = collision.unwrap();
        assert_eq!(collision.requested, "catalog_python");
        assert_eq!(collision.resolved, "catalog_python_1");
        assert!(collision.to_string().contains("catalog_python_1"));
    }

    #[test]
    fn test_add_overlay_rejects_unknown_kind() {
        let mut registry = OverlayRegistry::new();
        let mut info = marker_info("test");
        info.kind = "moc".to_string();

        let err = registry.add_overlay(info).unwrap_err();
        assert!(matches!(err, OverlayError::InvalidKind(_)));
        let message = err.to_string();
        assert!(message.contains("'moc'"));
        assert!(message.contains("overlay_stcs"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_add_overlay_checks_payload_and_name() {
        let mut registry = OverlayRegistry::new();

        let mut info = marker_info("test");
        info.kind = "catalog".to_string();
        assert!(matches!(
            registry.add_overlay(info),
            Err(OverlayError::PayloadMismatch { .. })
        ));

        let mut info = marker_info("test");
        info.options = OverlayOptions::new();
        assert_eq!(registry.add_overlay(info), Err(OverlayError::MissingName));

        registry.add_overlay(marker_info("test")).unwrap();
        assert_eq!(
            registry.add_overlay(marker_info("test")),
            Err(OverlayError::DuplicateName("test".to_string()))
        );
    }

    #[test]
    fn test_pop_and_order() {
        let mut registry = OverlayRegistry::new();
        for name in ["c", "a", "b"] {
            registry.add_overlay(marker_info(name)).unwrap();
        }
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["c", "a", "b"]);

        let record = registry.pop("a").unwrap();
        assert_eq!(record.name(), "a");
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["c", "b"]);

        assert_eq!(
            registry.pop("a"),
            Err(OverlayError::NotFound("a".to_string()))
        );
    }
}
