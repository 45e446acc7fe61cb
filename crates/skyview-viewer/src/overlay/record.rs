//! Overlay records and removal targets

use skyview_core::{OverlayKind, OverlayOptions, OverlayPayload};

use super::OverlayResult;
use crate::viewer::SkyViewer;

/// Description of an overlay to register
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayInfo {
    /// Kind name, checked against [`OverlayKind`] on registration
    pub kind: String,
    /// Options; must contain the resolved `name`
    pub options: OverlayOptions,
    pub payload: OverlayPayload,
}

impl OverlayInfo {
    pub fn new(kind: impl Into<String>, options: OverlayOptions, payload: OverlayPayload) -> Self {
        Self {
            kind: kind.into(),
            options,
            payload,
        }
    }
}

/// A registered overlay layer
///
/// The payload is the input the layer was created from, kept so that an
/// update can re-issue the full add command. Records are never edited in
/// place: [`OverlayRecord::update`] consumes the record and returns its
/// replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayRecord {
    kind: OverlayKind,
    name: String,
    options: OverlayOptions,
    payload: OverlayPayload,
}

impl OverlayRecord {
    pub(crate) fn new(
        kind: OverlayKind,
        name: String,
        options: OverlayOptions,
        payload: OverlayPayload,
    ) -> Self {
        Self {
            kind,
            name,
            options,
            payload,
        }
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Options the layer was added with, `name` included
    pub fn options(&self) -> &OverlayOptions {
        &self.options
    }

    pub fn payload(&self) -> &OverlayPayload {
        &self.payload
    }

    pub(crate) fn into_parts(self) -> (OverlayOptions, OverlayPayload) {
        (self.options, self.payload)
    }

    /// Replace this layer with one carrying `new_options` merged over its own
    ///
    /// Equivalent to removing the layer and adding it again; the new name may
    /// be suffixed if the requested one is taken.
    pub fn update(
        self,
        viewer: &mut SkyViewer,
        new_options: OverlayOptions,
    ) -> OverlayResult<OverlayRecord> {
        viewer.update_overlay(self, new_options)
    }
}

/// One overlay to remove, by name or by record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayTarget(String);

impl OverlayTarget {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OverlayTarget {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for OverlayTarget {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&String> for OverlayTarget {
    fn from(name: &String) -> Self {
        Self(name.clone())
    }
}

impl From<&OverlayRecord> for OverlayTarget {
    fn from(record: &OverlayRecord) -> Self {
        Self(record.name.clone())
    }
}

/// Overlays to remove in one batch, in caller order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayTargets(Vec<String>);

impl OverlayTargets {
    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn into_names(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for OverlayTargets {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for OverlayTargets {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<&OverlayRecord> for OverlayTargets {
    fn from(record: &OverlayRecord) -> Self {
        Self(vec![record.name.clone()])
    }
}

impl<T: Into<OverlayTarget>> From<Vec<T>> for OverlayTargets {
    fn from(targets: Vec<T>) -> Self {
        targets.into_iter().collect()
    }
}

impl<T: Into<OverlayTarget>, const N: usize> From<[T; N]> for OverlayTargets {
    fn from(targets: [T; N]) -> Self {
        targets.into_iter().collect()
    }
}

impl<T: Into<OverlayTarget>> FromIterator<T> for OverlayTargets {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(|t| t.into().0).collect())
    }
}
