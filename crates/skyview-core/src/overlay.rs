//! Overlay kinds, options and retained payloads

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::coord::SkyCoord;
use crate::region::{Region, RegionInfo};
use crate::table::SourceTable;

/// Option key holding an overlay's name
pub const NAME_KEY: &str = "name";

/// Raised when an overlay type string is not one of the known kinds
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid overlay type '{kind}'. Must be one of {valid:?}.")]
pub struct InvalidOverlayKind {
    pub kind: String,
    pub valid: Vec<&'static str>,
}

/// Kind of an overlay layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    Marker,
    Catalog,
    Table,
    OverlayRegion,
    OverlayStcs,
}

impl OverlayKind {
    pub const ALL: [OverlayKind; 5] = [
        OverlayKind::Marker,
        OverlayKind::Catalog,
        OverlayKind::Table,
        OverlayKind::OverlayRegion,
        OverlayKind::OverlayStcs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OverlayKind::Marker => "marker",
            OverlayKind::Catalog => "catalog",
            OverlayKind::Table => "table",
            OverlayKind::OverlayRegion => "overlay_region",
            OverlayKind::OverlayStcs => "overlay_stcs",
        }
    }
}

impl FromStr for OverlayKind {
    type Err = InvalidOverlayKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| InvalidOverlayKind {
                kind: s.to_string(),
                valid: Self::ALL.iter().map(|kind| kind.as_str()).collect(),
            })
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render options of an overlay, forwarded verbatim to the viewer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayOptions(Map<String, Value>);

impl OverlayOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str(NAME_KEY)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.0.insert(NAME_KEY.to_string(), Value::String(name.into()));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Copy of these options with `other`'s keys written over them
    pub fn merged(&self, other: &OverlayOptions) -> Self {
        let mut merged = self.0.clone();
        for (key, value) in &other.0 {
            merged.insert(key.clone(), value.clone());
        }
        Self(merged)
    }

    /// Copy of these options without `key`
    pub fn without(&self, key: &str) -> Self {
        let mut copy = self.0.clone();
        copy.remove(key);
        Self(copy)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for OverlayOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for OverlayOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// A single marker shown with a popup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Object name or "ra dec" string resolved by the viewer
    pub position: String,
    pub title: String,
    pub description: String,
}

impl Marker {
    pub fn new(
        position: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            position: position.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    /// Marker at an explicit coordinate
    pub fn at(coord: SkyCoord, title: impl Into<String>) -> Self {
        Self::new(coord.to_string(), title, "")
    }
}

/// Input retained by an overlay so it can be re-added on update
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OverlayPayload {
    Markers {
        markers: Vec<Marker>,
    },
    Catalog {
        votable_url: String,
    },
    Table {
        table: Arc<SourceTable>,
    },
    Regions {
        regions: Vec<Region>,
        regions_infos: Vec<RegionInfo>,
    },
    Stcs {
        stc_strings: Vec<String>,
        regions_infos: Vec<RegionInfo>,
    },
}

impl OverlayPayload {
    /// Kind of overlay this payload belongs to
    pub fn kind(&self) -> OverlayKind {
        match self {
            OverlayPayload::Markers { .. } => OverlayKind::Marker,
            OverlayPayload::Catalog { .. } => OverlayKind::Catalog,
            OverlayPayload::Table { .. } => OverlayKind::Table,
            OverlayPayload::Regions { .. } => OverlayKind::OverlayRegion,
            OverlayPayload::Stcs { .. } => OverlayKind::OverlayStcs,
        }
    }
}
