//! Sky regions drawn as graphic overlays

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::angle::Angle;
use crate::coord::SkyCoord;
use crate::overlay::{NAME_KEY, OverlayOptions};

/// Visual attributes of a region (`edgecolor`, `linewidth`, `facecolor`, ...)
pub type VisualStyle = Map<String, Value>;

/// Geometry of a sky region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RegionShape {
    Circle {
        center: SkyCoord,
        radius: Angle,
    },
    Ellipse {
        center: SkyCoord,
        width: Angle,
        height: Angle,
        angle: Angle,
    },
    Rectangle {
        center: SkyCoord,
        width: Angle,
        height: Angle,
        angle: Angle,
    },
    Polygon {
        vertices: Vec<SkyCoord>,
    },
    Point {
        center: SkyCoord,
    },
    Line {
        start: SkyCoord,
        end: SkyCoord,
    },
}

impl RegionShape {
    /// Region type name understood by the viewer
    pub fn type_name(&self) -> &'static str {
        match self {
            RegionShape::Circle { .. } => "circle",
            RegionShape::Ellipse { .. } => "ellipse",
            RegionShape::Rectangle { .. } => "rectangle",
            RegionShape::Polygon { .. } => "polygon",
            RegionShape::Point { .. } => "point",
            RegionShape::Line { .. } => "line",
        }
    }
}

/// A region with its visual style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub shape: RegionShape,
    #[serde(default)]
    pub visual: VisualStyle,
}

impl Region {
    pub fn new(shape: RegionShape) -> Self {
        Self {
            shape,
            visual: VisualStyle::new(),
        }
    }

    pub fn circle(center: SkyCoord, radius: Angle) -> Self {
        Self::new(RegionShape::Circle { center, radius })
    }

    pub fn polygon(vertices: Vec<SkyCoord>) -> Self {
        Self::new(RegionShape::Polygon { vertices })
    }

    pub fn point(center: SkyCoord) -> Self {
        Self::new(RegionShape::Point { center })
    }

    /// Builder-style visual attribute
    pub fn with_visual(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.visual.insert(key.into(), value.into());
        self
    }

    /// Copy of this region with overlay options folded into its visual style
    ///
    /// `name` never reaches the visual style; `color` becomes `edgecolor`.
    pub fn restyled(&self, options: &OverlayOptions) -> Self {
        let mut visual = self.visual.clone();
        for (key, value) in options.without(NAME_KEY).iter() {
            if key == "color" {
                visual.insert("edgecolor".to_string(), value.clone());
            } else {
                visual.insert(key.clone(), value.clone());
            }
        }
        Self {
            shape: self.shape.clone(),
            visual,
        }
    }

    /// Normalized description sent to the viewer
    pub fn to_info(&self) -> RegionInfo {
        let infos = match &self.shape {
            RegionShape::Circle { center, radius } => json!({
                "ra": center.ra().degrees(),
                "dec": center.dec().degrees(),
                "radius": radius.degrees(),
            }),
            RegionShape::Ellipse {
                center,
                width,
                height,
                angle,
            } => json!({
                "ra": center.ra().degrees(),
                "dec": center.dec().degrees(),
                "a": width.degrees() / 2.0,
                "b": height.degrees() / 2.0,
                "theta": angle.degrees(),
            }),
            RegionShape::Rectangle {
                center,
                width,
                height,
                angle,
            } => json!({
                "ra": center.ra().degrees(),
                "dec": center.dec().degrees(),
                "width": width.degrees(),
                "height": height.degrees(),
                "angle": angle.degrees(),
            }),
            RegionShape::Polygon { vertices } => json!({
                "vertices": {
                    "ra": vertices.iter().map(|v| v.ra().degrees()).collect::<Vec<_>>(),
                    "dec": vertices.iter().map(|v| v.dec().degrees()).collect::<Vec<_>>(),
                },
            }),
            RegionShape::Point { center } => json!({
                "ra": center.ra().degrees(),
                "dec": center.dec().degrees(),
            }),
            RegionShape::Line { start, end } => json!({
                "ra1": start.ra().degrees(),
                "dec1": start.dec().degrees(),
                "ra2": end.ra().degrees(),
                "dec2": end.dec().degrees(),
            }),
        };

        RegionInfo {
            region_type: self.shape.type_name().to_string(),
            infos: match infos {
                Value::Object(map) => map,
                _ => Map::new(),
            },
            options: visual_to_options(&self.visual),
        }
    }
}

/// Translate visual attribute names into the viewer's option names
fn visual_to_options(visual: &VisualStyle) -> Map<String, Value> {
    let mut options = Map::new();
    for (key, value) in visual {
        let option_key = match key.as_str() {
            "edgecolor" => "color",
            "linewidth" => "lineWidth",
            "facecolor" => "fillColor",
            "alpha" => "opacity",
            _ => continue,
        };
        options.insert(option_key.to_string(), value.clone());
    }
    options
}

/// Wire description of one graphic region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionInfo {
    pub region_type: String,
    pub infos: Map<String, Value>,
    pub options: Map<String, Value>,
}

impl RegionInfo {
    /// An STC-S string region
    pub fn stcs(stcs: impl Into<String>, options: &OverlayOptions) -> Self {
        let mut infos = Map::new();
        infos.insert("stcs".to_string(), Value::String(stcs.into()));
        Self {
            region_type: "stcs".to_string(),
            infos,
            options: options.as_map().clone(),
        }
    }
}
