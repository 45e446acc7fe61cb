//! Source tables and the marker shapes used to draw them

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::angle::AngleUnit;

/// Column holding footprint STC-S strings
pub const S_REGION_COLUMN: &str = "s_region";

/// Shape used when none is given
pub const DEFAULT_TABLE_SHAPE: &str = "cross";

/// Position columns, in degrees; `targ_ra`/`targ_dec` are used when `ra` is absent
pub const POSITION_COLUMNS: (&str, &str) = ("ra", "dec");
pub const TARGET_POSITION_COLUMNS: (&str, &str) = ("targ_ra", "targ_dec");

/// Table-related errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TableError {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Column '{0}' has no angular unit")]
    MissingUnit(String),

    #[error("Column '{column}' has unsupported unit '{unit}'")]
    UnsupportedUnit { column: String, unit: String },

    #[error("Column '{column}' has a non-numeric value at row {row}")]
    NonNumeric { column: String, row: usize },
}

/// A named table column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(default)]
    pub unit: Option<String>,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            unit: None,
            values,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Factor converting this column's values to degrees
    pub fn degree_factor(&self) -> Result<f64, TableError> {
        let unit = self
            .unit
            .as_deref()
            .ok_or_else(|| TableError::MissingUnit(self.name.clone()))?;
        AngleUnit::parse(unit)
            .map(AngleUnit::to_degrees_factor)
            .ok_or_else(|| TableError::UnsupportedUnit {
                column: self.name.clone(),
                unit: unit.to_string(),
            })
    }
}

/// A column-oriented source table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceTable {
    pub columns: Vec<Column>,
}

impl SourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mean `(ra, dec)` in degrees over rows with a known position
    ///
    /// Reads `ra`/`dec`, or `targ_ra`/`targ_dec` when there is no `ra`
    /// column. Rows where both values are 0 have no position and are left
    /// out. Returns `None` when no row has a position.
    pub fn mean_position(&self) -> Result<Option<(f64, f64)>, TableError> {
        let (ra_name, dec_name) = if self.has_column(POSITION_COLUMNS.0) {
            POSITION_COLUMNS
        } else {
            TARGET_POSITION_COLUMNS
        };
        let ra = self.numeric_column(ra_name)?;
        let dec = self.numeric_column(dec_name)?;

        let (sum_ra, sum_dec, count) = ra
            .iter()
            .zip(&dec)
            .filter(|&(&ra, &dec)| !(ra == 0.0 && dec == 0.0))
            .fold((0.0_f64, 0.0_f64, 0usize), |(sum_ra, sum_dec, n), (ra, dec)| {
                (sum_ra + *ra, sum_dec + *dec, n + 1)
            });

        if count == 0 {
            return Ok(None);
        }
        Ok(Some((sum_ra / count as f64, sum_dec / count as f64)))
    }

    fn numeric_column(&self, name: &str) -> Result<Vec<f64>, TableError> {
        let column = self
            .column(name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))?;
        column
            .values
            .iter()
            .enumerate()
            .map(|(row, value)| {
                value.as_f64().ok_or_else(|| TableError::NonNumeric {
                    column: name.to_string(),
                    row,
                })
            })
            .collect()
    }

    fn degree_factor(&self, name: &str) -> Result<f64, TableError> {
        self.column(name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))?
            .degree_factor()
    }
}

/// How table rows are drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableShape {
    /// A named marker shape (`cross`, `square`, `circle`, ...)
    Named(String),
    /// Circles sized from a radius column
    CircleError {
        radius: String,
        default_shape: String,
    },
    /// Ellipses sized from axis and angle columns
    EllipseError {
        maj_axis: String,
        min_axis: String,
        angle: String,
        default_shape: String,
    },
}

impl Default for TableShape {
    fn default() -> Self {
        TableShape::Named(DEFAULT_TABLE_SHAPE.to_string())
    }
}

/// A table shape resolved against a table
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedShape {
    /// Marker shape name
    pub shape: String,
    /// Extra option (`circle_error` / `ellipse_error`) and its value
    pub error_option: Option<(&'static str, Value)>,
}

impl TableShape {
    pub fn named(shape: impl Into<String>) -> Self {
        TableShape::Named(shape.into())
    }

    pub fn circle_error(radius: impl Into<String>) -> Self {
        TableShape::CircleError {
            radius: radius.into(),
            default_shape: DEFAULT_TABLE_SHAPE.to_string(),
        }
    }

    pub fn ellipse_error(
        maj_axis: impl Into<String>,
        min_axis: impl Into<String>,
        angle: impl Into<String>,
    ) -> Self {
        TableShape::EllipseError {
            maj_axis: maj_axis.into(),
            min_axis: min_axis.into(),
            angle: angle.into(),
            default_shape: DEFAULT_TABLE_SHAPE.to_string(),
        }
    }

    /// Resolve column units into degree conversion factors
    pub fn resolve(&self, table: &SourceTable) -> Result<ResolvedShape, TableError> {
        match self {
            TableShape::Named(shape) => Ok(ResolvedShape {
                shape: shape.clone(),
                error_option: None,
            }),
            TableShape::CircleError {
                radius,
                default_shape,
            } => Ok(ResolvedShape {
                shape: default_shape.clone(),
                error_option: Some((
                    "circle_error",
                    json!({
                        "radius": radius,
                        "conversion_radius": table.degree_factor(radius)?,
                    }),
                )),
            }),
            TableShape::EllipseError {
                maj_axis,
                min_axis,
                angle,
                default_shape,
            } => Ok(ResolvedShape {
                shape: default_shape.clone(),
                error_option: Some((
                    "ellipse_error",
                    json!({
                        "maj_axis": maj_axis,
                        "min_axis": min_axis,
                        "angle": angle,
                        "conversion_angle": table.degree_factor(angle)?,
                        "conversion_maj_axis": table.degree_factor(maj_axis)?,
                        "conversion_min_axis": table.degree_factor(min_axis)?,
                    }),
                )),
            }),
        }
    }
}
