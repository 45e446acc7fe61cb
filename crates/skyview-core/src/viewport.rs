//! Viewport state: center, field of view and rotation of a view

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::angle::Angle;
use crate::coord::{CoordError, SkyCoord};
use crate::wcs::WcsError;

/// Error type for viewport operations
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ViewportError {
    #[error("Invalid center: {0}")]
    InvalidCenter(#[from] CoordError),

    #[error("`fov` must be a positive, finite angle. Received fov={0}")]
    InvalidFov(Angle),

    #[error("`rotation` must be a finite angle. Received rotation={0}")]
    InvalidRotation(Angle),

    #[error("Unknown coordinate frame '{0}', expected 'sky' or 'pixel'")]
    UnknownFrame(String),

    #[error("{0}")]
    Unsupported(String),

    #[error("Field of view is not available yet: {0}")]
    FovUnavailable(String),

    #[error("Projection failed: {0}")]
    Projection(#[from] WcsError),
}

/// Result type for viewport operations
pub type ViewportResult<T> = Result<T, ViewportError>;

/// Frame in which a viewport is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateFrame {
    #[default]
    Sky,
    Pixel,
}

impl FromStr for CoordinateFrame {
    type Err = ViewportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sky" => Ok(Self::Sky),
            "pixel" => Ok(Self::Pixel),
            other => Err(ViewportError::UnknownFrame(other.to_string())),
        }
    }
}

/// Field of view along each viewport axis, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FovXY {
    pub x: f64,
    pub y: f64,
}

impl FovXY {
    pub fn new(x: Angle, y: Angle) -> Self {
        Self {
            x: x.degrees(),
            y: y.degrees(),
        }
    }

    pub fn x(&self) -> Angle {
        Angle::from_degrees(self.x)
    }

    pub fn y(&self) -> Angle {
        Angle::from_degrees(self.y)
    }

    /// Span of the shorter viewport axis
    pub fn shorter(&self) -> Angle {
        Angle::from_degrees(self.x.min(self.y))
    }

    /// Height over width
    pub fn aspect(&self) -> f64 {
        self.y / self.x
    }

    /// Factor that pins `desired` onto the shorter axis
    ///
    /// Fails with [`ViewportError::FovUnavailable`] when the shorter axis is
    /// not a positive, finite span, since no factor can rescale it.
    pub fn scale_factor_for(&self, desired: Angle) -> ViewportResult<f64> {
        let shorter = self.shorter().degrees();
        if !(shorter.is_finite() && shorter > 0.0) {
            return Err(ViewportError::FovUnavailable(format!(
                "cannot rescale a view whose axes span {} x {} degrees",
                self.x, self.y
            )));
        }
        Ok(desired.degrees() / shorter)
    }

    /// Both axes multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

/// The visible window of a viewer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// Center of the view
    pub center: SkyCoord,
    /// Span of the shorter viewport axis
    pub fov: Angle,
    /// Angle between viewport "up" and north, east of north
    pub rotation: Option<Angle>,
}

impl ViewportState {
    pub fn new(center: SkyCoord, fov: Angle, rotation: Option<Angle>) -> ViewportResult<Self> {
        validate_fov(fov)?;
        if let Some(rotation) = rotation {
            validate_rotation(rotation)?;
        }
        Ok(Self {
            center,
            fov,
            rotation,
        })
    }
}

/// A partial viewport change; `None` leaves that dimension unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportUpdate {
    pub center: Option<SkyCoord>,
    pub fov: Option<Angle>,
    pub rotation: Option<Angle>,
    /// Only meaningful for viewers that hold several images
    pub image_label: Option<String>,
}

impl ViewportUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_center(mut self, center: SkyCoord) -> Self {
        self.center = Some(center);
        self
    }

    /// Set the fov; a plain float is read as degrees
    pub fn with_fov(mut self, fov: impl Into<Angle>) -> Self {
        self.fov = Some(fov.into());
        self
    }

    /// Set the rotation; a plain float is read as degrees
    pub fn with_rotation(mut self, rotation: impl Into<Angle>) -> Self {
        self.rotation = Some(rotation.into());
        self
    }

    pub fn with_image_label(mut self, label: impl Into<String>) -> Self {
        self.image_label = Some(label.into());
        self
    }

    /// True when no viewport dimension would change
    pub fn is_empty(&self) -> bool {
        self.center.is_none() && self.fov.is_none() && self.rotation.is_none()
    }

    /// Check every supplied value before anything is applied
    pub fn validate(&self) -> ViewportResult<()> {
        if let Some(center) = self.center {
            SkyCoord::new(center.ra().degrees(), center.dec().degrees())?;
        }
        if let Some(fov) = self.fov {
            validate_fov(fov)?;
        }
        if let Some(rotation) = self.rotation {
            validate_rotation(rotation)?;
        }
        Ok(())
    }
}

impl From<ViewportState> for ViewportUpdate {
    fn from(state: ViewportState) -> Self {
        Self {
            center: Some(state.center),
            fov: Some(state.fov),
            rotation: state.rotation,
            image_label: None,
        }
    }
}

fn validate_fov(fov: Angle) -> ViewportResult<()> {
    if fov.is_finite() && fov.degrees() > 0.0 {
        Ok(())
    } else {
        Err(ViewportError::InvalidFov(fov))
    }
}

fn validate_rotation(rotation: Angle) -> ViewportResult<()> {
    if rotation.is_finite() {
        Ok(())
    } else {
        Err(ViewportError::InvalidRotation(rotation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scale_factor_pins_shorter_axis() {
        let fov = FovXY { x: 60.0, y: 40.0 };
        let factor = fov.scale_factor_for(Angle::from_degrees(45.0)).unwrap();
        assert_relative_eq!(factor, 1.125);

        let scaled = fov.scaled(factor);
        assert_relative_eq!(scaled.x, 67.5);
        assert_relative_eq!(scaled.y, 45.0);
        assert_relative_eq!(scaled.shorter().degrees(), 45.0);
    }

    #[test]
    fn test_scale_factor_portrait() {
        let fov = FovXY { x: 10.0, y: 30.0 };
        let scaled = fov.scaled(fov.scale_factor_for(Angle::from_degrees(2.0)).unwrap());
        assert_relative_eq!(scaled.shorter().degrees(), 2.0);
        assert_relative_eq!(scaled.aspect(), 3.0);
    }

    #[test]
    fn test_scale_factor_needs_positive_axes() {
        let desired = Angle::from_degrees(2.0);
        for fov in [
            FovXY { x: 0.0, y: 10.0 },
            FovXY { x: 10.0, y: -1.0 },
            FovXY { x: f64::NAN, y: 10.0 },
            FovXY { x: f64::INFINITY, y: f64::INFINITY },
        ] {
            assert!(matches!(
                fov.scale_factor_for(desired),
                Err(ViewportError::FovUnavailable(_))
            ));
        }
    }

    #[test]
    fn test_update_validation() {
        assert!(ViewportUpdate::new().with_fov(1.5).validate().is_ok());
        assert!(matches!(
            ViewportUpdate::new().with_fov(-1.0).validate(),
            Err(ViewportError::InvalidFov(_))
        ));
        assert!(matches!(
            ViewportUpdate::new().with_fov(0.0).validate(),
            Err(ViewportError::InvalidFov(_))
        ));
        assert!(matches!(
            ViewportUpdate::new().with_rotation(f64::INFINITY).validate(),
            Err(ViewportError::InvalidRotation(_))
        ));
    }

    #[test]
    fn test_state_requires_positive_fov() {
        let center = SkyCoord::new(10.0, 10.0).unwrap();
        assert!(ViewportState::new(center, Angle::from_degrees(1.0), None).is_ok());
        assert!(ViewportState::new(center, Angle::ZERO, None).is_err());
    }

    #[test]
    fn test_frame_parse() {
        assert_eq!("sky".parse::<CoordinateFrame>().unwrap(), CoordinateFrame::Sky);
        assert_eq!(
            "pixel".parse::<CoordinateFrame>().unwrap(),
            CoordinateFrame::Pixel
        );
        assert!(matches!(
            "galactic".parse::<CoordinateFrame>(),
            Err(ViewportError::UnknownFrame(_))
        ));
    }

    #[test]
    fn test_update_from_state() {
        let center = SkyCoord::new(10.0, 10.0).unwrap();
        let state = ViewportState::new(center, Angle::from_degrees(2.0), None).unwrap();
        let update = ViewportUpdate::from(state);
        assert_eq!(update.center, Some(center));
        assert_eq!(update.fov, Some(Angle::from_degrees(2.0)));
        assert!(update.rotation.is_none());
    }
}
