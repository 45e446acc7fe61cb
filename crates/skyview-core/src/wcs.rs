//! Gnomonic (TAN) world coordinate system and pixel limits
//!
//! Only the projection needed to convert viewport corners between an image
//! viewer's pixel frame and the sky is modelled here.

use glam::{DMat2, DVec2, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::angle::Angle;
use crate::coord::SkyCoord;

/// Error type for WCS operations
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WcsError {
    #[error("Singular CD matrix (determinant {0})")]
    SingularMatrix(f64),

    #[error("Coordinate {0} lies outside the projection hemisphere")]
    OutsideProjection(SkyCoord),
}

/// Result type for WCS operations
pub type WcsResult<T> = Result<T, WcsError>;

/// Minimum tangent-plane depth accepted by `world_to_pixel`
const HORIZON_EPSILON: f64 = 1e-10;

/// A TAN projection: reference coordinate, reference pixel and CD matrix
///
/// The CD matrix maps pixel offsets to intermediate world coordinates in
/// degrees, with the first axis pointing east and the second north.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TanWcs {
    crval: SkyCoord,
    crpix: DVec2,
    cd: DMat2,
}

impl TanWcs {
    /// Create a WCS from its reference values and CD matrix
    pub fn new(crval: SkyCoord, crpix: DVec2, cd: DMat2) -> WcsResult<Self> {
        let det = cd.determinant();
        if !det.is_finite() || det.abs() < f64::EPSILON * 1e-6 {
            return Err(WcsError::SingularMatrix(det));
        }
        Ok(Self { crval, crpix, cd })
    }

    /// North up, east left, square pixels of `scale`
    pub fn north_up(crval: SkyCoord, crpix: DVec2, scale: Angle) -> WcsResult<Self> {
        Self::rotated(crval, crpix, scale, Angle::ZERO)
    }

    /// East-left image rotated by `rotation` (east of north)
    pub fn rotated(
        crval: SkyCoord,
        crpix: DVec2,
        scale: Angle,
        rotation: Angle,
    ) -> WcsResult<Self> {
        let s = scale.degrees();
        let flip = DMat2::from_cols(DVec2::new(-s, 0.0), DVec2::new(0.0, s));
        let rot = DMat2::from_angle(-rotation.radians());
        Self::new(crval, crpix, rot * flip)
    }

    pub fn crval(&self) -> SkyCoord {
        self.crval
    }

    pub fn crpix(&self) -> DVec2 {
        self.crpix
    }

    pub fn cd(&self) -> DMat2 {
        self.cd
    }

    /// Mean pixel size
    pub fn pixel_scale(&self) -> Angle {
        Angle::from_degrees(self.cd.determinant().abs().sqrt())
    }

    /// Sky coordinate of a pixel position
    pub fn pixel_to_world(&self, pixel: DVec2) -> SkyCoord {
        let standard = self.cd * (pixel - self.crpix);
        let local = DVec3::new(1.0, standard.x.to_radians(), standard.y.to_radians());
        SkyCoord::from_unit_vector(self.crval.offset_frame() * local)
    }

    /// Pixel position of a sky coordinate
    pub fn world_to_pixel(&self, coord: &SkyCoord) -> WcsResult<DVec2> {
        let local = self.crval.offset_frame().transpose() * coord.to_unit_vector();
        if local.x <= HORIZON_EPSILON {
            return Err(WcsError::OutsideProjection(*coord));
        }
        let standard = DVec2::new(
            (local.y / local.x).to_degrees(),
            (local.z / local.x).to_degrees(),
        );
        Ok(self.cd.inverse() * standard + self.crpix)
    }

    /// Position angle of the pixel +y axis at `pixel`, measured from north
    /// through east
    pub fn y_axis_position_angle(&self, pixel: DVec2) -> WcsResult<Angle> {
        let world = self.pixel_to_world(pixel);
        let step = self.pixel_scale();

        let north = world.spherical_offsets_by(Angle::ZERO, step);
        let east = world.spherical_offsets_by(step, Angle::ZERO);
        let north_dir = (self.world_to_pixel(&north)? - pixel).normalize();
        let east_dir = (self.world_to_pixel(&east)? - pixel).normalize();

        let angle = Angle::from_radians(east_dir.y.atan2(north_dir.y));
        Ok(angle.wrap_360())
    }
}

/// Pixel box displayed by an image viewer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelLimits {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl PixelLimits {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Bounding box of a set of pixel positions
    pub fn from_points(points: impl IntoIterator<Item = DVec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self::new(min.x, max.x, min.y, max.y))
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    pub fn lower_left(&self) -> DVec2 {
        DVec2::new(self.x_min, self.y_min)
    }

    pub fn lower_right(&self) -> DVec2 {
        DVec2::new(self.x_max, self.y_min)
    }

    pub fn upper_left(&self) -> DVec2 {
        DVec2::new(self.x_min, self.y_max)
    }

    pub fn upper_right(&self) -> DVec2 {
        DVec2::new(self.x_max, self.y_max)
    }

    pub fn corners(&self) -> [DVec2; 4] {
        [
            self.lower_left(),
            self.lower_right(),
            self.upper_left(),
            self.upper_right(),
        ]
    }

    /// Same center, both spans multiplied by `factor`
    pub fn scaled_about_center(&self, factor: f64) -> Self {
        let center = self.center();
        let half = DVec2::new(self.width(), self.height()) * factor / 2.0;
        Self::new(
            center.x - half.x,
            center.x + half.x,
            center.y - half.y,
            center.y + half.y,
        )
    }

    /// Same spans, moved to a new center
    pub fn recentred(&self, center: DVec2) -> Self {
        let shift = center - self.center();
        Self::new(
            self.x_min + shift.x,
            self.x_max + shift.x,
            self.y_min + shift.y,
            self.y_max + shift.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cartwheel_wcs() -> TanWcs {
        let crval = SkyCoord::new(9.4213055, -33.71625419).unwrap();
        TanWcs::north_up(crval, DVec2::new(500.0, 500.0), Angle::from_arcsec(0.5)).unwrap()
    }

    #[test]
    fn test_reference_pixel_maps_to_crval() {
        let wcs = cartwheel_wcs();
        let world = wcs.pixel_to_world(DVec2::new(500.0, 500.0));
        assert_relative_eq!(world.ra().degrees(), 9.4213055, epsilon = 1e-9);
        assert_relative_eq!(world.dec().degrees(), -33.71625419, epsilon = 1e-9);
    }

    #[test]
    fn test_pixel_world_round_trip() {
        let wcs = cartwheel_wcs();
        let pixel = DVec2::new(123.4, 876.5);
        let back = wcs.world_to_pixel(&wcs.pixel_to_world(pixel)).unwrap();
        assert_relative_eq!(back.x, pixel.x, epsilon = 1e-6);
        assert_relative_eq!(back.y, pixel.y, epsilon = 1e-6);
    }

    #[test]
    fn test_east_is_left() {
        let wcs = cartwheel_wcs();
        let left = wcs.pixel_to_world(DVec2::new(400.0, 500.0));
        assert!(left.ra().degrees() > wcs.crval().ra().degrees());
    }

    #[test]
    fn test_opposite_hemisphere_is_rejected() {
        let wcs = cartwheel_wcs();
        let antipode = SkyCoord::new(189.4213055, 33.71625419).unwrap();
        assert!(matches!(
            wcs.world_to_pixel(&antipode),
            Err(WcsError::OutsideProjection(_))
        ));
    }

    #[test]
    fn test_singular_matrix_is_rejected() {
        let crval = SkyCoord::new(0.0, 0.0).unwrap();
        let result = TanWcs::new(crval, DVec2::ZERO, DMat2::ZERO);
        assert!(matches!(result, Err(WcsError::SingularMatrix(_))));
    }

    #[test]
    fn test_y_axis_position_angle() {
        let wcs = cartwheel_wcs();
        let angle = wcs.y_axis_position_angle(DVec2::new(500.0, 500.0)).unwrap();
        assert!(angle.degrees() < 1e-6 || angle.degrees() > 360.0 - 1e-6);

        let crval = SkyCoord::new(150.0, 2.0).unwrap();
        let rotated = TanWcs::rotated(
            crval,
            DVec2::new(50.0, 50.0),
            Angle::from_arcsec(1.0),
            Angle::from_degrees(30.0),
        )
        .unwrap();
        let angle = rotated.y_axis_position_angle(DVec2::new(50.0, 50.0)).unwrap();
        assert_relative_eq!(angle.degrees(), 30.0, epsilon = 1e-4);
    }

    #[test]
    fn test_limits_geometry() {
        let limits = PixelLimits::new(0.0, 100.0, 0.0, 50.0);
        assert_eq!(limits.center(), DVec2::new(50.0, 25.0));

        let scaled = limits.scaled_about_center(2.0);
        assert_eq!(scaled, PixelLimits::new(-50.0, 150.0, -25.0, 75.0));

        let moved = limits.recentred(DVec2::new(10.0, 10.0));
        assert_eq!(moved, PixelLimits::new(-40.0, 60.0, -15.0, 35.0));
    }

    #[test]
    fn test_limits_from_points() {
        let limits = PixelLimits::from_points([
            DVec2::new(3.0, -1.0),
            DVec2::new(-2.0, 4.0),
            DVec2::new(1.0, 1.0),
        ])
        .unwrap();
        assert_eq!(limits, PixelLimits::new(-2.0, 3.0, -1.0, 4.0));
        assert!(PixelLimits::from_points([]).is_none());
    }
}
