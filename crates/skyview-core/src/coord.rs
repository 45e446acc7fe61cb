//! Sky coordinates (ICRS, degrees)

use std::fmt;

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::angle::Angle;

/// Error type for coordinate construction
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoordError {
    #[error("Coordinate values must be finite: ra={ra}, dec={dec}")]
    NonFinite { ra: f64, dec: f64 },

    #[error("Declination out of range [-90, 90]: {0}")]
    DeclinationOutOfRange(f64),
}

#[derive(Deserialize)]
struct RawSkyCoord {
    ra: f64,
    dec: f64,
}

/// A position on the sky
///
/// `ra` is kept in [0, 360) and `dec` in [-90, 90], both in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSkyCoord")]
pub struct SkyCoord {
    ra: f64,
    dec: f64,
}

impl TryFrom<RawSkyCoord> for SkyCoord {
    type Error = CoordError;

    fn try_from(raw: RawSkyCoord) -> Result<Self, Self::Error> {
        SkyCoord::new(raw.ra, raw.dec)
    }
}

impl SkyCoord {
    /// Create a coordinate from right ascension and declination in degrees
    pub fn new(ra: f64, dec: f64) -> Result<Self, CoordError> {
        if !ra.is_finite() || !dec.is_finite() {
            return Err(CoordError::NonFinite { ra, dec });
        }
        if !(-90.0..=90.0).contains(&dec) {
            return Err(CoordError::DeclinationOutOfRange(dec));
        }
        Ok(Self {
            ra: Angle::from_degrees(ra).wrap_360().degrees(),
            dec,
        })
    }

    /// Create a coordinate from angles
    pub fn from_angles(ra: Angle, dec: Angle) -> Result<Self, CoordError> {
        Self::new(ra.degrees(), dec.degrees())
    }

    pub fn ra(&self) -> Angle {
        Angle::from_degrees(self.ra)
    }

    pub fn dec(&self) -> Angle {
        Angle::from_degrees(self.dec)
    }

    /// Unit vector pointing at this coordinate
    pub fn to_unit_vector(&self) -> DVec3 {
        let (sin_ra, cos_ra) = self.ra.to_radians().sin_cos();
        let (sin_dec, cos_dec) = self.dec.to_radians().sin_cos();
        DVec3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec)
    }

    /// Coordinate pointed at by a (not necessarily normalized) vector
    pub fn from_unit_vector(v: DVec3) -> Self {
        let v = v.normalize();
        let dec = v.z.clamp(-1.0, 1.0).asin().to_degrees();
        let ra = v.y.atan2(v.x).to_degrees();
        Self {
            ra: Angle::from_degrees(ra).wrap_360().degrees(),
            dec,
        }
    }

    /// Rotation from the offset frame centred on this coordinate to ICRS
    ///
    /// In the offset frame this coordinate is +x, east is +y and north is +z.
    pub fn offset_frame(&self) -> DMat3 {
        DMat3::from_rotation_z(self.ra.to_radians()) * DMat3::from_rotation_y(-self.dec.to_radians())
    }

    /// Great-circle separation (Vincenty formula)
    pub fn separation(&self, other: &SkyCoord) -> Angle {
        let (sin_dlon, cos_dlon) = (other.ra - self.ra).to_radians().sin_cos();
        let (sin_d1, cos_d1) = self.dec.to_radians().sin_cos();
        let (sin_d2, cos_d2) = other.dec.to_radians().sin_cos();

        let num1 = cos_d2 * sin_dlon;
        let num2 = cos_d1 * sin_d2 - sin_d1 * cos_d2 * cos_dlon;
        let denominator = sin_d1 * sin_d2 + cos_d1 * cos_d2 * cos_dlon;

        Angle::from_radians(num1.hypot(num2).atan2(denominator))
    }

    /// The point at longitude `dlon` and latitude `dlat` of the offset frame
    /// centred on this coordinate
    pub fn spherical_offsets_by(&self, dlon: Angle, dlat: Angle) -> SkyCoord {
        let (sin_lon, cos_lon) = dlon.radians().sin_cos();
        let (sin_lat, cos_lat) = dlat.radians().sin_cos();
        let local = DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);
        SkyCoord::from_unit_vector(self.offset_frame() * local)
    }
}

impl fmt::Display for SkyCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} {:+.6}", self.ra, self.dec)
    }
}
