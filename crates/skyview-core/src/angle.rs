//! Angles and angular units

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// An angle, stored in degrees
///
/// A unit-less `f64` converts into an `Angle` as degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    /// Create an angle from degrees
    pub const fn from_degrees(degrees: f64) -> Self {
        Self(degrees)
    }

    /// Create an angle from radians
    pub fn from_radians(radians: f64) -> Self {
        Self(radians.to_degrees())
    }

    /// Create an angle from arcminutes
    pub fn from_arcmin(arcmin: f64) -> Self {
        Self(arcmin / 60.0)
    }

    /// Create an angle from arcseconds
    pub fn from_arcsec(arcsec: f64) -> Self {
        Self(arcsec / 3600.0)
    }

    /// Value in degrees
    pub const fn degrees(self) -> f64 {
        self.0
    }

    /// Value in radians
    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Wrap into [0, 360)
    pub fn wrap_360(self) -> Self {
        let wrapped = self.0.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        Self(if wrapped >= 360.0 { 0.0 } else { wrapped })
    }

    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }
}

impl From<f64> for Angle {
    fn from(degrees: f64) -> Self {
        Self(degrees)
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0)
    }
}

impl Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

impl Mul<f64> for Angle {
    type Output = Angle;

    fn mul(self, rhs: f64) -> Angle {
        Angle(self.0 * rhs)
    }
}

impl Div<f64> for Angle {
    type Output = Angle;

    fn div(self, rhs: f64) -> Angle {
        Angle(self.0 / rhs)
    }
}

/// Ratio of two angles
impl Div for Angle {
    type Output = f64;

    fn div(self, rhs: Angle) -> f64 {
        self.0 / rhs.0
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} deg", self.0)
    }
}

/// Angular units found on table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngleUnit {
    Degree,
    Radian,
    Arcminute,
    Arcsecond,
    Milliarcsecond,
}

impl AngleUnit {
    /// Parse a unit string such as `"deg"`, `"arcsec"` or `"mas"`
    pub fn parse(unit: &str) -> Option<Self> {
        match unit.trim() {
            "deg" | "degree" | "degrees" => Some(Self::Degree),
            "rad" | "radian" | "radians" => Some(Self::Radian),
            "arcmin" | "arcminute" | "arcminutes" => Some(Self::Arcminute),
            "arcsec" | "arcsecond" | "arcseconds" => Some(Self::Arcsecond),
            "mas" | "milliarcsecond" | "milliarcseconds" => Some(Self::Milliarcsecond),
            _ => None,
        }
    }

    /// Factor converting a value in this unit to degrees
    pub fn to_degrees_factor(self) -> f64 {
        match self {
            Self::Degree => 1.0,
            Self::Radian => 180.0 / std::f64::consts::PI,
            Self::Arcminute => 1.0 / 60.0,
            Self::Arcsecond => 1.0 / 3600.0,
            Self::Milliarcsecond => 1.0 / 3_600_000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_float_is_degrees() {
        let angle: Angle = 45.0.into();
        assert_eq!(angle.degrees(), 45.0);
        assert_relative_eq!(angle.radians(), std::f64::consts::FRAC_PI_4);
    }

    #[test]
    fn test_unit_constructors() {
        assert_relative_eq!(Angle::from_arcmin(30.0).degrees(), 0.5);
        assert_relative_eq!(Angle::from_arcsec(1800.0).degrees(), 0.5);
        assert_relative_eq!(Angle::from_radians(std::f64::consts::PI).degrees(), 180.0);
    }

    #[test]
    fn test_wrap_360() {
        assert_relative_eq!(Angle::from_degrees(-10.0).wrap_360().degrees(), 350.0);
        assert_relative_eq!(Angle::from_degrees(720.5).wrap_360().degrees(), 0.5);
    }

    #[test]
    fn test_angle_ratio() {
        let ratio = Angle::from_degrees(45.0) / Angle::from_degrees(40.0);
        assert_relative_eq!(ratio, 1.125);
    }

    #[test]
    fn test_unit_parse() {
        assert_eq!(AngleUnit::parse("deg"), Some(AngleUnit::Degree));
        assert_eq!(AngleUnit::parse("mas"), Some(AngleUnit::Milliarcsecond));
        assert_eq!(AngleUnit::parse("parsec"), None);
        assert_relative_eq!(AngleUnit::Arcsecond.to_degrees_factor() * 3600.0, 1.0);
    }
}
