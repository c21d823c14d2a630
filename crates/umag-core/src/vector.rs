//! Plain `[f64; 3]` vector helpers and the [`Axis3`] selector.

use crate::error::SceneError;
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// A Cartesian 3-vector (position, size, field or polarization).
pub type Vec3 = [f64; 3];

/// Componentwise `a + b`.
#[inline]
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Componentwise `a - b`.
#[inline]
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// `s * v`.
#[inline]
pub fn scale(v: Vec3, s: f64) -> Vec3 {
    [v[0] * s, v[1] * s, v[2] * s]
}

/// 3D dot product.
#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Euclidean length.
#[inline]
pub fn norm(v: Vec3) -> f64 {
    dot(v, v).sqrt()
}

/// Unit vector along `axis` scaled by `s`.
#[inline]
pub fn along(axis: Axis3, s: f64) -> Vec3 {
    let mut v = [0.0; 3];
    v[axis.index()] = s;
    v
}

/// One of the three Cartesian axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis3 {
    /// The x axis (component 0).
    X,
    /// The y axis (component 1).
    Y,
    /// The z axis (component 2).
    Z,
}

impl Axis3 {
    /// All axes in component order.
    pub const ALL: [Axis3; 3] = [Axis3::X, Axis3::Y, Axis3::Z];

    /// Component index (x=0, y=1, z=2).
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// The two axes other than `self`, in component order.
    pub fn others(self) -> [Axis3; 2] {
        match self {
            Self::X => [Self::Y, Self::Z],
            Self::Y => [Self::X, Self::Z],
            Self::Z => [Self::X, Self::Y],
        }
    }

    /// Parse a single character.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'x' => Some(Self::X),
            'y' => Some(Self::Y),
            'z' => Some(Self::Z),
            _ => None,
        }
    }

    /// Parse a direction string such as `"xy"` into its components.
    ///
    /// Order is preserved and duplicates are dropped. Returns
    /// `Err(SceneError::InvalidComponent)` for an empty string or any
    /// character other than `x`, `y`, `z`.
    pub fn parse_set(s: &str) -> Result<SmallVec<[Axis3; 3]>, SceneError> {
        let mut out: SmallVec<[Axis3; 3]> = SmallVec::new();
        for c in s.chars() {
            let axis = Self::from_char(c).ok_or_else(|| SceneError::InvalidComponent {
                name: s.to_string(),
            })?;
            if !out.contains(&axis) {
                out.push(axis);
            }
        }
        if out.is_empty() {
            return Err(SceneError::InvalidComponent {
                name: s.to_string(),
            });
        }
        Ok(out)
    }
}

impl FromStr for Axis3 {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next().and_then(Self::from_char), chars.next()) {
            (Some(axis), None) => Ok(axis),
            _ => Err(SceneError::InvalidComponent {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Axis3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        };
        f.write_str(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_parse_round_trip() {
        for axis in Axis3::ALL {
            assert_eq!(axis.to_string().parse::<Axis3>().unwrap(), axis);
        }
        assert!("xy".parse::<Axis3>().is_err());
        assert!("w".parse::<Axis3>().is_err());
    }

    #[test]
    fn parse_set_keeps_order_and_dedups() {
        let set = Axis3::parse_set("zxz").unwrap();
        assert_eq!(set.as_slice(), &[Axis3::Z, Axis3::X]);
        assert!(Axis3::parse_set("").is_err());
        assert!(Axis3::parse_set("xq").is_err());
    }

    #[test]
    fn others_excludes_self() {
        assert_eq!(Axis3::Y.others(), [Axis3::X, Axis3::Z]);
    }

    #[test]
    fn vector_helpers() {
        let a = [1.0, 2.0, 2.0];
        assert_eq!(norm(a), 3.0);
        assert_eq!(sub(add(a, a), a), a);
        assert_eq!(along(Axis3::Z, 2.5), [0.0, 0.0, 2.5]);
        assert_eq!(scale(a, 2.0), [2.0, 4.0, 4.0]);
    }
}
