//! Scene records and the per-cell builder operations.

use crate::tessellate::tessellate_triangle;
use umag_core::vector::{self, Axis3};
use umag_core::{SceneError, Vec3};

/// Metres per nanometre.
pub const NM: f64 = 1e-9;

/// An axis-aligned box given by its center and edge lengths.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cuboid {
    /// Center point.
    pub center: Vec3,
    /// Edge length along x, y and z.
    pub size: Vec3,
}

impl Cuboid {
    /// A box at `center` with edge lengths `size`.
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }

    /// The same box with every length multiplied by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            center: vector::scale(self.center, factor),
            size: vector::scale(self.size, factor),
        }
    }

    /// The same box moved by `displacement`.
    pub fn translated(self, displacement: Vec3) -> Self {
        Self {
            center: vector::add(self.center, displacement),
            size: self.size,
        }
    }

    /// `(min, max)` extent along each axis.
    pub fn bounds(&self) -> [(f64, f64); 3] {
        [0, 1, 2].map(|k| {
            let h = self.size[k] / 2.0;
            (self.center[k] - h, self.center[k] + h)
        })
    }

    /// Whether `p` lies strictly inside the box.
    pub fn contains(&self, p: Vec3) -> bool {
        self.bounds()
            .iter()
            .zip(p)
            .all(|(&(lo, hi), v)| v > lo && v < hi)
    }

    /// Enclosed volume.
    pub fn volume(&self) -> f64 {
        self.size.iter().product::<f64>().abs()
    }
}

/// One fully specified configuration: magnet volumes, magnetisation,
/// external field and observation points.
///
/// Lengths are stored in metres, fields in tesla.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneRecord {
    /// Placed magnet volumes.
    pub volumes: Vec<Cuboid>,
    /// Polarization shared by every volume.
    pub magnetisation: Vec3,
    /// Uniform field added everywhere.
    pub external_field: Vec3,
    /// Qubit positions.
    pub observation_points: Vec<Vec3>,
}

impl Default for SceneRecord {
    fn default() -> Self {
        Self::with_magnetisation([1.0, 0.0, 0.0])
    }
}

impl SceneRecord {
    /// An empty record with the given magnetisation (tesla).
    pub fn with_magnetisation(magnetisation: Vec3) -> Self {
        Self {
            volumes: Vec::new(),
            magnetisation,
            external_field: [0.0; 3],
            observation_points: Vec::new(),
        }
    }

    /// Set the magnetisation of every volume (tesla).
    pub fn set_magnetisation(&mut self, m: Vec3) {
        self.magnetisation = m;
    }

    /// Set the uniform external field (tesla).
    pub fn set_external_field(&mut self, b: Vec3) {
        self.external_field = b;
    }

    /// Add a qubit position (nm).
    pub fn add_observation_position(&mut self, position_nm: Vec3) {
        self.observation_points.push(vector::scale(position_nm, NM));
    }

    /// Add a box by center and edge lengths (nm). Negative lengths are
    /// taken by magnitude.
    pub fn add_cube(&mut self, center_nm: Vec3, size_nm: Vec3) {
        let size = size_nm.map(f64::abs);
        self.volumes.push(Cuboid::new(center_nm, size).scaled(NM));
    }

    /// Add a right-triangular region as `n_slabs` boxes (nm).
    ///
    /// See [`tessellate_triangle`] for the decomposition and its errors.
    pub fn add_triangle(
        &mut self,
        corners_nm: [Vec3; 3],
        static_axis: Axis3,
        thickness_nm: f64,
        n_slabs: usize,
    ) -> Result<(), SceneError> {
        let slabs = tessellate_triangle(corners_nm, static_axis, thickness_nm, n_slabs)?;
        self.volumes.extend(slabs.into_iter().map(|s| s.scaled(NM)));
        Ok(())
    }
}
