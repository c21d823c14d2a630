//! Field views: qubit fields over a whole grid and field maps of one
//! scene on a probe lattice.

use crate::collection::{FieldSource, MagnetCollection};
use crate::derivative::{field_gradient, DerivativeConfig, Gradient};
use crate::record::NM;
use crate::units::FieldUnit;
use smallvec::SmallVec;
use umag_core::vector::Axis3;
use umag_core::{DenseArray, SceneError, Shape, Vec3};
use umag_grid::{ObjectGrid, Setpoint, SetpointRegistry};

/// Raw field `(..., 3)` and gradient `(3, ..., 3)` arrays in tesla and
/// tesla per nanometre.
#[derive(Clone, Debug, PartialEq)]
struct FieldData {
    field: DenseArray,
    gradient: DenseArray,
}

impl FieldData {
    fn with_points(outer: &[usize]) -> Self {
        let mut shape: Shape = SmallVec::from_slice(outer);
        shape.push(3);
        let field = DenseArray::zeros(&shape);
        shape.insert(0, 3);
        Self {
            field,
            gradient: DenseArray::zeros(&shape),
        }
    }

    /// Store the field and gradient of points `first..first + b.len()`.
    fn write(&mut self, first: usize, b: &[Vec3], grad: &Gradient) {
        let per_move = self.field.len();
        let field = self.field.as_mut_slice();
        for (p, v) in b.iter().enumerate() {
            field[(first + p) * 3..(first + p) * 3 + 3].copy_from_slice(v);
        }
        let gradient = self.gradient.as_mut_slice();
        for (m, rows) in grad.per_axis.iter().enumerate() {
            for (p, v) in rows.iter().enumerate() {
                let at = m * per_move + (first + p) * 3;
                gradient[at..at + 3].copy_from_slice(v);
            }
        }
    }

    fn outer_shape(&self) -> &[usize] {
        &self.field.shape()[..self.field.ndim() - 1]
    }

    fn b(&self, components: &str, unit: FieldUnit) -> Result<DenseArray, SceneError> {
        let comps = Axis3::parse_set(components)?;
        let factor = unit.factor();
        let mut out = DenseArray::zeros(self.outer_shape());
        for (o, v) in out
            .as_mut_slice()
            .iter_mut()
            .zip(self.field.as_slice().chunks_exact(3))
        {
            let value = match comps.as_slice() {
                [only] => v[only.index()],
                _ => comps.iter().map(|a| v[a.index()].powi(2)).sum::<f64>().sqrt(),
            };
            *o = value * factor;
        }
        Ok(out)
    }

    fn b_total(&self, unit: FieldUnit) -> DenseArray {
        let factor = unit.factor();
        let mut out = DenseArray::zeros(self.outer_shape());
        for (o, v) in out
            .as_mut_slice()
            .iter_mut()
            .zip(self.field.as_slice().chunks_exact(3))
        {
            *o = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt() * factor;
        }
        out
    }

    fn db(
        &self,
        field_components: &str,
        move_components: &str,
        unit: FieldUnit,
    ) -> Result<DenseArray, SceneError> {
        let fc = Axis3::parse_set(field_components)?;
        let mc = Axis3::parse_set(move_components)?;
        let factor = unit.factor();
        let per_move = self.field.len();
        let grad = self.gradient.as_slice();
        let g = |m: Axis3, c: Axis3, i: usize| grad[m.index() * per_move + i * 3 + c.index()];

        let mut out = DenseArray::zeros(self.outer_shape());
        for (i, o) in out.as_mut_slice().iter_mut().enumerate() {
            let value = match (fc.as_slice(), mc.as_slice()) {
                ([c], [m]) => g(*m, *c, i),
                _ => mc
                    .iter()
                    .flat_map(|&m| fc.iter().map(move |&c| (m, c)))
                    .map(|(m, c)| g(m, c, i).powi(2))
                    .sum::<f64>()
                    .sqrt(),
            };
            *o = value * factor;
        }
        Ok(out)
    }
}

/// Field and gradient at every qubit position of every grid cell.
///
/// Arrays are shaped `(*grid_shape, n_points)` once a component is
/// selected.
#[derive(Clone, Debug, PartialEq)]
pub struct QubitField {
    data: FieldData,
    grid_shape: Shape,
    n_points: usize,
    setpoints: Vec<Setpoint>,
}

impl QubitField {
    /// Evaluate every realized scene of `scenes` at its observation
    /// points, including gradients per `config`.
    ///
    /// # Errors
    ///
    /// `SceneError::InconsistentObservations` if cells disagree on the
    /// number of observation points.
    pub fn evaluate(
        scenes: &mut ObjectGrid<MagnetCollection>,
        registry: &SetpointRegistry,
        config: &DerivativeConfig,
    ) -> Result<Self, SceneError> {
        let n_points = scenes
            .flatten()
            .first()
            .map_or(0, |c| c.observation_points().len());
        for (cell, c) in scenes.iter().enumerate() {
            let found = c.observation_points().len();
            if found != n_points {
                return Err(SceneError::InconsistentObservations {
                    expected: n_points,
                    found,
                    cell,
                });
            }
        }

        let grid_shape: Shape = SmallVec::from_slice(scenes.shape());
        let mut outer = grid_shape.clone();
        outer.push(n_points);
        let mut data = FieldData::with_points(&outer);
        for (cell, scene) in scenes.flatten_mut().iter_mut().enumerate() {
            let points = scene.observation_points().to_vec();
            let b = scene.evaluate_field(&points);
            let grad = field_gradient(scene, &points, &b, config);
            data.write(cell * n_points, &b, &grad);
        }
        log::debug!(
            "evaluated {} qubit(s) over grid {:?}",
            n_points,
            grid_shape.as_slice()
        );

        Ok(Self {
            data,
            grid_shape,
            n_points,
            setpoints: registry.iter().cloned().collect(),
        })
    }

    /// Shape of the scene grid.
    pub fn grid_shape(&self) -> &[usize] {
        &self.grid_shape
    }

    /// Observation points per scene.
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Raw field, shape `(*grid_shape, n_points, 3)`, tesla.
    pub fn field(&self) -> &DenseArray {
        &self.data.field
    }

    /// Raw gradient, shape `(3, *grid_shape, n_points, 3)`, T/nm; the
    /// leading index is the displacement axis.
    pub fn gradient(&self) -> &DenseArray {
        &self.data.gradient
    }

    /// Registered axes, outermost first.
    pub fn setpoints(&self) -> &[Setpoint] {
        &self.setpoints
    }

    /// The setpoint of grid axis `axis`, if one was registered.
    pub fn setpoint(&self, axis: usize) -> Option<&Setpoint> {
        self.setpoints.iter().find(|s| s.axis == axis)
    }

    /// One field component, or the norm over several (e.g. `"xz"`).
    pub fn b(&self, components: &str, unit: FieldUnit) -> Result<DenseArray, SceneError> {
        self.data.b(components, unit)
    }

    /// Field magnitude.
    pub fn b_total(&self, unit: FieldUnit) -> DenseArray {
        self.data.b_total(unit)
    }

    /// `dB_c / d(move)` for single components, or the root sum of squares
    /// over every listed pair.
    pub fn db(
        &self,
        field_components: &str,
        move_components: &str,
        unit: FieldUnit,
    ) -> Result<DenseArray, SceneError> {
        self.data.db(field_components, move_components, unit)
    }
}

/// Range of one lattice axis: `n` points from `start` to `stop` (nm).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeAxis {
    /// First coordinate.
    pub start: f64,
    /// Last coordinate.
    pub stop: f64,
    /// Number of points.
    pub n: usize,
}

impl LatticeAxis {
    fn new(start: f64, stop: f64, n: usize) -> Result<Self, SceneError> {
        if n == 0 {
            return Err(SceneError::InvalidLattice {
                reason: "every axis needs at least one point".to_string(),
            });
        }
        if !start.is_finite() || !stop.is_finite() {
            return Err(SceneError::InvalidLattice {
                reason: format!("non-finite range {start}..{stop}"),
            });
        }
        Ok(Self { start, stop, n })
    }

    fn fixed(level: f64) -> Result<Self, SceneError> {
        Self::new(level, level, 1)
    }

    fn coordinates(&self) -> Vec<f64> {
        if self.n == 1 {
            return vec![self.start];
        }
        let step = (self.stop - self.start) / (self.n - 1) as f64;
        (0..self.n)
            .map(|i| {
                if i + 1 == self.n {
                    self.stop
                } else {
                    self.start + step * i as f64
                }
            })
            .collect()
    }
}

/// A rectangular lattice of probe points, in nanometres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeLattice {
    axes: [LatticeAxis; 3],
}

impl Default for ProbeLattice {
    fn default() -> Self {
        Self {
            axes: [
                LatticeAxis {
                    start: -1000.0,
                    stop: 1000.0,
                    n: 100,
                },
                LatticeAxis {
                    start: -1000.0,
                    stop: 1000.0,
                    n: 80,
                },
                LatticeAxis {
                    start: -30.0,
                    stop: -30.0,
                    n: 1,
                },
            ],
        }
    }
}

impl ProbeLattice {
    /// A lattice from `(start, stop, n)` per axis.
    pub fn new(
        x: (f64, f64, usize),
        y: (f64, f64, usize),
        z: (f64, f64, usize),
    ) -> Result<Self, SceneError> {
        Ok(Self {
            axes: [
                LatticeAxis::new(x.0, x.1, x.2)?,
                LatticeAxis::new(y.0, y.1, y.2)?,
                LatticeAxis::new(z.0, z.1, z.2)?,
            ],
        })
    }

    /// A line along `axis`, with the other two axes (in x, y, z order)
    /// held at `level1` and `level2`.
    pub fn slice(
        axis: Axis3,
        start: f64,
        stop: f64,
        n: usize,
        level1: f64,
        level2: f64,
    ) -> Result<Self, SceneError> {
        let [o1, o2] = axis.others();
        let mut axes = [LatticeAxis::fixed(0.0)?; 3];
        axes[axis.index()] = LatticeAxis::new(start, stop, n)?;
        axes[o1.index()] = LatticeAxis::fixed(level1)?;
        axes[o2.index()] = LatticeAxis::fixed(level2)?;
        Ok(Self { axes })
    }

    /// A plane spanned by the two axes named in `plane` (e.g. `"xy"`),
    /// with the remaining axis held at `level`.
    pub fn image(
        plane: &str,
        first: (f64, f64, usize),
        second: (f64, f64, usize),
        level: f64,
    ) -> Result<Self, SceneError> {
        let axes_named = Axis3::parse_set(plane)?;
        let [a, b] = match axes_named.as_slice() {
            [a, b] => [*a, *b],
            _ => {
                return Err(SceneError::InvalidLattice {
                    reason: format!("an image needs two distinct axes, got '{plane}'"),
                })
            }
        };
        let mut axes = [LatticeAxis::fixed(level)?; 3];
        axes[a.index()] = LatticeAxis::new(first.0, first.1, first.2)?;
        axes[b.index()] = LatticeAxis::new(second.0, second.1, second.2)?;
        Ok(Self { axes })
    }

    /// Points per axis.
    pub fn shape(&self) -> [usize; 3] {
        self.axes.map(|a| a.n)
    }

    /// Axes with more than one point, in x, y, z order.
    pub fn active_axes(&self) -> SmallVec<[Axis3; 3]> {
        Axis3::ALL
            .into_iter()
            .filter(|a| self.axes[a.index()].n > 1)
            .collect()
    }

    /// Coordinates along `axis` (nm).
    pub fn coordinates(&self, axis: Axis3) -> Vec<f64> {
        self.axes[axis.index()].coordinates()
    }

    /// Every lattice point in metres, x slowest and z fastest.
    pub fn points(&self) -> Vec<Vec3> {
        let [xs, ys, zs] = Axis3::ALL.map(|a| self.coordinates(a));
        let mut out = Vec::with_capacity(xs.len() * ys.len() * zs.len());
        for &x in &xs {
            for &y in &ys {
                for &z in &zs {
                    out.push([x * NM, y * NM, z * NM]);
                }
            }
        }
        out
    }
}

/// Field of a single scene on a [`ProbeLattice`].
///
/// Accessors drop lattice axes with a single point, so a line yields a
/// one-dimensional array and an image a two-dimensional one.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldMap {
    data: FieldData,
    lattice: ProbeLattice,
}

impl FieldMap {
    /// Evaluate `source` on every lattice point, including gradients.
    pub fn evaluate<S: FieldSource + ?Sized>(
        source: &mut S,
        lattice: ProbeLattice,
        config: &DerivativeConfig,
    ) -> Self {
        let points = lattice.points();
        let mut data = FieldData::with_points(&lattice.shape());
        let b = source.evaluate_field(&points);
        let grad = field_gradient(source, &points, &b, config);
        data.write(0, &b, &grad);
        log::debug!("evaluated field map on lattice {:?}", lattice.shape());
        Self { data, lattice }
    }

    /// The probe lattice.
    pub fn lattice(&self) -> &ProbeLattice {
        &self.lattice
    }

    /// Lattice axes with more than one point.
    pub fn active_axes(&self) -> SmallVec<[Axis3; 3]> {
        self.lattice.active_axes()
    }

    /// Raw field, shape `(nx, ny, nz, 3)`, tesla.
    pub fn field(&self) -> &DenseArray {
        &self.data.field
    }

    /// One field component, or the norm over several.
    pub fn b(&self, components: &str, unit: FieldUnit) -> Result<DenseArray, SceneError> {
        self.data.b(components, unit).map(DenseArray::squeeze)
    }

    /// Field magnitude.
    pub fn b_total(&self, unit: FieldUnit) -> DenseArray {
        self.data.b_total(unit).squeeze()
    }

    /// Field derivative with respect to probe displacement, T/nm scaled
    /// by `unit`.
    pub fn db(
        &self,
        field_components: &str,
        move_components: &str,
        unit: FieldUnit,
    ) -> Result<DenseArray, SceneError> {
        self.data
            .db(field_components, move_components, unit)
            .map(DenseArray::squeeze)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::realize;
    use crate::record::SceneRecord;

    fn uniform(b: Vec3, points: usize) -> SceneRecord {
        let mut r = SceneRecord::default();
        r.set_external_field(b);
        for i in 0..points {
            r.add_observation_position([i as f64 * 10.0, 0.0, 0.0]);
        }
        r
    }

    #[test]
    fn qubit_field_shape_follows_grid() {
        let mut grid = ObjectGrid::new(uniform([0.0, 0.3, 0.4], 2));
        grid.grow_axis(0, 3).unwrap();
        grid.grow_axis(1, 2).unwrap();
        let mut scenes = realize(&grid);
        let qf = QubitField::evaluate(
            &mut scenes,
            &SetpointRegistry::new(),
            &DerivativeConfig::default(),
        )
        .unwrap();
        assert_eq!(qf.field().shape(), &[2, 3, 2, 3]);
        assert_eq!(qf.gradient().shape(), &[3, 2, 3, 2, 3]);
        let bt = qf.b_total(FieldUnit::MilliTesla);
        assert_eq!(bt.shape(), &[2, 3, 2]);
        assert!(bt.as_slice().iter().all(|&v| (v - 500.0).abs() < 1e-9));
        let by = qf.b("y", FieldUnit::Tesla).unwrap();
        assert!(by.as_slice().iter().all(|&v| (v - 0.3).abs() < 1e-15));
        // A uniform field has no gradient.
        let db = qf.db("xyz", "xyz", FieldUnit::Tesla).unwrap();
        assert!(db.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn inconsistent_observation_counts_are_rejected() {
        let mut grid = ObjectGrid::new(uniform([0.0; 3], 1));
        grid.grow_axis(0, 2).unwrap();
        grid.get_mut(&[1])
            .unwrap()
            .add_observation_position([0.0; 3]);
        let mut scenes = realize(&grid);
        let err = QubitField::evaluate(
            &mut scenes,
            &SetpointRegistry::new(),
            &DerivativeConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SceneError::InconsistentObservations {
                expected: 1,
                found: 2,
                cell: 1
            }
        );
    }

    #[test]
    fn invalid_component_is_reported() {
        let mut scenes = realize(&ObjectGrid::new(uniform([0.0; 3], 1)));
        let qf = QubitField::evaluate(
            &mut scenes,
            &SetpointRegistry::new(),
            &DerivativeConfig::default(),
        )
        .unwrap();
        assert!(matches!(
            qf.b("w", FieldUnit::Tesla),
            Err(SceneError::InvalidComponent { .. })
        ));
    }

    #[test]
    fn lattice_slice_and_image() {
        let line = ProbeLattice::slice(Axis3::Y, -10.0, 10.0, 5, 1.0, 2.0).unwrap();
        assert_eq!(line.shape(), [1, 5, 1]);
        assert_eq!(line.coordinates(Axis3::X), vec![1.0]);
        assert_eq!(line.coordinates(Axis3::Z), vec![2.0]);
        assert_eq!(line.active_axes().as_slice(), &[Axis3::Y]);

        let img = ProbeLattice::image("zx", (0.0, 1.0, 2), (0.0, 1.0, 3), -5.0).unwrap();
        assert_eq!(img.shape(), [3, 1, 2]);
        assert_eq!(img.points().len(), 6);
        assert!(ProbeLattice::image("x", (0.0, 1.0, 2), (0.0, 1.0, 3), 0.0).is_err());
        assert!(ProbeLattice::new((0.0, 1.0, 0), (0.0, 0.0, 1), (0.0, 0.0, 1)).is_err());
    }

    #[test]
    fn default_lattice_matches_overview_plane() {
        let l = ProbeLattice::default();
        assert_eq!(l.shape(), [100, 80, 1]);
        assert_eq!(l.coordinates(Axis3::Z), vec![-30.0]);
    }

    #[test]
    fn field_map_squeezes_to_active_axes() {
        let mut r = SceneRecord::default();
        r.add_cube([0.0; 3], [100.0, 100.0, 50.0]);
        let mut c = MagnetCollection::from_record(&r);
        let line = ProbeLattice::slice(Axis3::X, -200.0, 200.0, 9, 0.0, 100.0).unwrap();
        let map = FieldMap::evaluate(&mut c, line, &DerivativeConfig::default());
        assert_eq!(map.field().shape(), &[9, 1, 1, 3]);
        let bx = map.b("x", FieldUnit::Tesla).unwrap();
        assert_eq!(bx.shape(), &[9]);
        // Symmetric about the magnet center.
        let v = bx.as_slice();
        assert!((v[0] - v[8]).abs() < 1e-12);
        assert_eq!(map.db("x", "x", FieldUnit::Tesla).unwrap().shape(), &[9]);
        assert_eq!(c.offset(), [0.0; 3]);
    }
}
