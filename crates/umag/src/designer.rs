//! The builder session users drive with scalar-or-sweep arguments.

use crate::config::DesignerConfig;
use crate::error::DesignError;
use umag_core::vector::Axis3;
use umag_core::{GridError, SceneError, Vec3};
use umag_grid::{
    dispatch, CallArgs, CellArgs, ObjectGrid, Param, SetpointRegistry, SweepBindings,
};
use umag_scene::{
    realize, FieldMap, FieldUnit, MagnetCollection, ProbeLattice, QubitField, SceneRecord,
};
use umag_sweep::SweepValue;

/// Keyword under which triangle calls pass their slab count.
const N_SLABS: &str = "n_slabs";

/// Conversion into three builder arguments, one per coordinate.
///
/// Implemented for plain `[f64; 3]` vectors, for `[Param; 3]`, and for
/// tuples mixing scalars and sweeps:
///
/// ```rust
/// # use umag::prelude::*;
/// let width = SweepValue::linspace(20.0, 80.0, 5).unwrap();
/// let mut d = MagnetDesigner::new();
/// d.add_cube([0.0, 0.0, 0.0], (&width, 100.0, 50.0)).unwrap();
/// assert_eq!(d.shape(), &[5]);
/// ```
pub trait IntoPoint<'a> {
    /// The three coordinates as builder arguments.
    fn into_point(self) -> [Param<'a>; 3];
}

impl<'a> IntoPoint<'a> for [f64; 3] {
    fn into_point(self) -> [Param<'a>; 3] {
        self.map(Param::Scalar)
    }
}

impl<'a> IntoPoint<'a> for [Param<'a>; 3] {
    fn into_point(self) -> [Param<'a>; 3] {
        self
    }
}

impl<'a, A, B, C> IntoPoint<'a> for (A, B, C)
where
    A: Into<Param<'a>>,
    B: Into<Param<'a>>,
    C: Into<Param<'a>>,
{
    fn into_point(self) -> [Param<'a>; 3] {
        [self.0.into(), self.1.into(), self.2.into()]
    }
}

fn push_point<'a>(args: CallArgs<'a>, point: impl IntoPoint<'a>) -> CallArgs<'a> {
    point.into_point().into_iter().fold(args, |a, p| a.arg(p))
}

/// Three consecutive per-cell scalars starting at `first`.
fn vec3_at(args: &CellArgs, first: usize) -> Result<Vec3, DesignError> {
    let mut out = [0.0; 3];
    for (k, slot) in out.iter_mut().enumerate() {
        *slot = args
            .get(first + k)
            .ok_or(GridError::UnresolvedSweep { position: first + k })?;
    }
    Ok(out)
}

fn slab_count(value: f64) -> Result<usize, SceneError> {
    if value.is_finite() && value >= 1.0 && value.fract() == 0.0 {
        Ok(value as usize)
    } else {
        Err(SceneError::InvalidSlabCount { value })
    }
}

/// A micromagnet design session.
///
/// Owns the scene grid, the setpoint registry and the resolved sweep
/// axes. Every builder call accepts scalars or sweeps; sweeps grow the
/// grid and the call is replayed once per cell with that cell's values.
///
/// Errors are fatal to the session: a failed call may leave the grid
/// partially grown.
#[derive(Clone, Debug)]
pub struct MagnetDesigner {
    grid: ObjectGrid<SceneRecord>,
    registry: SetpointRegistry,
    bindings: SweepBindings,
    config: DesignerConfig,
}

impl Default for MagnetDesigner {
    fn default() -> Self {
        Self::new()
    }
}

impl MagnetDesigner {
    /// A session with the default configuration.
    pub fn new() -> Self {
        Self::from_valid(DesignerConfig::default())
    }

    /// A session with a custom configuration.
    ///
    /// # Errors
    ///
    /// `DesignError::Config` if `config` fails validation.
    pub fn with_config(config: DesignerConfig) -> Result<Self, DesignError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: DesignerConfig) -> Self {
        log::debug!("new design session with {config:?}");
        Self {
            grid: ObjectGrid::new(SceneRecord::with_magnetisation(
                config.default_magnetisation,
            )),
            registry: SetpointRegistry::new(),
            bindings: SweepBindings::new(),
            config,
        }
    }

    fn apply<F>(&mut self, args: &CallArgs<'_>, f: F) -> Result<(), DesignError>
    where
        F: FnMut(&mut SceneRecord, &CellArgs) -> Result<(), DesignError>,
    {
        dispatch(
            &mut self.grid,
            &mut self.registry,
            &mut self.bindings,
            args,
            f,
        )
    }

    /// Set the magnetisation (tesla) of every magnet in each scene.
    pub fn set_magnetisation<'a>(&mut self, m: impl IntoPoint<'a>) -> Result<(), DesignError> {
        let args = push_point(CallArgs::new(), m);
        self.apply(&args, |record, cell| {
            record.set_magnetisation(vec3_at(cell, 0)?);
            Ok(())
        })
    }

    /// Set the uniform external field (tesla).
    pub fn set_external_field<'a>(&mut self, b: impl IntoPoint<'a>) -> Result<(), DesignError> {
        let args = push_point(CallArgs::new(), b);
        self.apply(&args, |record, cell| {
            record.set_external_field(vec3_at(cell, 0)?);
            Ok(())
        })
    }

    /// Add a qubit position (nm).
    pub fn add_observation_position<'a>(
        &mut self,
        position: impl IntoPoint<'a>,
    ) -> Result<(), DesignError> {
        let args = push_point(CallArgs::new(), position);
        self.apply(&args, |record, cell| {
            record.add_observation_position(vec3_at(cell, 0)?);
            Ok(())
        })
    }

    /// Add a box magnet by center and edge lengths (nm).
    pub fn add_cube<'a>(
        &mut self,
        center: impl IntoPoint<'a>,
        size: impl IntoPoint<'a>,
    ) -> Result<(), DesignError> {
        let args = push_point(push_point(CallArgs::new(), center), size);
        self.apply(&args, |record, cell| {
            record.add_cube(vec3_at(cell, 0)?, vec3_at(cell, 3)?);
            Ok(())
        })
    }

    /// Add a right-triangular magnet (nm) extruded by `thickness` along
    /// `static_axis`, approximated by `n_slabs` boxes.
    ///
    /// `n_slabs` defaults to the configured slab count. It must be a
    /// positive integer and cannot be swept.
    ///
    /// # Errors
    ///
    /// - `GridError::NotImplemented` if `n_slabs` is a sweep.
    /// - `SceneError::InvalidSlabCount` for a non-integer or non-positive
    ///   count.
    /// - `SceneError::DegenerateTriangle` if a cell's corners do not form
    ///   an axis-aligned right triangle.
    pub fn add_triangle<'a>(
        &mut self,
        p1: impl IntoPoint<'a>,
        p2: impl IntoPoint<'a>,
        p3: impl IntoPoint<'a>,
        static_axis: Axis3,
        thickness: impl Into<Param<'a>>,
        n_slabs: Option<Param<'a>>,
    ) -> Result<(), DesignError> {
        let n_slabs = n_slabs.unwrap_or(Param::Scalar(self.config.default_slab_count as f64));
        if let Param::Scalar(v) = n_slabs {
            slab_count(v)?;
        }
        let args = push_point(push_point(push_point(CallArgs::new(), p1), p2), p3)
            .arg(thickness)
            .kwarg(N_SLABS, n_slabs);
        self.apply(&args, |record, cell| {
            let n = cell
                .named(N_SLABS)
                .ok_or(SceneError::InvalidSlabCount { value: f64::NAN })?;
            let corners = [vec3_at(cell, 0)?, vec3_at(cell, 3)?, vec3_at(cell, 6)?];
            let thickness = cell
                .get(9)
                .ok_or(GridError::UnresolvedSweep { position: 9 })?;
            record.add_triangle(corners, static_axis, thickness, slab_count(n)?)?;
            Ok(())
        })
    }

    /// Current grid shape, outermost dimension first.
    pub fn shape(&self) -> &[usize] {
        self.grid.shape()
    }

    /// The scene grid.
    pub fn grid(&self) -> &ObjectGrid<SceneRecord> {
        &self.grid
    }

    /// Every scene record in row-major order.
    pub fn flatten(&self) -> &[SceneRecord] {
        self.grid.flatten()
    }

    /// Axis labels, units and coordinates registered so far.
    pub fn registry(&self) -> &SetpointRegistry {
        &self.registry
    }

    /// Grid axes each sweep was resolved to.
    pub fn bindings(&self) -> &SweepBindings {
        &self.bindings
    }

    /// A copy of `sweep` pinned to the axes it was resolved to in this
    /// session. Sweeps derived by scalar arithmetic already follow their
    /// origin; pinning fixes the axes into the sweep itself.
    pub fn pinned(&self, sweep: &SweepValue) -> SweepValue {
        self.bindings.pinned(sweep)
    }

    /// The session configuration.
    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    /// Preferred output unit for views.
    pub fn unit(&self) -> FieldUnit {
        self.config.unit
    }

    /// Turn every scene record into a field-ready collection.
    pub fn realize(&self) -> ObjectGrid<MagnetCollection> {
        realize(&self.grid)
    }

    /// Field and gradient at every qubit of every scene.
    pub fn qubit_field(&self) -> Result<QubitField, DesignError> {
        let mut scenes = self.realize();
        Ok(QubitField::evaluate(
            &mut scenes,
            &self.registry,
            &self.config.derivative,
        )?)
    }

    /// Field of the only scene on `lattice`.
    ///
    /// # Errors
    ///
    /// `DesignError::MultidimensionalView` if the grid holds more than one
    /// scene; use [`field_map_at`](Self::field_map_at) instead.
    pub fn field_map(&self, lattice: ProbeLattice) -> Result<FieldMap, DesignError> {
        if self.grid.len() != 1 {
            return Err(DesignError::MultidimensionalView {
                cells: self.grid.len(),
            });
        }
        self.field_map_at(&vec![0; self.grid.ndim()], lattice)
    }

    /// Field of the scene at `index` on `lattice`.
    pub fn field_map_at(
        &self,
        index: &[usize],
        lattice: ProbeLattice,
    ) -> Result<FieldMap, DesignError> {
        let record = self
            .grid
            .get(index)
            .ok_or_else(|| DesignError::CellOutOfBounds {
                index: index.to_vec(),
                shape: self.grid.shape().to_vec(),
            })?;
        let mut scene = MagnetCollection::from_record(record);
        Ok(FieldMap::evaluate(
            &mut scene,
            lattice,
            &self.config.derivative,
        ))
    }
}
