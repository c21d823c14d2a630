//! Two-phase broadcast dispatch of builder calls over an [`ObjectGrid`].
//!
//! Phase one, [`resolve_call`], places every sweep argument on concrete
//! grid axes, growing the grid as needed. Phase two, [`fan_out`], visits
//! each cell and passes its record, together with the per-cell scalar
//! arguments, to a closure.
//!
//! Resolution is not transactional: if a later argument fails to
//! resolve, growth caused by earlier arguments remains.

use crate::grid::ObjectGrid;
use crate::setpoint::SetpointRegistry;
use indexmap::IndexMap;
use smallvec::SmallVec;
use umag_core::array::{row_major_strides, IndexIter};
use umag_core::{DenseArray, GridError, Shape, SweepId};
use umag_sweep::{SweepAxis, SweepValue};

/// One builder argument: a plain scalar or a sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Param<'a> {
    /// A value used unchanged in every cell.
    Scalar(f64),
    /// A sweep resolved to one value per cell.
    Sweep(&'a SweepValue),
}

impl From<f64> for Param<'_> {
    fn from(v: f64) -> Self {
        Param::Scalar(v)
    }
}

impl From<i32> for Param<'_> {
    fn from(v: i32) -> Self {
        Param::Scalar(f64::from(v))
    }
}

impl<'a> From<&'a SweepValue> for Param<'a> {
    fn from(s: &'a SweepValue) -> Self {
        Param::Sweep(s)
    }
}

/// Positional and keyword arguments of one builder call.
#[derive(Clone, Debug, Default)]
pub struct CallArgs<'a> {
    positional: Vec<Param<'a>>,
    named: Vec<(String, Param<'a>)>,
}

impl<'a> CallArgs<'a> {
    /// No arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, param: impl Into<Param<'a>>) -> Self {
        self.positional.push(param.into());
        self
    }

    /// Append a keyword argument.
    pub fn kwarg(mut self, name: impl Into<String>, param: impl Into<Param<'a>>) -> Self {
        self.named.push((name.into(), param.into()));
        self
    }

    /// Positional arguments in call order.
    pub fn positional(&self) -> &[Param<'a>] {
        &self.positional
    }

    /// Keyword arguments in call order.
    pub fn named(&self) -> &[(String, Param<'a>)] {
        &self.named
    }
}

/// Concrete axes assigned to each sweep, keyed by [`SweepId`].
///
/// Once a sweep has been placed, every later use of it, of a clone, or
/// of a sweep derived from it by scalar arithmetic lands on the same
/// axes. A derived sweep placed before its origin binds only itself.
#[derive(Clone, Debug, Default)]
pub struct SweepBindings {
    axes: IndexMap<SweepId, Shape>,
}

impl SweepBindings {
    /// No bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Concrete axes bound to `id`, one per sweep dimension.
    pub fn get(&self, id: SweepId) -> Option<&[usize]> {
        self.axes.get(&id).map(|a| a.as_slice())
    }

    /// Axes `sweep` is bound to, falling back to the binding of its
    /// [`origin`](SweepValue::origin). Bindings whose dimension count
    /// differs from the sweep's are ignored.
    pub fn axes_for(&self, sweep: &SweepValue) -> Option<&[usize]> {
        self.get(sweep.id())
            .or_else(|| self.get(sweep.origin()))
            .filter(|axes| axes.len() == sweep.ndim())
    }

    /// Bind `id` to `axes`, replacing any previous binding.
    pub fn bind(&mut self, id: SweepId, axes: &[usize]) {
        self.axes.insert(id, SmallVec::from_slice(axes));
    }

    /// Number of bound sweeps.
    pub fn len(&self) -> usize {
        self.axes.len()
    }

    /// Whether no sweep has been bound.
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// A copy of `sweep` with its axes pinned to the bound ones, or a
    /// plain clone if it is unbound.
    pub fn pinned(&self, sweep: &SweepValue) -> SweepValue {
        let mut out = sweep.clone();
        if let Some(axes) = self.axes_for(sweep) {
            if out.pin_axes(axes).is_err() {
                return sweep.clone();
            }
        }
        out
    }
}

/// A sweep argument after axis resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSweep {
    values: DenseArray,
    axes: Shape,
    strides: Shape,
}

impl ResolvedSweep {
    /// Concrete axis per sweep dimension.
    pub fn axes(&self) -> &[usize] {
        &self.axes
    }

    /// The swept values.
    pub fn values(&self) -> &DenseArray {
        &self.values
    }

    /// Value for the grid cell at `index`, or `None` if the grid does not
    /// cover this sweep's axes. Sweep dimensions of extent 1 broadcast.
    pub fn value_at(&self, index: &[usize]) -> Option<f64> {
        let ndim = index.len();
        let shape = self.values.shape();
        let mut flat = 0usize;
        for (k, &axis) in self.axes.iter().enumerate() {
            if axis >= ndim {
                return None;
            }
            let i = if shape[k] == 1 { 0 } else { index[ndim - 1 - axis] };
            if i >= shape[k] {
                return None;
            }
            flat += i * self.strides[k];
        }
        self.values.as_slice().get(flat).copied()
    }

    fn covered_by(&self, grid_shape: &[usize]) -> bool {
        let ndim = grid_shape.len();
        self.axes.iter().zip(self.values.shape()).all(|(&axis, &n)| {
            axis < ndim && (n == 1 || grid_shape[ndim - 1 - axis] == n)
        })
    }
}

/// A positional argument after resolution.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedParam {
    /// Same value in every cell.
    Scalar(f64),
    /// Looked up per cell.
    Sweep(ResolvedSweep),
}

/// Output of [`resolve_call`], consumed by [`fan_out`].
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedCall {
    shape: Shape,
    params: Vec<ResolvedParam>,
    named: Vec<(String, f64)>,
}

impl ResolvedCall {
    /// Grid shape after resolution.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Resolved positional arguments.
    pub fn params(&self) -> &[ResolvedParam] {
        &self.params
    }

    /// Concrete axes of the sweep at `position`, if that argument is one.
    pub fn sweep_axes(&self, position: usize) -> Option<&[usize]> {
        match self.params.get(position)? {
            ResolvedParam::Sweep(s) => Some(s.axes()),
            ResolvedParam::Scalar(_) => None,
        }
    }
}

/// Fully scalar arguments for one grid cell.
#[derive(Clone, Debug, PartialEq)]
pub struct CellArgs {
    index: Shape,
    positional: SmallVec<[f64; 12]>,
    named: Vec<(String, f64)>,
}

impl CellArgs {
    /// Multi-index of the cell being visited.
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Positional argument `i`.
    pub fn get(&self, i: usize) -> Option<f64> {
        self.positional.get(i).copied()
    }

    /// All positional arguments.
    pub fn positional(&self) -> &[f64] {
        &self.positional
    }

    /// Keyword argument `name`.
    pub fn named(&self, name: &str) -> Option<f64> {
        self.named.iter().find(|(n, _)| n == name).map(|&(_, v)| v)
    }
}

/// Phase one: place every sweep argument on concrete grid axes.
///
/// For each positional sweep, dimensions are resolved innermost first
/// against the grid's current shape, growing the grid as required.
/// Previously bound sweeps reuse their axes. Resolved axes are stored in
/// `bindings`, and sweeps carrying set values (and not flagged
/// `no_setpoints`) are recorded in `registry`.
///
/// # Errors
///
/// - `GridError::NotImplemented` if a keyword argument is a sweep.
/// - `GridError::IncompatibleAxis` from grid growth.
/// - `GridError::UnorderedAxes` if a sweep's dimensions resolve to axes
///   that are not strictly descending.
/// - `GridError::DuplicateAxis` from the registry.
pub fn resolve_call<T: Clone>(
    grid: &mut ObjectGrid<T>,
    registry: &mut SetpointRegistry,
    bindings: &mut SweepBindings,
    args: &CallArgs<'_>,
) -> Result<ResolvedCall, GridError> {
    let mut named = Vec::with_capacity(args.named.len());
    for (name, param) in &args.named {
        match param {
            Param::Scalar(v) => named.push((name.clone(), *v)),
            Param::Sweep(_) => {
                return Err(GridError::NotImplemented {
                    feature: format!("sweep value passed as keyword argument '{name}'"),
                })
            }
        }
    }

    let mut params = Vec::with_capacity(args.positional.len());
    for param in &args.positional {
        match param {
            Param::Scalar(v) => params.push(ResolvedParam::Scalar(*v)),
            Param::Sweep(sweep) => {
                params.push(ResolvedParam::Sweep(resolve_sweep(
                    grid, registry, bindings, sweep,
                )?));
            }
        }
    }

    Ok(ResolvedCall {
        shape: SmallVec::from_slice(grid.shape()),
        params,
        named,
    })
}

fn resolve_sweep<T: Clone>(
    grid: &mut ObjectGrid<T>,
    registry: &mut SetpointRegistry,
    bindings: &mut SweepBindings,
    sweep: &SweepValue,
) -> Result<ResolvedSweep, GridError> {
    let ndim = sweep.ndim();
    let requested: SmallVec<[SweepAxis; 4]> = match bindings.axes_for(sweep) {
        Some(bound) => bound.iter().map(|&a| SweepAxis::Index(a)).collect(),
        None => SmallVec::from_slice(sweep.axes()),
    };

    let mut axes: Shape = SmallVec::from_elem(0, ndim);
    for d in (0..ndim).rev() {
        axes[d] = grid.grow(requested[d], sweep.shape()[d])?;
    }
    if axes.windows(2).any(|w| w[0] <= w[1]) {
        return Err(GridError::UnorderedAxes {
            axes: axes.to_vec(),
        });
    }
    bindings.bind(sweep.id(), &axes);

    if !sweep.no_setpoints() {
        match sweep.set_values() {
            Some(set_values) => {
                for d in 0..ndim {
                    registry.register(
                        axes[d],
                        sweep.labels()[d].as_str(),
                        sweep.units()[d].as_str(),
                        set_values[d].clone(),
                    )?;
                }
            }
            None => log::warn!(
                "sweep of shape {:?} has no set values; axes {:?} get no setpoints",
                sweep.shape(),
                axes.as_slice()
            ),
        }
    }

    Ok(ResolvedSweep {
        values: sweep.values().clone(),
        strides: row_major_strides(sweep.shape()),
        axes,
    })
}

/// Phase two: apply `f` to every cell, outermost dimension slowest.
///
/// Each call receives the cell's record and the cell's scalar arguments.
/// Records are mutated in place; the first error stops the walk.
///
/// # Errors
///
/// `GridError::UnresolvedSweep` (converted into `E`) if the grid does not
/// cover a sweep argument's axes, and any error returned by `f`.
pub fn fan_out<T, E, F>(grid: &mut ObjectGrid<T>, call: &ResolvedCall, mut f: F) -> Result<(), E>
where
    E: From<GridError>,
    F: FnMut(&mut T, &CellArgs) -> Result<(), E>,
{
    for (position, param) in call.params.iter().enumerate() {
        if let ResolvedParam::Sweep(sweep) = param {
            if !sweep.covered_by(grid.shape()) {
                return Err(GridError::UnresolvedSweep { position }.into());
            }
        }
    }

    let shape: Shape = SmallVec::from_slice(grid.shape());
    let cells = grid.flatten_mut();
    for (flat, index) in IndexIter::new(&shape).enumerate() {
        let mut positional: SmallVec<[f64; 12]> = SmallVec::with_capacity(call.params.len());
        for (position, param) in call.params.iter().enumerate() {
            let v = match param {
                ResolvedParam::Scalar(v) => *v,
                ResolvedParam::Sweep(sweep) => sweep
                    .value_at(&index)
                    .ok_or(GridError::UnresolvedSweep { position })?,
            };
            positional.push(v);
        }
        let args = CellArgs {
            index,
            positional,
            named: call.named.clone(),
        };
        log::trace!("cell {:?} <- {:?}", args.index(), args.positional());
        f(&mut cells[flat], &args)?;
    }
    Ok(())
}

/// Resolve `args` and fan `f` out over the grid in one step.
pub fn dispatch<T, E, F>(
    grid: &mut ObjectGrid<T>,
    registry: &mut SetpointRegistry,
    bindings: &mut SweepBindings,
    args: &CallArgs<'_>,
    f: F,
) -> Result<(), E>
where
    T: Clone,
    E: From<GridError>,
    F: FnMut(&mut T, &CellArgs) -> Result<(), E>,
{
    let call = resolve_call(grid, registry, bindings, args)?;
    fan_out(grid, &call, f)
}
