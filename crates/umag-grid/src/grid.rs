//! Dense N-dimensional grid of owned records.

use crate::resolve::resolve_new_shape;
use smallvec::SmallVec;
use umag_core::array::{element_count, row_major_strides, IndexIter};
use umag_core::{GridError, Shape};
use umag_sweep::SweepAxis;

/// An N-dimensional array holding exactly one record per cell.
///
/// Cells are stored row-major (last dimension fastest). The grid starts
/// as a single cell of shape `[1]` and only ever grows. Growth clones
/// existing records into every new slice, so no two cells share state.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectGrid<T> {
    shape: Shape,
    cells: Vec<T>,
}

impl<T> ObjectGrid<T> {
    /// Wrap row-major `cells` with `shape`.
    ///
    /// Returns `None` if the shape is empty or does not match the number
    /// of cells.
    pub fn from_shape_vec(shape: &[usize], cells: Vec<T>) -> Option<Self> {
        if shape.is_empty() || element_count(shape) != cells.len() {
            return None;
        }
        Some(Self {
            shape: SmallVec::from_slice(shape),
            cells,
        })
    }

    /// Extent of every dimension, outermost first.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells. Never true for grids built with
    /// [`ObjectGrid::new`].
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn flat_index(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0usize;
        for (&i, &n) in index.iter().zip(self.shape.iter()) {
            if i >= n {
                return None;
            }
            flat = flat * n + i;
        }
        Some(flat)
    }

    /// Record at a multi-index.
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        self.flat_index(index).map(|i| &self.cells[i])
    }

    /// Mutable record at a multi-index.
    pub fn get_mut(&mut self, index: &[usize]) -> Option<&mut T> {
        let i = self.flat_index(index)?;
        Some(&mut self.cells[i])
    }

    /// All records in row-major order.
    pub fn flatten(&self) -> &[T] {
        &self.cells
    }

    /// All records in row-major order, mutably.
    pub fn flatten_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Iterate records in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.cells.iter()
    }

    /// Iterate `(multi-index, record)` pairs in row-major order.
    pub fn indexed_iter(&self) -> impl Iterator<Item = (Shape, &T)> + '_ {
        IndexIter::new(&self.shape).zip(self.cells.iter())
    }

    /// A grid of the same shape holding `f(record)` per cell.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> ObjectGrid<U> {
        ObjectGrid {
            shape: self.shape.clone(),
            cells: self.cells.iter().map(f).collect(),
        }
    }

    /// Like [`map`](Self::map), stopping at the first error.
    pub fn try_map<U, E>(&self, f: impl FnMut(&T) -> Result<U, E>) -> Result<ObjectGrid<U>, E> {
        Ok(ObjectGrid {
            shape: self.shape.clone(),
            cells: self.cells.iter().map(f).collect::<Result<_, _>>()?,
        })
    }

    /// Consume the grid, returning its row-major records.
    pub fn into_vec(self) -> Vec<T> {
        self.cells
    }
}

impl<T: Clone> ObjectGrid<T> {
    /// A single-cell grid of shape `[1]`.
    pub fn new(record: T) -> Self {
        Self {
            shape: smallvec::smallvec![1],
            cells: vec![record],
        }
    }

    /// Grow explicit axis `axis` (counted from the trailing dimension) to
    /// `new_len`, padding with extent-1 dimensions if the grid is not yet
    /// deep enough.
    ///
    /// # Errors
    ///
    /// `GridError::IncompatibleAxis` if the axis already exists with an
    /// extent other than 1 or `new_len`.
    pub fn grow_axis(&mut self, axis: usize, new_len: usize) -> Result<(), GridError> {
        self.grow(SweepAxis::Index(axis), new_len).map(|_| ())
    }

    /// Place one sweep dimension of length `len` on `axis` and return the
    /// concrete axis it landed on. See [`resolve_new_shape`].
    pub fn grow(&mut self, axis: SweepAxis, len: usize) -> Result<usize, GridError> {
        let (shape, concrete) = resolve_new_shape(&self.shape, axis, len)?;
        self.expand_to(&shape)?;
        Ok(concrete)
    }

    /// Broadcast the grid to `target`.
    ///
    /// `target` may add outer dimensions and may grow any existing
    /// dimension of extent 1. Each new cell is a clone of the cell it
    /// broadcasts from; existing multi-indices keep their content.
    ///
    /// # Errors
    ///
    /// `GridError::IncompatibleAxis` if `target` has fewer dimensions than
    /// the grid or changes an extent other than 1.
    pub fn expand_to(&mut self, target: &[usize]) -> Result<(), GridError> {
        let ndim = self.shape.len();
        if target.len() < ndim {
            return Err(GridError::IncompatibleAxis {
                axis: target.len(),
                existing: self.shape[ndim - 1 - target.len()],
                requested: 1,
            });
        }
        let offset = target.len() - ndim;
        for (d, &old) in self.shape.iter().enumerate() {
            let new = target[offset + d];
            if new != old && old != 1 {
                return Err(GridError::IncompatibleAxis {
                    axis: ndim - 1 - d,
                    existing: old,
                    requested: new,
                });
            }
        }
        if target == self.shape.as_slice() {
            return Ok(());
        }

        let strides = row_major_strides(&self.shape);
        let mut cells = Vec::with_capacity(element_count(target));
        for index in IndexIter::new(target) {
            let mut src = 0usize;
            for d in 0..ndim {
                if self.shape[d] != 1 {
                    src += index[offset + d] * strides[d];
                }
            }
            cells.push(self.cells[src].clone());
        }
        log::debug!("grid grown from {:?} to {:?}", self.shape.as_slice(), target);
        self.shape = SmallVec::from_slice(target);
        self.cells = cells;
        Ok(())
    }
}
