//! Dense row-major N-dimensional `f64` storage.
//!
//! [`DenseArray`] backs sweep values and the field arrays produced by
//! views. It is deliberately small: shape bookkeeping, flat indexing,
//! leading-dimension slicing and elementwise maps. Anything fancier
//! belongs to the caller.

use crate::error::SweepError;
use smallvec::SmallVec;

/// Extent of every dimension, outermost first.
///
/// Uses `SmallVec<[usize; 4]>` to avoid heap allocation for the common
/// case of up to four sweep axes; deeper grids spill to the heap.
pub type Shape = SmallVec<[usize; 4]>;

/// Row-major strides for `shape` (last dimension has stride 1).
pub fn row_major_strides(shape: &[usize]) -> Shape {
    let mut strides: Shape = SmallVec::from_elem(1, shape.len());
    for d in (0..shape.len().saturating_sub(1)).rev() {
        strides[d] = strides[d + 1] * shape[d + 1];
    }
    strides
}

/// Number of elements held by an array of `shape`.
pub fn element_count(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Odometer over every multi-index of a shape in row-major order.
///
/// The leftmost index varies slowest, matching nested loops written from
/// the outermost dimension inward.
#[derive(Clone, Debug)]
pub struct IndexIter {
    shape: Shape,
    current: Shape,
    done: bool,
}

impl IndexIter {
    /// Iterate all indices of `shape`. An empty iteration results if any
    /// dimension has length zero.
    pub fn new(shape: &[usize]) -> Self {
        Self {
            shape: SmallVec::from_slice(shape),
            current: SmallVec::from_elem(0, shape.len()),
            done: shape.iter().any(|&n| n == 0),
        }
    }
}

impl Iterator for IndexIter {
    type Item = Shape;

    fn next(&mut self) -> Option<Shape> {
        if self.done {
            return None;
        }
        let out = self.current.clone();
        // Advance from the innermost dimension, carrying outward.
        let mut d = self.shape.len();
        loop {
            if d == 0 {
                self.done = true;
                break;
            }
            d -= 1;
            self.current[d] += 1;
            if self.current[d] < self.shape[d] {
                break;
            }
            self.current[d] = 0;
        }
        Some(out)
    }
}

/// Dense N-dimensional array of `f64` in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseArray {
    shape: Shape,
    data: Vec<f64>,
}

impl DenseArray {
    /// Zero-filled array of the given shape.
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            shape: SmallVec::from_slice(shape),
            data: vec![0.0; element_count(shape)],
        }
    }

    /// One-dimensional array holding `data`.
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self {
            shape: smallvec::smallvec![data.len()],
            data,
        }
    }

    /// Wrap `data` with the given shape.
    ///
    /// Returns `Err(SweepError::DimensionMismatch)` if the element count
    /// implied by `shape` differs from `data.len()` or `shape` is empty.
    pub fn from_shape_vec(shape: &[usize], data: Vec<f64>) -> Result<Self, SweepError> {
        if shape.is_empty() {
            return Err(SweepError::DimensionMismatch {
                reason: "array must have at least one dimension".to_string(),
            });
        }
        let expected = element_count(shape);
        if expected != data.len() {
            return Err(SweepError::DimensionMismatch {
                reason: format!(
                    "shape {shape:?} holds {expected} elements, got {}",
                    data.len()
                ),
            });
        }
        Ok(Self {
            shape: SmallVec::from_slice(shape),
            data,
        })
    }

    /// Build an array by evaluating `f` at every multi-index.
    pub fn from_fn(shape: &[usize], mut f: impl FnMut(&[usize]) -> f64) -> Self {
        let data = IndexIter::new(shape).map(|idx| f(&idx)).collect();
        Self {
            shape: SmallVec::from_slice(shape),
            data,
        }
    }

    /// Extent of every dimension.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat row-major view of the elements.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable flat row-major view of the elements.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume the array, returning its flat storage.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Flat offset of a multi-index, or `None` if it is out of bounds or
    /// has the wrong number of components.
    pub fn flat_index(&self, index: &[usize]) -> Option<usize> {
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

    /// Element at a multi-index.
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        self.flat_index(index).map(|i| self.data[i])
    }

    /// Mutable element at a multi-index.
    pub fn get_mut(&mut self, index: &[usize]) -> Option<&mut f64> {
        let i = self.flat_index(index)?;
        Some(&mut self.data[i])
    }

    /// Drop every dimension of extent 1. An array whose dimensions all
    /// have extent 1 becomes shape `[1]`.
    pub fn squeeze(self) -> Self {
        let mut shape: Shape = self.shape.iter().copied().filter(|&n| n != 1).collect();
        if shape.is_empty() {
            shape.push(1);
        }
        Self {
            shape,
            data: self.data,
        }
    }

    /// The sub-array obtained by fixing dimension 0 at `i`.
    ///
    /// Returns `None` for one-dimensional arrays (use [`get`](Self::get))
    /// or when `i` is out of range.
    pub fn slice_leading(&self, i: usize) -> Option<DenseArray> {
        if self.shape.len() < 2 || i >= self.shape[0] {
            return None;
        }
        let inner = element_count(&self.shape[1..]);
        Some(Self {
            shape: SmallVec::from_slice(&self.shape[1..]),
            data: self.data[i * inner..(i + 1) * inner].to_vec(),
        })
    }

    /// Apply `f` to every element, returning a new array of the same shape.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            shape: self.shape.clone(),
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Apply `f` to every element in place.
    pub fn map_inplace(&mut self, f: impl Fn(f64) -> f64) {
        for v in &mut self.data {
            *v = f(*v);
        }
    }

    /// Combine two arrays of identical shape elementwise.
    ///
    /// Returns `None` if the shapes differ.
    pub fn zip_map(&self, other: &DenseArray, f: impl Fn(f64, f64) -> f64) -> Option<Self> {
        if self.shape != other.shape {
            return None;
        }
        Some(Self {
            shape: self.shape.clone(),
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    /// Outer combination of two one-dimensional arrays:
    /// `out[i, j] = f(a[i], b[j])`.
    ///
    /// Returns `None` unless both inputs are one-dimensional.
    pub fn outer(a: &DenseArray, b: &DenseArray, f: impl Fn(f64, f64) -> f64) -> Option<Self> {
        if a.ndim() != 1 || b.ndim() != 1 {
            return None;
        }
        let mut data = Vec::with_capacity(a.len() * b.len());
        for &x in &a.data {
            for &y in &b.data {
                data.push(f(x, y));
            }
        }
        Some(Self {
            shape: smallvec::smallvec![a.len(), b.len()],
            data,
        })
    }
}
