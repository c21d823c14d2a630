//! The [`SweepValue`] type and its construction rules.

use smallvec::SmallVec;
use umag_core::{DenseArray, Shape, SweepError, SweepId};

/// Placeholder label and unit for dimensions that were not named.
pub const NO_LABEL: &str = "no_label";

/// Target grid axis for one sweep dimension.
///
/// Axis numbers count from the innermost grid dimension: axis 0 is the
/// most deeply nested loop. `Auto` sorts below every explicit index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SweepAxis {
    /// Let the dispatcher pick an axis when the sweep is first used.
    Auto,
    /// Use this exact axis.
    Index(usize),
}

impl SweepAxis {
    /// The explicit index, if any.
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Auto => None,
            Self::Index(i) => Some(i),
        }
    }
}

impl From<usize> for SweepAxis {
    fn from(v: usize) -> Self {
        Self::Index(v)
    }
}

/// Raw description of a sweep, validated by [`SweepValue::add_data`].
///
/// Only `values` and `shape` are required. Every optional list must have
/// one entry per dimension.
#[derive(Clone, Debug, Default)]
pub struct SweepData {
    /// Flat row-major values.
    pub values: Vec<f64>,
    /// Extent of every dimension, outermost first.
    pub shape: Shape,
    /// Target axis per dimension; `None` marks every dimension `Auto`.
    pub axis: Option<Vec<SweepAxis>>,
    /// Display label per dimension.
    pub labels: Option<Vec<String>>,
    /// Display unit per dimension.
    pub units: Option<Vec<String>>,
    /// Display coordinates per dimension, `set_values[d].len() == shape[d]`.
    pub set_values: Option<Vec<Vec<f64>>>,
}

impl SweepData {
    /// Values with an explicit shape.
    pub fn new(values: Vec<f64>, shape: &[usize]) -> Self {
        Self {
            values,
            shape: SmallVec::from_slice(shape),
            ..Self::default()
        }
    }

    /// One-dimensional values.
    pub fn from_vec(values: Vec<f64>) -> Self {
        let n = values.len();
        Self::new(values, &[n])
    }

    /// Explicit target axes, one per dimension, strictly descending.
    pub fn with_axis(mut self, axis: impl IntoIterator<Item = usize>) -> Self {
        self.axis = Some(axis.into_iter().map(SweepAxis::Index).collect());
        self
    }

    /// Target axes that may mix explicit indices and `Auto`.
    pub fn with_axes(mut self, axes: Vec<SweepAxis>) -> Self {
        self.axis = Some(axes);
        self
    }

    /// Display labels, one per dimension.
    pub fn with_labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Display units, one per dimension.
    pub fn with_units<S: Into<String>>(mut self, units: impl IntoIterator<Item = S>) -> Self {
        self.units = Some(units.into_iter().map(Into::into).collect());
        self
    }

    /// Display coordinates, one vector per dimension.
    pub fn with_set_values(mut self, set_values: Vec<Vec<f64>>) -> Self {
        self.set_values = Some(set_values);
        self
    }
}

/// One element of a sweep along its leading dimension.
#[derive(Clone, Debug, PartialEq)]
pub enum SweepItem {
    /// The sweep was one-dimensional; this is the raw value.
    Scalar(f64),
    /// The remaining dimensions.
    Sweep(SweepValue),
}

/// A tagged N-dimensional array of candidate values for one builder
/// argument.
///
/// # Invariants
///
/// - `axes`, `labels` and `units` each have one entry per dimension.
/// - Explicit axes are strictly descending across dimensions; `Auto`
///   entries may only trail explicit ones.
/// - `set_values`, when present, has one coordinate vector per dimension
///   matching that dimension's extent.
/// - Every dimension has at least one value.
///
/// Values are never aliased: clones and derived sweeps own their data.
/// Sweeps derived by scalar arithmetic get a fresh [`id`](Self::id) but
/// keep their parent's [`origin`](Self::origin), so they follow the
/// parent onto whatever axes it was placed on.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepValue {
    pub(crate) id: SweepId,
    pub(crate) origin: SweepId,
    pub(crate) values: DenseArray,
    pub(crate) axes: SmallVec<[SweepAxis; 4]>,
    pub(crate) labels: Vec<String>,
    pub(crate) units: Vec<String>,
    pub(crate) set_values: Option<Vec<Vec<f64>>>,
    pub(crate) no_setpoints: bool,
}

impl SweepValue {
    /// Build a user-facing sweep from `data`.
    pub fn from_data(data: SweepData) -> Result<Self, SweepError> {
        Self::build(data, false)
    }

    /// Build an internal sweep that never registers setpoints.
    ///
    /// Used for derived or helper sweeps that should not appear as
    /// labelled axes downstream.
    pub fn internal(data: SweepData) -> Result<Self, SweepError> {
        Self::build(data, true)
    }

    fn build(data: SweepData, no_setpoints: bool) -> Result<Self, SweepError> {
        let id = SweepId::next();
        let mut sweep = Self {
            id,
            origin: id,
            values: DenseArray::from_vec(Vec::new()),
            axes: SmallVec::new(),
            labels: Vec::new(),
            units: Vec::new(),
            set_values: None,
            no_setpoints,
        };
        sweep.add_data(data)?;
        Ok(sweep)
    }

    /// Replace the sweep's contents with `data` after validating it.
    ///
    /// Returns `Err(SweepError::DimensionMismatch)` if:
    /// - `values` does not fill `shape`, or any dimension is empty
    /// - `axis`, `labels`, `units` or `set_values` have the wrong length
    /// - explicit axes are not strictly descending
    ///
    /// On error the sweep is left unchanged.
    pub fn add_data(&mut self, data: SweepData) -> Result<(), SweepError> {
        let values = DenseArray::from_shape_vec(&data.shape, data.values)?;
        if values.is_empty() {
            return Err(SweepError::DimensionMismatch {
                reason: format!("sweep of shape {:?} has no values", values.shape()),
            });
        }
        let ndim = values.ndim();

        let axes: SmallVec<[SweepAxis; 4]> = match data.axis {
            None => SmallVec::from_elem(SweepAxis::Auto, ndim),
            Some(axes) => {
                if axes.len() != ndim {
                    return Err(SweepError::DimensionMismatch {
                        reason: format!(
                            "provided incorrect dimensions for the axis \
                             (axis: {axes:?} <> data: {:?})",
                            values.shape()
                        ),
                    });
                }
                check_descending(&axes)?;
                SmallVec::from_vec(axes)
            }
        };

        let labels = per_dimension(data.labels, ndim, "labels")?;
        let units = per_dimension(data.units, ndim, "units")?;

        let set_values = if self.no_setpoints {
            None
        } else {
            match data.set_values {
                Some(sv) => {
                    if sv.len() != ndim
                        || sv.iter().zip(values.shape()).any(|(s, &n)| s.len() != n)
                    {
                        return Err(SweepError::DimensionMismatch {
                            reason: "set values should have the same dimensions as the data"
                                .to_string(),
                        });
                    }
                    Some(sv)
                }
                None if ndim == 1 => Some(vec![values.as_slice().to_vec()]),
                None => None,
            }
        };

        self.values = values;
        self.axes = axes;
        self.labels = labels;
        self.units = units;
        self.set_values = set_values;
        Ok(())
    }

    /// Identity shared by clones of this sweep.
    pub fn id(&self) -> SweepId {
        self.id
    }

    /// Identity of the sweep this one was derived from by scalar
    /// arithmetic, or its own [`id`](Self::id) if it was built directly.
    pub fn origin(&self) -> SweepId {
        self.origin
    }

    /// The swept values.
    pub fn values(&self) -> &DenseArray {
        &self.values
    }

    /// Extent of every dimension.
    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.values.ndim()
    }

    /// Extent of the leading dimension.
    pub fn len(&self) -> usize {
        self.values.shape()[0]
    }

    /// Always `false`: construction rejects empty sweeps.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Target axis per dimension.
    pub fn axes(&self) -> &[SweepAxis] {
        &self.axes
    }

    /// Display label per dimension.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Display unit per dimension.
    pub fn units(&self) -> &[String] {
        &self.units
    }

    /// Display coordinates per dimension, if any.
    pub fn set_values(&self) -> Option<&[Vec<f64>]> {
        self.set_values.as_deref()
    }

    /// Whether this sweep stays out of the setpoint registry.
    pub fn no_setpoints(&self) -> bool {
        self.no_setpoints
    }

    /// Index the leading dimension.
    ///
    /// One-dimensional sweeps yield the raw value. Deeper sweeps yield a
    /// new sweep (with a fresh ID) that drops the leading axis, label,
    /// unit and set-value entries. Returns `None` if `i` is out of range.
    pub fn get(&self, i: usize) -> Option<SweepItem> {
        if self.ndim() == 1 {
            return self.values.get(&[i]).map(SweepItem::Scalar);
        }
        let values = self.values.slice_leading(i)?;
        let id = SweepId::next();
        Some(SweepItem::Sweep(Self {
            id,
            origin: id,
            values,
            axes: SmallVec::from_slice(&self.axes[1..]),
            labels: self.labels[1..].to_vec(),
            units: self.units[1..].to_vec(),
            set_values: self.set_values.as_ref().map(|sv| sv[1..].to_vec()),
            no_setpoints: self.no_setpoints,
        }))
    }

    /// Replace every target axis with an explicit one, keeping the ID.
    ///
    /// Returns `Err(SweepError::DimensionMismatch)` if `axes` does not
    /// have one strictly descending entry per dimension.
    pub fn pin_axes(&mut self, axes: &[usize]) -> Result<(), SweepError> {
        let axes: Vec<SweepAxis> = axes.iter().map(|&a| SweepAxis::Index(a)).collect();
        if axes.len() != self.ndim() {
            return Err(SweepError::DimensionMismatch {
                reason: format!("expected {} axes, got {}", self.ndim(), axes.len()),
            });
        }
        check_descending(&axes)?;
        self.axes = SmallVec::from_vec(axes);
        Ok(())
    }

    /// A copy with new values and every piece of metadata kept, under a
    /// fresh ID and the same origin.
    pub(crate) fn derive(&self, values: DenseArray) -> Self {
        Self {
            id: SweepId::next(),
            origin: self.origin,
            values,
            axes: self.axes.clone(),
            labels: self.labels.clone(),
            units: self.units.clone(),
            set_values: self.set_values.clone(),
            no_setpoints: self.no_setpoints,
        }
    }
}

fn check_descending(axes: &[SweepAxis]) -> Result<(), SweepError> {
    for pair in axes.windows(2) {
        let ok = match (pair[0], pair[1]) {
            (SweepAxis::Index(a), SweepAxis::Index(b)) => a > b,
            (SweepAxis::Index(_), SweepAxis::Auto) => true,
            (SweepAxis::Auto, SweepAxis::Auto) => true,
            (SweepAxis::Auto, SweepAxis::Index(_)) => false,
        };
        if !ok {
            return Err(SweepError::DimensionMismatch {
                reason: format!("axis must be defined in descending order, e.g. [1, 0]; got {axes:?}"),
            });
        }
    }
    Ok(())
}

fn per_dimension(
    given: Option<Vec<String>>,
    ndim: usize,
    what: &str,
) -> Result<Vec<String>, SweepError> {
    match given {
        None => Ok(vec![NO_LABEL.to_string(); ndim]),
        Some(v) if v.len() == ndim => Ok(v),
        Some(v) => Err(SweepError::DimensionMismatch {
            reason: format!("expected {ndim} {what}, got {}", v.len()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_2x3() -> SweepData {
        SweepData::new((0..6).map(f64::from).collect(), &[2, 3])
    }

    #[test]
    fn defaults_fill_every_dimension() {
        let s = SweepValue::from_data(grid_2x3()).unwrap();
        assert_eq!(s.axes(), &[SweepAxis::Auto, SweepAxis::Auto]);
        assert_eq!(s.labels(), &[NO_LABEL, NO_LABEL]);
        assert_eq!(s.units(), &[NO_LABEL, NO_LABEL]);
        // Multi-dimensional set values cannot be inferred.
        assert!(s.set_values().is_none());
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn one_dimensional_set_values_default_to_values() {
        let s = SweepValue::from_data(SweepData::from_vec(vec![1.0, 2.0])).unwrap();
        assert_eq!(s.set_values().unwrap(), &[vec![1.0, 2.0]]);
    }

    #[test]
    fn internal_sweeps_carry_no_set_values() {
        let s = SweepValue::internal(SweepData::from_vec(vec![1.0, 2.0])).unwrap();
        assert!(s.no_setpoints());
        assert!(s.set_values().is_none());
    }

    #[test]
    fn axis_length_must_match_ndim() {
        let err = SweepValue::from_data(grid_2x3().with_axis([1])).unwrap_err();
        assert!(matches!(err, SweepError::DimensionMismatch { .. }));
    }

    #[test]
    fn axis_must_be_strictly_descending() {
        assert!(SweepValue::from_data(grid_2x3().with_axis([1, 0])).is_ok());
        assert!(SweepValue::from_data(grid_2x3().with_axis([0, 1])).is_err());
        assert!(SweepValue::from_data(grid_2x3().with_axis([1, 1])).is_err());
        assert!(SweepValue::from_data(
            grid_2x3().with_axes(vec![SweepAxis::Index(3), SweepAxis::Auto])
        )
        .is_ok());
        assert!(SweepValue::from_data(
            grid_2x3().with_axes(vec![SweepAxis::Auto, SweepAxis::Index(3)])
        )
        .is_err());
    }

    #[test]
    fn labels_and_units_must_match_ndim() {
        assert!(SweepValue::from_data(grid_2x3().with_labels(["a"])).is_err());
        assert!(SweepValue::from_data(grid_2x3().with_units(["nm", "nm", "nm"])).is_err());
        let s = SweepValue::from_data(grid_2x3().with_labels(["a", "b"]).with_units(["nm", "T"]))
            .unwrap();
        assert_eq!(s.labels(), &["a", "b"]);
    }

    #[test]
    fn set_values_must_match_each_extent() {
        let bad = grid_2x3().with_set_values(vec![vec![0.0, 1.0], vec![0.0, 1.0]]);
        assert!(SweepValue::from_data(bad).is_err());
        let good = grid_2x3().with_set_values(vec![vec![0.0, 1.0], vec![5.0, 6.0, 7.0]]);
        assert!(SweepValue::from_data(good).is_ok());
    }

    #[test]
    fn empty_values_are_rejected() {
        let err = SweepValue::from_data(SweepData::from_vec(vec![])).unwrap_err();
        assert!(matches!(err, SweepError::DimensionMismatch { .. }));
    }

    #[test]
    fn failed_add_data_leaves_sweep_unchanged() {
        let mut s = SweepValue::from_data(SweepData::from_vec(vec![1.0, 2.0])).unwrap();
        let before = s.clone();
        assert!(s.add_data(grid_2x3().with_axis([0, 1])).is_err());
        assert_eq!(s, before);
    }

    #[test]
    fn get_drops_leading_metadata() {
        let s = SweepValue::from_data(
            grid_2x3()
                .with_axis([4, 2])
                .with_labels(["outer", "inner"])
                .with_units(["nm", "T"]),
        )
        .unwrap();
        let Some(SweepItem::Sweep(row)) = s.get(1) else {
            panic!("expected a sub-sweep");
        };
        assert_eq!(row.shape(), &[3]);
        assert_eq!(row.values().as_slice(), &[3.0, 4.0, 5.0]);
        assert_eq!(row.axes(), &[SweepAxis::Index(2)]);
        assert_eq!(row.labels(), &["inner"]);
        assert_eq!(row.units(), &["T"]);
        assert_ne!(row.id(), s.id());

        assert_eq!(row.get(2), Some(SweepItem::Scalar(5.0)));
        assert_eq!(row.get(3), None);
        assert!(s.get(2).is_none());
    }

    #[test]
    fn clone_preserves_id() {
        let s = SweepValue::from_data(SweepData::from_vec(vec![1.0])).unwrap();
        assert_eq!(s.clone().id(), s.id());
    }
}
