//! Range constructors and chainable metadata setters.

use crate::sweep::{SweepAxis, SweepData, SweepValue};
use umag_core::SweepError;

fn check_count(n: usize) -> Result<(), SweepError> {
    if n == 0 {
        return Err(SweepError::DimensionMismatch {
            reason: "a range sweep needs at least one value".to_string(),
        });
    }
    Ok(())
}

/// `n` evenly spaced values from `start` to `stop`, both inclusive.
///
/// The last value is exactly `stop`.
fn linear(start: f64, stop: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![start];
    }
    let step = (stop - start) / (n - 1) as f64;
    let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
    out[n - 1] = stop;
    out
}

impl SweepValue {
    /// `n` evenly spaced values over `[start, stop]`.
    ///
    /// Returns `Err(SweepError::DimensionMismatch)` if `n == 0`.
    pub fn linspace(start: f64, stop: f64, n: usize) -> Result<Self, SweepError> {
        check_count(n)?;
        Self::from_data(SweepData::from_vec(linear(start, stop, n)))
    }

    /// `n` values spaced evenly on a log scale, from `10^start` to
    /// `10^stop`.
    pub fn logspace(start: f64, stop: f64, n: usize) -> Result<Self, SweepError> {
        check_count(n)?;
        let values = linear(start, stop, n)
            .into_iter()
            .map(|e| 10f64.powf(e))
            .collect();
        Self::from_data(SweepData::from_vec(values))
    }

    /// `n` values in geometric progression from `start` to `stop`.
    ///
    /// Both bounds must be non-zero and share a sign; otherwise returns
    /// `Err(SweepError::DimensionMismatch)`.
    pub fn geomspace(start: f64, stop: f64, n: usize) -> Result<Self, SweepError> {
        check_count(n)?;
        if start == 0.0 || stop == 0.0 || start.signum() != stop.signum() {
            return Err(SweepError::DimensionMismatch {
                reason: format!(
                    "geometric range needs non-zero bounds of equal sign, got {start} and {stop}"
                ),
            });
        }
        let sign = start.signum();
        let mut values: Vec<f64> = linear(start.abs().log10(), stop.abs().log10(), n)
            .into_iter()
            .map(|e| sign * 10f64.powf(e))
            .collect();
        values[0] = start;
        values[n - 1] = stop;
        Self::from_data(SweepData::from_vec(values))
    }

    /// Set the label and unit of the leading dimension.
    pub fn named(mut self, label: impl Into<String>, unit: impl Into<String>) -> Self {
        self.labels[0] = label.into();
        self.units[0] = unit.into();
        self
    }

    /// Pin a one-dimensional sweep to an explicit grid axis.
    pub fn on_axis(mut self, axis: usize) -> Result<Self, SweepError> {
        if self.ndim() != 1 {
            return Err(SweepError::DimensionMismatch {
                reason: format!(
                    "on_axis sets a single axis but the sweep has {} dimensions",
                    self.ndim()
                ),
            });
        }
        self.axes[0] = SweepAxis::Index(axis);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umag_core::SweepError;

    #[test]
    fn linspace_hits_both_ends() {
        let s = SweepValue::linspace(20.0, 80.0, 5).unwrap();
        assert_eq!(s.values().as_slice(), &[20.0, 35.0, 50.0, 65.0, 80.0]);
        assert_eq!(s.axes(), &[SweepAxis::Auto]);
    }

    #[test]
    fn single_point_range_is_start() {
        let s = SweepValue::linspace(3.0, 9.0, 1).unwrap();
        assert_eq!(s.values().as_slice(), &[3.0]);
    }

    #[test]
    fn zero_count_is_rejected() {
        for r in [
            SweepValue::linspace(0.0, 1.0, 0),
            SweepValue::logspace(0.0, 1.0, 0),
            SweepValue::geomspace(1.0, 2.0, 0),
        ] {
            assert!(matches!(r, Err(SweepError::DimensionMismatch { .. })));
        }
    }

    #[test]
    fn logspace_uses_decade_exponents() {
        let s = SweepValue::logspace(0.0, 2.0, 3).unwrap();
        let v = s.values().as_slice();
        assert!((v[0] - 1.0).abs() < 1e-12);
        assert!((v[1] - 10.0).abs() < 1e-12);
        assert!((v[2] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn geomspace_has_constant_ratio() {
        let s = SweepValue::geomspace(-1.0, -1000.0, 4).unwrap();
        let v = s.values().as_slice();
        assert_eq!(v[0], -1.0);
        assert_eq!(v[3], -1000.0);
        assert!((v[1] + 10.0).abs() < 1e-9);
        assert!((v[2] + 100.0).abs() < 1e-9);
        assert!(SweepValue::geomspace(0.0, 1.0, 3).is_err());
        assert!(SweepValue::geomspace(-1.0, 1.0, 3).is_err());
    }

    #[test]
    fn named_and_on_axis_chain() {
        let s = SweepValue::linspace(0.0, 1.0, 3)
            .unwrap()
            .named("width", "nm")
            .on_axis(2)
            .unwrap();
        assert_eq!(s.labels(), &["width"]);
        assert_eq!(s.units(), &["nm"]);
        assert_eq!(s.axes(), &[SweepAxis::Index(2)]);
    }
}
