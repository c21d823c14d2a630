//! Axis labels, units and coordinates for downstream display.

use indexmap::IndexMap;
use umag_core::{GridError, Shape};

/// Display metadata for one grid axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Setpoint {
    /// Axis index, counted from the innermost dimension.
    pub axis: usize,
    /// Axis label.
    pub label: String,
    /// Unit of `coordinates`.
    pub unit: String,
    /// Coordinate value per position along the axis.
    pub coordinates: Vec<f64>,
}

/// Accumulates one [`Setpoint`] per swept axis.
///
/// Entries are keyed by axis index and never removed. Registration is
/// idempotent for matching metadata; the registry never influences grid
/// growth.
#[derive(Clone, Debug, Default)]
pub struct SetpointRegistry {
    entries: IndexMap<usize, Setpoint>,
}

impl SetpointRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the label, unit and coordinates of `axis`.
    ///
    /// Registering an axis again with the same label, unit and coordinate
    /// count is a no-op that keeps the first coordinates.
    ///
    /// # Errors
    ///
    /// `GridError::DuplicateAxis` if `axis` is already registered with a
    /// different label, unit or coordinate count.
    pub fn register(
        &mut self,
        axis: usize,
        label: impl Into<String>,
        unit: impl Into<String>,
        coordinates: Vec<f64>,
    ) -> Result<(), GridError> {
        let label = label.into();
        let unit = unit.into();
        if let Some(existing) = self.entries.get(&axis) {
            let reason = if existing.label != label {
                Some(format!("label '{}' differs from '{label}'", existing.label))
            } else if existing.unit != unit {
                Some(format!("unit '{}' differs from '{unit}'", existing.unit))
            } else if existing.coordinates.len() != coordinates.len() {
                Some(format!(
                    "{} coordinates registered, got {}",
                    existing.coordinates.len(),
                    coordinates.len()
                ))
            } else {
                None
            };
            return match reason {
                Some(reason) => Err(GridError::DuplicateAxis { axis, reason }),
                None => Ok(()),
            };
        }
        log::debug!(
            "registered setpoint axis {axis} '{label}' ({unit}), {} points",
            coordinates.len()
        );
        self.entries.insert(
            axis,
            Setpoint {
                axis,
                label,
                unit,
                coordinates,
            },
        );
        Ok(())
    }

    /// The entry for `axis`, if registered.
    pub fn lookup(&self, axis: usize) -> Option<&Setpoint> {
        self.entries.get(&axis)
    }

    /// Whether `axis` is registered.
    pub fn contains(&self, axis: usize) -> bool {
        self.entries.contains_key(&axis)
    }

    /// Number of registered axes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered from the outermost (highest) axis inward, matching
    /// grid dimension order.
    pub fn iter(&self) -> impl Iterator<Item = &Setpoint> {
        let mut sorted: Vec<&Setpoint> = self.entries.values().collect();
        sorted.sort_by(|a, b| b.axis.cmp(&a.axis));
        sorted.into_iter()
    }

    /// Coordinate counts ordered from the outermost axis inward.
    pub fn shape(&self) -> Shape {
        self.iter().map(|s| s.coordinates.len()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup() {
        let mut reg = SetpointRegistry::new();
        reg.register(0, "width", "nm", vec![1.0, 2.0]).unwrap();
        let sp = reg.lookup(0).unwrap();
        assert_eq!(sp.label, "width");
        assert_eq!(sp.unit, "nm");
        assert_eq!(sp.coordinates.len(), 2);
        assert!(reg.lookup(1).is_none());
    }

    #[test]
    fn identical_registration_is_idempotent() {
        let mut reg = SetpointRegistry::new();
        reg.register(2, "x", "nm", vec![0.0, 1.0]).unwrap();
        reg.register(2, "x", "nm", vec![5.0, 6.0]).unwrap();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.lookup(2).unwrap().coordinates, vec![0.0, 1.0]);
    }

    #[test]
    fn conflicting_registration_is_duplicate() {
        let mut reg = SetpointRegistry::new();
        reg.register(1, "x", "nm", vec![0.0, 1.0]).unwrap();
        for (label, unit, n) in [("y", "nm", 2), ("x", "um", 2), ("x", "nm", 3)] {
            let err = reg.register(1, label, unit, vec![0.0; n]).unwrap_err();
            assert!(matches!(err, GridError::DuplicateAxis { axis: 1, .. }));
        }
    }

    #[test]
    fn iteration_runs_outermost_first() {
        let mut reg = SetpointRegistry::new();
        reg.register(0, "inner", "nm", vec![0.0; 3]).unwrap();
        reg.register(2, "outer", "nm", vec![0.0; 5]).unwrap();
        reg.register(1, "mid", "T", vec![0.0; 4]).unwrap();
        let labels: Vec<&str> = reg.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["outer", "mid", "inner"]);
        assert_eq!(reg.shape().as_slice(), &[5, 4, 3]);
    }
}
