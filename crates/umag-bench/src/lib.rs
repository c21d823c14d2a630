//! Benchmark profiles for the umag design workspace.
//!
//! - [`axis_sweeps`]: one sweep per grid axis with the given lengths
//! - [`swept_design`]: a designer session whose grid has a given shape
//!   and one qubit per cell

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use umag::{DesignError, MagnetDesigner};
use umag_sweep::SweepValue;

/// One sweep per entry of `lengths`, outermost first, each pinned to
/// the matching grid axis so the final shape equals `lengths`.
pub fn axis_sweeps(lengths: &[usize]) -> Result<Vec<SweepValue>, DesignError> {
    let ndim = lengths.len();
    lengths
        .iter()
        .enumerate()
        .map(|(d, &n)| {
            let sweep = SweepValue::linspace(0.0, 100.0, n)?.on_axis(ndim - 1 - d)?;
            Ok(sweep)
        })
        .collect()
}

/// A session with a cube whose x, y and z offsets are swept over
/// `lengths` (at most three axes) and one qubit per cell.
pub fn swept_design(lengths: &[usize]) -> Result<MagnetDesigner, DesignError> {
    let sweeps = axis_sweeps(lengths)?;
    let mut design = MagnetDesigner::new();
    design.set_magnetisation([0.0, 0.0, 1.0])?;
    for (k, sweep) in sweeps.iter().enumerate().take(3) {
        let mut center: [umag_grid::Param<'_>; 3] = [0.0.into(); 3];
        center[k] = sweep.into();
        design.add_cube(center, [100.0, 100.0, 50.0])?;
    }
    design.add_observation_position([0.0, 0.0, -80.0])?;
    Ok(design)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swept_design_has_requested_shape() {
        let d = swept_design(&[2, 3, 4]).unwrap();
        assert_eq!(d.shape(), &[2, 3, 4]);
        assert_eq!(d.flatten()[0].volumes.len(), 3);
    }
}
