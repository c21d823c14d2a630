//! Property tests for grid growth and dispatch.

use proptest::prelude::*;
use umag_core::array::IndexIter;
use umag_core::GridError;
use umag_grid::{dispatch, CallArgs, ObjectGrid, SetpointRegistry, SweepBindings};
use umag_sweep::{SweepData, SweepValue};

fn tagged(shape: &[usize]) -> ObjectGrid<Vec<usize>> {
    let cells = IndexIter::new(shape)
        .enumerate()
        .map(|(flat, _)| vec![flat])
        .collect();
    ObjectGrid::from_shape_vec(shape, cells).unwrap()
}

proptest! {
    #[test]
    fn growth_preserves_existing_cells(
        shape in prop::collection::vec(1usize..4, 1..4),
        axis in 0usize..5,
        len in 1usize..4,
    ) {
        let before = tagged(&shape);
        let mut grid = before.clone();
        if grid.grow_axis(axis, len).is_ok() {
            let offset = grid.ndim() - before.ndim();
            for (idx, cell) in before.indexed_iter() {
                let mut padded = vec![0usize; offset];
                padded.extend_from_slice(&idx);
                prop_assert_eq!(grid.get(&padded), Some(cell));
            }
        }
    }

    #[test]
    fn grown_cells_never_alias(
        shape in prop::collection::vec(1usize..4, 1..3),
        axis in 0usize..4,
        len in 2usize..4,
        pick in any::<prop::sample::Index>(),
    ) {
        let mut grid = tagged(&shape);
        prop_assume!(grid.grow_axis(axis, len).is_ok());
        let snapshot = grid.clone();
        let target = pick.index(grid.len());
        grid.flatten_mut()[target].push(usize::MAX);
        for (i, cell) in grid.iter().enumerate() {
            if i != target {
                prop_assert_eq!(cell, &snapshot.flatten()[i]);
            }
        }
    }

    #[test]
    fn outer_product_of_two_sweeps(
        n in 1usize..6,
        m in 2usize..6,
    ) {
        let a_values = (0..n).map(|i| i as f64).collect();
        let b_values = (0..m).map(|i| 10.0 * i as f64).collect();
        let a = SweepValue::from_data(SweepData::from_vec(a_values).with_axis([0])).unwrap();
        let b = SweepValue::from_data(SweepData::from_vec(b_values).with_axis([1])).unwrap();
        let mut grid = ObjectGrid::new(0.0f64);
        let mut registry = SetpointRegistry::new();
        let mut bindings = SweepBindings::new();
        let args = CallArgs::new().arg(&a).arg(&b);
        dispatch::<_, GridError, _>(&mut grid, &mut registry, &mut bindings, &args, |cell, c| {
            *cell = c.positional().iter().sum();
            Ok(())
        })
        .unwrap();
        prop_assert_eq!(grid.shape(), &[m, n][..]);
        for (idx, &v) in grid.indexed_iter() {
            prop_assert_eq!(v, 10.0 * idx[0] as f64 + idx[1] as f64);
        }
    }
}
