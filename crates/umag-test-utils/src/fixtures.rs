//! Canned scene grids.
//!
//! - [`single_cube`]: one x-polarized cube with one qubit below it.
//! - [`width_sweep`]: the same cube with its width swept over `n` values,
//!   built through the dispatcher so the registry is populated.
//! - [`uneven_observations`]: a two-cell grid whose cells disagree on
//!   their qubit count.

use umag_core::GridError;
use umag_grid::{dispatch, CallArgs, ObjectGrid, SetpointRegistry, SweepBindings};
use umag_scene::SceneRecord;
use umag_sweep::SweepValue;

/// A grid, its registry and the bindings produced while building it.
pub struct Fixture {
    pub grid: ObjectGrid<SceneRecord>,
    pub registry: SetpointRegistry,
    pub bindings: SweepBindings,
}

pub fn single_cube() -> ObjectGrid<SceneRecord> {
    let mut r = SceneRecord::default();
    r.add_cube([0.0; 3], [100.0, 100.0, 50.0]);
    r.add_observation_position([0.0, 0.0, -80.0]);
    ObjectGrid::new(r)
}

/// Cube widths `linspace(20, 80, n)` on axis 0, labelled "width" in nm.
pub fn width_sweep(n: usize) -> Fixture {
    let mut fixture = Fixture {
        grid: single_cube(),
        registry: SetpointRegistry::new(),
        bindings: SweepBindings::new(),
    };
    let width = SweepValue::linspace(20.0, 80.0, n)
        .unwrap()
        .named("width", "nm");
    let args = CallArgs::new().arg(&width);
    dispatch::<_, GridError, _>(
        &mut fixture.grid,
        &mut fixture.registry,
        &mut fixture.bindings,
        &args,
        |record, cell| {
            if let (Some(w), Some(cube)) = (cell.get(0), record.volumes.first_mut()) {
                cube.size[0] = w * umag_scene::NM;
            }
            Ok(())
        },
    )
    .unwrap();
    fixture
}

pub fn uneven_observations() -> ObjectGrid<SceneRecord> {
    let mut grid = single_cube();
    grid.grow_axis(0, 2).unwrap();
    grid.get_mut(&[1])
        .unwrap()
        .add_observation_position([10.0, 0.0, -80.0]);
    grid
}
