//! Physical consistency checks for the scene pipeline: tessellation,
//! realization, gradients and views evaluated together.

use umag_core::vector::Axis3;
use umag_grid::{ObjectGrid, SetpointRegistry};
use umag_scene::{
    field_gradient, realize, DerivativeConfig, FieldSource, FieldUnit, FiniteDifference,
    MagnetCollection, QubitField, SceneRecord,
};

const QUBIT: [f64; 3] = [40.0, 30.0, -60.0];

fn triangle(n: usize) -> MagnetCollection {
    let mut r = SceneRecord::with_magnetisation([0.0, 0.0, 1.2]);
    r.add_triangle(
        [[0.0, 0.0, 0.0], [200.0, 0.0, 0.0], [0.0, 150.0, 0.0]],
        Axis3::Z,
        50.0,
        n,
    )
    .unwrap();
    r.add_observation_position(QUBIT);
    MagnetCollection::from_record(&r)
}

fn bz(c: &MagnetCollection) -> f64 {
    c.evaluate_field(c.observation_points())[0][2]
}

#[test]
fn staircase_converges_with_slab_count() {
    let fine = bz(&triangle(160));
    let coarse_err = (bz(&triangle(5)) - fine).abs();
    let mid_err = (bz(&triangle(40)) - fine).abs();
    assert!(mid_err < coarse_err, "{mid_err} !< {coarse_err}");
    assert!(mid_err < 5e-2 * fine.abs());
}

#[test]
fn forward_and_central_gradients_agree_for_small_steps() {
    let mut c = triangle(20);
    let p = c.observation_points().to_vec();
    let base = c.evaluate_field(&p);
    let small = |scheme| DerivativeConfig {
        step_nm: 0.05,
        scheme,
    };
    let fwd = field_gradient(&mut c, &p, &base, &small(FiniteDifference::Forward));
    let ctr = field_gradient(&mut c, &p, &base, &small(FiniteDifference::Central));
    let scale = Axis3::ALL
        .iter()
        .flat_map(|&a| ctr.along(a)[0])
        .fold(0.0_f64, |m, v| m.max(v.abs()));
    for axis in Axis3::ALL {
        for k in 0..3 {
            let (a, b) = (fwd.along(axis)[0][k], ctr.along(axis)[0][k]);
            assert!(
                (a - b).abs() <= 1e-2 * scale,
                "d{axis}, component {k}: {a} vs {b}"
            );
        }
    }
    assert_eq!(c.evaluate_field(&p), base);
}

#[test]
fn qubit_field_matches_direct_evaluation_per_cell() {
    let mut grid = ObjectGrid::new(SceneRecord::default());
    grid.grow_axis(0, 3).unwrap();
    for (i, cell) in grid.flatten_mut().iter_mut().enumerate() {
        cell.add_cube([0.0; 3], [100.0, 100.0, 40.0 + 10.0 * i as f64]);
        cell.add_observation_position([0.0, 0.0, -80.0]);
        cell.add_observation_position([25.0, 0.0, -80.0]);
    }
    let mut scenes = realize(&grid);
    let direct: Vec<_> = scenes
        .iter()
        .map(|c| c.evaluate_field(c.observation_points()))
        .collect();

    let qf = QubitField::evaluate(
        &mut scenes,
        &SetpointRegistry::new(),
        &DerivativeConfig::default(),
    )
    .unwrap();
    let bx = qf.b("x", FieldUnit::Tesla).unwrap();
    assert_eq!(bx.shape(), &[3, 2]);
    for (cell, points) in direct.iter().enumerate() {
        for (p, b) in points.iter().enumerate() {
            assert_eq!(bx.get(&[cell, p]), Some(b[0]));
        }
    }
    // Thicker magnets give a stronger field below them.
    assert!(bx.get(&[2, 0]).unwrap().abs() > bx.get(&[0, 0]).unwrap().abs());
}

#[test]
fn unit_scaling_applies_to_field_and_gradient() {
    let mut c = triangle(10);
    let mut grid = ObjectGrid::new(c.clone());
    let qf = QubitField::evaluate(
        &mut grid,
        &SetpointRegistry::new(),
        &DerivativeConfig::default(),
    )
    .unwrap();
    let t = qf.b("z", FieldUnit::Tesla).unwrap().as_slice()[0];
    let ghz = qf.b("z", FieldUnit::GHz).unwrap().as_slice()[0];
    assert!((ghz - t * 28.5714).abs() < 1e-12 * ghz.abs().max(1.0));

    let p = c.observation_points().to_vec();
    let base = c.evaluate_field(&p);
    let g = field_gradient(&mut c, &p, &base, &DerivativeConfig::default());
    let db = qf.db("z", "x", FieldUnit::MilliTesla).unwrap().as_slice()[0];
    assert!((db - g.along(Axis3::X)[0][2] * 1e3).abs() < 1e-12);
}
