//! Design a slanted micromagnet pair and sweep the gap between them.
//!
//! Run with `RUST_LOG=debug cargo run -p umag --example slanted_magnet`
//! to see grid growth and axis registration.

use umag::prelude::*;

fn main() -> Result<(), DesignError> {
    env_logger::init();

    let gap = SweepValue::linspace(100.0, 300.0, 5)?.named("gap", "nm");
    // Inner edge of the left bar sits at -gap/2.
    let left = -(&gap * 0.5) - 25.0;

    let mut design = MagnetDesigner::new();
    design.set_magnetisation([1.5, 0.0, 0.0])?;
    design.set_external_field([0.4, 0.0, 0.0])?;

    // A bar and a right triangle facing each other across the gap. The
    // triangle edge is derived from the bar position, so it lands on the
    // axis the bar was placed on and both move together.
    design.add_cube((&left, 0.0, 0.0), [50.0, 1000.0, 200.0])?;
    let right = -&left - 25.0;
    design.add_triangle(
        (&right, -500.0, 0.0),
        (1000.0, -500.0, 0.0),
        (&right, 500.0, 0.0),
        Axis3::Z,
        200.0,
        None,
    )?;

    for y in [-50.0, 0.0, 50.0] {
        design.add_observation_position([0.0, y, -100.0])?;
    }
    println!("grid shape: {:?}", design.shape());

    let field = design.qubit_field()?;
    let bx = field.b("x", FieldUnit::MilliTesla)?;
    let slope = field.db("z", "y", FieldUnit::MilliTesla)?;
    let gaps = field
        .setpoint(0)
        .map(|s| s.coordinates.clone())
        .unwrap_or_default();
    for (i, g) in gaps.iter().enumerate() {
        println!(
            "gap {g:6.1} nm: Bx = {:8.3} mT, dBz/dy = {:7.4} mT/nm",
            bx.get(&[i, 1]).unwrap_or(f64::NAN),
            slope.get(&[i, 1]).unwrap_or(f64::NAN),
        );
    }

    let line = ProbeLattice::slice(Axis3::Y, -600.0, 600.0, 7, 0.0, -100.0)?;
    let map = design.field_map_at(&[0], line)?;
    println!(
        "Bz along y at the narrowest gap: {:?}",
        map.b("z", design.unit())?.as_slice()
    );
    Ok(())
}
