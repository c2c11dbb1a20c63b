use std::path::Path;
use std::process::ExitCode;

use brick9_solver::elements::brick9::NUM_DOFS;
use brick9_solver::{Brick9, ElementDescription, ElementError};

fn usage() {
    eprintln!("usage:");
    eprintln!("  brick9-solver evaluate <element.json>");
    eprintln!("  brick9-solver points <element.json>");
}

fn print_evaluation(elem: &Brick9) -> Result<(), ElementError> {
    let mass = elem.mass_matrix()?;
    let gravity = elem.gravity_force()?;
    let forces = elem.internal_forces()?;
    let (k, r) = elem.stiffness_and_damping()?;

    let corner_mass: f64 = mass.view((0, 0), (24, 24)).iter().sum();
    let mut gravity_sum = [0.0; 3];
    for row in 0..8 {
        for (i, g) in gravity_sum.iter_mut().enumerate() {
            *g += gravity[3 * row + i];
        }
    }

    println!("dofs: {}", NUM_DOFS);
    println!("volume: {:.6e}", elem.volume()?);
    println!("translational_mass: {:.6e}", corner_mass / 3.0);
    println!(
        "gravity_sum: {:.6e} {:.6e} {:.6e}",
        gravity_sum[0], gravity_sum[1], gravity_sum[2]
    );
    println!("internal_force_norm: {:.6e}", forces.norm());
    println!("stiffness_norm: {:.6e}", k.norm());
    println!("damping_norm: {:.6e}", r.norm());
    Ok(())
}

fn print_points(elem: &Brick9) -> Result<(), ElementError> {
    let results = elem.integration_point_results()?;
    let json = serde_json::to_string_pretty(&results).map_err(ElementError::from)?;
    println!("{json}");
    Ok(())
}

fn load(path: &Path) -> Result<Brick9, ElementError> {
    let desc = ElementDescription::from_file(path)?;
    let (_nodes, elem) = desc.build()?;
    Ok(elem)
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        usage();
        return ExitCode::from(2);
    }

    let path = Path::new(&args[2]);
    let result = match args[1].as_str() {
        "evaluate" => load(path).and_then(|elem| print_evaluation(&elem)),
        "points" => load(path).and_then(|elem| print_points(&elem)),
        _ => {
            usage();
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {err}", path.display());
            ExitCode::from(1)
        }
    }
}
