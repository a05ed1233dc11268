use inertia::{InertiaSettings, InertiaTensor, MassDistribution, PointMass};
use nalgebra::Vector3;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // eight corner masses of a 2 x 2 x 2 cube plus one off-center mass
    let mut points = Vec::new();
    for x in [-1.0, 1.0] {
        for y in [-1.0, 1.0] {
            for z in [-1.0, 1.0] {
                points.push(PointMass::new(1.0, Vector3::new(x, y, z)));
            }
        }
    }
    points.push(PointMass::new(2.0, Vector3::new(0.5, 0.0, 0.0)));

    let settings = InertiaSettings::new(10.0, MassDistribution::PointMasses(points));
    let tensor = InertiaTensor::from_settings(&settings)?;

    println!("mass:              {:10.6}", tensor.mass());
    let com = tensor.center_of_mass();
    println!(
        "center of mass:    {:10.6} {:10.6} {:10.6}",
        com[0], com[1], com[2]
    );
    let moments = tensor.principal_moments();
    println!(
        "principal moments: {:10.6} {:10.6} {:10.6}",
        moments[0], moments[1], moments[2]
    );

    println!("tensor about the center of mass:");
    let matrix = tensor.matrix();
    for row in 0..3 {
        println!(
            "    {:10.6} {:10.6} {:10.6}",
            matrix[(row, 0)],
            matrix[(row, 1)],
            matrix[(row, 2)]
        );
    }
    Ok(())
}
