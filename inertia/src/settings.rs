use crate::InertiaErrors;
use nalgebra::{Matrix3, Vector3};
use rotations::Rotation;
use serde::{Deserialize, Serialize};

fn zero_vector() -> Vector3<f64> {
    Vector3::zeros()
}

/// A discrete mass at a body-frame position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointMass {
    pub mass: f64,
    pub position: Vector3<f64>,
}

impl PointMass {
    pub fn new(mass: f64, position: Vector3<f64>) -> Self {
        Self { mass, position }
    }
}

/// Declarative description of how mass is distributed about a body.
///
/// `PrincipalMoments` and `Matrix` state the tensor directly, about the given
/// center of mass in body axes. `PointMasses` derives both the center of mass
/// and the tensor from the listed masses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MassDistribution {
    PrincipalMoments {
        moments: Vector3<f64>,
        #[serde(default)]
        orientation: Rotation,
        #[serde(default = "zero_vector")]
        center_of_mass: Vector3<f64>,
    },
    Matrix {
        matrix: Matrix3<f64>,
        #[serde(default = "zero_vector")]
        center_of_mass: Vector3<f64>,
    },
    PointMasses(Vec<PointMass>),
}

/// Input descriptor for building an [`crate::InertiaTensor`].
///
/// Immutable for the duration of a run. All validation happens when the
/// tensor is computed, so values deserialized from configuration are checked
/// exactly once, at the same place as programmatic input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InertiaSettings {
    pub mass: f64,
    pub distribution: MassDistribution,
}

impl InertiaSettings {
    pub fn new(mass: f64, distribution: MassDistribution) -> Self {
        Self { mass, distribution }
    }

    /// Settings for a uniform solid sphere about its center.
    ///
    /// # Arguments
    ///
    /// * `mass` - Total mass.
    /// * `radius` - Sphere radius.
    ///
    /// # Returns
    ///
    /// A `Result` with the settings, or `InertiaErrors::DimensionNotPositive`
    /// for a degenerate radius.
    pub fn solid_sphere(mass: f64, radius: f64) -> Result<Self, InertiaErrors> {
        check_dimension("radius", radius)?;
        let moment = 0.4 * mass * radius * radius;
        Ok(Self::new(
            mass,
            MassDistribution::PrincipalMoments {
                moments: Vector3::new(moment, moment, moment),
                orientation: Rotation::IDENTITY,
                center_of_mass: Vector3::zeros(),
            },
        ))
    }

    /// Settings for a uniform solid cuboid with the given edge lengths,
    /// axis-aligned about its center.
    pub fn solid_cuboid(mass: f64, dimensions: Vector3<f64>) -> Result<Self, InertiaErrors> {
        check_dimension("x dimension", dimensions[0])?;
        check_dimension("y dimension", dimensions[1])?;
        check_dimension("z dimension", dimensions[2])?;
        let (dx2, dy2, dz2) = (
            dimensions[0] * dimensions[0],
            dimensions[1] * dimensions[1],
            dimensions[2] * dimensions[2],
        );
        let factor = mass / 12.0;
        Ok(Self::new(
            mass,
            MassDistribution::PrincipalMoments {
                moments: Vector3::new(
                    factor * (dy2 + dz2),
                    factor * (dx2 + dz2),
                    factor * (dx2 + dy2),
                ),
                orientation: Rotation::IDENTITY,
                center_of_mass: Vector3::zeros(),
            },
        ))
    }

    /// Settings for a uniform solid cylinder about its center, with the
    /// symmetry axis along z.
    pub fn solid_cylinder(mass: f64, radius: f64, length: f64) -> Result<Self, InertiaErrors> {
        check_dimension("radius", radius)?;
        check_dimension("length", length)?;
        let r2 = radius * radius;
        let transverse = mass * (3.0 * r2 + length * length) / 12.0;
        Ok(Self::new(
            mass,
            MassDistribution::PrincipalMoments {
                moments: Vector3::new(transverse, transverse, 0.5 * mass * r2),
                orientation: Rotation::IDENTITY,
                center_of_mass: Vector3::zeros(),
            },
        ))
    }
}

fn check_dimension(name: &'static str, value: f64) -> Result<(), InertiaErrors> {
    if !value.is_finite() || value <= f64::EPSILON {
        return Err(InertiaErrors::DimensionNotPositive { name, value });
    }
    Ok(())
}
