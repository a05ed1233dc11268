use crate::{InertiaErrors, InertiaSettings, MassDistribution, PointMass};
use nalgebra::{Matrix3, Vector3};
use rotations::prelude::*;
use serde::{Deserialize, Serialize};

// Admits equality cases such as planar bodies, where one moment equals the
// sum of the other two up to fp noise.
const REALIZABILITY_SLACK: f64 = 1e-9;
const SYMMETRY_TOL: f64 = 1e-9;
const POINT_MASS_SUM_TOL: f64 = 1e-6;

const AXIS_NAMES: [&str; 3] = ["x", "y", "z"];
const PRINCIPAL_NAMES: [&str; 3] = ["principal axis 1", "principal axis 2", "principal axis 3"];

/// A validated inertia tensor in principal form.
///
/// Holds the three principal moments, the unit quaternion rotating
/// principal-frame vectors into body frame, the center of mass in body axes,
/// and the total mass. Read-only once constructed; to change the mass
/// distribution, build new settings and recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InertiaTensor {
    mass: f64,
    center_of_mass: Vector3<f64>,
    principal_moments: Vector3<f64>,
    orientation: Quaternion,
}

impl Default for InertiaTensor {
    /// Unit mass with unit moments, the conventional placeholder before real
    /// settings are applied.
    fn default() -> Self {
        Self {
            mass: 1.0,
            center_of_mass: Vector3::zeros(),
            principal_moments: Vector3::new(1.0, 1.0, 1.0),
            orientation: Quaternion::IDENTITY,
        }
    }
}

impl InertiaTensor {
    /// Computes the tensor for a mass distribution.
    ///
    /// Principal-moment input is taken as declared. Matrix and point-mass
    /// input is reduced to principal form by symmetric eigendecomposition,
    /// with eigenvalues sorted ascending and the eigenbasis corrected to
    /// right-handed. Point-mass input derives the center of mass first and
    /// takes second moments about it.
    ///
    /// # Arguments
    ///
    /// * `settings` - The mass distribution descriptor.
    ///
    /// # Returns
    ///
    /// A `Result` which is `Ok` containing the validated `InertiaTensor`, or
    /// an `Err` of `InertiaErrors` naming the offending value. Deterministic
    /// and side-effect free.
    pub fn from_settings(settings: &InertiaSettings) -> Result<Self, InertiaErrors> {
        let mass = settings.mass;
        if !mass.is_finite() || mass <= f64::EPSILON {
            return Err(InertiaErrors::MassNotPositive(mass));
        }

        match &settings.distribution {
            MassDistribution::PrincipalMoments {
                moments,
                orientation,
                center_of_mass,
            } => {
                check_moments(moments, &AXIS_NAMES)?;
                check_center_of_mass(center_of_mass)?;
                let orientation = orientation.to_quaternion()?;
                Ok(Self {
                    mass,
                    center_of_mass: *center_of_mass,
                    principal_moments: *moments,
                    orientation,
                })
            }
            MassDistribution::Matrix {
                matrix,
                center_of_mass,
            } => {
                check_center_of_mass(center_of_mass)?;
                Self::from_full_matrix(matrix, *center_of_mass, mass)
            }
            MassDistribution::PointMasses(points) => {
                let (center_of_mass, matrix) = reduce_point_masses(points, mass)?;
                Self::from_full_matrix(&matrix, center_of_mass, mass)
            }
        }
    }

    /// Reduces a full symmetric matrix about the center of mass to principal
    /// form.
    fn from_full_matrix(
        matrix: &Matrix3<f64>,
        center_of_mass: Vector3<f64>,
        mass: f64,
    ) -> Result<Self, InertiaErrors> {
        for row in 0..3 {
            for col in 0..3 {
                if !matrix[(row, col)].is_finite() {
                    return Err(InertiaErrors::MatrixNotFinite { row, col });
                }
            }
        }

        let scale = matrix.abs().max().max(1.0);
        let asymmetry = (matrix - matrix.transpose()).abs().max();
        if asymmetry > SYMMETRY_TOL * scale {
            return Err(InertiaErrors::MatrixNotSymmetric(asymmetry));
        }

        let eigen = matrix.symmetric_eigen();

        // ascending eigenvalue order gives a stable principal convention
        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| {
            eigen.eigenvalues[a]
                .partial_cmp(&eigen.eigenvalues[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let moments = Vector3::new(
            eigen.eigenvalues[order[0]],
            eigen.eigenvalues[order[1]],
            eigen.eigenvalues[order[2]],
        );
        check_moments(&moments, &PRINCIPAL_NAMES)?;

        let mut columns = [
            eigen.eigenvectors.column(order[0]).into_owned(),
            eigen.eigenvectors.column(order[1]).into_owned(),
            eigen.eigenvectors.column(order[2]).into_owned(),
        ];
        if Matrix3::from_columns(&columns).determinant() < 0.0 {
            columns[2] = -columns[2];
        }
        let basis = RotationMatrix::from_columns(columns[0], columns[1], columns[2])
            .map_err(RotationErrors::from)?;
        let orientation = Quaternion::from(&basis)
            .normalize()
            .map_err(RotationErrors::from)?;

        Ok(Self {
            mass,
            center_of_mass,
            principal_moments: moments,
            orientation,
        })
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Center of mass in body axes.
    pub fn center_of_mass(&self) -> Vector3<f64> {
        self.center_of_mass
    }

    /// The three principal moments of inertia.
    pub fn principal_moments(&self) -> Vector3<f64> {
        self.principal_moments
    }

    /// Unit quaternion rotating principal-frame vectors into the body frame.
    pub fn orientation(&self) -> Quaternion {
        self.orientation
    }

    /// The full symmetric tensor about the center of mass in body axes,
    /// `R * diag(moments) * R^T`.
    ///
    /// This is the conversion target for hosts that take a full matrix rather
    /// than a diagonal plus rotation.
    pub fn matrix(&self) -> Matrix3<f64> {
        let r = *RotationMatrix::from(&self.orientation).matrix();
        r * Matrix3::from_diagonal(&self.principal_moments) * r.transpose()
    }
}

fn check_moments(moments: &Vector3<f64>, names: &[&'static str; 3]) -> Result<(), InertiaErrors> {
    for i in 0..3 {
        if !moments[i].is_finite() || moments[i] <= f64::EPSILON {
            return Err(InertiaErrors::MomentNotPositive {
                axis: names[i],
                value: moments[i],
            });
        }
    }
    let slack = REALIZABILITY_SLACK * moments.max();
    for i in 0..3 {
        let others = moments.sum() - moments[i];
        if moments[i] > others + slack {
            return Err(InertiaErrors::MomentsNotRealizable(
                moments[0], moments[1], moments[2],
            ));
        }
    }
    Ok(())
}

fn check_center_of_mass(center_of_mass: &Vector3<f64>) -> Result<(), InertiaErrors> {
    for i in 0..3 {
        if !center_of_mass[i].is_finite() {
            return Err(InertiaErrors::CenterOfMassNotFinite {
                axis: AXIS_NAMES[i],
            });
        }
    }
    Ok(())
}

/// Mass-weighted center of mass and second moments about it.
fn reduce_point_masses(
    points: &[PointMass],
    declared_mass: f64,
) -> Result<(Vector3<f64>, Matrix3<f64>), InertiaErrors> {
    if points.is_empty() {
        return Err(InertiaErrors::NoPointMasses);
    }
    for (index, point) in points.iter().enumerate() {
        if !point.mass.is_finite() || point.mass <= f64::EPSILON {
            return Err(InertiaErrors::PointMassNotPositive {
                index,
                mass: point.mass,
            });
        }
    }

    let sum: f64 = points.iter().map(|p| p.mass).sum();
    if (sum - declared_mass).abs() > POINT_MASS_SUM_TOL * declared_mass {
        return Err(InertiaErrors::PointMassSumMismatch {
            declared: declared_mass,
            sum,
        });
    }

    let center_of_mass = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.mass * p.position)
        / sum;

    let matrix = points.iter().fold(Matrix3::zeros(), |acc, p| {
        let d = p.position - center_of_mass;
        acc + p.mass * (d.norm_squared() * Matrix3::identity() - d * d.transpose())
    });

    Ok((center_of_mass, matrix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::PI;
    const TOL: f64 = 1e-12;

    fn principal_settings(
        mass: f64,
        moments: Vector3<f64>,
        orientation: Quaternion,
    ) -> InertiaSettings {
        InertiaSettings::new(
            mass,
            MassDistribution::PrincipalMoments {
                moments,
                orientation: Rotation::from(&orientation),
                center_of_mass: Vector3::zeros(),
            },
        )
    }

    /// Randomized valid settings always produce a symmetric positive-definite
    /// matrix.
    #[test]
    fn test_random_settings_symmetric_positive_definite() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..200 {
            let moments = loop {
                let m = Vector3::new(
                    rng.random_range(0.1..10.0),
                    rng.random_range(0.1..10.0),
                    rng.random_range(0.1..10.0),
                );
                if 2.0 * m.max() <= m.sum() {
                    break m;
                }
            };
            let axis = Vector3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            );
            let angle = rng.random_range(-PI..PI);
            let orientation =
                Quaternion::from_axis_angle(&axis, angle).unwrap_or(Quaternion::IDENTITY);

            let tensor =
                InertiaTensor::from_settings(&principal_settings(5.0, moments, orientation))
                    .unwrap();
            let matrix = tensor.matrix();

            let asymmetry = (matrix - matrix.transpose()).abs().max();
            assert_abs_diff_eq!(asymmetry, 0.0, epsilon = 1e-12);

            let eigenvalues = matrix.symmetric_eigen().eigenvalues;
            for i in 0..3 {
                assert!(eigenvalues[i] > 0.0, "eigenvalue {} not positive", i);
            }
        }
    }

    /// Round trip: principal form to full matrix and back recovers the
    /// moments and reproduces the matrix.
    #[test]
    fn test_principal_matrix_round_trip() {
        let moments = Vector3::new(2.0, 4.0, 6.0);
        let orientation =
            Quaternion::from_axis_angle(&Vector3::new(0.3, -1.0, 0.7), 1.1).unwrap();
        let tensor =
            InertiaTensor::from_settings(&principal_settings(3.0, moments, orientation)).unwrap();
        let matrix = tensor.matrix();

        let recovered = InertiaTensor::from_settings(&InertiaSettings::new(
            3.0,
            MassDistribution::Matrix {
                matrix,
                center_of_mass: Vector3::zeros(),
            },
        ))
        .unwrap();

        // ascending input moments land in the same order
        assert_relative_eq!(
            recovered.principal_moments()[0],
            moments[0],
            max_relative = 1e-9
        );
        assert_relative_eq!(
            recovered.principal_moments()[1],
            moments[1],
            max_relative = 1e-9
        );
        assert_relative_eq!(
            recovered.principal_moments()[2],
            moments[2],
            max_relative = 1e-9
        );

        let reproduced = recovered.matrix();
        assert_relative_eq!(reproduced, matrix, max_relative = 1e-9, epsilon = 1e-12);
    }

    /// Test rejection of moments violating the realizability inequality.
    #[test]
    fn test_unrealizable_moments_rejected() {
        let result = InertiaTensor::from_settings(&principal_settings(
            1.0,
            Vector3::new(10.0, 1.0, 1.0),
            Quaternion::IDENTITY,
        ));
        assert_eq!(
            result,
            Err(InertiaErrors::MomentsNotRealizable(10.0, 1.0, 1.0))
        );
    }

    #[test]
    fn test_nonpositive_inputs_rejected() {
        let result = InertiaTensor::from_settings(&principal_settings(
            0.0,
            Vector3::new(1.0, 1.0, 1.0),
            Quaternion::IDENTITY,
        ));
        assert_eq!(result, Err(InertiaErrors::MassNotPositive(0.0)));

        let result = InertiaTensor::from_settings(&principal_settings(
            1.0,
            Vector3::new(1.0, -1.0, 1.0),
            Quaternion::IDENTITY,
        ));
        assert_eq!(
            result,
            Err(InertiaErrors::MomentNotPositive {
                axis: "y",
                value: -1.0
            })
        );
    }

    /// A planar body, where one moment equals the sum of the other two, is
    /// realizable.
    #[test]
    fn test_planar_equality_admitted() {
        let result = InertiaTensor::from_settings(&principal_settings(
            1.0,
            Vector3::new(1.0, 1.0, 2.0),
            Quaternion::IDENTITY,
        ));
        assert!(result.is_ok());
    }

    #[test]
    fn test_asymmetric_matrix_rejected() {
        let mut matrix = Matrix3::from_diagonal(&Vector3::new(1.0, 2.0, 3.0));
        matrix[(0, 1)] = 0.5;
        let result = InertiaTensor::from_settings(&InertiaSettings::new(
            1.0,
            MassDistribution::Matrix {
                matrix,
                center_of_mass: Vector3::zeros(),
            },
        ));
        assert!(matches!(result, Err(InertiaErrors::MatrixNotSymmetric(_))));
    }

    /// Known matrix input: a rotated diagonal recovers sorted moments.
    #[test]
    fn test_matrix_input_recovers_moments() {
        let r = *RotationMatrix::from(&EulerAngles::new(0.0, 0.0, PI / 6.0)).matrix();
        let matrix = r * Matrix3::from_diagonal(&Vector3::new(6.0, 2.0, 4.0)) * r.transpose();

        let tensor = InertiaTensor::from_settings(&InertiaSettings::new(
            2.0,
            MassDistribution::Matrix {
                matrix,
                center_of_mass: Vector3::zeros(),
            },
        ))
        .unwrap();

        assert_relative_eq!(tensor.principal_moments()[0], 2.0, max_relative = 1e-9);
        assert_relative_eq!(tensor.principal_moments()[1], 4.0, max_relative = 1e-9);
        assert_relative_eq!(tensor.principal_moments()[2], 6.0, max_relative = 1e-9);
        assert_relative_eq!(tensor.matrix(), matrix, max_relative = 1e-9, epsilon = 1e-12);
    }

    /// Point masses at cube corners: analytic moments and derived center of
    /// mass, invariant under translation of the whole cloud.
    #[test]
    fn test_point_masses_cube() {
        let mut points = Vec::new();
        for x in [-1.0, 1.0] {
            for y in [-1.0, 1.0] {
                for z in [-1.0, 1.0] {
                    points.push(PointMass::new(1.0, Vector3::new(x, y, z)));
                }
            }
        }
        let tensor = InertiaTensor::from_settings(&InertiaSettings::new(
            8.0,
            MassDistribution::PointMasses(points.clone()),
        ))
        .unwrap();

        assert_abs_diff_eq!(tensor.center_of_mass().norm(), 0.0, epsilon = TOL);
        for i in 0..3 {
            assert_relative_eq!(tensor.principal_moments()[i], 16.0, max_relative = 1e-9);
        }

        // translating every point moves the center of mass, not the moments
        let offset = Vector3::new(1.0, 2.0, 3.0);
        let shifted: Vec<PointMass> = points
            .iter()
            .map(|p| PointMass::new(p.mass, p.position + offset))
            .collect();
        let tensor = InertiaTensor::from_settings(&InertiaSettings::new(
            8.0,
            MassDistribution::PointMasses(shifted),
        ))
        .unwrap();

        assert_abs_diff_eq!((tensor.center_of_mass() - offset).norm(), 0.0, epsilon = 1e-9);
        for i in 0..3 {
            assert_relative_eq!(tensor.principal_moments()[i], 16.0, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_point_mass_validation() {
        let result = InertiaTensor::from_settings(&InertiaSettings::new(
            5.0,
            MassDistribution::PointMasses(vec![
                PointMass::new(1.0, Vector3::x()),
                PointMass::new(1.0, -Vector3::x()),
            ]),
        ));
        assert!(matches!(
            result,
            Err(InertiaErrors::PointMassSumMismatch { .. })
        ));

        let result = InertiaTensor::from_settings(&InertiaSettings::new(
            1.0,
            MassDistribution::PointMasses(vec![PointMass::new(-1.0, Vector3::x())]),
        ));
        assert!(matches!(
            result,
            Err(InertiaErrors::PointMassNotPositive { index: 0, .. })
        ));

        let result = InertiaTensor::from_settings(&InertiaSettings::new(
            1.0,
            MassDistribution::PointMasses(Vec::new()),
        ));
        assert_eq!(result, Err(InertiaErrors::NoPointMasses));
    }

    /// Collinear points have zero moment about their axis and are rejected
    /// through the positivity check.
    #[test]
    fn test_collinear_points_rejected() {
        let result = InertiaTensor::from_settings(&InertiaSettings::new(
            2.0,
            MassDistribution::PointMasses(vec![
                PointMass::new(1.0, Vector3::x()),
                PointMass::new(1.0, -Vector3::x()),
            ]),
        ));
        assert!(matches!(
            result,
            Err(InertiaErrors::MomentNotPositive { .. })
        ));
    }

    #[test]
    fn test_sphere_settings_end_to_end() {
        let tensor =
            InertiaTensor::from_settings(&InertiaSettings::solid_sphere(10.0, 1.0).unwrap())
                .unwrap();
        for i in 0..3 {
            assert_abs_diff_eq!(tensor.principal_moments()[i], 4.0, epsilon = TOL);
        }
        assert_abs_diff_eq!(tensor.mass(), 10.0, epsilon = TOL);

        let matrix = tensor.matrix();
        assert_relative_eq!(
            matrix,
            Matrix3::from_diagonal(&Vector3::new(4.0, 4.0, 4.0)),
            max_relative = 1e-12,
            epsilon = 1e-12
        );
    }
}
