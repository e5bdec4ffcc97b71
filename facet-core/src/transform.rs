/// Display placement applied to local-frame geometry at export time
use nalgebra::{Matrix3, Point3, Quaternion, Rotation3, UnitQuaternion, Vector3};

use crate::error::{FacetError, Result};

/// Translation and rotation that place a mesh in the world.
///
/// Stored beside the geometry, never baked into it: changing the display
/// transform leaves every stored vertex untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTransform {
    pub translation: Vector3<f64>,
    pub rotation: Matrix3<f64>,
}

impl DisplayTransform {
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: Matrix3::identity(),
        }
    }

    pub fn set_position(&mut self, x: f64, y: f64, z: f64) {
        self.translation = Vector3::new(x, y, z);
    }

    /// Set the rotation matrix. With `fast` the matrix is stored as given,
    /// otherwise it is first re-orthonormalized.
    pub fn set_rotation(&mut self, rotation: Matrix3<f64>, fast: bool) {
        self.rotation = if fast {
            rotation
        } else {
            Rotation3::from_matrix(&rotation).into_inner()
        };
    }

    /// Set the rotation from a `(w, x, y, z)` quaternion. With `fast` the
    /// quaternion is assumed to be unit length already.
    pub fn set_rotation_from_quaternion(&mut self, w: f64, x: f64, y: f64, z: f64, fast: bool) {
        let q = Quaternion::new(w, x, y, z);
        let unit = if fast {
            UnitQuaternion::new_unchecked(q)
        } else {
            UnitQuaternion::from_quaternion(q)
        };
        self.rotation = unit.to_rotation_matrix().into_inner();
    }

    /// Rotate the local Z axis onto `(x, y, z)`. With `fast` the axis is
    /// assumed to be unit length already.
    ///
    /// A zero or non-finite axis is rejected and the current rotation is kept.
    pub fn set_rotation_from_axis(&mut self, x: f64, y: f64, z: f64, fast: bool) -> Result<()> {
        let mut axis = Vector3::new(x, y, z);
        let norm = axis.norm();
        if norm == 0.0 || !norm.is_finite() {
            return Err(FacetError::DegenerateAxis { x, y, z });
        }
        if !fast {
            axis /= norm;
        }
        let (p, q) = plane_space(&axis);
        self.rotation = Matrix3::from_columns(&[p, q, axis]);
        Ok(())
    }

    /// Map a local-frame point into the display frame: rotate, then translate.
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * point.coords + self.translation)
    }

    pub fn is_identity(&self) -> bool {
        self.translation == Vector3::zeros() && self.rotation == Matrix3::identity()
    }
}

impl Default for DisplayTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Two unit vectors that, together with `n`, form a right-handed orthonormal basis.
fn plane_space(n: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    if n.z.abs() > std::f64::consts::FRAC_1_SQRT_2 {
        // choose p in the y-z plane
        let a = n.y * n.y + n.z * n.z;
        let k = 1.0 / a.sqrt();
        let p = Vector3::new(0.0, -n.z * k, n.y * k);
        let q = Vector3::new(a * k, -n.x * p.z, n.x * p.y);
        (p, q)
    } else {
        // choose p in the x-y plane
        let a = n.x * n.x + n.y * n.y;
        let k = 1.0 / a.sqrt();
        let p = Vector3::new(-n.y * k, n.x * k, 0.0);
        let q = Vector3::new(-n.z * p.y, n.z * p.x, a * k);
        (p, q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_apply() {
        let transform = DisplayTransform::identity();
        let p = Point3::new(1.0, -2.0, 3.0);
        assert_eq!(transform.apply(&p), p);
        assert!(transform.is_identity());
    }

    #[test]
    fn test_rotate_then_translate() {
        let mut transform = DisplayTransform::identity();
        // 90 degrees about z
        transform.set_rotation_from_quaternion(
            std::f64::consts::FRAC_PI_4.cos(),
            0.0,
            0.0,
            std::f64::consts::FRAC_PI_4.sin(),
            false,
        );
        transform.set_position(10.0, 0.0, 0.0);
        let p = transform.apply(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(10.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_quaternion_is_normalized_unless_fast() {
        let mut transform = DisplayTransform::identity();
        transform.set_rotation_from_quaternion(2.0, 0.0, 0.0, 0.0, false);
        assert_relative_eq!(transform.rotation, Matrix3::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_axis_rotation_maps_z_onto_axis() {
        for axis in [
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 2.0, -3.0),
            Vector3::new(0.2, -0.1, 5.0),
        ] {
            let mut transform = DisplayTransform::identity();
            transform
                .set_rotation_from_axis(axis.x, axis.y, axis.z, false)
                .unwrap();
            let r = transform.rotation;
            assert_relative_eq!(r * Vector3::z(), axis.normalize(), epsilon = 1e-12);
            assert_relative_eq!(r.transpose() * r, Matrix3::identity(), epsilon = 1e-12);
            assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_set_rotation_orthonormalizes() {
        let mut transform = DisplayTransform::identity();
        let skewed = Matrix3::new(1.0, 0.01, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        transform.set_rotation(skewed, true);
        assert_eq!(transform.rotation, skewed);
        transform.set_rotation(skewed, false);
        let r = transform.rotation;
        assert_relative_eq!(r.transpose() * r, Matrix3::identity(), epsilon = 1e-9);
    }

    #[test]
    fn test_zero_axis_is_rejected() {
        let mut transform = DisplayTransform::identity();
        let err = transform
            .set_rotation_from_axis(0.0, 0.0, 0.0, false)
            .unwrap_err();
        assert!(matches!(err, FacetError::DegenerateAxis { .. }));
        assert!(transform
            .set_rotation_from_axis(f64::NAN, 0.0, 1.0, true)
            .is_err());
        assert_eq!(transform.rotation, Matrix3::identity());
        assert!(transform.rotation.iter().all(|v| v.is_finite()));
    }
}
