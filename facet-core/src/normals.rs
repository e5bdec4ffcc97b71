/// Face normal computation
use nalgebra::{Point3, Vector3};

/// Unit normal of the triangle `(v1, v2, v3)`, assuming counter-clockwise
/// winding when viewed from outside.
///
/// A degenerate (collinear or repeated-vertex) triangle has a zero cross
/// product; normalization is skipped and the zero vector is returned.
pub fn compute_face_normal(v1: &Point3<f64>, v2: &Point3<f64>, v3: &Point3<f64>) -> Vector3<f64> {
    let edge1 = v2 - v1;
    let edge2 = v3 - v1;
    let normal = edge1.cross(&edge2);

    let norm = normal.norm();
    if norm > 0.0 {
        normal / norm
    } else {
        normal
    }
}
