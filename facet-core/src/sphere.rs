//! Icosphere template used to turn point clouds into unions of spheres.

use nalgebra::{Point3, Vector3};

use crate::error::Result;
use crate::geometry::MeshBuffer;

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 1, 2],
    [3, 2, 1],
    [3, 4, 5],
    [3, 8, 4],
    [0, 6, 7],
    [0, 9, 6],
    [4, 10, 11],
    [6, 11, 10],
    [2, 5, 9],
    [11, 9, 5],
    [1, 7, 8],
    [10, 8, 7],
    [3, 5, 2],
    [3, 1, 8],
    [0, 2, 9],
    [0, 7, 1],
    [6, 9, 11],
    [6, 10, 7],
    [4, 11, 5],
    [4, 8, 10],
];

fn icosahedron() -> Vec<[Vector3<f64>; 3]> {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let a = 1.0;
    let b = 1.0 / phi;
    let corners = [
        Vector3::new(0.0, b, -a),
        Vector3::new(b, a, 0.0),
        Vector3::new(-b, a, 0.0),
        Vector3::new(0.0, b, a),
        Vector3::new(0.0, -b, a),
        Vector3::new(-a, 0.0, b),
        Vector3::new(0.0, -b, -a),
        Vector3::new(a, 0.0, -b),
        Vector3::new(a, 0.0, b),
        Vector3::new(-a, 0.0, -b),
        Vector3::new(b, -a, 0.0),
        Vector3::new(-b, -a, 0.0),
    ]
    .map(|v| v.normalize());

    ICOSAHEDRON_FACES
        .iter()
        .map(|&[i, j, k]| {
            let (p, q, r) = (corners[i], corners[j], corners[k]);
            // orient counter-clockwise seen from outside
            if (q - p).cross(&(r - p)).dot(&(p + q + r)) < 0.0 {
                [p, r, q]
            } else {
                [p, q, r]
            }
        })
        .collect()
}

/// Split every triangle into four, pushing the new edge midpoints onto the unit sphere.
fn subdivide(triangles: &[[Vector3<f64>; 3]]) -> Vec<[Vector3<f64>; 3]> {
    let mut out = Vec::with_capacity(triangles.len() * 4);
    for &[a, b, c] in triangles {
        let ab = (a + b).normalize();
        let bc = (b + c).normalize();
        let ca = (c + a).normalize();
        out.push([a, ab, ca]);
        out.push([ab, b, bc]);
        out.push([ca, bc, c]);
        out.push([ab, bc, ca]);
    }
    out
}

/// Closed sphere of `radius` centred on the origin, built from an
/// icosahedron subdivided `subdivisions` times (`20 * 4^subdivisions` triangles).
pub fn sphere_template(radius: f64, subdivisions: u32) -> Result<MeshBuffer> {
    let mut triangles = icosahedron();
    for _ in 0..subdivisions {
        triangles = subdivide(&triangles);
    }

    let mut mesh = MeshBuffer::with_allocation_increment(triangles.len() * 3);
    for [a, b, c] in triangles {
        mesh.add_triangle(
            Point3::from(a * radius),
            Point3::from(b * radius),
            Point3::from(c * radius),
        )?;
    }
    Ok(mesh)
}
