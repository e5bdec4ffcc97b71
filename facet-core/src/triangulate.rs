//! Turns parsed surface records into triangles.
//!
//! Faces with three indices go straight to [`MeshBuffer::add_triangle`];
//! larger faces are fan-triangulated by [`MeshBuffer::add_polygon`]. Fan
//! triangulation assumes convex, planar polygons. Concave or non-planar
//! faces are split the same way and may produce overlapping or folded
//! triangles; no attempt is made to detect or correct this.

use std::path::Path;

use nalgebra::Point3;
use tracing::{info, instrument};

use crate::config::{ImportOptions, SPHERE_SUBDIVISIONS};
use crate::error::{FacetError, Result};
use crate::geometry::MeshBuffer;
use crate::obj::{read_surface, SurfaceRecords};
use crate::sphere::sphere_template;

/// Builds mesh buffers from surface records according to [`ImportOptions`].
#[derive(Debug, Clone, Default)]
pub struct Triangulator {
    options: ImportOptions,
}

impl Triangulator {
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Build a new mesh buffer from `records`.
    pub fn build(&self, records: &SurfaceRecords) -> Result<MeshBuffer> {
        let mut mesh = MeshBuffer::with_allocation_increment(self.options.allocation_increment);
        self.extend(&mut mesh, records)?;
        Ok(mesh)
    }

    /// Append the triangles for `records` to an existing buffer.
    #[instrument(skip_all, fields(vertices = records.vertices.len(), faces = records.faces.len()))]
    pub fn extend(&self, mesh: &mut MeshBuffer, records: &SurfaceRecords) -> Result<()> {
        let before = mesh.triangle_count();
        match self.options.point_cloud_radius() {
            Some(radius) => self.add_spheres(mesh, &records.vertices, radius)?,
            None => self.add_faces(mesh, records)?,
        }
        info!(
            triangles = mesh.triangle_count() - before,
            "triangulated surface"
        );
        Ok(())
    }

    fn add_faces(&self, mesh: &mut MeshBuffer, records: &SurfaceRecords) -> Result<()> {
        check_indices(records)?;
        let copies = if self.options.duplicate_reversed_faces { 2 } else { 1 };
        let needed: usize = records
            .faces
            .iter()
            .map(|face| 3 * face.len().saturating_sub(2) * copies)
            .sum();
        if needed > 0 {
            mesh.set_allocation_increment(needed);
        }

        let mut corners: Vec<Point3<f64>> = Vec::with_capacity(records.largest_face());
        let vertices = &records.vertices;
        for (position, face) in records.faces.iter().enumerate() {
            add_face(mesh, vertices, position, face.iter().copied(), &mut corners)?;
            if self.options.duplicate_reversed_faces {
                if face.len() == 3 {
                    let flipped = [face[0], face[2], face[1]];
                    add_face(mesh, vertices, position, flipped.into_iter(), &mut corners)?;
                } else {
                    let reversed = face.iter().rev().copied();
                    add_face(mesh, vertices, position, reversed, &mut corners)?;
                }
            }
        }
        Ok(())
    }

    /// One template sphere per point, translated to the point.
    fn add_spheres(
        &self,
        mesh: &mut MeshBuffer,
        centres: &[Point3<f64>],
        radius: f64,
    ) -> Result<()> {
        let template = sphere_template(radius, SPHERE_SUBDIVISIONS)?;
        let needed = template.vertex_count() * centres.len();
        if needed > 0 {
            mesh.set_allocation_increment(needed);
        }

        for centre in centres {
            let offset = centre.coords;
            for [a, b, c] in template.triangles() {
                mesh.add_triangle(a + offset, b + offset, c + offset)?;
            }
        }
        Ok(())
    }
}

/// Reject records whose faces point past the vertex list before anything is added.
fn check_indices(records: &SurfaceRecords) -> Result<()> {
    let vertex_count = records.vertices.len();
    for (face, indices) in records.faces.iter().enumerate() {
        if indices.len() < 3 {
            return Err(FacetError::TooFewVertices {
                count: indices.len(),
            });
        }
        if let Some(&index) = indices.iter().find(|&&i| i >= vertex_count) {
            return Err(FacetError::FaceIndexOutOfRange {
                face,
                index,
                vertex_count,
            });
        }
    }
    Ok(())
}

fn add_face(
    mesh: &mut MeshBuffer,
    vertices: &[Point3<f64>],
    position: usize,
    face: impl Iterator<Item = usize>,
    corners: &mut Vec<Point3<f64>>,
) -> Result<()> {
    corners.clear();
    for i in face {
        let vertex = vertices.get(i).ok_or(FacetError::FaceIndexOutOfRange {
            face: position,
            index: i,
            vertex_count: vertices.len(),
        })?;
        corners.push(*vertex);
    }
    if let [a, b, c] = corners.as_slice() {
        mesh.add_triangle(*a, *b, *c)
    } else {
        mesh.add_polygon(corners.as_slice())
    }
}

/// Read a surface file and triangulate it.
pub fn load_surface(path: &Path, options: &ImportOptions) -> Result<MeshBuffer> {
    let records = read_surface(path)?;
    Triangulator::new(options.clone()).build(&records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::parse_surface;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    const QUAD: &str = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";

    #[test]
    fn test_single_triangle_example() {
        let records = parse_surface("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let mesh = Triangulator::default().build(&records).unwrap();

        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(
            mesh.triangle(0),
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0)
            ]
        );
        assert_relative_eq!(mesh.face_normal(0), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_quad_becomes_two_triangles() {
        let records = parse_surface(QUAD).unwrap();
        let mesh = Triangulator::default().build(&records).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.triangle(1)[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(mesh.triangle(1)[2], Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_exact_preallocation() {
        let records = parse_surface(QUAD).unwrap();
        let mesh = Triangulator::default().build(&records).unwrap();
        assert_eq!(mesh.capacity(), 6);
        assert_eq!(mesh.reallocations(), 1);
    }

    #[test]
    fn test_duplicate_reversed_triangle() {
        let records = parse_surface("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let mesh = Triangulator::new(ImportOptions::bad_mesh())
            .build(&records)
            .unwrap();

        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.triangle(1)[1], Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(mesh.face_normal(0), -mesh.face_normal(1));
    }

    #[test]
    fn test_duplicate_reversed_polygon() {
        let records = parse_surface(QUAD).unwrap();
        let mesh = Triangulator::new(ImportOptions::bad_mesh())
            .build(&records)
            .unwrap();

        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.triangle(2)[0], Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(mesh.face_normal(2), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_point_cloud_spheres() {
        let records = parse_surface("v 0 0 0\nv 10 0 0\nf 1 2 1\n").unwrap();
        let mesh = Triangulator::new(ImportOptions::point_cloud(0.5))
            .build(&records)
            .unwrap();

        assert_eq!(mesh.triangle_count(), 2 * 320);
        let (min, max) = mesh.bounds().unwrap();
        assert!(min.x >= -0.5 - 1e-12 && min.x < -0.4);
        assert!(max.x <= 10.5 + 1e-12 && max.x > 10.4);
        assert_eq!(mesh.reallocations(), 1);
    }

    #[test]
    fn test_bad_index_in_built_records_is_an_error() {
        let records = SurfaceRecords {
            vertices: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            faces: vec![vec![0, 1, 2], vec![0, 1, 3]],
        };
        let triangulator = Triangulator::default();
        let err = triangulator.build(&records).unwrap_err();
        assert!(matches!(
            err,
            FacetError::FaceIndexOutOfRange {
                face: 1,
                index: 3,
                vertex_count: 3
            }
        ));

        // nothing from the valid first face is kept
        let mut mesh = MeshBuffer::new();
        assert!(triangulator.extend(&mut mesh, &records).is_err());
        assert!(mesh.is_empty());

        let short = SurfaceRecords {
            vertices: records.vertices.clone(),
            faces: vec![vec![0, 1, 2], vec![0, 1]],
        };
        let err = triangulator.extend(&mut mesh, &short).unwrap_err();
        assert!(matches!(err, FacetError::TooFewVertices { count: 2 }));
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_extend_appends() {
        let records = parse_surface(QUAD).unwrap();
        let triangulator = Triangulator::default();
        let mut mesh = triangulator.build(&records).unwrap();
        triangulator.extend(&mut mesh, &records).unwrap();
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.indices(), &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
    }
}
