//! Flat position/index arrays for handing a mesh to a collision library.

use std::mem::size_of;

use tracing::debug;

use crate::geometry::MeshBuffer;

/// Owned triangle arrays in the mesh's local frame.
///
/// `positions` holds three coordinates per vertex with no sharing between
/// triangles; `indices` holds three per triangle. Strides are in bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionMesh<T> {
    pub positions: Vec<T>,
    pub indices: Vec<u32>,
    pub vertex_stride: usize,
    pub index_stride: usize,
}

impl<T> CollisionMesh<T> {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Double precision copy of `mesh`.
pub fn collision_mesh_f64(mesh: &MeshBuffer) -> CollisionMesh<f64> {
    build(mesh, |v| v)
}

/// Single precision copy of `mesh`.
pub fn collision_mesh_f32(mesh: &MeshBuffer) -> CollisionMesh<f32> {
    build(mesh, |v| v as f32)
}

fn build<T>(mesh: &MeshBuffer, convert: fn(f64) -> T) -> CollisionMesh<T> {
    let mut positions = Vec::with_capacity(mesh.vertex_count() * 3);
    for vertex in mesh.vertices() {
        positions.extend([convert(vertex.x), convert(vertex.y), convert(vertex.z)]);
    }

    debug!(vertices = mesh.vertex_count(), "built collision arrays");
    CollisionMesh {
        positions,
        indices: mesh.indices().to_vec(),
        vertex_stride: 3 * size_of::<T>(),
        index_stride: 3 * size_of::<u32>(),
    }
}
