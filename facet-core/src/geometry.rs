/// Triangle storage: the growable mesh buffer and its colour metadata
use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::config::DEFAULT_ALLOCATION_INCREMENT;
use crate::error::{FacetError, Result};
use crate::normals::compute_face_normal;
use crate::transform::DisplayTransform;

/// RGBA colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub alpha: f32,
}

impl Colour {
    pub fn new(r: f32, g: f32, b: f32, alpha: f32) -> Self {
        Self { r, g, b, alpha }
    }
}

/// Growable triangle soup with one face normal per vertex slot.
///
/// Vertices, normals and indices are parallel arrays of equal length. Every
/// triangle owns three fresh vertices (nothing is shared) and the index array
/// is always the identity permutation, so vertex `i` is index `i`.
///
/// Storage grows geometrically: when a triangle does not fit, the capacity is
/// raised by the current increment and the increment doubles.
#[derive(Debug, Clone)]
pub struct MeshBuffer {
    vertices: Vec<Point3<f64>>,
    normals: Vec<Vector3<f64>>,
    indices: Vec<u32>,
    capacity: usize,
    allocation_increment: usize,
    reallocations: usize,
    display: DisplayTransform,
    colour: Option<Colour>,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::with_allocation_increment(DEFAULT_ALLOCATION_INCREMENT)
    }

    /// An empty buffer whose first growth reserves `increment` vertices.
    pub fn with_allocation_increment(increment: usize) -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            capacity: 0,
            allocation_increment: increment.max(3),
            reallocations: 0,
            display: DisplayTransform::identity(),
            colour: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Allocated capacity, in vertices.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn allocation_increment(&self) -> usize {
        self.allocation_increment
    }

    /// Size of the next growth step. Importers set this to the exact size
    /// they are about to add.
    pub fn set_allocation_increment(&mut self, increment: usize) {
        self.allocation_increment = increment.max(3);
    }

    /// Number of times storage has been grown.
    pub fn reallocations(&self) -> usize {
        self.reallocations
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// The three vertices of triangle `i`.
    pub fn triangle(&self, i: usize) -> [Point3<f64>; 3] {
        let base = i * 3;
        [
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        ]
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
    }

    /// Face normal stored for triangle `i`.
    pub fn face_normal(&self, i: usize) -> Vector3<f64> {
        self.normals[i * 3]
    }

    pub fn display_transform(&self) -> &DisplayTransform {
        &self.display
    }

    pub fn display_transform_mut(&mut self) -> &mut DisplayTransform {
        &mut self.display
    }

    pub fn set_display_transform(&mut self, display: DisplayTransform) {
        self.display = display;
    }

    pub fn colour(&self) -> Option<Colour> {
        self.colour
    }

    pub fn set_colour(&mut self, colour: Option<Colour>) {
        self.colour = colour;
    }

    /// Append one triangle. Its face normal is computed here and written to
    /// all three normal slots.
    pub fn add_triangle(
        &mut self,
        v0: Point3<f64>,
        v1: Point3<f64>,
        v2: Point3<f64>,
    ) -> Result<()> {
        let needed = self.vertices.len() + 3;
        if needed > self.capacity {
            self.grow(needed)?;
        }
        let first = last_index(needed)? - 2;

        let normal = compute_face_normal(&v0, &v1, &v2);
        for (index, v) in [first, first + 1, first + 2].into_iter().zip([v0, v1, v2]) {
            self.vertices.push(v);
            self.normals.push(normal);
            self.indices.push(index);
        }
        Ok(())
    }

    /// Fan-triangulate a polygon around its first vertex: `n` vertices give
    /// `n - 2` triangles `(v0, v[k], v[k + 1])`.
    ///
    /// Correct for convex planar polygons only. Concave or non-planar input
    /// is triangulated the same way without any correction.
    pub fn add_polygon(&mut self, vertices: &[Point3<f64>]) -> Result<()> {
        if vertices.len() < 3 {
            return Err(FacetError::TooFewVertices {
                count: vertices.len(),
            });
        }
        let pivot = vertices[0];
        for pair in vertices[1..].windows(2) {
            self.add_triangle(pivot, pair[0], pair[1])?;
        }
        Ok(())
    }

    fn grow(&mut self, needed: usize) -> Result<()> {
        // every stored vertex needs a u32 index
        last_index(needed)?;
        let limit = usize::try_from(u32::MAX).map_or(usize::MAX, |max| max.saturating_add(1));

        let mut target = self.capacity;
        let mut increment = self.allocation_increment;
        while target < needed {
            target = target.saturating_add(increment);
            increment = increment.saturating_mul(2);
        }
        let target = target.min(limit);

        let additional = target - self.vertices.len();
        let failed = |_| FacetError::Allocation { requested: target };
        self.vertices.try_reserve_exact(additional).map_err(failed)?;
        self.normals.try_reserve_exact(additional).map_err(failed)?;
        self.indices.try_reserve_exact(additional).map_err(failed)?;

        debug!(
            from = self.capacity,
            to = target,
            next_increment = increment,
            "grew mesh buffer"
        );
        self.capacity = target;
        self.allocation_increment = increment;
        self.reallocations += 1;
        Ok(())
    }

    /// Move every stored vertex. Only valid before the data is handed to a renderer.
    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        let offset = Vector3::new(dx, dy, dz);
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Scale every stored vertex per axis. Only valid before the data is handed to a renderer.
    pub fn scale(&mut self, sx: f64, sy: f64, sz: f64) {
        for v in &mut self.vertices {
            v.x *= sx;
            v.y *= sy;
            v.z *= sz;
        }
    }

    /// Swap the second and third vertex of every triangle and negate every
    /// normal. Applying it twice restores the original buffer.
    pub fn reverse_winding(&mut self) {
        for tri in self.vertices.chunks_exact_mut(3) {
            tri.swap(1, 2);
        }
        for n in &mut self.normals {
            *n = -*n;
        }
    }

    /// Append all triangles of `other`. With `apply_display_transform` each
    /// vertex is first mapped through this buffer's display transform.
    pub fn append_mesh(
        &mut self,
        other: &MeshBuffer,
        apply_display_transform: bool,
    ) -> Result<()> {
        let needed = self.vertices.len() + other.vertex_count();
        if needed > self.capacity {
            self.grow(needed)?;
        }
        let display = self.display;
        for [a, b, c] in other.triangles() {
            if apply_display_transform {
                self.add_triangle(display.apply(&a), display.apply(&b), display.apply(&c))?;
            } else {
                self.add_triangle(a, b, c)?;
            }
        }
        Ok(())
    }

    /// Remove all triangles, keeping the allocated storage.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.normals.clear();
        self.indices.clear();
    }

    /// Axis-aligned bounds of the stored vertices, or `None` when empty.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.vertices.first()?;
        let bounds = self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.inf(v), max.sup(v))
        });
        Some(bounds)
    }

    /// Closed box of edge length `size` centred on the origin, wound
    /// counter-clockwise when seen from outside.
    pub fn cuboid(size: f64) -> Result<Self> {
        let h = size / 2.0;
        let corners = [
            Point3::new(-h, -h, -h),
            Point3::new(h, -h, -h),
            Point3::new(h, h, -h),
            Point3::new(-h, h, -h),
            Point3::new(-h, -h, h),
            Point3::new(h, -h, h),
            Point3::new(h, h, h),
            Point3::new(-h, h, h),
        ];
        let faces: [[usize; 4]; 6] = [
            [4, 5, 6, 7], // front  (+z)
            [1, 0, 3, 2], // back   (-z)
            [3, 7, 6, 2], // top    (+y)
            [0, 1, 5, 4], // bottom (-y)
            [1, 2, 6, 5], // right  (+x)
            [0, 4, 7, 3], // left   (-x)
        ];

        let mut mesh = Self::with_allocation_increment(36);
        for face in &faces {
            let quad: Vec<Point3<f64>> = face.iter().map(|&i| corners[i]).collect();
            mesh.add_polygon(&quad)?;
        }
        Ok(mesh)
    }
}

impl Default for MeshBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of the last vertex in a buffer holding `count` vertices.
fn last_index(count: usize) -> Result<u32> {
    count
        .checked_sub(1)
        .and_then(|last| u32::try_from(last).ok())
        .ok_or(FacetError::Allocation { requested: count })
}
