//! Facet Core Library - triangle meshes, mass properties and export
//!
//! Reads polygonal surface files into growable triangle buffers, computes
//! mass, center of mass and inertia of closed meshes, and writes meshes as
//! raytrace scenes, interchange text or flat collision arrays.

pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod mass;
pub mod normals;
pub mod obj;
pub mod sphere;
pub mod transform;
pub mod triangulate;

// Re-export commonly used types
pub use config::ImportOptions;
pub use error::{FacetError, Result};
pub use export::{
    collision_mesh_f32, collision_mesh_f64, export_mesh, CollisionMesh, ExportFormat, ExportQueue,
    IndexMode, ObjWriter,
};
pub use geometry::{Colour, MeshBuffer};
pub use mass::{compute_mass_properties, MassProperties, Winding};
pub use normals::compute_face_normal;
pub use obj::{parse_surface, read_surface, SurfaceRecords};
pub use sphere::sphere_template;
pub use transform::DisplayTransform;
pub use triangulate::{load_surface, Triangulator};
