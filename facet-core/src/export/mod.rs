//! Mesh export: raytrace scenes, interchange text, collision arrays and the
//! batching queue.
//!
//! Text exporters map vertices through the mesh's display transform; the
//! stored geometry is never modified. Collision arrays stay in the local
//! frame.

pub mod collision;
pub mod format;
pub mod obj;
pub mod povray;
pub mod queue;

use std::io::Write;

use crate::error::Result;
use crate::geometry::MeshBuffer;

pub use collision::{collision_mesh_f32, collision_mesh_f64, CollisionMesh};
pub use obj::{IndexMode, ObjWriter};
pub use povray::write_raytrace;
pub use queue::ExportQueue;

/// Target text format for [`export_mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Raytrace,
    Interchange(IndexMode),
}

/// Write one mesh in `format`. `obj_writer` carries the object counter and
/// vertex offset between calls and is untouched by raytrace output.
pub fn export_mesh<W: Write>(
    mesh: &MeshBuffer,
    format: ExportFormat,
    out: &mut W,
    obj_writer: &mut ObjWriter,
) -> Result<()> {
    match format {
        ExportFormat::Raytrace => write_raytrace(mesh, out),
        ExportFormat::Interchange(mode) => obj_writer.write_mesh(mesh, mode, out),
    }
}
