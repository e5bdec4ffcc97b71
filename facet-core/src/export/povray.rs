//! Raytrace scene export: one `object { mesh { ... } }` block per mesh.

use std::io::Write;

use tracing::{info, instrument};

use crate::config::EXPORT_PRECISION;
use crate::error::Result;
use crate::export::format::format_significant;
use crate::geometry::MeshBuffer;

/// Write `mesh` as a mesh object with one `triangle` per stored triangle.
///
/// Vertices are mapped through the mesh's display transform. A `pigment`
/// block follows the triangles when a colour is attached; transmit is
/// written as `1 - alpha`.
#[instrument(skip_all, fields(triangles = mesh.triangle_count()))]
pub fn write_raytrace<W: Write>(mesh: &MeshBuffer, out: &mut W) -> Result<()> {
    let display = mesh.display_transform();
    let fmt = |v: f64| format_significant(v, EXPORT_PRECISION);

    writeln!(out, "object {{")?;
    writeln!(out, "  mesh {{")?;

    for triangle in mesh.triangles() {
        writeln!(out, "    triangle {{")?;
        for vertex in &triangle {
            let p = display.apply(vertex);
            writeln!(out, "      <{},{},{}>", fmt(p.x), fmt(p.y), fmt(p.z))?;
        }
        writeln!(out, "    }}")?;
    }

    if let Some(colour) = mesh.colour() {
        writeln!(out, "    pigment {{")?;
        writeln!(
            out,
            "      color rgbf<{},{},{},{}>",
            fmt(f64::from(colour.r)),
            fmt(f64::from(colour.g)),
            fmt(f64::from(colour.b)),
            fmt(f64::from(1.0 - colour.alpha))
        )?;
        writeln!(out, "    }}")?;
    }

    writeln!(out, "  }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    info!("wrote raytrace mesh");
    Ok(())
}
