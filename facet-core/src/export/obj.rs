//! Interchange export in the same vertex/face format the importer reads.

use std::io::Write;

use tracing::{info, instrument};

use crate::config::EXPORT_PRECISION;
use crate::error::Result;
use crate::export::format::format_significant;
use crate::geometry::MeshBuffer;

/// How face records refer to their vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMode {
    /// Each triangle writes its three vertices followed by `f -3 -2 -1`.
    /// Objects can be concatenated without any shared state.
    Relative,
    /// All vertices first, then faces with absolute 1-based indices offset
    /// by the vertices already written to the same file.
    Absolute,
}

/// Per-file interchange writer.
///
/// Holds the object name, the number of objects written so far (appended to
/// the name so every object is unique) and the running vertex offset used
/// by [`IndexMode::Absolute`]. Use one writer per output file, or call
/// [`ObjWriter::reset`] before starting a new file.
#[derive(Debug, Clone)]
pub struct ObjWriter {
    name: String,
    objects_written: u64,
    vertex_offset: usize,
}

impl ObjWriter {
    pub fn new(name: &str) -> Self {
        Self {
            name: sanitize_name(name),
            objects_written: 0,
            vertex_offset: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = sanitize_name(name);
    }

    pub fn objects_written(&self) -> u64 {
        self.objects_written
    }

    /// Vertices already written to the current file in absolute mode.
    pub fn vertex_offset(&self) -> usize {
        self.vertex_offset
    }

    /// Start a new output file.
    pub fn reset(&mut self) {
        self.vertex_offset = 0;
    }

    /// Write one `o` object for `mesh`, with vertices mapped through its
    /// display transform.
    ///
    /// The object counter and vertex offset only advance once the whole
    /// object has been written.
    #[instrument(
        skip(self, mesh, out),
        fields(name = %self.name, triangles = mesh.triangle_count())
    )]
    pub fn write_mesh<W: Write>(
        &mut self,
        mesh: &MeshBuffer,
        mode: IndexMode,
        out: &mut W,
    ) -> Result<()> {
        let display = mesh.display_transform();
        let fmt = |v: f64| format_significant(v, EXPORT_PRECISION);

        writeln!(out, "o {}{}", self.name, self.objects_written)?;

        match mode {
            IndexMode::Relative => {
                for triangle in mesh.triangles() {
                    for vertex in &triangle {
                        let p = display.apply(vertex);
                        writeln!(out, "v {} {} {}", fmt(p.x), fmt(p.y), fmt(p.z))?;
                    }
                    writeln!(out, "f -3 -2 -1")?;
                }
            }
            IndexMode::Absolute => {
                for vertex in mesh.vertices() {
                    let p = display.apply(vertex);
                    writeln!(out, "v {} {} {}", fmt(p.x), fmt(p.y), fmt(p.z))?;
                }
                let base = self.vertex_offset + 1;
                for face in mesh.indices().chunks_exact(3) {
                    writeln!(
                        out,
                        "f {} {} {}",
                        face[0] as usize + base,
                        face[1] as usize + base,
                        face[2] as usize + base
                    )?;
                }
                self.vertex_offset += mesh.vertex_count();
            }
        }
        self.objects_written += 1;

        info!(?mode, "wrote interchange object");
        Ok(())
    }
}

impl Default for ObjWriter {
    fn default() -> Self {
        Self::new("object")
    }
}

/// Replace whitespace and control characters with `_`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() || c.is_control() { '_' } else { c })
        .collect()
}
