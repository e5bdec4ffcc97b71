//! Meshes held back for a single batched write.

use std::collections::VecDeque;
use std::io::Write;

use tracing::{info, instrument};

use crate::error::Result;
use crate::export::obj::ObjWriter;
use crate::export::{export_mesh, ExportFormat};
use crate::geometry::MeshBuffer;

/// FIFO of owned meshes waiting to be exported together.
#[derive(Debug, Clone, Default)]
pub struct ExportQueue {
    meshes: VecDeque<MeshBuffer>,
}

impl ExportQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mesh: MeshBuffer) {
        self.meshes.push_back(mesh);
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MeshBuffer> {
        self.meshes.iter()
    }

    /// Write every queued mesh to `out` in insertion order, emptying the
    /// queue. Returns the number of meshes written.
    ///
    /// A mesh is removed only once it has been written, so on error the
    /// failed mesh and everything after it stay queued.
    #[instrument(skip(self, out, obj_writer), fields(queued = self.meshes.len()))]
    pub fn flush<W: Write>(
        &mut self,
        format: ExportFormat,
        out: &mut W,
        obj_writer: &mut ObjWriter,
    ) -> Result<usize> {
        let mut written = 0;
        while let Some(mesh) = self.meshes.front() {
            export_mesh(mesh, format, out, obj_writer)?;
            self.meshes.pop_front();
            written += 1;
        }
        info!(written, "flushed export queue");
        Ok(written)
    }
}
