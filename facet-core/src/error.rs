//! Error types for mesh import, construction, mass properties and export.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`FacetError`].
pub type Result<T> = std::result::Result<T, FacetError>;

/// Errors that can occur while building, measuring or exporting a mesh.
#[derive(Debug, Error)]
pub enum FacetError {
    /// A vertex or face record could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number of the offending record.
        line: usize,
        /// What was wrong with the record.
        message: String,
    },

    /// A face references a vertex that does not exist.
    #[error("line {line}: face index {index} is outside the {vertex_count} vertices read so far")]
    IndexOutOfRange {
        /// 1-based line number of the face record.
        line: usize,
        /// The index as written in the file.
        index: i64,
        /// Number of vertices available when the face was read.
        vertex_count: usize,
    },

    /// A face in caller-built records refers past the end of its vertex list.
    #[error("face {face}: vertex index {index} is outside the {vertex_count} vertices")]
    FaceIndexOutOfRange {
        /// 0-based position of the face in the record list.
        face: usize,
        /// The 0-based vertex index.
        index: usize,
        /// Number of vertices in the records.
        vertex_count: usize,
    },

    /// A polygon needs at least three vertices.
    #[error("polygon has {count} vertices, at least 3 are required")]
    TooFewVertices {
        /// Number of vertices supplied.
        count: usize,
    },

    /// Growing the vertex storage failed. Previously stored triangles are untouched.
    #[error("could not grow mesh storage to {requested} vertices")]
    Allocation {
        /// Capacity that was requested, in vertices.
        requested: usize,
    },

    /// The enclosed volume is zero so the center of mass is undefined.
    #[error("mesh encloses zero volume, mass properties are undefined")]
    ZeroVolume,

    /// A rotation axis must be finite and non-zero.
    #[error("rotation axis ({x}, {y}, {z}) has no direction")]
    DegenerateAxis {
        x: f64,
        y: f64,
        z: f64,
    },

    /// Density must be a finite number.
    #[error("invalid density: {0}")]
    InvalidDensity(f64),

    /// Option file could not be read.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Reading an input file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Writing export output failed.
    #[error("write failed: {0}")]
    Write(#[from] std::io::Error),
}
