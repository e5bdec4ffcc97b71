//! Import options and shared constants.
//!
//! Options can be built in code or read from a TOML file.

use serde::{Deserialize, Serialize};

use crate::error::{FacetError, Result};

/// Vertices reserved by the first growth of an empty mesh buffer.
pub const DEFAULT_ALLOCATION_INCREMENT: usize = 8192;

/// Subdivision depth of the sphere placed at each point in point-cloud mode.
pub const SPHERE_SUBDIVISIONS: u32 = 2;

/// Significant digits used for exported coordinates.
pub const EXPORT_PRECISION: usize = 7;

/// Controls how a surface file is turned into triangles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Emit every face a second time with reversed winding. Use for meshes
    /// whose winding is inconsistent so that an outward copy always exists.
    pub duplicate_reversed_faces: bool,

    /// When set, faces are ignored and every vertex becomes a sphere of
    /// this radius.
    pub sphere_radius: Option<f64>,

    /// Growth increment for a buffer that has no import-size hint.
    pub allocation_increment: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            duplicate_reversed_faces: false,
            sphere_radius: None,
            allocation_increment: DEFAULT_ALLOCATION_INCREMENT,
        }
    }
}

impl ImportOptions {
    /// Options for meshes with unreliable winding.
    pub fn bad_mesh() -> Self {
        Self {
            duplicate_reversed_faces: true,
            ..Default::default()
        }
    }

    /// Options that turn each vertex into a sphere of `radius`.
    pub fn point_cloud(radius: f64) -> Self {
        Self {
            sphere_radius: Some(radius),
            ..Default::default()
        }
    }

    /// Parse options from TOML. Missing keys take their default values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| FacetError::Config(e.to_string()))
    }

    /// Sphere radius if point-cloud mode is active. Non-positive radii disable it.
    pub fn point_cloud_radius(&self) -> Option<f64> {
        self.sphere_radius.filter(|r| *r > 0.0)
    }
}
