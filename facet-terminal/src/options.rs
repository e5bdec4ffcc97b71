/// Command-line value parsers and option loading
use std::path::Path;

use clap::ValueEnum;
use facet_core::{Colour, ExportFormat, ImportOptions, IndexMode};

/// Output format names accepted by `facet export --format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// POV-Ray mesh objects
    Povray,
    /// Wavefront-style text, absolute face indices
    Obj,
    /// Wavefront-style text, each face refers to the three preceding vertices
    ObjRelative,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Povray => ExportFormat::Raytrace,
            OutputFormat::Obj => ExportFormat::Interchange(IndexMode::Absolute),
            OutputFormat::ObjRelative => ExportFormat::Interchange(IndexMode::Relative),
        }
    }
}

fn parse_components<const N: usize>(text: &str) -> Result<[f64; N], String> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated numbers, got `{text}`"));
    }
    let mut values = [0.0; N];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .parse::<f64>()
            .map_err(|e| format!("`{part}` is not a number: {e}"))?;
        if !value.is_finite() {
            return Err(format!("`{part}` is not finite"));
        }
    }
    Ok(values)
}

/// Parse `X,Y,Z`.
pub fn parse_triple(text: &str) -> Result<[f64; 3], String> {
    parse_components::<3>(text)
}

/// Parse `X,Y,Z` as a direction: at least one component must be non-zero.
pub fn parse_axis(text: &str) -> Result<[f64; 3], String> {
    let axis = parse_triple(text)?;
    if axis.iter().all(|c| *c == 0.0) {
        return Err(format!("axis `{text}` has zero length"));
    }
    Ok(axis)
}

/// Parse `R,G,B,A` with every component in `[0, 1]`.
pub fn parse_colour(text: &str) -> Result<Colour, String> {
    let [r, g, b, a] = parse_components::<4>(text)?;
    if [r, g, b, a].iter().any(|c| !(0.0..=1.0).contains(c)) {
        return Err(format!("colour components must lie in [0, 1], got `{text}`"));
    }
    Ok(Colour::new(r as f32, g as f32, b as f32, a as f32))
}

/// Import options from an optional TOML file, defaults otherwise.
pub fn load_import_options(
    path: Option<&Path>,
) -> Result<ImportOptions, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
            Ok(ImportOptions::from_toml_str(&text)?)
        }
        None => Ok(ImportOptions::default()),
    }
}
