/// Command implementations for the `facet` binary
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use facet_core::{
    collision_mesh_f32, compute_mass_properties, load_surface, Colour, ExportFormat, ExportQueue,
    ImportOptions, ObjWriter, Winding,
};
use tracing::warn;

use crate::report::Report;

/// Arguments of `facet info`.
#[derive(Debug, Clone)]
pub struct InfoArgs {
    pub input: PathBuf,
    pub density: f64,
    pub winding: Winding,
    pub options: ImportOptions,
}

/// Arguments of `facet export`.
#[derive(Debug, Clone)]
pub struct ExportArgs {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub format: ExportFormat,
    pub name: String,
    pub translate: Option<[f64; 3]>,
    pub axis: Option<[f64; 3]>,
    pub colour: Option<Colour>,
    pub options: ImportOptions,
}

/// Import one surface and write its mesh, mass and collision report to `out`.
///
/// A mesh without enclosed volume is still reported; the mass section is
/// replaced by a warning.
pub fn info<W: Write>(args: &InfoArgs, out: &mut W) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = load_surface(&args.input, &args.options)?;

    let mut report = Report::new(args.input.display().to_string());
    report.add_mesh(&mesh);
    match compute_mass_properties(&mesh, args.density, args.winding) {
        Ok(props) => {
            report.add_mass(&props);
        }
        Err(e) => {
            warn!(error = %e, "no mass properties");
            report.section("Mass properties").warning(e.to_string());
        }
    }
    report.add_collision(&collision_mesh_f32(&mesh));

    report.draw(out)?;
    out.flush()?;
    Ok(())
}

/// Import every input, queue it with the requested placement and colour,
/// then write the whole queue to one output file.
pub fn export<W: Write>(args: &ExportArgs, out: &mut W) -> Result<(), Box<dyn std::error::Error>> {
    let mut queue = ExportQueue::new();
    let mut triangles = 0;
    for input in &args.inputs {
        let mut mesh = load_surface(input, &args.options)?;
        let display = mesh.display_transform_mut();
        if let Some([x, y, z]) = args.translate {
            display.set_position(x, y, z);
        }
        if let Some([x, y, z]) = args.axis {
            display.set_rotation_from_axis(x, y, z, false)?;
        }
        mesh.set_colour(args.colour);
        triangles += mesh.triangle_count();
        queue.push(mesh);
    }

    let file = File::create(&args.output).map_err(|e| create_error(&args.output, e))?;
    let mut writer = BufWriter::new(file);
    let mut obj_writer = ObjWriter::new(&args.name);
    let written = queue.flush(args.format, &mut writer, &mut obj_writer)?;
    writer.flush()?;
    tracing::info!(written, output = %args.output.display(), "export finished");

    let mut report = Report::new(format!("wrote {}", args.output.display()));
    report
        .field("format", format!("{:?}", args.format))
        .field("objects", written.to_string())
        .field("triangles", triangles.to_string());
    report.draw(out)?;
    out.flush()?;
    Ok(())
}

fn create_error(path: &Path, e: std::io::Error) -> String {
    format!("cannot create {}: {e}", path.display())
}
