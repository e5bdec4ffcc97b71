//! Facet - mass properties and export for polygon surface files

use std::io::stdout;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use facet_core::{Colour, Winding};
use facet_terminal::options::{load_import_options, parse_axis, parse_colour, parse_triple};
use facet_terminal::{ExportArgs, InfoArgs, OutputFormat};
use tracing::Level;

#[derive(Parser)]
#[command(name = "facet")]
#[command(version, about = "Mass properties and export for polygon surface files")]
struct Cli {
    /// Log progress to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print counts, bounds, mass properties and collision array sizes.
    Info {
        /// Surface file to read.
        input: PathBuf,

        /// Uniform density of the solid.
        #[arg(short, long, default_value_t = 1.0)]
        density: f64,

        /// Faces are wound clockwise when seen from outside.
        #[arg(long)]
        clockwise: bool,

        /// Import options (TOML).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write one or more surface files into a single output.
    Export {
        /// Surface files to read, written in order.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file.
        #[arg(short, long)]
        output: PathBuf,

        /// Output format.
        #[arg(short, long, value_enum)]
        format: OutputFormat,

        /// Object name for interchange output.
        #[arg(short, long, default_value = "object")]
        name: String,

        /// Display translation as X,Y,Z.
        #[arg(long, value_parser = parse_triple, allow_hyphen_values = true)]
        translate: Option<[f64; 3]>,

        /// Display rotation axis as X,Y,Z; the mesh z axis is aligned with it.
        #[arg(long, value_parser = parse_axis, allow_hyphen_values = true)]
        axis: Option<[f64; 3]>,

        /// Raytrace pigment as R,G,B,A.
        #[arg(long, value_parser = parse_colour)]
        colour: Option<Colour>,

        /// Import options (TOML).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = stdout().lock();
    match command {
        Commands::Info {
            input,
            density,
            clockwise,
            config,
        } => {
            let args = InfoArgs {
                input,
                density,
                winding: if clockwise {
                    Winding::Clockwise
                } else {
                    Winding::CounterClockwise
                },
                options: load_import_options(config.as_deref())?,
            };
            facet_terminal::info(&args, &mut out)
        }
        Commands::Export {
            inputs,
            output,
            format,
            name,
            translate,
            axis,
            colour,
            config,
        } => {
            let args = ExportArgs {
                inputs,
                output,
                format: format.into(),
                name,
                translate,
                axis,
                colour,
                options: load_import_options(config.as_deref())?,
            };
            facet_terminal::export(&args, &mut out)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
