/// Styled text reports for the terminal
use crossterm::{
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    QueueableCommand,
};
use facet_core::export::format::format_significant;
use facet_core::{CollisionMesh, MassProperties, MeshBuffer};
use nalgebra::{Matrix3, Point3};
use std::io::Write;

/// Significant digits shown in reports
const REPORT_PRECISION: usize = 6;

/// Width of the label column
const LABEL_WIDTH: usize = 22;

enum Row {
    Section(String),
    Field { label: String, value: String },
    Warning(String),
}

/// A titled list of sections and label/value fields, drawn with colour
pub struct Report {
    title: String,
    rows: Vec<Row>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    pub fn section(&mut self, name: impl Into<String>) -> &mut Self {
        self.rows.push(Row::Section(name.into()));
        self
    }

    pub fn field(&mut self, label: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.rows.push(Row::Field {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    pub fn warning(&mut self, message: impl Into<String>) -> &mut Self {
        self.rows.push(Row::Warning(message.into()));
        self
    }

    /// Triangle and vertex counts plus the bounding box.
    pub fn add_mesh(&mut self, mesh: &MeshBuffer) -> &mut Self {
        self.section("Mesh");
        self.field("triangles", mesh.triangle_count().to_string());
        self.field("vertices", mesh.vertex_count().to_string());
        match mesh.bounds() {
            Some((min, max)) => {
                self.field("bounds min", point(&min));
                self.field("bounds max", point(&max));
            }
            None => {
                self.field("bounds", "empty");
            }
        }
        self
    }

    pub fn add_mass(&mut self, props: &MassProperties) -> &mut Self {
        self.section("Mass properties");
        self.field("density", number(props.density));
        self.field("volume", number(props.volume()));
        self.field("mass", number(props.mass));
        self.field("center of mass", point(&props.center_of_mass));
        self.matrix("inertia (origin)", &props.inertia);
        self.matrix("inertia (com)", &props.inertia_about_center_of_mass());
        self
    }

    pub fn add_collision<T>(&mut self, arrays: &CollisionMesh<T>) -> &mut Self {
        self.section("Collision arrays");
        self.field(
            "positions",
            format!("{} ({} B stride)", arrays.positions.len(), arrays.vertex_stride),
        );
        self.field(
            "indices",
            format!("{} ({} B stride)", arrays.index_count(), arrays.index_stride),
        );
        self
    }

    fn matrix(&mut self, label: &str, m: &Matrix3<f64>) {
        for (i, row) in m.row_iter().enumerate() {
            let label = if i == 0 { label } else { "" };
            let values: Vec<String> = row.iter().map(|v| number(*v)).collect();
            self.field(label, format!("[{}]", values.join(", ")));
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetAttribute(Attribute::Bold))?;
        writer.queue(SetForegroundColor(Color::Yellow))?;
        writer.queue(Print(&self.title))?;
        writer.queue(SetAttribute(Attribute::Reset))?;
        writer.queue(Print('\n'))?;

        for row in &self.rows {
            match row {
                Row::Section(name) => {
                    writer.queue(SetForegroundColor(Color::Cyan))?;
                    writer.queue(Print(format!("\n{name}\n")))?;
                }
                Row::Field { label, value } => {
                    writer.queue(SetForegroundColor(Color::DarkGrey))?;
                    writer.queue(Print(format!("  {:<width$}", label, width = LABEL_WIDTH)))?;
                    writer.queue(SetForegroundColor(Color::White))?;
                    writer.queue(Print(format!("{value}\n")))?;
                }
                Row::Warning(message) => {
                    writer.queue(SetForegroundColor(Color::Red))?;
                    writer.queue(Print(format!("  {message}\n")))?;
                }
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn number(value: f64) -> String {
    format_significant(value, REPORT_PRECISION)
}

fn point(p: &Point3<f64>) -> String {
    format!("({}, {}, {})", number(p.x), number(p.y), number(p.z))
}
