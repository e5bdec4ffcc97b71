/// Facet command-line front end
///
/// Loads surface files through `facet-core` and prints styled mass-property
/// reports or writes batched exports.
pub mod commands;
pub mod options;
pub mod report;

pub use commands::{export, info, ExportArgs, InfoArgs};
pub use options::OutputFormat;
pub use report::Report;
