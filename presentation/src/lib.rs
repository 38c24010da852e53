//! Presentation layer for trajopt-panel
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the interactive control panel.

pub mod cli;
pub mod config;
pub mod output;
pub mod panel;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use config::ReplConfig;
pub use output::console::ConsoleFormatter;
pub use panel::{
    control_panel::ControlPanel,
    form::ParameterForm,
    repl::{PanelCommand, PanelRepl},
    surface::{ConsoleSurface, PanelText, TextSurface},
};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
