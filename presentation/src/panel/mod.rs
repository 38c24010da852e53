//! Interactive control panel
//!
//! The panel is the interaction side of the system: a form holding the
//! seven parameters, a triggering control backed by the invoker's gate,
//! and a display surface that receives the solver's report.

pub mod control_panel;
pub mod form;
pub mod repl;
pub mod surface;
