//! Display surfaces for the panel

use crate::output::console::{ConsoleFormatter, PENDING_TEXT};
use std::sync::{Mutex, PoisonError};
use trajopt_application::DisplaySurface;
use trajopt_domain::{OptimizationRequest, SolverReport};

/// What a surface currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum PanelText {
    Empty,
    Pending(OptimizationRequest),
    Report(String),
    Failure(String),
}

impl PanelText {
    /// Plain text as a text view would hold it
    pub fn as_text(&self) -> String {
        match self {
            PanelText::Empty => String::new(),
            PanelText::Pending(_) => PENDING_TEXT.to_string(),
            PanelText::Report(text) => text.clone(),
            PanelText::Failure(message) => message.clone(),
        }
    }
}

/// In-memory surface that keeps the latest content and how many updates it saw
#[derive(Debug)]
pub struct TextSurface {
    state: Mutex<(PanelText, usize)>,
}

impl TextSurface {
    pub fn new() -> Self {
        Self {
            state: Mutex::new((PanelText::Empty, 0)),
        }
    }

    pub fn content(&self) -> PanelText {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .0
            .clone()
    }

    /// Number of times the content was replaced
    pub fn updates(&self) -> usize {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).1
    }

    fn replace(&self, text: PanelText) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.0 = text;
        state.1 += 1;
    }
}

impl Default for TextSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySurface for TextSurface {
    fn show_pending(&self, request: &OptimizationRequest) {
        self.replace(PanelText::Pending(*request));
    }

    fn show_report(&self, report: &SolverReport) {
        self.replace(PanelText::Report(report.text().to_string()));
    }

    fn show_failure(&self, message: &str) {
        self.replace(PanelText::Failure(message.to_string()));
    }
}

/// Surface that prints to the terminal and remembers what it printed
pub struct ConsoleSurface {
    last: TextSurface,
}

impl ConsoleSurface {
    pub fn new() -> Self {
        Self {
            last: TextSurface::new(),
        }
    }

    pub fn content(&self) -> PanelText {
        self.last.content()
    }
}

impl Default for ConsoleSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySurface for ConsoleSurface {
    fn show_pending(&self, request: &OptimizationRequest) {
        println!("{}", ConsoleFormatter::format_pending(request));
        self.last.show_pending(request);
    }

    fn show_report(&self, report: &SolverReport) {
        println!();
        print!("{}", report.text());
        if !report.text().ends_with('\n') {
            println!();
        }
        self.last.show_report(report);
    }

    fn show_failure(&self, message: &str) {
        eprintln!("{}", ConsoleFormatter::format_error(message));
        self.last.show_failure(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_surface_replaces_content() {
        let surface = TextSurface::new();
        assert_eq!(surface.content(), PanelText::Empty);

        surface.show_pending(&OptimizationRequest::default());
        assert_eq!(surface.content().as_text(), "Recalculating");

        surface.show_report(&SolverReport::new("Cost = 1\n\n\u{7}"));
        assert_eq!(
            surface.content(),
            PanelText::Report("Cost = 1\n\n\u{7}".to_string())
        );
        assert_eq!(surface.updates(), 2);
    }

    #[test]
    fn test_failure_text() {
        let surface = TextSurface::new();
        surface.show_failure("Solver failed: exit 3");
        assert_eq!(surface.content().as_text(), "Solver failed: exit 3");
    }
}
