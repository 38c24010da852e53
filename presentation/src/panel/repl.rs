//! REPL (Read-Eval-Print Loop) for the interactive panel

use super::control_panel::ControlPanel;
use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::PathBuf;
use trajopt_application::{InvokeError, ParameterSource, SolverGateway};
use trajopt_domain::ParameterField;

const HISTORY_CAPACITY: usize = 500;

/// A parsed panel command
#[derive(Debug, Clone, PartialEq)]
pub enum PanelCommand {
    Show,
    Set { field: ParameterField, value: String },
    Reset,
    Run,
    Status,
    Cancel,
    Options,
    Help,
    Quit,
}

impl PanelCommand {
    /// Parse one input line. A leading `/` is accepted.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let line = line.strip_prefix('/').unwrap_or(line);
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return Err("Empty command".to_string());
        };

        let command = match command.to_lowercase().as_str() {
            "show" | "s" => PanelCommand::Show,
            "set" => {
                let field = parts
                    .next()
                    .ok_or_else(|| "Usage: set <field> <value>".to_string())?
                    .parse::<ParameterField>()
                    .map_err(|e| e.to_string())?;
                let value = parts
                    .next()
                    .ok_or_else(|| "Usage: set <field> <value>".to_string())?
                    .to_string();
                PanelCommand::Set { field, value }
            }
            "reset" => PanelCommand::Reset,
            "run" | "r" | "recalculate" => PanelCommand::Run,
            "status" => PanelCommand::Status,
            "cancel" => PanelCommand::Cancel,
            "options" => PanelCommand::Options,
            "help" | "h" | "?" => PanelCommand::Help,
            "quit" | "exit" | "q" => PanelCommand::Quit,
            other => {
                return Err(format!(
                    "Unknown command: {}\nType help for available commands",
                    other
                ));
            }
        };

        if parts.next().is_some() {
            return Err(format!("Too many arguments for '{}'", line));
        }
        Ok(command)
    }
}

/// Interactive panel REPL
pub struct PanelRepl<G: SolverGateway + ?Sized + 'static> {
    panel: ControlPanel<G>,
    history_file: Option<PathBuf>,
}

impl<G: SolverGateway + ?Sized + 'static> PanelRepl<G> {
    pub fn new(panel: ControlPanel<G>) -> Self {
        Self {
            panel,
            history_file: None,
        }
    }

    /// Persist line history to this file
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }

    /// Run the interactive REPL until the user quits.
    ///
    /// Requires a multi-threaded runtime: line editing blocks the current
    /// worker while results are delivered on the others.
    pub async fn run(&self) -> std::io::Result<()> {
        let mut editor = Reedline::create();
        if let Some(path) = &self.history_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(history) = FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
                editor = editor.with_history(Box::new(history));
            }
        }
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("trajopt".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            let signal = tokio::task::block_in_place(|| editor.read_line(&prompt))?;

            match signal {
                Signal::Success(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match PanelCommand::parse(&line) {
                        Ok(PanelCommand::Quit) => break,
                        Ok(command) => self.handle(command),
                        Err(message) => println!("{}", message),
                    }
                }
                Signal::CtrlC => {
                    if self.panel.cancel() {
                        println!("^C (cancelling running solve)");
                    } else {
                        println!("^C");
                    }
                }
                _ => break,
            }
        }

        println!("Bye!");
        self.panel.teardown();
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│        Trajectory Optimization Panel        │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Solver: {}", self.panel.invoker().gateway_name().bold());
        println!();
        self.print_request();
        println!("Type help for available commands");
        println!();
    }

    fn print_request(&self) {
        print!(
            "{}",
            ConsoleFormatter::format_request(&self.panel.form().snapshot())
        );
    }

    fn handle(&self, command: PanelCommand) {
        match command {
            PanelCommand::Show => self.print_request(),
            PanelCommand::Set { field, value } => match self.panel.form().set(field, &value) {
                Ok(value) => println!("{} = {}", field.name().cyan(), value),
                Err(e) => println!("{}", ConsoleFormatter::format_error(&e.to_string())),
            },
            PanelCommand::Reset => {
                self.panel.form().reset();
                self.print_request();
            }
            PanelCommand::Run => match self.panel.recalculate() {
                Ok(_) | Err(InvokeError::InvalidRequest(_)) => {}
                Err(InvokeError::Busy) => {
                    println!("{}", "A solve is already running (use cancel)".yellow())
                }
                Err(e) => println!("{}", ConsoleFormatter::format_error(&e.to_string())),
            },
            PanelCommand::Status => {
                let invoker = self.panel.invoker();
                if self.panel.is_enabled() {
                    println!("{} ready", "o".green());
                } else {
                    println!("{} solving", "*".yellow());
                }
                println!("  solver:     {}", invoker.gateway_name());
                println!("  validation: {}", invoker.config().validation);
                if let Some(timeout) = invoker.config().timeout {
                    println!("  timeout:    {}s", timeout.as_secs());
                }
                if invoker.in_flight() > 0 {
                    println!("  workers:    {}", invoker.in_flight());
                }
            }
            PanelCommand::Cancel => {
                if !self.panel.cancel() {
                    println!("No solve is running");
                }
            }
            PanelCommand::Options => {
                print!(
                    "{}",
                    ConsoleFormatter::format_options(&self.panel.form().snapshot())
                );
            }
            PanelCommand::Help => {
                println!();
                println!("Commands:");
                println!("  show                 - Show the current parameters");
                println!("  set <field> <value>  - Change a parameter");
                println!("  reset                - Restore default parameters");
                println!("  run, r               - Recalculate with the current parameters");
                println!("  status               - Show whether a solve is running");
                println!("  cancel               - Cancel the running solve");
                println!("  options              - Show the solver options block");
                println!("  help, h, ?           - Show this help");
                println!("  quit, exit, q        - Leave the panel");
                println!();
                println!(
                    "Fields: {}",
                    ParameterField::ALL
                        .iter()
                        .map(|f| f.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                println!();
            }
            PanelCommand::Quit => {}
        }
    }
}
