//! Shell dispatch, argument resolution, and error reporting.

use std::io;

use chrono::{Local, NaiveDate};
use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use tracing::{debug, warn};

use crate::{
    config::{Config, ConfigManager},
    errors::SignoutError,
    form::FormEngine,
    report::DATE_FORMAT,
    schema::{CategoryDefinition, FieldDefinition},
};

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};
pub use crate::cli::shell_context::{CliMode, ShellContext};
pub use crate::errors::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        Self::with_config_manager(mode, config_manager)
    }

    /// Session backed by an explicit preferences location.
    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = config_manager.load()?;
        cli_io::apply_config(&config);

        let engine = FormEngine::standard();
        let form = engine.new_state(Local::now().date_naive());

        Ok(ShellContext {
            mode,
            registry,
            engine,
            form,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        format!("signout {}> ", self.form.signout_date().format(DATE_FORMAT))
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            debug!(command, args = args.len(), "dispatching command");
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.dispatch(&raw.to_lowercase(), raw, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell? The signout list is not saved.")
            .map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        debug!(status = %self.status(), "command failed");
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(SignoutError::UnknownCategory(name)) => {
                self.print_error(&format!("Unknown category `{}`.", name));
                match self.engine.registry().suggest(&name) {
                    Some(best) => self.print_hint(&format!("Did you mean \"{}\"?", best)),
                    None => self.print_hint("Use `categories` to list them."),
                }
                Ok(())
            }
            CommandError::Core(SignoutError::IndexOutOfRange {
                category,
                index,
                len,
            }) => {
                self.print_error(&format!(
                    "`{}` has no entry #{} ({} entries).",
                    category,
                    index + 1,
                    len
                ));
                self.print_hint(&format!("Use `show \"{}\"` to see entry numbers.", category));
                Ok(())
            }
            CommandError::Io(err) => Err(CliError::from(err)),
            other => {
                warn!(error = %other, "command rejected");
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }

    /// Resolves a user-typed category name (case-insensitive).
    pub(crate) fn resolve_category(
        &self,
        raw: &str,
    ) -> Result<&'static CategoryDefinition, CommandError> {
        self.engine
            .registry()
            .find_case_insensitive(raw)
            .ok_or_else(|| CommandError::Core(SignoutError::UnknownCategory(raw.to_string())))
    }

    pub(crate) fn resolve_field<'c>(
        &self,
        category: &'c CategoryDefinition,
        raw: &str,
    ) -> Result<&'c FieldDefinition, CommandError> {
        category.find_field(raw).ok_or_else(|| {
            CommandError::Core(SignoutError::UnknownField {
                category: category.name.clone(),
                field: raw.to_string(),
            })
        })
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager
            .save(&self.config)
            .map_err(CommandError::from)
    }

    /// Applies `update` to a copy of the preferences, then persists it.
    pub(crate) fn update_config(
        &mut self,
        update: impl FnOnce(&mut Config) -> Result<(), SignoutError>,
    ) -> CommandResult {
        let mut next = self.config.clone();
        update(&mut next)?;
        self.config = next;
        self.persist_config()?;
        cli_io::apply_config(&self.config);
        Ok(())
    }
}

/// Parses a 1-based entry position as shown by `show`.
pub(crate) fn parse_position(raw: &str) -> Result<usize, CommandError> {
    match raw.trim().parse::<usize>() {
        Ok(position) if position >= 1 => Ok(position - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "invalid entry number `{}` (entries are numbered from 1)",
            raw
        ))),
    }
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    if input.eq_ignore_ascii_case("today") {
        return Ok(Local::now().date_naive());
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

/// Turns `\n` typed on one line into a line break; `\\` stands for one
/// backslash, so `\\n` keeps a literal backslash-n.
pub(crate) fn unescape_newlines(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] SignoutError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            CommandError::InvalidArguments(message) => CliError::Input(message),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}

/// Keeps test home directories alive for the whole test run.
#[cfg(test)]
static TEST_DIRS: once_cell::sync::Lazy<std::sync::Mutex<Vec<tempfile::TempDir>>> =
    once_cell::sync::Lazy::new(|| std::sync::Mutex::new(Vec::new()));

#[cfg(test)]
pub(crate) fn process_script(lines: &[&str]) -> Result<ShellContext, CliError> {
    let dir = tempfile::tempdir()?;
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf())?;
    TEST_DIRS
        .lock()
        .map_err(|_| CliError::Command("test directory registry poisoned".into()))?
        .push(dir);
    let mut app = ShellContext::with_config_manager(CliMode::Script, manager)?;
    for line in lines {
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err)?,
        }
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_line_handles_quotes() {
        let tokens =
            crate::cli::shell::parse_command_line("add \"Pending transfer\"").unwrap();
        assert_eq!(tokens, vec!["add", "Pending transfer"]);
    }

    #[test]
    fn script_builds_entries() {
        let app = process_script(&[
            "date 2024-03-15",
            "add \"pending transfer\"",
            "set \"Pending transfer\" 1 Number 3",
            "set \"Pending transfer\" 1 name Doe",
            "set \"Pending transfer\" 1 MRN 12345",
            "exit",
        ])
        .unwrap();
        let entries = app.form.entries("Pending transfer").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].get("Name"), "Doe");
        assert_eq!(
            app.form.signout_date(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn rejected_commands_do_not_stop_the_script() {
        let app = process_script(&[
            "add EOU",
            "remove Vent 1",
            "none Vent",
            "add Vnet",
            "add Vent",
        ])
        .unwrap();
        assert_eq!(app.form.entries("Vent").map(|e| e.len()), Some(1));
        assert!(!app.form.is_none_marked("Vent"));
    }

    #[test]
    fn free_text_commands() {
        let app = process_script(&[
            "text EOU \"Smith\\n\\nJones\"",
            "number eou",
            "append Other first line",
        ])
        .unwrap();
        assert_eq!(app.form.free_text("EOU"), Some("1. Smith\n\n2. Jones"));
        assert_eq!(app.form.free_text("Other"), Some("first line"));
    }

    #[test]
    fn newline_escapes() {
        assert_eq!(unescape_newlines("a\\nb"), "a\nb");
        assert_eq!(unescape_newlines("C:\\\\new"), "C:\\new");
        assert_eq!(unescape_newlines("tab\\t end\\"), "tab\\t end\\");
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(parse_position("1").unwrap(), 0);
        assert!(parse_position("0").is_err());
        assert!(parse_position("x").is_err());
    }

    #[test]
    fn dates_parse_iso_or_today() {
        assert_eq!(
            parse_date("2024-03-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert!(parse_date("today").is_ok());
        assert!(matches!(
            parse_date("15/03/2024"),
            Err(CommandError::InvalidArguments(_))
        ));
    }
}
