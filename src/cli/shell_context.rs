use dialoguer::theme::ColorfulTheme;

use crate::{
    config::{Config, ConfigManager},
    form::{FormEngine, FormState},
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Everything one shell session owns: the command table, the form being
/// edited, and the user's preferences.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub engine: FormEngine<'static>,
    pub form: FormState,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn status(&self) -> String {
        format!(
            "ShellContext {{ running: {}, last_command: {:?}, date: {} }}",
            self.running,
            self.last_command,
            self.form.signout_date()
        )
    }
}
