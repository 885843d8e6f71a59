use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change preferences",
        "config [set <key> <value>]",
        cmd_config,
    )]
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            let config = &context.config;
            output::section("Configuration");
            cli_io::print_info(format!("  File: {}", context.config_manager.path().display()));
            cli_io::print_info(format!(
                "  Screen reader mode: {}",
                on_off(config.screen_reader_mode)
            ));
            cli_io::print_info(format!(
                "  High contrast mode: {}",
                on_off(config.high_contrast_mode)
            ));
            cli_io::print_info(format!("  Quiet mode: {}", on_off(config.quiet_mode)));
            cli_io::print_info(format!(
                "  Log filter: {}",
                config.log_filter.as_deref().unwrap_or("(default)")
            ));
            Ok(())
        }
        ["set", key, rest @ ..] => {
            let value = rest.join(" ");
            context.update_config(|config| config.set(key, &value))?;
            if key.eq_ignore_ascii_case("log_filter") {
                cli_io::print_hint("The log filter applies from the next start.");
            }
            cli_io::print_success("Configuration updated.");
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: config [set <key> <value>]".into(),
        )),
    }
}
