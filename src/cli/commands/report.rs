//! The report views and the signout date.

use std::io::Write;

use crate::cli::core::{parse_date, CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::report::{render_report, ReportView, DATE_FORMAT, REPORT_TITLE};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "date",
            "Set the signout date",
            "date <YYYY-MM-DD|today>",
            cmd_date,
        ),
        CommandEntry::new(
            "report",
            "Show the signout list (--plain for the copy-paste text)",
            "report [--plain]",
            cmd_report,
        ),
    ]
}

fn cmd_date(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        cli_io::print_info(format!(
            "Signout date: {}",
            context.form.signout_date().format(DATE_FORMAT)
        ));
        return Ok(());
    };
    let date = parse_date(raw)?;
    context.engine.set_signout_date(&mut context.form, date);
    cli_io::print_success(format!("Signout date set to {}.", date.format(DATE_FORMAT)));
    Ok(())
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().copied() {
        None => {
            print_live_view(&ReportView::build(&context.form, context.engine.registry()));
            Ok(())
        }
        Some("--plain") | Some("plain") => {
            let report = render_report(&context.form, context.engine.registry());
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(report.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown report option `{}` (expected --plain)",
            other
        ))),
    }
}

/// Styled rendering of the same lines the plain report contains.
fn print_live_view(view: &ReportView) {
    output::section(REPORT_TITLE);
    output::info(view.date_line());
    output::separator();
    for block in &view.blocks {
        output::heading(&block.heading);
        for line in &block.lines {
            if block.is_empty() {
                output::muted(line);
            } else {
                output::info(line);
            }
        }
        println!();
    }
}
