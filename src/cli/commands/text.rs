//! Commands for free-text categories.

use crate::cli::core::{unescape_newlines, CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "text",
            "Replace the text of a free-text category (\\n breaks a line, \\\\n keeps it literal)",
            "text <category> [text...]",
            cmd_text,
        ),
        CommandEntry::new(
            "append",
            "Append one line to a free-text category",
            "append <category> <line...>",
            cmd_append,
        ),
        CommandEntry::new(
            "number",
            "Number the non-blank lines of a free-text category",
            "number <category>",
            cmd_number,
        ),
    ]
}

fn cmd_text(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((raw, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: text <category> [text...]".into(),
        ));
    };
    let category = context.resolve_category(raw)?;
    let text = unescape_newlines(&rest.join(" "));
    context
        .engine
        .set_free_text(&mut context.form, &category.name, &text)?;
    if text.is_empty() {
        cli_io::print_success(format!("{} cleared.", category.name));
    } else {
        cli_io::print_success(format!(
            "{} updated ({} lines).",
            category.name,
            text.split('\n').count()
        ));
    }
    Ok(())
}

fn cmd_append(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(
            "usage: append <category> <line...>".into(),
        ));
    }
    let category = context.resolve_category(args[0])?;
    let line = unescape_newlines(&args[1..].join(" "));
    context
        .engine
        .append_free_text_line(&mut context.form, &category.name, &line)?;
    cli_io::print_success(format!("Line added to {}.", category.name));
    Ok(())
}

fn cmd_number(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        return Err(CommandError::InvalidArguments("usage: number <category>".into()));
    };
    let category = context.resolve_category(raw)?;
    context
        .engine
        .apply_line_numbering(&mut context.form, &category.name)?;
    cli_io::print_success(format!("Lines of {} numbered.", category.name));
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::core::process_script;

    #[test]
    fn text_without_body_clears() {
        let app = process_script(&["text Other something", "text Other"]).unwrap();
        assert_eq!(app.form.free_text("Other"), Some(""));
    }

    #[test]
    fn numbering_twice_stacks_prefixes() {
        let app = process_script(&[
            "append \"Hospitalist - Day admit\" a",
            "append \"Hospitalist - Day admit\" \"\"",
            "append \"Hospitalist - Day admit\" b",
            "number \"hospitalist - day admit\"",
            "number \"Hospitalist - Day admit\"",
        ])
        .unwrap();
        assert_eq!(
            app.form.free_text("Hospitalist - Day admit"),
            Some("1. 1. a\n\n2. 2. b")
        );
    }

    #[test]
    fn escaped_backslash_keeps_literal_newline_sequence() {
        let app = process_script(&[
            "text Other 'C:\\\\new\\nnext'",
            "append Other 'path\\\\n'",
        ])
        .unwrap();
        assert_eq!(
            app.form.free_text("Other"),
            Some("C:\\new\nnext\npath\\n")
        );
    }

    #[test]
    fn numbering_other_is_rejected() {
        let app = process_script(&["text Other x", "number Other"]).unwrap();
        assert_eq!(app.form.free_text("Other"), Some("x"));
    }
}
