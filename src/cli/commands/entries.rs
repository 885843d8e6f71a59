//! Commands for structured categories: entries, fields, and "none" marks.

use crate::cli::core::{parse_position, CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::form::{resolve_choice, CategoryContent, ChoiceSelection, Entry};
use crate::schema::{CategoryDefinition, FieldDefinition, FieldKind, CUSTOM_OPTION};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "categories",
            "List handoff categories and their fields",
            "categories",
            cmd_categories,
        ),
        CommandEntry::new(
            "show",
            "Show what has been entered so far",
            "show [category]",
            cmd_show,
        ),
        CommandEntry::new(
            "add",
            "Add an empty patient entry",
            "add <category>",
            cmd_add,
        ),
        CommandEntry::new(
            "set",
            "Set one field of an entry",
            "set <category> <entry#> <field> [value...]",
            cmd_set,
        ),
        CommandEntry::new(
            "pick",
            "Choose a dropdown value for a field (interactive)",
            "pick <category> <entry#> <field>",
            cmd_pick,
        ),
        CommandEntry::new(
            "remove",
            "Remove an entry",
            "remove <category> <entry#>",
            cmd_remove,
        ),
        CommandEntry::new(
            "none",
            "Confirm a category has no patients",
            "none <category>",
            cmd_none,
        ),
    ]
}

fn require_args(args: &[&str], count: usize, usage: &str) -> CommandResult {
    if args.len() < count {
        Err(CommandError::InvalidArguments(format!("usage: {}", usage)))
    } else {
        Ok(())
    }
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Categories");
    for category in context.engine.registry() {
        cli_io::print_info(format!("  {:<34} {}", category.name, category.shape));
        for field in category.fields() {
            cli_io::print_info(format!("      - {:<14} {}", field.name, describe_field(field)));
        }
    }
    Ok(())
}

fn describe_field(field: &FieldDefinition) -> String {
    match &field.kind {
        FieldKind::ConstrainedChoice { options, .. } => {
            let labels: Vec<&str> = options
                .iter()
                .filter(|option| !option.is_empty())
                .map(String::as_str)
                .collect();
            format!("{} [{}]", field.kind, labels.join(", "))
        }
        other => other.to_string(),
    }
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(raw) = args.first() {
        let category = context.resolve_category(raw)?;
        show_category(context, category);
        return Ok(());
    }
    for category in context.engine.registry() {
        show_category(context, category);
    }
    Ok(())
}

fn show_category(context: &ShellContext, category: &CategoryDefinition) {
    output::section(&category.name);
    let Some(section) = context.form.section(&category.name) else {
        return;
    };
    match &section.content {
        CategoryContent::Entries {
            entries,
            none_marked,
        } => {
            if entries.is_empty() {
                if *none_marked {
                    cli_io::print_success("None (confirmed)");
                } else {
                    cli_io::print_info("  No entries. Use `add` or `none`.");
                }
            }
            for (index, entry) in entries.iter().enumerate() {
                cli_io::print_info(format!("  #{} {}", index + 1, describe_entry(category, entry)));
            }
        }
        CategoryContent::FreeText(text) => {
            if text.trim().is_empty() {
                cli_io::print_info("  (empty)");
            } else {
                for line in text.split('\n') {
                    cli_io::print_info(format!("  {}", line));
                }
            }
            if category.supports_line_numbering() {
                cli_io::print_hint("`number` prefixes each non-blank line with a counter.");
            }
        }
    }
}

/// Every field of an entry, blanks included, with dropdown state resolved.
fn describe_entry(category: &CategoryDefinition, entry: &Entry) -> String {
    category
        .fields()
        .iter()
        .map(|field| {
            let stored = entry.get(&field.name);
            let shown = match &field.kind {
                FieldKind::ConstrainedChoice { .. } => match resolve_choice(field, stored) {
                    ChoiceSelection::Declared(option) if option.is_empty() => "-".to_string(),
                    ChoiceSelection::Declared(option) => option,
                    ChoiceSelection::Custom(text) => format!("{} ({})", CUSTOM_OPTION, text),
                },
                _ if stored.trim().is_empty() => "-".to_string(),
                _ => stored.to_string(),
            };
            format!("{}: {}", field.name, shown)
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "add <category>")?;
    let category = context.resolve_category(args[0])?;
    let index = context.engine.add_entry(&mut context.form, &category.name)?;
    cli_io::print_success(format!("Added entry #{} to {}.", index + 1, category.name));
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 3, "set <category> <entry#> <field> [value...]")?;
    let category = context.resolve_category(args[0])?;
    let index = parse_position(args[1])?;
    let field = context.resolve_field(category, args[2])?;
    let typed = args[3..].join(" ");
    let value = canonical_option(field, &typed).unwrap_or(typed);
    context
        .engine
        .set_field(&mut context.form, &category.name, index, &field.name, &value)?;
    cli_io::print_success(format!(
        "{} #{}: {} set.",
        category.name,
        index + 1,
        field.name
    ));
    Ok(())
}

/// Declared option matching `typed` case-insensitively, if any.
fn canonical_option(field: &FieldDefinition, typed: &str) -> Option<String> {
    field
        .options()
        .iter()
        .find(|option| option.eq_ignore_ascii_case(typed.trim()))
        .filter(|option| !(field.allows_custom() && option.as_str() == CUSTOM_OPTION))
        .cloned()
}

fn cmd_pick(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 3, "pick <category> <entry#> <field>")?;
    if context.mode != CliMode::Interactive {
        return Err(CommandError::InvalidArguments(
            "`pick` needs an interactive terminal; use `set` in scripts".into(),
        ));
    }
    let category = context.resolve_category(args[0])?;
    let index = parse_position(args[1])?;
    let field = context.resolve_field(category, args[2])?;
    if field.options().is_empty() {
        return Err(CommandError::InvalidArguments(format!(
            "`{}` is not a dropdown field; use `set`",
            field.name
        )));
    }
    let stored = context
        .form
        .entries(&category.name)
        .and_then(|entries| entries.get(index))
        .map(|entry| entry.get(&field.name).to_string())
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "{} has no entry #{}",
                category.name,
                index + 1
            ))
        })?;

    let current = resolve_choice(field, &stored);
    let labels: Vec<String> = field
        .options()
        .iter()
        .map(|option| {
            if option.is_empty() {
                "(blank)".to_string()
            } else {
                option.clone()
            }
        })
        .collect();
    let default = field
        .options()
        .iter()
        .position(|option| option == current.option_label())
        .unwrap_or(0);
    let chosen = cli_io::select_index(&context.theme, &field.name, &labels, default)?;
    let option = field.options()[chosen].clone();

    let selection = if field.allows_custom() && option == CUSTOM_OPTION {
        let initial = current.custom_text().unwrap_or("");
        let custom = cli_io::prompt_text(
            &context.theme,
            &format!("Custom {}", field.name),
            initial,
        )?;
        ChoiceSelection::Custom(custom)
    } else {
        ChoiceSelection::Declared(option)
    };
    context.engine.set_field(
        &mut context.form,
        &category.name,
        index,
        &field.name,
        &selection.into_value(),
    )?;
    cli_io::print_success(format!(
        "{} #{}: {} set.",
        category.name,
        index + 1,
        field.name
    ));
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "remove <category> <entry#>")?;
    let category = context.resolve_category(args[0])?;
    let index = parse_position(args[1])?;
    context
        .engine
        .remove_entry(&mut context.form, &category.name, index)?;
    cli_io::print_success(format!("Removed entry #{} from {}.", index + 1, category.name));
    Ok(())
}

fn cmd_none(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "none <category>")?;
    let category = context.resolve_category(args[0])?;
    context.engine.mark_none(&mut context.form, &category.name)?;
    cli_io::print_success(format!("{} marked as none.", category.name));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::process_script;
    use crate::schema::CategoryRegistry;

    #[test]
    fn set_canonicalizes_closed_options() {
        let app = process_script(&["add Unseen", "set Unseen 1 group VENT"]).unwrap();
        assert_eq!(app.form.entries("Unseen").unwrap()[0].get("Group"), "Vent");
    }

    #[test]
    fn set_keeps_custom_text_verbatim() {
        let app = process_script(&[
            "add Palliative",
            "set Palliative 1 \"primary care\" Dr. Someone Else",
        ])
        .unwrap();
        assert_eq!(
            app.form.entries("Palliative").unwrap()[0].get("Primary Care"),
            "Dr. Someone Else"
        );
    }

    #[test]
    fn set_without_value_clears_field() {
        let app = process_script(&["add Vent", "set Vent 1 Name Doe", "set Vent 1 Name"]).unwrap();
        assert_eq!(app.form.entries("Vent").unwrap()[0].get("Name"), "");
    }

    #[test]
    fn pick_is_refused_in_scripts() {
        let app = process_script(&["add Vent", "pick Vent 1 \"Done by\""]).unwrap();
        assert_eq!(app.form.entries("Vent").unwrap()[0].get("Done by"), "");
    }

    #[test]
    fn describe_entry_resolves_dropdowns() {
        let registry = CategoryRegistry::standard();
        let vent = registry.get("Vent").unwrap();
        let app = process_script(&[
            "add Vent",
            "set Vent 1 Number 4",
            "set Vent 1 \"Done by\" Dr. Locum",
        ])
        .unwrap();
        let entry = &app.form.entries("Vent").unwrap()[0];
        assert_eq!(
            describe_entry(vent, entry),
            "Number: 4 | Name: - | MRN: - | Primary Care: - | Short Summary: - | Done by: Other (Dr. Locum)"
        );
    }
}
