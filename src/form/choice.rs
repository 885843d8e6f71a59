//! Resolution of constrained-choice fields for dropdown-style editors.

use crate::schema::{FieldDefinition, CUSTOM_OPTION};

/// What a dropdown shows for a stored choice value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceSelection {
    /// A declared option is selected.
    Declared(String),
    /// The implicit "Other" option with free text kept verbatim.
    Custom(String),
}

impl ChoiceSelection {
    /// Label of the option a dropdown should highlight.
    pub fn option_label(&self) -> &str {
        match self {
            ChoiceSelection::Declared(option) => option,
            ChoiceSelection::Custom(_) => CUSTOM_OPTION,
        }
    }

    /// Override text shown next to the dropdown, if any.
    pub fn custom_text(&self) -> Option<&str> {
        match self {
            ChoiceSelection::Custom(text) => Some(text),
            ChoiceSelection::Declared(_) => None,
        }
    }

    /// The string to store for this selection.
    pub fn into_value(self) -> String {
        match self {
            ChoiceSelection::Declared(option) | ChoiceSelection::Custom(option) => option,
        }
    }
}

/// Maps a stored value onto the dropdown state for `field`.
///
/// A declared option selects itself. Anything else, including the literal
/// custom label, selects "Other" with the stored value as override text when
/// the field allows custom values. Closed fields fall back to their first
/// option; the engine never stores undeclared values in them.
pub fn resolve_choice(field: &FieldDefinition, stored: &str) -> ChoiceSelection {
    let custom = field.allows_custom();
    let declared = field
        .options()
        .iter()
        .find(|option| option.as_str() == stored && !(custom && option.as_str() == CUSTOM_OPTION));
    match declared {
        Some(option) => ChoiceSelection::Declared(option.clone()),
        None if custom => ChoiceSelection::Custom(stored.to_string()),
        None => ChoiceSelection::Declared(field.options().first().cloned().unwrap_or_default()),
    }
}
