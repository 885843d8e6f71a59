//! Field definitions for structured categories.

use std::fmt;

/// Option label that stands for "type your own value" in custom-capable choices.
pub const CUSTOM_OPTION: &str = "Other";

/// Field that renders as `"<value>."` in the report instead of `"Name: value"`.
pub const NUMBER_FIELD: &str = "Number";

/// Data kinds a structured field may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    PlainText,
    MultilineText,
    ConstrainedChoice {
        options: Vec<String>,
        allow_custom: bool,
    },
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::PlainText => f.write_str("text"),
            FieldKind::MultilineText => f.write_str("multiline"),
            FieldKind::ConstrainedChoice { allow_custom, .. } => {
                if *allow_custom {
                    f.write_str("choice+custom")
                } else {
                    f.write_str("choice")
                }
            }
        }
    }
}

/// Declarative description of one column in a structured category.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub kind: FieldKind,
    /// Relative column width; purely cosmetic.
    pub width: f32,
}

impl FieldDefinition {
    pub fn text(name: impl Into<String>) -> Self {
        let name = name.into();
        let width = if name == NUMBER_FIELD { 0.5 } else { 1.0 };
        Self {
            name,
            kind: FieldKind::PlainText,
            width,
        }
    }

    pub fn multiline(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::MultilineText,
            width: 3.0,
        }
    }

    pub fn choice<I, S>(name: impl Into<String>, options: I, allow_custom: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: FieldKind::ConstrainedChoice {
                options: options.into_iter().map(Into::into).collect(),
                allow_custom,
            },
            width: 1.0,
        }
    }

    pub fn is_number(&self) -> bool {
        self.name == NUMBER_FIELD
    }

    /// Declared options for choice fields, empty for free-form ones.
    pub fn options(&self) -> &[String] {
        match &self.kind {
            FieldKind::ConstrainedChoice { options, .. } => options,
            _ => &[],
        }
    }

    pub fn allows_custom(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::ConstrainedChoice {
                allow_custom: true,
                ..
            }
        )
    }

    /// Returns whether `value` may be stored in this field.
    pub fn accepts(&self, value: &str) -> bool {
        match &self.kind {
            FieldKind::ConstrainedChoice {
                options,
                allow_custom,
            } => *allow_custom || options.iter().any(|option| option == value),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_choice_rejects_undeclared_values() {
        let field = FieldDefinition::choice("Group", ["", "Vent"], false);
        assert!(field.accepts("Vent"));
        assert!(field.accepts(""));
        assert!(!field.accepts("vent"));
    }

    #[test]
    fn width_hints_follow_field_role() {
        assert_eq!(FieldDefinition::text("Number").width, 0.5);
        assert_eq!(FieldDefinition::text("MRN").width, 1.0);
        assert_eq!(FieldDefinition::multiline("Short Summary").width, 3.0);
    }
}
