//! Category definitions: the fixed handoff sections and their entry shapes.

use std::fmt;

use super::field::FieldDefinition;

/// How entries of a category are captured.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryShape {
    /// Discrete patient rows with an ordered set of named fields.
    StructuredFields(Vec<FieldDefinition>),
    /// A single pasted block of text.
    FreeText { supports_line_numbering: bool },
}

/// One handoff section.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDefinition {
    pub name: String,
    pub shape: CategoryShape,
}

impl CategoryDefinition {
    pub fn structured(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            name: name.into(),
            shape: CategoryShape::StructuredFields(fields),
        }
    }

    pub fn free_text(name: impl Into<String>, supports_line_numbering: bool) -> Self {
        Self {
            name: name.into(),
            shape: CategoryShape::FreeText {
                supports_line_numbering,
            },
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self.shape, CategoryShape::StructuredFields(_))
    }

    pub fn supports_line_numbering(&self) -> bool {
        matches!(
            self.shape,
            CategoryShape::FreeText {
                supports_line_numbering: true
            }
        )
    }

    /// Fields of a structured category; empty for free text.
    pub fn fields(&self) -> &[FieldDefinition] {
        match &self.shape {
            CategoryShape::StructuredFields(fields) => fields,
            CategoryShape::FreeText { .. } => &[],
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields().iter().find(|field| field.name == name)
    }

    /// Case-insensitive field lookup used by the shell.
    pub fn find_field(&self, name: &str) -> Option<&FieldDefinition> {
        let needle = name.trim();
        self.field(needle).or_else(|| {
            self.fields()
                .iter()
                .find(|field| field.name.eq_ignore_ascii_case(needle))
        })
    }
}

impl fmt::Display for CategoryShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryShape::StructuredFields(fields) => {
                write!(f, "structured ({} fields)", fields.len())
            }
            CategoryShape::FreeText {
                supports_line_numbering: true,
            } => f.write_str("free text, numbered"),
            CategoryShape::FreeText { .. } => f.write_str("free text"),
        }
    }
}
