//! Validated command operations over a [`FormState`].

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::errors::{Result, SignoutError};
use crate::form::{number_lines, CategoryContent, Entry, FormState};
use crate::schema::{CategoryDefinition, CategoryRegistry, FieldDefinition};

/// Applies user commands to a [`FormState`] according to a [`CategoryRegistry`].
///
/// The engine holds no session data of its own. Every operation checks all of
/// its preconditions before mutating anything, so a rejected command leaves the
/// state exactly as it was.
#[derive(Debug, Clone, Copy)]
pub struct FormEngine<'r> {
    registry: &'r CategoryRegistry,
}

impl FormEngine<'static> {
    /// Engine bound to [`CategoryRegistry::standard`].
    pub fn standard() -> Self {
        FormEngine::new(CategoryRegistry::standard())
    }
}

impl<'r> FormEngine<'r> {
    pub fn new(registry: &'r CategoryRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r CategoryRegistry {
        self.registry
    }

    /// Blank form covering every registry category.
    pub fn new_state(&self, signout_date: NaiveDate) -> FormState {
        FormState::new(self.registry, signout_date)
    }

    /// Appends an empty entry and clears any "none" assertion.
    ///
    /// Returns the zero-based index of the new entry.
    pub fn add_entry(&self, state: &mut FormState, category: &str) -> Result<usize> {
        self.require_structured(category, "add an entry to")?;
        let (entries, none_marked) = entries_mut(state, category)?;
        entries.push(Entry::new());
        *none_marked = false;
        let index = entries.len() - 1;
        debug!(category, index, "entry added");
        Ok(index)
    }

    /// Deletes the entry at `index`. The "none" flag is left as is.
    pub fn remove_entry(
        &self,
        state: &mut FormState,
        category: &str,
        index: usize,
    ) -> Result<Entry> {
        self.require_structured(category, "remove an entry from")?;
        let (entries, _) = entries_mut(state, category)?;
        check_index(category, index, entries.len())?;
        let removed = entries.remove(index);
        debug!(category, index, "entry removed");
        Ok(removed)
    }

    /// Stores `value` in `field` of the entry at `index`.
    pub fn set_field(
        &self,
        state: &mut FormState,
        category: &str,
        index: usize,
        field: &str,
        value: &str,
    ) -> Result<()> {
        let definition = self.require_structured(category, "set a field in")?;
        let field_def = require_field(definition, field)?;
        if !field_def.accepts(value) {
            return Err(SignoutError::InvalidOption {
                field: field_def.name.clone(),
                value: value.to_string(),
                options: describe_options(field_def),
            });
        }
        let (entries, _) = entries_mut(state, category)?;
        check_index(category, index, entries.len())?;
        entries[index].set(&field_def.name, value);
        debug!(category, index, field, "field updated");
        Ok(())
    }

    /// Records that the category has no patients. Only valid while it is empty.
    pub fn mark_none(&self, state: &mut FormState, category: &str) -> Result<()> {
        self.require_structured(category, "mark none on")?;
        let (entries, none_marked) = entries_mut(state, category)?;
        if !entries.is_empty() {
            return Err(SignoutError::InvalidShapeOperation(format!(
                "cannot mark `{}` as none while it has {} entries",
                category,
                entries.len()
            )));
        }
        *none_marked = true;
        info!(category, "category marked none");
        Ok(())
    }

    /// Replaces the whole text of a free-text category.
    pub fn set_free_text(&self, state: &mut FormState, category: &str, text: &str) -> Result<()> {
        self.require_free_text(category, "set text on")?;
        let current = free_text_mut(state, category)?;
        *current = text.to_string();
        debug!(category, bytes = text.len(), "free text replaced");
        Ok(())
    }

    /// Adds `line` as a new last line of a free-text category.
    ///
    /// Empty text counts as having no lines, so the first append carries no
    /// leading line break.
    pub fn append_free_text_line(
        &self,
        state: &mut FormState,
        category: &str,
        line: &str,
    ) -> Result<()> {
        self.require_free_text(category, "append text to")?;
        let current = free_text_mut(state, category)?;
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
        debug!(category, "free text line appended");
        Ok(())
    }

    /// Prefixes every non-blank line of the category text with a running number.
    ///
    /// See [`number_lines`]; applying it twice numbers lines twice.
    pub fn apply_line_numbering(&self, state: &mut FormState, category: &str) -> Result<()> {
        let definition = self.require_free_text(category, "number lines of")?;
        if !definition.supports_line_numbering() {
            return Err(SignoutError::InvalidShapeOperation(format!(
                "`{}` does not support line numbering",
                category
            )));
        }
        let current = free_text_mut(state, category)?;
        *current = number_lines(current);
        info!(category, "line numbering applied");
        Ok(())
    }

    pub fn set_signout_date(&self, state: &mut FormState, date: NaiveDate) {
        state.set_signout_date(date);
        info!(%date, "signout date set");
    }

    fn require_structured(&self, category: &str, action: &str) -> Result<&'r CategoryDefinition> {
        let definition = self.registry.require(category)?;
        if definition.is_structured() {
            Ok(definition)
        } else {
            Err(SignoutError::InvalidShapeOperation(format!(
                "cannot {} free-text category `{}`",
                action, category
            )))
        }
    }

    fn require_free_text(&self, category: &str, action: &str) -> Result<&'r CategoryDefinition> {
        let definition = self.registry.require(category)?;
        if definition.is_structured() {
            Err(SignoutError::InvalidShapeOperation(format!(
                "cannot {} structured category `{}`",
                action, category
            )))
        } else {
            Ok(definition)
        }
    }
}

fn require_field<'a>(category: &'a CategoryDefinition, field: &str) -> Result<&'a FieldDefinition> {
    category
        .field(field)
        .ok_or_else(|| SignoutError::UnknownField {
            category: category.name.clone(),
            field: field.to_string(),
        })
}

fn check_index(category: &str, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(SignoutError::IndexOutOfRange {
            category: category.to_string(),
            index,
            len,
        })
    }
}

fn describe_options(field: &FieldDefinition) -> String {
    field
        .options()
        .iter()
        .map(|option| {
            if option.is_empty() {
                "(blank)".to_string()
            } else {
                option.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn entries_mut<'s>(
    state: &'s mut FormState,
    category: &str,
) -> Result<(&'s mut Vec<Entry>, &'s mut bool)> {
    match state.section_mut(category).map(|section| &mut section.content) {
        Some(CategoryContent::Entries {
            entries,
            none_marked,
        }) => Ok((entries, none_marked)),
        Some(CategoryContent::FreeText(_)) => Err(SignoutError::InvalidShapeOperation(format!(
            "form state holds free text for `{}`",
            category
        ))),
        None => Err(SignoutError::UnknownCategory(category.to_string())),
    }
}

fn free_text_mut<'s>(state: &'s mut FormState, category: &str) -> Result<&'s mut String> {
    match state.section_mut(category).map(|section| &mut section.content) {
        Some(CategoryContent::FreeText(text)) => Ok(text),
        Some(CategoryContent::Entries { .. }) => Err(SignoutError::InvalidShapeOperation(format!(
            "form state holds entries for `{}`",
            category
        ))),
        None => Err(SignoutError::UnknownCategory(category.to_string())),
    }
}
