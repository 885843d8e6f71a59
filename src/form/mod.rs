//! Live form state and the command operations that mutate it.
//!
//! [`FormState`] is an explicit value owned by the caller's session. The
//! [`FormEngine`] validates each command against the category registry and
//! either applies it completely or rejects it without touching the state.

pub mod choice;
pub mod engine;
pub mod numbering;

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::schema::{CategoryRegistry, CategoryShape};

pub use choice::{resolve_choice, ChoiceSelection};
pub use engine::FormEngine;
pub use numbering::number_lines;

/// One patient row inside a structured category.
///
/// Absent fields read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    fields: BTreeMap<String, String>,
}

impl Entry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    pub(crate) fn set(&mut self, field: &str, value: impl Into<String>) {
        self.fields.insert(field.to_string(), value.into());
    }
}

/// Storage for a single category, fixed by its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryContent {
    Entries {
        entries: Vec<Entry>,
        /// Set when the user affirmed "no patients" while the list was empty.
        none_marked: bool,
    },
    FreeText(String),
}

impl CategoryContent {
    fn blank_for(shape: &CategoryShape) -> Self {
        match shape {
            CategoryShape::StructuredFields(_) => CategoryContent::Entries {
                entries: Vec::new(),
                none_marked: false,
            },
            CategoryShape::FreeText { .. } => CategoryContent::FreeText(String::new()),
        }
    }
}

/// Content of one category within a [`FormState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryState {
    pub name: String,
    pub content: CategoryContent,
}

/// Everything the user has entered during one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    signout_date: NaiveDate,
    sections: Vec<CategoryState>,
}

impl FormState {
    /// Blank state with one section per registry category, in registry order.
    pub fn new(registry: &CategoryRegistry, signout_date: NaiveDate) -> Self {
        let sections = registry
            .iter()
            .map(|category| CategoryState {
                name: category.name.clone(),
                content: CategoryContent::blank_for(&category.shape),
            })
            .collect();
        Self {
            signout_date,
            sections,
        }
    }

    pub fn signout_date(&self) -> NaiveDate {
        self.signout_date
    }

    pub(crate) fn set_signout_date(&mut self, date: NaiveDate) {
        self.signout_date = date;
    }

    pub fn sections(&self) -> &[CategoryState] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&CategoryState> {
        self.sections.iter().find(|section| section.name == name)
    }

    pub(crate) fn section_mut(&mut self, name: &str) -> Option<&mut CategoryState> {
        self.sections.iter_mut().find(|section| section.name == name)
    }

    /// Entries of a structured category, `None` for free text or unknown names.
    pub fn entries(&self, name: &str) -> Option<&[Entry]> {
        match &self.section(name)?.content {
            CategoryContent::Entries { entries, .. } => Some(entries),
            CategoryContent::FreeText(_) => None,
        }
    }

    pub fn free_text(&self, name: &str) -> Option<&str> {
        match &self.section(name)?.content {
            CategoryContent::FreeText(text) => Some(text),
            CategoryContent::Entries { .. } => None,
        }
    }

    pub fn is_none_marked(&self, name: &str) -> bool {
        matches!(
            self.section(name).map(|section| &section.content),
            Some(CategoryContent::Entries {
                none_marked: true,
                ..
            })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_state_mirrors_registry() {
        let registry = CategoryRegistry::standard();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let state = FormState::new(registry, date);

        let names: Vec<_> = state.sections().iter().map(|s| s.name.as_str()).collect();
        let expected: Vec<_> = registry.names().collect();
        assert_eq!(names, expected);
        assert_eq!(state.signout_date(), date);
        assert_eq!(state.entries("Vent").map(<[Entry]>::len), Some(0));
        assert_eq!(state.free_text("EOU"), Some(""));
        assert!(state.entries("EOU").is_none());
        assert!(!state.is_none_marked("Vent"));
    }

    #[test]
    fn entry_reads_absent_fields_as_empty() {
        let mut entry = Entry::new();
        assert_eq!(entry.get("Name"), "");
        entry.set("MRN", "42");
        assert_eq!(entry.get("MRN"), "42");
        assert_eq!(entry.get("Name"), "");
    }
}
