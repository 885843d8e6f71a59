//! Report derivation.
//!
//! The report is a pure projection of a [`FormState`]: [`ReportView::build`]
//! walks the registry in order and collects the lines of each category block,
//! and [`render_report`] flattens that view into the plain copy-paste text.
//! Nothing is cached; every call recomputes from the state.

use std::fmt;

use chrono::NaiveDate;

use crate::form::{CategoryContent, Entry, FormState};
use crate::schema::{CategoryDefinition, CategoryRegistry, CategoryShape, FieldDefinition};

pub const REPORT_TITLE: &str = "SIGNOUT LIST";
pub const NONE_LINE: &str = "None";
pub const FIELD_SEPARATOR: &str = " | ";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
const RULE_WIDTH: usize = 50;

/// One category heading and the lines printed beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBlock {
    pub heading: String,
    pub lines: Vec<String>,
    /// Set when `lines` is only the `None` placeholder.
    pub empty: bool,
}

impl ReportBlock {
    fn new(heading: String, lines: Vec<String>) -> Self {
        if lines.is_empty() {
            Self {
                heading,
                lines: vec![NONE_LINE.to_string()],
                empty: true,
            }
        } else {
            Self {
                heading,
                lines,
                empty: false,
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }
}

/// Structured form of the report shared by the plain text and styled views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportView {
    pub date: NaiveDate,
    pub blocks: Vec<ReportBlock>,
}

impl ReportView {
    pub fn build(state: &FormState, registry: &CategoryRegistry) -> Self {
        let blocks = registry
            .iter()
            .map(|category| {
                ReportBlock::new(category.name.to_uppercase(), block_lines(state, category))
            })
            .collect();
        Self {
            date: state.signout_date(),
            blocks,
        }
    }

    pub fn date_line(&self) -> String {
        format!("Date: {}", self.date.format(DATE_FORMAT))
    }

    pub fn rule() -> String {
        "=".repeat(RULE_WIDTH)
    }
}

impl fmt::Display for ReportView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{REPORT_TITLE}")?;
        writeln!(f, "{}", self.date_line())?;
        writeln!(f, "{}", Self::rule())?;
        writeln!(f)?;
        for block in &self.blocks {
            writeln!(f, "{}", block.heading)?;
            for line in &block.lines {
                writeln!(f, "{line}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Plain-text handoff report for `state`.
///
/// Byte-for-byte determined by the state: the same state always yields the
/// same string. The "none" flag of a category is not consulted; an empty
/// category renders `None` whether or not the user marked it.
pub fn render_report(state: &FormState, registry: &CategoryRegistry) -> String {
    ReportView::build(state, registry).to_string()
}

/// Content lines of one category; empty when the placeholder is due.
fn block_lines(state: &FormState, category: &CategoryDefinition) -> Vec<String> {
    let content = state.section(&category.name).map(|section| &section.content);
    match (&category.shape, content) {
        (CategoryShape::FreeText { .. }, Some(CategoryContent::FreeText(text))) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_string()]
            }
        }
        (CategoryShape::StructuredFields(fields), Some(CategoryContent::Entries { entries, .. })) => {
            entries
                .iter()
                .filter_map(|entry| entry_line(fields, entry))
                .collect()
        }
        _ => Vec::new(),
    }
}

/// `" | "`-joined line for an entry, or `None` when every field is blank.
pub fn entry_line(fields: &[FieldDefinition], entry: &Entry) -> Option<String> {
    let parts: Vec<String> = fields
        .iter()
        .filter_map(|field| {
            let value = entry.get(&field.name).trim();
            if value.is_empty() {
                None
            } else if field.is_number() {
                Some(format!("{value}."))
            } else {
                Some(format!("{}: {}", field.name, value))
            }
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(FIELD_SEPARATOR))
    }
}
