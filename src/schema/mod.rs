//! Category schema registry.
//!
//! A static table describing every handoff category, in report order, and the
//! shape of the entries each one accepts. The form engine and the report
//! renderer both walk this table; nothing else decides what a category looks
//! like.

pub mod category;
pub mod field;

use std::collections::HashSet;

use once_cell::sync::Lazy;
use strsim::levenshtein;

use crate::errors::{Result, SignoutError};

pub use category::{CategoryDefinition, CategoryShape};
pub use field::{FieldDefinition, FieldKind, CUSTOM_OPTION, NUMBER_FIELD};

const DONE_BY_OPTIONS: &[&str] = &["", "Nocturnist", "APP", "resident", CUSTOM_OPTION];
const UNSEEN_GROUP_OPTIONS: &[&str] = &[
    "",
    "hospitalist",
    "geriatric",
    "WCC",
    "CMG",
    "CCC",
    "FMH",
    "Palliative",
    "Vent",
];
const GERIATRIC_PRIMARY_OPTIONS: &[&str] = &[
    "",
    "Dr. Daniel King",
    "Dr. Noel Yarze",
    "Dr. Dmitriy Migdalovich",
    "Dr. Kevin McCormick",
    CUSTOM_OPTION,
];
const PALLIATIVE_PRIMARY_OPTIONS: &[&str] = &[
    "",
    "Nicole Gise",
    "Brandon Wilcoxson",
    "Edward Shanley",
    "Rashmi Khadilkar",
    "Chin-Lin Ching",
    CUSTOM_OPTION,
];

/// Maximum edit distance for a category suggestion to be offered.
const SUGGESTION_DISTANCE: usize = 4;

static STANDARD: Lazy<CategoryRegistry> = Lazy::new(build_standard);

/// Ordered, name-unique collection of [`CategoryDefinition`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRegistry {
    categories: Vec<CategoryDefinition>,
}

impl CategoryRegistry {
    /// Builds a registry, rejecting duplicate category or field names.
    pub fn new(categories: Vec<CategoryDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        for category in &categories {
            if !seen.insert(category.name.as_str()) {
                return Err(SignoutError::Config(format!(
                    "duplicate category `{}`",
                    category.name
                )));
            }
            let mut fields = HashSet::new();
            for field in category.fields() {
                if !fields.insert(field.name.as_str()) {
                    return Err(SignoutError::Config(format!(
                        "duplicate field `{}` in `{}`",
                        field.name, category.name
                    )));
                }
            }
        }
        Ok(Self { categories })
    }

    /// The fixed handoff table used by the shell.
    pub fn standard() -> &'static CategoryRegistry {
        &STANDARD
    }

    pub fn get(&self, name: &str) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|category| category.name == name)
    }

    /// Like [`Self::get`], or an [`SignoutError::UnknownCategory`].
    pub fn require(&self, name: &str) -> Result<&CategoryDefinition> {
        self.get(name)
            .ok_or_else(|| SignoutError::UnknownCategory(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryDefinition> {
        self.categories.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|category| category.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Exact match first, then ASCII case-insensitive.
    pub fn find_case_insensitive(&self, name: &str) -> Option<&CategoryDefinition> {
        let needle = name.trim();
        self.get(needle).or_else(|| {
            self.categories
                .iter()
                .find(|category| category.name.eq_ignore_ascii_case(needle))
        })
    }

    /// Closest category name by edit distance, if any is close enough.
    pub fn suggest(&self, name: &str) -> Option<&str> {
        let needle = name.trim().to_ascii_lowercase();
        self.categories
            .iter()
            .map(|category| {
                (
                    levenshtein(&category.name.to_ascii_lowercase(), &needle),
                    category.name.as_str(),
                )
            })
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .map(|(_, name)| name)
    }
}

impl<'a> IntoIterator for &'a CategoryRegistry {
    type Item = &'a CategoryDefinition;
    type IntoIter = std::slice::Iter<'a, CategoryDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}

fn done_by() -> FieldDefinition {
    FieldDefinition::choice("Done by", DONE_BY_OPTIONS.iter().copied(), true)
}

fn summary() -> FieldDefinition {
    FieldDefinition::multiline("Short Summary")
}

/// Number, Name, MRN, Primary Care, Short Summary with a pluggable Primary Care.
fn patient_fields(primary_care: FieldDefinition, with_done_by: bool) -> Vec<FieldDefinition> {
    let mut fields = vec![
        FieldDefinition::text(NUMBER_FIELD),
        FieldDefinition::text("Name"),
        FieldDefinition::text("MRN"),
        primary_care,
        summary(),
    ];
    if with_done_by {
        fields.push(done_by());
    }
    fields
}

fn primary_care() -> FieldDefinition {
    FieldDefinition::text("Primary Care")
}

fn build_standard() -> CategoryRegistry {
    let categories = vec![
        CategoryDefinition::structured(
            "Unseen",
            vec![
                FieldDefinition::text(NUMBER_FIELD),
                FieldDefinition::choice("Group", UNSEEN_GROUP_OPTIONS.iter().copied(), false),
                FieldDefinition::text("Name"),
                FieldDefinition::text("MRN"),
                primary_care(),
                summary(),
            ],
        ),
        CategoryDefinition::structured(
            "Pending transfer",
            vec![
                FieldDefinition::text(NUMBER_FIELD),
                FieldDefinition::text("Name"),
                FieldDefinition::text("MRN"),
                summary(),
            ],
        ),
        CategoryDefinition::free_text("Hospitalist - Day admit", true),
        CategoryDefinition::structured(
            "Hospitalist - Night admit",
            patient_fields(primary_care(), true),
        ),
        CategoryDefinition::structured(
            "Geriatric overnight - admission",
            patient_fields(
                FieldDefinition::choice(
                    "Primary Care",
                    GERIATRIC_PRIMARY_OPTIONS.iter().copied(),
                    true,
                ),
                true,
            ),
        ),
        CategoryDefinition::structured(
            "Geriatric overnight - consult",
            patient_fields(primary_care(), false),
        ),
        CategoryDefinition::structured(
            "Geriatric overnight - WCC",
            patient_fields(primary_care(), true),
        ),
        CategoryDefinition::structured("CMG/CCC", patient_fields(primary_care(), true)),
        CategoryDefinition::structured(
            "Palliative",
            patient_fields(
                FieldDefinition::choice(
                    "Primary Care",
                    PALLIATIVE_PRIMARY_OPTIONS.iter().copied(),
                    true,
                ),
                true,
            ),
        ),
        CategoryDefinition::structured(
            "Highland Family Medicine",
            patient_fields(primary_care(), true),
        ),
        CategoryDefinition::structured("Vent", patient_fields(primary_care(), true)),
        CategoryDefinition::free_text("EOU", true),
        CategoryDefinition::free_text("Other", false),
    ];
    CategoryRegistry { categories }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_names(category: &CategoryDefinition) -> Vec<&str> {
        category.fields().iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn standard_registry_keeps_report_order() {
        let names: Vec<_> = CategoryRegistry::standard().names().collect();
        assert_eq!(
            names,
            vec![
                "Unseen",
                "Pending transfer",
                "Hospitalist - Day admit",
                "Hospitalist - Night admit",
                "Geriatric overnight - admission",
                "Geriatric overnight - consult",
                "Geriatric overnight - WCC",
                "CMG/CCC",
                "Palliative",
                "Highland Family Medicine",
                "Vent",
                "EOU",
                "Other",
            ]
        );
    }

    #[test]
    fn free_text_categories_and_numbering_flags() {
        let registry = CategoryRegistry::standard();
        let free: Vec<_> = registry
            .iter()
            .filter(|c| !c.is_structured())
            .map(|c| (c.name.as_str(), c.supports_line_numbering()))
            .collect();
        assert_eq!(
            free,
            vec![
                ("Hospitalist - Day admit", true),
                ("EOU", true),
                ("Other", false)
            ]
        );
    }

    #[test]
    fn unseen_group_is_closed_choice() {
        let unseen = CategoryRegistry::standard().get("Unseen").unwrap();
        assert_eq!(
            field_names(unseen),
            vec!["Number", "Group", "Name", "MRN", "Primary Care", "Short Summary"]
        );
        let group = unseen.field("Group").unwrap();
        assert!(!group.allows_custom());
        assert_eq!(group.options().len(), 9);
        assert_eq!(group.options()[0], "");
    }

    #[test]
    fn pending_transfer_has_four_fields() {
        let pending = CategoryRegistry::standard()
            .get("Pending transfer")
            .unwrap();
        assert_eq!(
            field_names(pending),
            vec!["Number", "Name", "MRN", "Short Summary"]
        );
    }

    #[test]
    fn consult_has_no_done_by() {
        let consult = CategoryRegistry::standard()
            .get("Geriatric overnight - consult")
            .unwrap();
        assert!(consult.field("Done by").is_none());
        assert_eq!(consult.field("Primary Care").unwrap().kind, FieldKind::PlainText);
    }

    #[test]
    fn palliative_primary_care_offers_five_physicians() {
        let palliative = CategoryRegistry::standard().get("Palliative").unwrap();
        let primary = palliative.field("Primary Care").unwrap();
        assert!(primary.allows_custom());
        assert_eq!(primary.options().len(), 7);
        assert_eq!(primary.options().last().map(String::as_str), Some("Other"));
        assert!(palliative.field("Done by").unwrap().allows_custom());
    }

    #[test]
    fn geriatric_admission_primary_care_offers_four_physicians() {
        let admission = CategoryRegistry::standard()
            .get("Geriatric overnight - admission")
            .unwrap();
        assert_eq!(admission.field("Primary Care").unwrap().options().len(), 6);
    }

    #[test]
    fn lookup_helpers() {
        let registry = CategoryRegistry::standard();
        assert_eq!(
            registry.find_case_insensitive("pending TRANSFER").map(|c| c.name.as_str()),
            Some("Pending transfer")
        );
        assert_eq!(registry.suggest("Vnet"), Some("Vent"));
        assert_eq!(registry.suggest("completely unrelated words"), None);
        assert!(matches!(
            registry.require("ICU"),
            Err(SignoutError::UnknownCategory(ref name)) if name == "ICU"
        ));
    }

    #[test]
    fn new_rejects_duplicate_names() {
        let err = CategoryRegistry::new(vec![
            CategoryDefinition::free_text("A", false),
            CategoryDefinition::free_text("A", true),
        ])
        .unwrap_err();
        assert!(matches!(err, SignoutError::Config(ref msg) if msg.contains("duplicate")));

        let err = CategoryRegistry::new(vec![CategoryDefinition::structured(
            "Ward",
            vec![FieldDefinition::text("Name"), FieldDefinition::text("Name")],
        )])
        .unwrap_err();
        assert_eq!(
            err,
            SignoutError::Config("duplicate field `Name` in `Ward`".into())
        );
    }
}
