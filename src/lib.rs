#![doc(test(attr(deny(warnings))))]

//! Signout Core builds clinical handoff ("signout") lists: a fixed table of
//! categories, a per-session form of patient entries and pasted text, and the
//! dated plain-text report clinicians copy at shift change.
//!
//! ```
//! use chrono::NaiveDate;
//! use signout_core::{form::FormEngine, report::render_report};
//!
//! let engine = FormEngine::standard();
//! let mut form = engine.new_state(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
//! let index = engine.add_entry(&mut form, "Vent").unwrap();
//! engine.set_field(&mut form, "Vent", index, "Name", "Doe").unwrap();
//!
//! let report = render_report(&form, engine.registry());
//! assert!(report.contains("VENT\nName: Doe\n"));
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod form;
pub mod report;
pub mod schema;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup log.
///
/// `log_filter` is an optional extra directive, typically from the user's
/// preferences.
pub fn init(log_filter: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(log_filter);
        tracing::debug!("Signout Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init(None);
        super::init(Some("signout_core=debug"));
    }
}
