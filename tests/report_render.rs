use chrono::NaiveDate;
use insta::assert_snapshot;
use signout_core::{
    form::{FormEngine, FormState},
    report::{render_report, ReportView},
    schema::CategoryRegistry,
};

fn blank() -> (FormEngine<'static>, FormState) {
    let engine = FormEngine::standard();
    let state = engine.new_state(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    (engine, state)
}

/// Lines printed under `heading`, up to the blank separator line.
fn block<'a>(report: &'a str, heading: &str) -> Vec<&'a str> {
    report
        .lines()
        .skip_while(|line| *line != heading)
        .skip(1)
        .take_while(|line| !line.is_empty())
        .collect()
}

#[test]
fn blank_report_matches_snapshot() {
    let (engine, state) = blank();
    let report = render_report(&state, engine.registry());
    assert_snapshot!("blank_report", report);
}

#[test]
fn blank_report_has_none_for_every_category() {
    let (engine, state) = blank();
    let report = render_report(&state, engine.registry());
    for category in CategoryRegistry::standard() {
        assert_eq!(
            block(&report, &category.name.to_uppercase()),
            vec!["None"],
            "category {}",
            category.name
        );
    }
}

#[test]
fn pending_transfer_scenario() {
    let (engine, mut state) = blank();
    let index = engine.add_entry(&mut state, "Pending transfer").unwrap();
    engine
        .set_field(&mut state, "Pending transfer", index, "Number", "3")
        .unwrap();
    engine
        .set_field(&mut state, "Pending transfer", index, "Name", "Doe")
        .unwrap();
    engine
        .set_field(&mut state, "Pending transfer", index, "MRN", "12345")
        .unwrap();
    engine
        .set_field(&mut state, "Pending transfer", index, "Short Summary", "")
        .unwrap();

    let report = render_report(&state, engine.registry());
    assert_eq!(report.lines().nth(1), Some("Date: 2024-03-15"));
    assert_eq!(
        block(&report, "PENDING TRANSFER"),
        vec!["3. | Name: Doe | MRN: 12345"]
    );
}

#[test]
fn one_line_per_qualifying_entry_in_every_structured_category() {
    let (engine, mut state) = blank();
    for category in engine.registry().iter().filter(|c| c.is_structured()) {
        engine.add_entry(&mut state, &category.name).unwrap();
        engine.add_entry(&mut state, &category.name).unwrap();
        engine.add_entry(&mut state, &category.name).unwrap();
        engine
            .set_field(&mut state, &category.name, 0, "Number", "1")
            .unwrap();
        engine
            .set_field(&mut state, &category.name, 0, "Name", "Alpha")
            .unwrap();
        engine
            .set_field(&mut state, &category.name, 2, "MRN", "99")
            .unwrap();
    }

    let report = render_report(&state, engine.registry());
    for category in engine.registry().iter().filter(|c| c.is_structured()) {
        assert_eq!(
            block(&report, &category.name.to_uppercase()),
            vec!["1. | Name: Alpha", "MRN: 99"],
            "category {}",
            category.name
        );
    }
}

#[test]
fn rendering_is_idempotent() {
    let (engine, mut state) = blank();
    engine.add_entry(&mut state, "Vent").unwrap();
    engine.set_field(&mut state, "Vent", 0, "Name", "Roe").unwrap();
    engine.set_free_text(&mut state, "EOU", "bed 4").unwrap();

    let first = render_report(&state, engine.registry());
    let second = render_report(&state, engine.registry());
    assert_eq!(first, second);
    assert_eq!(first, ReportView::build(&state, engine.registry()).to_string());
}

#[test]
fn removed_entry_disappears_and_order_is_kept() {
    let (engine, mut state) = blank();
    for name in ["A", "B", "C"] {
        let index = engine.add_entry(&mut state, "Unseen").unwrap();
        engine
            .set_field(&mut state, "Unseen", index, "Name", name)
            .unwrap();
    }
    engine.remove_entry(&mut state, "Unseen", 1).unwrap();

    let report = render_report(&state, engine.registry());
    assert_eq!(block(&report, "UNSEEN"), vec!["Name: A", "Name: C"]);
}

#[test]
fn custom_choice_round_trips_verbatim() {
    let (engine, mut state) = blank();
    engine.add_entry(&mut state, "Geriatric overnight - admission").unwrap();
    engine
        .set_field(
            &mut state,
            "Geriatric overnight - admission",
            0,
            "Primary Care",
            "Dr. Visiting Fellow",
        )
        .unwrap();
    engine
        .set_field(
            &mut state,
            "Geriatric overnight - admission",
            0,
            "Done by",
            "night float",
        )
        .unwrap();

    let report = render_report(&state, engine.registry());
    assert_eq!(
        block(&report, "GERIATRIC OVERNIGHT - ADMISSION"),
        vec!["Primary Care: Dr. Visiting Fellow | Done by: night float"]
    );
}

#[test]
fn none_mark_is_not_reflected_in_report() {
    let (engine, mut state) = blank();
    let before = render_report(&state, engine.registry());
    engine.mark_none(&mut state, "Vent").unwrap();
    assert_eq!(render_report(&state, engine.registry()), before);
}

#[test]
fn numbered_free_text_appears_in_report() {
    let (engine, mut state) = blank();
    engine.set_free_text(&mut state, "EOU", "a\n\nb").unwrap();
    engine.apply_line_numbering(&mut state, "EOU").unwrap();
    let report = render_report(&state, engine.registry());
    assert!(report.contains("EOU\n1. a\n\n2. b\n\nOTHER\nNone\n\n"));
}
