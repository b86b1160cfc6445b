mod common;

use chrono::NaiveDate;
use common::{record, sample_patients};
use medipanel_core::{
    entities::{AppointmentForm, EntityForm, PatientForm},
    filter::{END_DATE_KEY, START_DATE_KEY},
};
use serde_json::json;

fn ids(rows: &[medipanel_core::filter::Record]) -> Vec<i64> {
    rows.iter().filter_map(|row| row["id"].as_i64()).collect()
}

fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[test]
fn fresh_view_shows_everything() {
    let view = PatientForm.filter_view(sample_patients());
    assert_eq!(ids(view.filtered()), vec![1, 2, 3, 4]);
    assert!(view.filters().is_blank());
}

#[test]
fn name_filter_is_accent_and_case_blind() {
    let mut view = PatientForm.filter_view(sample_patients());
    view.filters_mut().set_text("name", "JOSE");
    assert_eq!(ids(view.apply()), vec![1]);

    view.filters_mut().set_text("name", "angela n");
    assert_eq!(ids(view.apply()), vec![3]);

    view.filters_mut().set_text("name", "perez");
    assert!(view.apply().is_empty());
}

#[test]
fn numeric_fields_match_by_prefix() {
    let mut view = PatientForm.filter_view(sample_patients());
    view.filters_mut().set_text("document_id", "30");
    assert_eq!(ids(view.apply()), vec![3]);
}

#[test]
fn date_range_keeps_written_day() {
    let mut view = PatientForm.filter_view(sample_patients());
    view.filters_mut().set_date(START_DATE_KEY, day(2024, 2, 1));
    view.filters_mut().set_date(END_DATE_KEY, day(2024, 3, 5));
    assert_eq!(ids(view.apply()), vec![2, 3]);
}

#[test]
fn filters_combine_with_and() {
    let mut view = PatientForm.filter_view(sample_patients());
    view.filters_mut().set_text("name", "m");
    view.filters_mut().set_date(START_DATE_KEY, day(2024, 3, 1));
    assert!(view.apply().is_empty());

    view.filters_mut().set_date(START_DATE_KEY, day(2024, 2, 1));
    assert_eq!(ids(view.apply()), vec![2]);
}

#[test]
fn reset_restores_the_full_set() {
    let mut view = PatientForm.filter_view(sample_patients());
    view.filters_mut().set_text("name", "pedro");
    view.filters_mut().set_date(END_DATE_KEY, day(2024, 1, 1));
    assert!(view.apply().is_empty());

    assert_eq!(ids(view.reset()), vec![1, 2, 3, 4]);
    assert!(view.filters().is_blank());
    assert_eq!(view.apply().len(), view.all().len());
}

#[test]
fn appointment_filters_use_renamed_keys() {
    let rows = vec![
        record(json!({
            "id": 10,
            "patient_full_name": "Luis Mora",
            "professional_full_name": "Dra. Ruiz",
            "status": "confirmed",
            "scheduled_at": "2024-05-02T09:30:00"
        })),
        record(json!({
            "id": 11,
            "patient_full_name": "Lucía Ortega",
            "professional_full_name": "Dr. Salas",
            "status": "pending",
            "scheduled_at": "2024-05-03T15:00:00"
        })),
    ];
    let mut view = AppointmentForm.filter_view(rows);
    view.filters_mut().set_text("patient", "lu");
    assert_eq!(ids(view.apply()), vec![10, 11]);

    view.filters_mut().set_text("status", "pend");
    assert_eq!(ids(view.apply()), vec![11]);

    view.filters_mut().set_text("status", "");
    view.filters_mut().set_date(END_DATE_KEY, day(2024, 5, 2));
    assert_eq!(ids(view.apply()), vec![10]);
}
