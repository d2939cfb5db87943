use chrono::NaiveDate;
use organizer::forms::{ScheduleEntryForm, SubjectForm, TaskEditForm, TaskForm};
use organizer::models::{SubjectColor, TaskType, Weekday};
use serde_json::json;

fn schedule_form(start: &str, end: &str) -> ScheduleEntryForm {
    serde_json::from_value(json!({
        "subjectId": "subj-1",
        "day": "Martes",
        "startTime": start,
        "endTime": end,
        "location": "Aula 101"
    }))
    .expect("form body")
}

#[test]
fn test_subject_form_accepts_valid_input() {
    let form: SubjectForm = serde_json::from_value(json!({
        "name": "Física",
        "teacher": "Dr. Feynman",
        "credits": "3",
        "color": "red"
    }))
    .expect("form body");

    let draft = form.validate().expect("valid subject");
    assert_eq!(draft.credits, 3);
    assert_eq!(draft.color, SubjectColor::Red);
}

#[test]
fn test_subject_form_reports_every_field() {
    let form: SubjectForm = serde_json::from_value(json!({
        "name": "AB",
        "teacher": "",
        "credits": 0,
        "color": "orange"
    }))
    .expect("form body");

    let errors = form.validate().expect_err("invalid subject");
    assert_eq!(errors.fields().len(), 4);
    assert_eq!(
        errors.field("name").map(|e| e.message.as_str()),
        Some("El nombre debe tener al menos 3 caracteres.")
    );
    assert_eq!(
        errors.field("credits").map(|e| e.message.as_str()),
        Some("Los créditos deben ser al menos 1.")
    );
    assert!(errors.field("teacher").is_some());
    assert!(errors.field("color").is_some());
}

#[test]
fn test_subject_form_rejects_fractional_credits() {
    let form: SubjectForm = serde_json::from_value(json!({
        "name": "Física",
        "teacher": "Dr. Feynman",
        "credits": 2.5,
        "color": "blue"
    }))
    .expect("form body");

    let errors = form.validate().expect_err("fractional credits");
    assert!(errors.field("credits").is_some());
}

#[test]
fn test_name_length_counts_characters() {
    let form: SubjectForm = serde_json::from_value(json!({
        "name": "Ñoñ",
        "teacher": "Dra. Ñúñez",
        "credits": 1,
        "color": "gray"
    }))
    .expect("form body");

    assert!(form.validate().is_ok());
}

#[test]
fn test_task_form_ignores_completed_flag() {
    let form: TaskForm = serde_json::from_value(json!({
        "title": "Parcial 2",
        "subjectId": "subj-2",
        "dueDate": "2024-05-20",
        "type": "Parcial",
        "completed": true
    }))
    .expect("form body");

    let draft = form.validate().expect("valid task");
    assert_eq!(draft.kind, TaskType::Midterm);
    assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2024, 5, 20).unwrap());
}

#[test]
fn test_task_form_requires_subject_and_date() {
    let form: TaskForm = serde_json::from_value(json!({
        "title": "Parcial 2",
        "type": "Examen"
    }))
    .expect("form body");

    let errors = form.validate().expect_err("incomplete task");
    assert_eq!(
        errors.field("subjectId").map(|e| e.message.as_str()),
        Some("Debes seleccionar una materia.")
    );
    assert_eq!(
        errors.field("dueDate").map(|e| e.message.as_str()),
        Some("Debes seleccionar una fecha.")
    );
    assert!(errors.field("type").is_some());
}

#[test]
fn test_task_edit_form_only_checks_present_fields() {
    let form: TaskEditForm = serde_json::from_value(json!({ "completed": true })).expect("form body");
    let changes = form.validate().expect("valid edit");
    assert_eq!(changes.completed, Some(true));
    assert!(changes.title.is_none());

    let form: TaskEditForm = serde_json::from_value(json!({ "title": "No" })).expect("form body");
    assert!(form.validate().expect_err("short title").field("title").is_some());
}

#[test]
fn test_schedule_form_rejects_inverted_range() {
    let errors = schedule_form("10:00", "09:00")
        .validate()
        .expect_err("end before start");

    assert_eq!(errors.fields().len(), 1);
    assert_eq!(
        errors.field("endTime").map(|e| e.message.as_str()),
        Some("La hora de inicio debe ser anterior a la hora de fin.")
    );
}

#[test]
fn test_schedule_form_rejects_equal_times() {
    let errors = schedule_form("10:00", "10:00").validate().expect_err("empty range");
    assert!(errors.field("endTime").is_some());
}

#[test]
fn test_schedule_form_normalises_hours() {
    let draft = schedule_form("9:00", "10:30").validate().expect("valid entry");
    assert_eq!(draft.start_time, "09:00");
    assert_eq!(draft.end_time, "10:30");
    assert_eq!(draft.day, Weekday::Tuesday);
}

#[test]
fn test_schedule_form_checks_format_and_location() {
    let form: ScheduleEntryForm = serde_json::from_value(json!({
        "subjectId": "subj-1",
        "day": "Sábado",
        "startTime": "25:00",
        "endTime": "10:00",
        "location": ""
    }))
    .expect("form body");

    let errors = form.validate().expect_err("invalid entry");
    assert!(errors.field("day").is_some());
    assert_eq!(
        errors.field("startTime").map(|e| e.message.as_str()),
        Some("Formato de hora inválido (HH:MM).")
    );
    assert!(errors.field("location").is_some());
    assert!(errors.field("endTime").is_none());
}

#[test]
fn test_null_and_mistyped_fields_become_field_errors() {
    let form: ScheduleEntryForm = serde_json::from_value(json!({
        "subjectId": "subj-1",
        "day": null,
        "startTime": 900,
        "endTime": "10:00",
        "location": ["Aula 101"]
    }))
    .expect("lenient body");

    let errors = form.validate().expect_err("invalid entry");
    assert_eq!(
        errors.field("day").map(|e| e.message.as_str()),
        Some("Día inválido.")
    );
    assert!(errors.field("startTime").is_some());
    assert!(errors.field("location").is_some());

    let form: TaskForm = serde_json::from_value(json!({
        "title": null,
        "subjectId": 7,
        "dueDate": false,
        "type": null
    }))
    .expect("lenient body");
    let errors = form.validate().expect_err("invalid task");
    for field in ["title", "subjectId", "dueDate", "type"] {
        assert!(errors.field(field).is_some(), "missing error for {field}");
    }
}

#[test]
fn test_task_edit_form_treats_null_as_unchanged() {
    let form: TaskEditForm = serde_json::from_value(json!({
        "title": null,
        "dueDate": null,
        "completed": null
    }))
    .expect("lenient body");
    let changes = form.validate().expect("nothing to change");
    assert!(changes.title.is_none());
    assert!(changes.due_date.is_none());
    assert!(changes.completed.is_none());

    let form: TaskEditForm =
        serde_json::from_value(json!({ "completed": "yes", "type": 3 })).expect("lenient body");
    let errors = form.validate().expect_err("mistyped edit");
    assert_eq!(
        errors.field("completed").map(|e| e.message.as_str()),
        Some("El estado debe ser verdadero o falso.")
    );
    assert!(errors.field("type").is_some());
}
