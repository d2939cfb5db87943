use std::io::Write;

use organizer::error::AppError;
use organizer::models::Weekday;
use organizer::seed::Seed;
use organizer::store::Store;
use serde_json::json;
use tempfile::NamedTempFile;

fn write_seed(value: serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    write!(file, "{}", value).expect("Failed to write seed");
    file
}

#[test]
fn test_seed_file_replaces_builtin_data() {
    let file = write_seed(json!({
        "subjects": [
            { "id": "s-a", "name": "Química", "teacher": "Dra. Curie", "credits": 4, "color": "yellow" }
        ],
        "schedule": [
            { "id": "c-2", "day": "Jueves", "startTime": "11:00", "endTime": "12:00", "subjectId": "s-a", "location": "Lab 1" },
            { "id": "c-1", "day": "Lunes", "startTime": "07:00", "endTime": "09:00", "subjectId": "s-a", "location": "Lab 1" }
        ]
    }));

    let seed = Seed::from_path(file.path()).expect("valid seed");
    assert_eq!(seed.subjects.len(), 1);
    assert!(seed.tasks.is_empty());

    let store = Store::new(seed);
    let snapshot = store.snapshot();
    assert_eq!(snapshot.schedule[0].id, "c-1");
    assert_eq!(snapshot.schedule[0].day, Weekday::Monday);
    assert_eq!(snapshot.revision, 0);
}

#[test]
fn test_seed_file_with_duplicate_ids_is_rejected() {
    let subject = json!({ "id": "s-a", "name": "Química", "teacher": "Dra. Curie", "credits": 4, "color": "yellow" });
    let file = write_seed(json!({ "subjects": [subject.clone(), subject] }));

    assert!(matches!(Seed::from_path(file.path()), Err(AppError::Seed(_))));
}

#[test]
fn test_malformed_seed_file_is_rejected() {
    let file = write_seed(json!({ "subjects": [{ "id": "s-a", "color": "orange" }] }));

    assert!(matches!(Seed::from_path(file.path()), Err(AppError::Json(_))));
}

#[test]
fn test_seed_times_are_padded_before_sorting() {
    let file = write_seed(json!({
        "schedule": [
            { "id": "c-10", "day": "Lunes", "startTime": "10:00", "endTime": "11:00", "subjectId": "s-a", "location": "Lab 1" },
            { "id": "c-9", "day": "Lunes", "startTime": "9:00", "endTime": "9:45", "subjectId": "s-a", "location": "Lab 1" }
        ]
    }));

    let seed = Seed::from_path(file.path()).expect("valid seed");
    let snapshot = Store::new(seed).snapshot();
    assert_eq!(snapshot.schedule[0].id, "c-9");
    assert_eq!(snapshot.schedule[0].start_time, "09:00");
    assert_eq!(snapshot.schedule[0].end_time, "09:45");
}

#[test]
fn test_seed_with_bad_class_times_is_rejected() {
    let inverted = write_seed(json!({
        "schedule": [
            { "id": "c-1", "day": "Lunes", "startTime": "12:00", "endTime": "10:00", "subjectId": "s-a", "location": "Lab 1" }
        ]
    }));
    assert!(matches!(Seed::from_path(inverted.path()), Err(AppError::Seed(_))));

    let malformed = write_seed(json!({
        "schedule": [
            { "id": "c-1", "day": "Lunes", "startTime": "noon", "endTime": "13:00", "subjectId": "s-a", "location": "Lab 1" }
        ]
    }));
    assert!(matches!(Seed::from_path(malformed.path()), Err(AppError::Seed(_))));
}
