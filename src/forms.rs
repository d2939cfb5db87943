//! Input validation for everything that reaches the store.
//!
//! Forms deserialize leniently: text fields go through [`TextInput`], which
//! accepts any JSON value, so a missing, null or wrongly typed value produces
//! a field message instead of a rejected body. `validate`
//! reports every failing field at once; the store never re-validates.

use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::{
    ScheduleDraft, SubjectColor, SubjectDraft, TaskChanges, TaskDraft, TaskType, Weekday,
};

/// 24-hour `H:MM` or `HH:MM`.
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").expect("valid time regex"));

const MSG_NAME: &str = "El nombre debe tener al menos 3 caracteres.";
const MSG_TEACHER: &str = "El nombre del docente debe tener al menos 3 caracteres.";
const MSG_CREDITS_MIN: &str = "Los créditos deben ser al menos 1.";
const MSG_CREDITS_INT: &str = "Los créditos deben ser un número entero.";
const MSG_CREDITS_NAN: &str = "Los créditos deben ser un número.";
const MSG_COLOR: &str = "Color inválido.";
const MSG_TITLE: &str = "El título debe tener al menos 3 caracteres.";
const MSG_SUBJECT: &str = "Debes seleccionar una materia.";
const MSG_DUE_DATE: &str = "Debes seleccionar una fecha.";
const MSG_DUE_DATE_FORMAT: &str = "Fecha inválida (AAAA-MM-DD).";
const MSG_TASK_TYPE: &str = "Tipo de tarea inválido.";
const MSG_DAY: &str = "Día inválido.";
const MSG_TIME: &str = "Formato de hora inválido (HH:MM).";
const MSG_LOCATION: &str = "La ubicación es requerida.";
const MSG_TIME_ORDER: &str = "La hora de inicio debe ser anterior a la hora de fin.";
const MSG_COMPLETED: &str = "El estado debe ser verdadero o falso.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First error reported for `field`.
    pub fn field(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_fields(self) -> Vec<FieldError> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// A text field as submitted: absent/null, a string, or a value of another type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TextInput {
    #[default]
    Missing,
    Text(String),
    WrongType,
}

impl TextInput {
    /// The submitted text; empty when missing or wrongly typed.
    pub fn as_str(&self) -> &str {
        match self {
            TextInput::Text(s) => s,
            TextInput::Missing | TextInput::WrongType => "",
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            TextInput::Text(s) => Some(s),
            TextInput::Missing | TextInput::WrongType => None,
        }
    }
}

impl<'de> Deserialize<'de> for TextInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => TextInput::Missing,
            Value::String(s) => TextInput::Text(s),
            _ => TextInput::WrongType,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubjectForm {
    pub name: TextInput,
    pub teacher: TextInput,
    /// Number or numeric string, as submitted by an HTML input.
    pub credits: Value,
    pub color: TextInput,
}

impl SubjectForm {
    pub fn validate(self) -> Result<SubjectDraft, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        check_min_chars(&mut errors, "name", self.name.as_str(), 3, MSG_NAME);
        check_min_chars(&mut errors, "teacher", self.teacher.as_str(), 3, MSG_TEACHER);

        let credits = match coerce_number(&self.credits) {
            Some(n) if n < 1.0 => {
                errors.push("credits", MSG_CREDITS_MIN);
                None
            }
            Some(n) if n.fract() != 0.0 || n > f64::from(u32::MAX) => {
                errors.push("credits", MSG_CREDITS_INT);
                None
            }
            Some(n) => Some(n as u32),
            None => {
                errors.push("credits", MSG_CREDITS_NAN);
                None
            }
        };

        let color = SubjectColor::parse(self.color.as_str());
        if color.is_none() {
            errors.push("color", MSG_COLOR);
        }

        match (self.name.into_text(), self.teacher.into_text(), credits, color) {
            (Some(name), Some(teacher), Some(credits), Some(color)) if errors.is_empty() => {
                Ok(SubjectDraft {
                    name,
                    teacher,
                    credits,
                    color,
                })
            }
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskForm {
    pub title: TextInput,
    pub subject_id: TextInput,
    pub due_date: TextInput,
    #[serde(rename = "type")]
    pub kind: TextInput,
}

impl TaskForm {
    pub fn validate(self) -> Result<TaskDraft, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        check_min_chars(&mut errors, "title", self.title.as_str(), 3, MSG_TITLE);
        let subject_id = required_subject(&mut errors, self.subject_id);
        let due_date = match self.due_date.as_str().trim() {
            "" => {
                errors.push("dueDate", MSG_DUE_DATE);
                None
            }
            raw => parse_date(&mut errors, raw),
        };
        let kind = parse_task_type(&mut errors, self.kind.as_str());

        match (self.title.into_text(), subject_id, due_date, kind) {
            (Some(title), Some(subject_id), Some(due_date), Some(kind)) if errors.is_empty() => {
                Ok(TaskDraft {
                    title,
                    subject_id,
                    due_date,
                    kind,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Edit form: only the fields present are checked and changed. Absent and
/// null fields are left alone; wrongly typed ones are reported.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskEditForm {
    pub title: TextInput,
    pub subject_id: TextInput,
    pub due_date: TextInput,
    #[serde(rename = "type")]
    pub kind: TextInput,
    pub completed: Value,
}

impl TaskEditForm {
    pub fn validate(self) -> Result<TaskChanges, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.title != TextInput::Missing {
            check_min_chars(&mut errors, "title", self.title.as_str(), 3, MSG_TITLE);
        }
        let subject_id = match self.subject_id {
            TextInput::Missing => None,
            input => required_subject(&mut errors, input),
        };
        let due_date = match &self.due_date {
            TextInput::Missing => None,
            input => parse_date(&mut errors, input.as_str().trim()),
        };
        let kind = match &self.kind {
            TextInput::Missing => None,
            input => parse_task_type(&mut errors, input.as_str()),
        };
        let completed = match self.completed {
            Value::Null => None,
            Value::Bool(done) => Some(done),
            _ => {
                errors.push("completed", MSG_COMPLETED);
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(TaskChanges {
            title: self.title.into_text(),
            subject_id,
            due_date,
            kind,
            completed,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleEntryForm {
    pub subject_id: TextInput,
    pub day: TextInput,
    pub start_time: TextInput,
    pub end_time: TextInput,
    pub location: TextInput,
}

impl ScheduleEntryForm {
    pub fn validate(self) -> Result<ScheduleDraft, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let subject_id = required_subject(&mut errors, self.subject_id);
        let day = Weekday::parse(self.day.as_str());
        if day.is_none() {
            errors.push("day", MSG_DAY);
        }
        let start_time = parse_time(&mut errors, "startTime", self.start_time.as_str());
        let end_time = parse_time(&mut errors, "endTime", self.end_time.as_str());
        check_min_chars(&mut errors, "location", self.location.as_str(), 1, MSG_LOCATION);

        if let (Some(start), Some(end)) = (&start_time, &end_time) {
            if start >= end {
                errors.push("endTime", MSG_TIME_ORDER);
            }
        }

        match (subject_id, day, start_time, end_time, self.location.into_text()) {
            (Some(subject_id), Some(day), Some(start_time), Some(end_time), Some(location))
                if errors.is_empty() =>
            {
                Ok(ScheduleDraft {
                    day,
                    start_time,
                    end_time,
                    subject_id,
                    location,
                })
            }
            _ => Err(errors),
        }
    }
}

fn check_min_chars(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    min: usize,
    message: &str,
) {
    if value.chars().count() < min {
        errors.push(field, message);
    }
}

fn required_subject(errors: &mut ValidationErrors, subject_id: TextInput) -> Option<String> {
    match subject_id {
        TextInput::Text(id) if !id.trim().is_empty() => Some(id),
        _ => {
            errors.push("subjectId", MSG_SUBJECT);
            None
        }
    }
}

fn parse_date(errors: &mut ValidationErrors, raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push("dueDate", MSG_DUE_DATE_FORMAT);
            None
        }
    }
}

fn parse_task_type(errors: &mut ValidationErrors, raw: &str) -> Option<TaskType> {
    let kind = TaskType::parse(raw);
    if kind.is_none() {
        errors.push("type", MSG_TASK_TYPE);
    }
    kind
}

fn parse_time(errors: &mut ValidationErrors, field: &'static str, raw: &str) -> Option<String> {
    let time = normalize_time(raw);
    if time.is_none() {
        errors.push(field, MSG_TIME);
    }
    time
}

/// Validates `H:MM`/`HH:MM` and returns the zero-padded form.
pub(crate) fn normalize_time(raw: &str) -> Option<String> {
    if !TIME_RE.is_match(raw) {
        return None;
    }
    match raw.split_once(':') {
        Some((hours, minutes)) if hours.len() == 1 => Some(format!("0{}:{}", hours, minutes)),
        _ => Some(raw.to_string()),
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_digit_hours_are_zero_padded() {
        let mut errors = ValidationErrors::default();
        assert_eq!(parse_time(&mut errors, "startTime", "9:05").as_deref(), Some("09:05"));
        assert_eq!(parse_time(&mut errors, "startTime", "23:59").as_deref(), Some("23:59"));
        assert!(errors.is_empty());
    }

    #[test]
    fn out_of_range_times_are_rejected() {
        let mut errors = ValidationErrors::default();
        assert!(parse_time(&mut errors, "startTime", "24:00").is_none());
        assert!(parse_time(&mut errors, "endTime", "12:60").is_none());
        assert!(parse_time(&mut errors, "endTime", "noon").is_none());
        assert_eq!(errors.fields().len(), 3);
    }

    #[test]
    fn credits_accept_numeric_strings() {
        assert_eq!(coerce_number(&Value::from("4")), Some(4.0));
        assert_eq!(coerce_number(&Value::from(2)), Some(2.0));
        assert_eq!(coerce_number(&Value::Null), None);
    }
}
