use serde::{Deserialize, Serialize};

use super::new_id;

/// A recurring weekly class slot.
///
/// `start_time` and `end_time` are zero-padded `HH:MM` strings, so string
/// order is chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: String,
    pub day: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub subject_id: String,
    pub location: String,
}

impl ScheduleEntry {
    pub(crate) fn create(draft: ScheduleDraft) -> Self {
        Self::with_id(new_id("sch"), draft)
    }

    pub(crate) fn with_id(id: String, draft: ScheduleDraft) -> Self {
        Self {
            id,
            day: draft.day,
            start_time: draft.start_time,
            end_time: draft.end_time,
            subject_id: draft.subject_id,
            location: draft.location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDraft {
    pub day: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub subject_id: String,
    pub location: String,
}

/// Teaching days. Weekends have no classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "Lunes")]
    Monday,
    #[serde(rename = "Martes")]
    Tuesday,
    #[serde(rename = "Miércoles")]
    Wednesday,
    #[serde(rename = "Jueves")]
    Thursday,
    #[serde(rename = "Viernes")]
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Monday => "Lunes",
            Weekday::Tuesday => "Martes",
            Weekday::Wednesday => "Miércoles",
            Weekday::Thursday => "Jueves",
            Weekday::Friday => "Viernes",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == value)
    }

    pub fn from_chrono(day: chrono::Weekday) -> Option<Self> {
        match day {
            chrono::Weekday::Mon => Some(Weekday::Monday),
            chrono::Weekday::Tue => Some(Weekday::Tuesday),
            chrono::Weekday::Wed => Some(Weekday::Wednesday),
            chrono::Weekday::Thu => Some(Weekday::Thursday),
            chrono::Weekday::Fri => Some(Weekday::Friday),
            chrono::Weekday::Sat | chrono::Weekday::Sun => None,
        }
    }
}
