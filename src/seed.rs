//! Start-up data for the store.
//!
//! The built-in seed mirrors the demo data the organizer ships with. A JSON
//! file with the same shape can replace it through `ORGANIZER_SEED_PATH`.

use std::collections::HashSet;
use std::path::Path;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::forms::normalize_time;
use crate::models::{Note, ScheduleEntry, Subject, SubjectColor, Task, TaskType, Weekday};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub schedule: Vec<ScheduleEntry>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Seed {
    /// Seed from the configured file, or the built-in data when none is set.
    pub fn load(config: &Config, today: NaiveDate) -> Result<Self, AppError> {
        match &config.seed_path {
            Some(path) => Self::from_path(path),
            None => {
                info!("using built-in seed data");
                Ok(Self::builtin(today))
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let seed = serde_json::from_str::<Seed>(&raw)?.checked()?;
        info!("loaded seed data from {}", path.display());
        Ok(seed)
    }

    /// Demo data. Task due dates are relative to `today`.
    pub fn builtin(today: NaiveDate) -> Self {
        let subject = |id: &str, name: &str, teacher: &str, color, credits| Subject {
            id: id.to_string(),
            name: name.to_string(),
            teacher: teacher.to_string(),
            credits,
            color,
        };
        let task = |id: &str, title: &str, days: u64, subject_id: &str, completed, kind| Task {
            id: id.to_string(),
            title: title.to_string(),
            due_date: today + Days::new(days),
            subject_id: subject_id.to_string(),
            completed,
            kind,
        };
        let class = |id: &str, day, start: &str, end: &str, subject_id: &str, location: &str| {
            ScheduleEntry {
                id: id.to_string(),
                day,
                start_time: start.to_string(),
                end_time: end.to_string(),
                subject_id: subject_id.to_string(),
                location: location.to_string(),
            }
        };

        Self {
            subjects: vec![
                subject("subj-1", "Cálculo Diferencial", "Dr. Alan Turing", SubjectColor::Blue, 4),
                subject("subj-2", "Estructuras de Datos", "Dra. Ada Lovelace", SubjectColor::Green, 5),
                subject("subj-3", "Diseño de Interfaces", "Prof. Steve Jobs", SubjectColor::Purple, 3),
            ],
            tasks: vec![
                task("task-1", "Entrega Taller 1", 2, "subj-1", false, TaskType::Delivery),
                task("task-2", "Parcial 1", 7, "subj-2", false, TaskType::Midterm),
                task("task-3", "Leer capítulo 3", 1, "subj-3", true, TaskType::Reminder),
                task("task-4", "Preparar exposición", 4, "subj-3", false, TaskType::Delivery),
            ],
            schedule: vec![
                class("sch-1", Weekday::Monday, "08:00", "10:00", "subj-1", "Aula 101"),
                class("sch-2", Weekday::Tuesday, "10:00", "12:00", "subj-2", "Lab C-2"),
                class("sch-3", Weekday::Wednesday, "08:00", "10:00", "subj-1", "Aula 101"),
                class("sch-4", Weekday::Thursday, "10:00", "12:00", "subj-2", "Lab C-2"),
                class("sch-5", Weekday::Friday, "14:00", "16:00", "subj-3", "Aula 305"),
            ],
            notes: Vec::new(),
        }
    }

    /// Rejects duplicate ids and bad class times; pads `H:MM` to `HH:MM` so
    /// seeded entries sort the same way form-created ones do.
    fn checked(mut self) -> Result<Self, AppError> {
        unique("subject", self.subjects.iter().map(|s| s.id.as_str()))?;
        unique("task", self.tasks.iter().map(|t| t.id.as_str()))?;
        unique("schedule entry", self.schedule.iter().map(|e| e.id.as_str()))?;
        unique("note", self.notes.iter().map(|n| n.date.to_string()))?;

        for entry in &mut self.schedule {
            let start = seed_time(&entry.id, &entry.start_time)?;
            let end = seed_time(&entry.id, &entry.end_time)?;
            if start >= end {
                return Err(AppError::Seed(format!(
                    "schedule entry {} starts at {} but ends at {}",
                    entry.id, start, end
                )));
            }
            entry.start_time = start;
            entry.end_time = end;
        }
        Ok(self)
    }
}

fn seed_time(id: &str, raw: &str) -> Result<String, AppError> {
    normalize_time(raw)
        .ok_or_else(|| AppError::Seed(format!("schedule entry {} has invalid time {:?}", id, raw)))
}

fn unique<K>(kind: &str, keys: impl Iterator<Item = K>) -> Result<(), AppError>
where
    K: Into<String>,
{
    let mut seen = HashSet::new();
    for key in keys {
        let key = key.into();
        if !seen.insert(key.clone()) {
            return Err(AppError::Seed(format!("duplicate {} id {}", kind, key)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_seed_has_demo_collections() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let seed = Seed::builtin(today);
        assert_eq!(seed.subjects.len(), 3);
        assert_eq!(seed.tasks.len(), 4);
        assert_eq!(seed.schedule.len(), 5);
        assert_eq!(seed.tasks[1].due_date, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(seed.clone().checked().expect("builtin seed is valid"), seed);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut seed = Seed::builtin(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        seed.tasks[1].id = "task-1".to_string();
        assert!(matches!(seed.checked(), Err(AppError::Seed(_))));
    }
}
