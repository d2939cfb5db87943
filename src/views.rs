//! Read-only projections of a [`Snapshot`] for the organizer pages.
//!
//! Every row carries its subject already resolved, so a dangling
//! `subject_id` shows up as [`UNKNOWN_SUBJECT`] instead of failing.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{ScheduleEntry, Subject, SubjectColor, Task, Weekday};
use crate::store::{Snapshot, UNKNOWN_SUBJECT};

/// Upcoming tasks shown on the dashboard.
pub const DASHBOARD_TASK_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    #[serde(flatten)]
    pub task: Task,
    pub subject_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRow {
    #[serde(flatten)]
    pub entry: ScheduleEntry,
    pub subject_name: String,
    pub color: SubjectColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub today: NaiveDate,
    /// `None` on weekends.
    pub weekday: Option<Weekday>,
    pub upcoming_tasks: Vec<TaskRow>,
    pub today_classes: Vec<ClassRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    pub day: Weekday,
    pub classes: Vec<ClassRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub tasks: Vec<TaskRow>,
    /// Every date that has at least one task, ascending.
    pub event_days: Vec<NaiveDate>,
}

pub fn dashboard(snapshot: &Snapshot, today: NaiveDate) -> Dashboard {
    let mut upcoming: Vec<&Task> = snapshot
        .tasks
        .iter()
        .filter(|t| !t.completed && t.due_date >= today)
        .collect();
    upcoming.sort_by_key(|t| t.due_date);

    let weekday = Weekday::from_chrono(today.weekday());
    let today_classes = match weekday {
        Some(day) => snapshot
            .schedule
            .iter()
            .filter(|e| e.day == day)
            .map(|e| class_row(snapshot, e))
            .collect(),
        None => Vec::new(),
    };

    Dashboard {
        today,
        weekday,
        upcoming_tasks: upcoming
            .into_iter()
            .take(DASHBOARD_TASK_LIMIT)
            .map(|t| task_row(snapshot, t))
            .collect(),
        today_classes,
    }
}

/// Monday to Friday, each day's classes by start time.
pub fn weekly_schedule(snapshot: &Snapshot) -> Vec<ScheduleDay> {
    Weekday::ALL
        .into_iter()
        .map(|day| {
            let mut entries: Vec<&ScheduleEntry> =
                snapshot.schedule.iter().filter(|e| e.day == day).collect();
            entries.sort_by(|a, b| a.start_time.cmp(&b.start_time));
            ScheduleDay {
                day,
                classes: entries.into_iter().map(|e| class_row(snapshot, e)).collect(),
            }
        })
        .collect()
}

pub fn calendar_day(snapshot: &Snapshot, date: NaiveDate) -> CalendarDay {
    let tasks = snapshot
        .tasks
        .iter()
        .filter(|t| t.due_date == date)
        .map(|t| task_row(snapshot, t))
        .collect();
    let event_days: BTreeSet<NaiveDate> = snapshot.tasks.iter().map(|t| t.due_date).collect();

    CalendarDay {
        date,
        tasks,
        event_days: event_days.into_iter().collect(),
    }
}

pub fn subjects(snapshot: &Snapshot) -> Vec<Subject> {
    snapshot.subjects.clone()
}

fn task_row(snapshot: &Snapshot, task: &Task) -> TaskRow {
    TaskRow {
        task: task.clone(),
        subject_name: snapshot.subject_name(&task.subject_id).to_string(),
    }
}

fn class_row(snapshot: &Snapshot, entry: &ScheduleEntry) -> ClassRow {
    let (subject_name, color) = match snapshot.subject(&entry.subject_id) {
        Some(subject) => (subject.name.clone(), subject.color),
        None => (UNKNOWN_SUBJECT.to_string(), SubjectColor::Gray),
    };
    ClassRow {
        entry: entry.clone(),
        subject_name,
        color,
    }
}
