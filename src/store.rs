//! In-memory store holding every collection the organizer works with.
//!
//! Each successful mutation builds a new [`Snapshot`] and publishes it through
//! a watch channel, so readers holding an older `Arc<Snapshot>` never observe a
//! partial change. Calls that target an unknown id return `None` and leave the
//! published snapshot (and its revision) untouched.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::models::{
    Note, ScheduleDraft, ScheduleEntry, Subject, SubjectDraft, Task, TaskChanges, TaskDraft,
};
use crate::seed::Seed;

/// Label shown wherever a soft reference points at a subject that no longer exists.
pub const UNKNOWN_SUBJECT: &str = "Desconocido";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub revision: u64,
    pub subjects: Vec<Subject>,
    pub tasks: Vec<Task>,
    pub schedule: Vec<ScheduleEntry>,
    pub notes: Vec<Note>,
}

impl Snapshot {
    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Resolves a subject id to its name, falling back to [`UNKNOWN_SUBJECT`].
    pub fn subject_name(&self, id: &str) -> &str {
        self.subject(id)
            .map(|s| s.name.as_str())
            .unwrap_or(UNKNOWN_SUBJECT)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn schedule_entry(&self, id: &str) -> Option<&ScheduleEntry> {
        self.schedule.iter().find(|e| e.id == id)
    }

    pub fn note(&self, date: NaiveDate) -> Option<&Note> {
        self.notes.iter().find(|n| n.date == date)
    }
}

pub struct Store {
    tx: watch::Sender<Arc<Snapshot>>,
}

impl Store {
    pub fn new(seed: Seed) -> Self {
        let mut schedule = seed.schedule;
        sort_schedule(&mut schedule);
        let mut notes = seed.notes;
        notes.sort_by_key(|n| n.date);

        let snapshot = Snapshot {
            revision: 0,
            subjects: seed.subjects,
            tasks: seed.tasks,
            schedule,
            notes,
        };
        info!(
            "store seeded with {} subjects, {} tasks, {} schedule entries",
            snapshot.subjects.len(),
            snapshot.tasks.len(),
            snapshot.schedule.len()
        );

        let (tx, _rx) = watch::channel(Arc::new(snapshot));
        Self { tx }
    }

    /// Latest committed state.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.tx.borrow().clone()
    }

    /// Receiver notified after every committed mutation.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.tx.subscribe()
    }

    pub fn subject(&self, id: &str) -> Option<Subject> {
        self.snapshot().subject(id).cloned()
    }

    pub fn subject_name(&self, id: &str) -> String {
        self.snapshot().subject_name(id).to_string()
    }

    pub fn note(&self, date: NaiveDate) -> Option<Note> {
        self.snapshot().note(date).cloned()
    }

    pub fn add_subject(&self, draft: SubjectDraft) -> Subject {
        let subject = Subject::create(draft);
        self.commit(|current| {
            let mut next = current.clone();
            next.subjects.push(subject.clone());
            Some((next, ()))
        });
        info!("subject added: {} ({})", subject.name, subject.id);
        subject
    }

    /// Overwrites every field of the subject, keeping its id and position.
    pub fn update_subject(&self, id: &str, draft: SubjectDraft) -> Option<Subject> {
        let updated = self.commit(|current| {
            let index = current.subjects.iter().position(|s| s.id == id)?;
            let subject = Subject::with_id(id.to_string(), draft);
            let mut next = current.clone();
            next.subjects[index] = subject.clone();
            Some((next, subject))
        });
        log_outcome("update_subject", id, updated.is_some());
        updated
    }

    /// Removes the subject only. Tasks and classes pointing at it keep a
    /// dangling `subject_id` and resolve to [`UNKNOWN_SUBJECT`].
    pub fn delete_subject(&self, id: &str) -> Option<Subject> {
        let removed = self.commit(|current| {
            let index = current.subjects.iter().position(|s| s.id == id)?;
            let mut next = current.clone();
            let subject = next.subjects.remove(index);
            Some((next, subject))
        });
        log_outcome("delete_subject", id, removed.is_some());
        removed
    }

    pub fn add_schedule_entry(&self, draft: ScheduleDraft) -> ScheduleEntry {
        let entry = ScheduleEntry::create(draft);
        self.commit(|current| {
            let mut next = current.clone();
            next.schedule.push(entry.clone());
            sort_schedule(&mut next.schedule);
            Some((next, ()))
        });
        info!(
            "schedule entry added: {} {}-{} ({})",
            entry.day.label(),
            entry.start_time,
            entry.end_time,
            entry.id
        );
        entry
    }

    pub fn update_schedule_entry(&self, id: &str, draft: ScheduleDraft) -> Option<ScheduleEntry> {
        let updated = self.commit(|current| {
            let index = current.schedule.iter().position(|e| e.id == id)?;
            let entry = ScheduleEntry::with_id(id.to_string(), draft);
            let mut next = current.clone();
            next.schedule[index] = entry.clone();
            sort_schedule(&mut next.schedule);
            Some((next, entry))
        });
        log_outcome("update_schedule_entry", id, updated.is_some());
        updated
    }

    pub fn delete_schedule_entry(&self, id: &str) -> Option<ScheduleEntry> {
        let removed = self.commit(|current| {
            let index = current.schedule.iter().position(|e| e.id == id)?;
            let mut next = current.clone();
            let entry = next.schedule.remove(index);
            Some((next, entry))
        });
        log_outcome("delete_schedule_entry", id, removed.is_some());
        removed
    }

    pub fn add_task(&self, draft: TaskDraft) -> Task {
        let task = Task::create(draft);
        self.commit(|current| {
            let mut next = current.clone();
            next.tasks.push(task.clone());
            Some((next, ()))
        });
        info!("task added: {} ({})", task.title, task.id);
        task
    }

    pub fn update_task(&self, id: &str, changes: TaskChanges) -> Option<Task> {
        let updated = self.commit(|current| {
            let index = current.tasks.iter().position(|t| t.id == id)?;
            let task = changes.apply_to(&current.tasks[index]);
            let mut next = current.clone();
            next.tasks[index] = task.clone();
            Some((next, task))
        });
        log_outcome("update_task", id, updated.is_some());
        updated
    }

    pub fn delete_task(&self, id: &str) -> Option<Task> {
        let removed = self.commit(|current| {
            let index = current.tasks.iter().position(|t| t.id == id)?;
            let mut next = current.clone();
            let task = next.tasks.remove(index);
            Some((next, task))
        });
        log_outcome("delete_task", id, removed.is_some());
        removed
    }

    pub fn update_task_completion(&self, id: &str, completed: bool) -> Option<Task> {
        let updated = self.commit(|current| {
            let index = current.tasks.iter().position(|t| t.id == id)?;
            let task = Task {
                completed,
                ..current.tasks[index].clone()
            };
            let mut next = current.clone();
            next.tasks[index] = task.clone();
            Some((next, task))
        });
        log_outcome("update_task_completion", id, updated.is_some());
        updated
    }

    /// Stores the note for `date`. Blank content removes it.
    ///
    /// Returns the note now held for that date, if any.
    pub fn update_note(&self, date: NaiveDate, content: String) -> Option<Note> {
        let note = (!content.trim().is_empty()).then(|| Note { date, content });
        let applied = self.commit(|current| {
            let existing = current.notes.iter().position(|n| n.date == date);
            let mut next = match (existing, &note) {
                (None, None) => return None,
                (Some(i), Some(note)) if current.notes[i] == *note => return None,
                _ => current.clone(),
            };
            match (existing, &note) {
                (Some(i), None) => {
                    next.notes.remove(i);
                }
                (Some(i), Some(note)) => next.notes[i] = note.clone(),
                (None, Some(note)) => {
                    next.notes.push(note.clone());
                    next.notes.sort_by_key(|n| n.date);
                }
                (None, None) => {}
            }
            Some((next, ()))
        });
        if applied.is_some() {
            debug!("note for {} {}", date, if note.is_some() { "saved" } else { "cleared" });
        }
        note
    }

    /// Applies `change` to the current snapshot and publishes the result.
    ///
    /// `None` from `change` means nothing changed: no new revision, no
    /// notification.
    fn commit<T>(&self, change: impl FnOnce(&Snapshot) -> Option<(Snapshot, T)>) -> Option<T> {
        let mut outcome = None;
        self.tx.send_if_modified(|current| {
            let Some((mut next, value)) = change(&**current) else {
                return false;
            };
            next.revision = current.revision + 1;
            *current = Arc::new(next);
            outcome = Some(value);
            true
        });
        outcome
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Seed::default())
    }
}

/// Stable sort by start time; entries starting together keep insertion order.
fn sort_schedule(entries: &mut [ScheduleEntry]) {
    entries.sort_by(|a, b| a.start_time.cmp(&b.start_time));
}

fn log_outcome(op: &str, id: &str, applied: bool) {
    if applied {
        info!("{} applied to {}", op, id);
    } else {
        debug!("{} ignored: no record with id {}", op, id);
    }
}
