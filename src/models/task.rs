use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::new_id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub subject_id: String,
    pub due_date: NaiveDate,
    pub completed: bool,
    #[serde(rename = "type")]
    pub kind: TaskType,
}

impl Task {
    /// New tasks always start out pending.
    pub(crate) fn create(draft: TaskDraft) -> Self {
        Self {
            id: new_id("task"),
            title: draft.title,
            subject_id: draft.subject_id,
            due_date: draft.due_date,
            completed: false,
            kind: draft.kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub subject_id: String,
    pub due_date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TaskType,
}

/// Partial update merged over an existing task. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskChanges {
    pub title: Option<String>,
    pub subject_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub kind: Option<TaskType>,
    pub completed: Option<bool>,
}

impl TaskChanges {
    pub fn apply_to(self, task: &Task) -> Task {
        Task {
            id: task.id.clone(),
            title: self.title.unwrap_or_else(|| task.title.clone()),
            subject_id: self.subject_id.unwrap_or_else(|| task.subject_id.clone()),
            due_date: self.due_date.unwrap_or(task.due_date),
            completed: self.completed.unwrap_or(task.completed),
            kind: self.kind.unwrap_or(task.kind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    #[serde(rename = "Entrega")]
    Delivery,
    #[serde(rename = "Parcial")]
    Midterm,
    #[serde(rename = "Recordatorio")]
    Reminder,
}

impl TaskType {
    pub const ALL: [TaskType; 3] = [TaskType::Delivery, TaskType::Midterm, TaskType::Reminder];

    pub fn label(&self) -> &'static str {
        match self {
            TaskType::Delivery => "Entrega",
            TaskType::Midterm => "Parcial",
            TaskType::Reminder => "Recordatorio",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == value)
    }
}
