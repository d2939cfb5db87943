pub mod note;
pub mod schedule;
pub mod subject;
pub mod task;

pub use note::Note;
pub use schedule::{ScheduleDraft, ScheduleEntry, Weekday};
pub use subject::{Subject, SubjectColor, SubjectDraft};
pub use task::{Task, TaskChanges, TaskDraft, TaskType};

use uuid::Uuid;

/// Builds a collection-scoped id such as `subj-<uuid>`.
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}
