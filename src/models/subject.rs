use serde::{Deserialize, Serialize};

use super::new_id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub teacher: String,
    pub credits: u32,
    pub color: SubjectColor,
}

impl Subject {
    pub(crate) fn create(draft: SubjectDraft) -> Self {
        Self::with_id(new_id("subj"), draft)
    }

    pub(crate) fn with_id(id: String, draft: SubjectDraft) -> Self {
        Self {
            id,
            name: draft.name,
            teacher: draft.teacher,
            credits: draft.credits,
            color: draft.color,
        }
    }
}

/// Validated subject fields, used both for creation and full overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDraft {
    pub name: String,
    pub teacher: String,
    pub credits: u32,
    pub color: SubjectColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectColor {
    Blue,
    Green,
    Purple,
    Red,
    Yellow,
    Gray,
}

impl SubjectColor {
    pub const ALL: [SubjectColor; 6] = [
        SubjectColor::Blue,
        SubjectColor::Green,
        SubjectColor::Purple,
        SubjectColor::Red,
        SubjectColor::Yellow,
        SubjectColor::Gray,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectColor::Blue => "blue",
            SubjectColor::Green => "green",
            SubjectColor::Purple => "purple",
            SubjectColor::Red => "red",
            SubjectColor::Yellow => "yellow",
            SubjectColor::Gray => "gray",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}
