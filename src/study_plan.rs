//! Single-slot holder for the study-plan PDF.
//!
//! Each accepted upload gets a fresh handle. The previous handle is released
//! as soon as it is replaced, removed, or the slot is closed, so at most one
//! handle resolves at any time.

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const DEFAULT_DOCUMENT_NAME: &str = "Plan de Estudio";

#[derive(Debug, Clone)]
struct Document {
    handle: Uuid,
    name: String,
    bytes: Bytes,
    uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanInfo {
    pub handle: Uuid,
    pub name: String,
    pub size: usize,
    /// Path serving the document bytes while the handle is live.
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Accepted(StudyPlanInfo),
    /// Not a PDF. The slot is unchanged.
    Ignored,
}

#[derive(Debug, Default)]
pub struct StudyPlanSlot {
    current: Option<Document>,
}

impl StudyPlanSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<StudyPlanInfo> {
        self.current.as_ref().map(info_for)
    }

    pub fn upload(&mut self, name: Option<&str>, content_type: &str, bytes: Bytes) -> UploadOutcome {
        if !is_pdf(content_type) {
            warn!(
                "ignoring study plan upload with declared type {:?}; only {} is accepted",
                content_type, PDF_CONTENT_TYPE
            );
            return UploadOutcome::Ignored;
        }

        self.release();
        let document = Document {
            handle: Uuid::new_v4(),
            name: name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or(DEFAULT_DOCUMENT_NAME)
                .to_string(),
            bytes,
            uploaded_at: Utc::now(),
        };
        let info = info_for(&document);
        info!("study plan {} uploaded ({} bytes)", info.name, info.size);
        self.current = Some(document);
        UploadOutcome::Accepted(info)
    }

    /// Name and bytes of the document behind `handle`, if it is still live.
    /// The name has quotes and control characters removed so it can go
    /// straight into a `Content-Disposition` filename.
    pub fn document(&self, handle: Uuid) -> Option<(String, Bytes)> {
        self.current
            .as_ref()
            .filter(|d| d.handle == handle)
            .map(|d| (header_safe(&d.name), d.bytes.clone()))
    }

    /// Drops the current document. Returns `false` when the slot was empty.
    pub fn remove(&mut self) -> bool {
        self.release()
    }

    /// Releases whatever the slot still holds; called on shutdown.
    pub fn close(&mut self) {
        if self.release() {
            info!("study plan slot closed");
        }
    }

    pub fn live_handles(&self) -> usize {
        usize::from(self.current.is_some())
    }

    fn release(&mut self) -> bool {
        match self.current.take() {
            Some(document) => {
                debug!("released study plan handle {}", document.handle);
                true
            }
            None => false,
        }
    }
}

impl Drop for StudyPlanSlot {
    fn drop(&mut self) {
        self.release();
    }
}

fn info_for(document: &Document) -> StudyPlanInfo {
    StudyPlanInfo {
        handle: document.handle,
        name: document.name.clone(),
        size: document.bytes.len(),
        url: format!("/study-plan/{}", document.handle),
        uploaded_at: document.uploaded_at,
    }
}

fn header_safe(name: &str) -> String {
    name.chars().filter(|c| *c != '"' && !c.is_control()).collect()
}

/// Compares the media type only, ignoring parameters and case.
fn is_pdf(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|mime| mime.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf() -> Bytes {
        Bytes::from_static(b"%PDF-1.7 test")
    }

    #[test]
    fn replacing_releases_previous_handle() {
        let mut slot = StudyPlanSlot::new();
        let UploadOutcome::Accepted(first) = slot.upload(Some("malla.pdf"), PDF_CONTENT_TYPE, pdf())
        else {
            panic!("pdf upload should be accepted");
        };
        let UploadOutcome::Accepted(second) = slot.upload(None, PDF_CONTENT_TYPE, pdf()) else {
            panic!("pdf upload should be accepted");
        };

        assert!(slot.document(first.handle).is_none());
        assert!(slot.document(second.handle).is_some());
        assert_eq!(second.name, DEFAULT_DOCUMENT_NAME);
        assert_eq!(slot.live_handles(), 1);
    }

    #[test]
    fn non_pdf_is_ignored() {
        let mut slot = StudyPlanSlot::new();
        slot.upload(Some("malla.pdf"), "application/pdf; charset=binary", pdf());
        let before = slot.current();

        let outcome = slot.upload(Some("notes.txt"), "text/plain", Bytes::from_static(b"hi"));

        assert_eq!(outcome, UploadOutcome::Ignored);
        assert_eq!(slot.current(), before);
    }

    #[test]
    fn document_name_is_safe_for_headers() {
        let mut slot = StudyPlanSlot::new();
        let UploadOutcome::Accepted(info) =
            slot.upload(Some("plan \"2024\"\r\n.pdf"), PDF_CONTENT_TYPE, pdf())
        else {
            panic!("pdf upload should be accepted");
        };

        let (name, bytes) = slot.document(info.handle).expect("live handle");
        assert_eq!(name, "plan 2024.pdf");
        assert_eq!(bytes, pdf());
    }

    #[test]
    fn close_releases_everything() {
        let mut slot = StudyPlanSlot::new();
        slot.upload(None, PDF_CONTENT_TYPE, pdf());
        slot.close();
        assert_eq!(slot.live_handles(), 0);
        assert!(!slot.remove());
    }
}
