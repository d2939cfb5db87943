use axum::Json;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, Query};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use axum::routing::put;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tower::ServiceBuilder;
use uuid::Uuid;

use crate::error::AppError;
use crate::forms::{ScheduleEntryForm, SubjectForm, TaskEditForm, TaskForm};
use crate::models::*;
use crate::state::AppState;
use crate::store::Snapshot;
use crate::study_plan::{PDF_CONTENT_TYPE, StudyPlanInfo};
use crate::views::{self, CalendarDay, Dashboard, ScheduleDay};

#[derive(Deserialize)]
struct DashboardParams {
    today: Option<String>,
}

#[derive(Deserialize)]
struct CalendarParams {
    date: Option<String>,
}

#[derive(Deserialize)]
struct CompletionRequest {
    completed: bool,
}

#[derive(Deserialize)]
struct NoteRequest {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct UploadParams {
    name: Option<String>,
}

pub fn router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health))
        .route("/snapshot", get(snapshot))
        .route("/subjects", get(list_subjects).post(create_subject))
        .route(
            "/subjects/{id}",
            get(get_subject).put(update_subject).delete(delete_subject),
        )
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .route("/tasks/{id}/completion", put(update_task_completion))
        .route("/schedule", get(list_schedule).post(create_schedule_entry))
        .route(
            "/schedule/{id}",
            get(get_schedule_entry)
                .put(update_schedule_entry)
                .delete(delete_schedule_entry),
        )
        .route("/notes/{date}", get(get_note).put(update_note))
        .route("/views/dashboard", get(dashboard_view))
        .route("/views/schedule", get(schedule_view))
        .route("/views/calendar", get(calendar_view))
        .route("/views/subjects", get(subjects_view))
        .route(
            "/study-plan",
            get(current_study_plan)
                .put(upload_study_plan)
                .delete(remove_study_plan),
        )
        .route("/study-plan/{handle}", get(download_study_plan))
        .layer(ServiceBuilder::new().layer(DefaultBodyLimit::max(max_upload_bytes)))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn snapshot(State(state): State<AppState>) -> Json<Snapshot> {
    Json(Snapshot::clone(&state.store.snapshot()))
}

async fn list_subjects(State(state): State<AppState>) -> Json<Vec<Subject>> {
    Json(state.store.snapshot().subjects.clone())
}

async fn get_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Subject>, AppError> {
    let subject = state.store.subject(&id).ok_or(AppError::NotFound)?;
    Ok(Json(subject))
}

async fn create_subject(
    State(state): State<AppState>,
    Json(form): Json<SubjectForm>,
) -> Result<(StatusCode, Json<Subject>), AppError> {
    let draft = form.validate()?;
    let subject = state.store.add_subject(draft);
    Ok((StatusCode::CREATED, Json(subject)))
}

async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<SubjectForm>,
) -> Result<Json<Subject>, AppError> {
    let draft = form.validate()?;
    let subject = state
        .store
        .update_subject(&id, draft)
        .ok_or(AppError::NotFound)?;
    Ok(Json(subject))
}

async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.delete_subject(&id).ok_or(AppError::NotFound)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_tasks(State(state): State<AppState>) -> Json<Vec<Task>> {
    Json(state.store.snapshot().tasks.clone())
}

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, AppError> {
    let task = state
        .store
        .snapshot()
        .task(&id)
        .cloned()
        .ok_or(AppError::NotFound)?;
    Ok(Json(task))
}

async fn create_task(
    State(state): State<AppState>,
    Json(form): Json<TaskForm>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let draft = form.validate()?;
    let task = state.store.add_task(draft);
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<TaskEditForm>,
) -> Result<Json<Task>, AppError> {
    let changes = form.validate()?;
    let task = state
        .store
        .update_task(&id, changes)
        .ok_or(AppError::NotFound)?;
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.delete_task(&id).ok_or(AppError::NotFound)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_task_completion(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CompletionRequest>,
) -> Result<Json<Task>, AppError> {
    let task = state
        .store
        .update_task_completion(&id, req.completed)
        .ok_or(AppError::NotFound)?;
    Ok(Json(task))
}

async fn list_schedule(State(state): State<AppState>) -> Json<Vec<ScheduleEntry>> {
    Json(state.store.snapshot().schedule.clone())
}

async fn get_schedule_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ScheduleEntry>, AppError> {
    let entry = state
        .store
        .snapshot()
        .schedule_entry(&id)
        .cloned()
        .ok_or(AppError::NotFound)?;
    Ok(Json(entry))
}

async fn create_schedule_entry(
    State(state): State<AppState>,
    Json(form): Json<ScheduleEntryForm>,
) -> Result<(StatusCode, Json<ScheduleEntry>), AppError> {
    let draft = form.validate()?;
    let entry = state.store.add_schedule_entry(draft);
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn update_schedule_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<ScheduleEntryForm>,
) -> Result<Json<ScheduleEntry>, AppError> {
    let draft = form.validate()?;
    let entry = state
        .store
        .update_schedule_entry(&id, draft)
        .ok_or(AppError::NotFound)?;
    Ok(Json(entry))
}

async fn delete_schedule_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .store
        .delete_schedule_entry(&id)
        .ok_or(AppError::NotFound)?;
    Ok(StatusCode::NO_CONTENT)
}

/// A day without a note reads as empty content.
async fn get_note(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Note>, AppError> {
    let date = parse_date(&date)?;
    let note = state.store.note(date).unwrap_or(Note {
        date,
        content: String::new(),
    });
    Ok(Json(note))
}

async fn update_note(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(req): Json<NoteRequest>,
) -> Result<Json<Note>, AppError> {
    let date = parse_date(&date)?;
    let note = state.store.update_note(date, req.content).unwrap_or(Note {
        date,
        content: String::new(),
    });
    Ok(Json(note))
}

async fn dashboard_view(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<Dashboard>, AppError> {
    let today = date_or_today(params.today.as_deref())?;
    Ok(Json(views::dashboard(&state.store.snapshot(), today)))
}

async fn schedule_view(State(state): State<AppState>) -> Json<Vec<ScheduleDay>> {
    Json(views::weekly_schedule(&state.store.snapshot()))
}

async fn calendar_view(
    State(state): State<AppState>,
    Query(params): Query<CalendarParams>,
) -> Result<Json<CalendarDay>, AppError> {
    let date = date_or_today(params.date.as_deref())?;
    Ok(Json(views::calendar_day(&state.store.snapshot(), date)))
}

async fn subjects_view(State(state): State<AppState>) -> Json<Vec<Subject>> {
    Json(views::subjects(&state.store.snapshot()))
}

async fn current_study_plan(State(state): State<AppState>) -> Json<Option<StudyPlanInfo>> {
    Json(state.study_plan.lock().await.current())
}

/// Raw body upload. The declared `Content-Type` decides acceptance; anything
/// but a PDF leaves the slot as it was.
async fn upload_study_plan(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Option<StudyPlanInfo>> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let mut slot = state.study_plan.lock().await;
    slot.upload(params.name.as_deref(), content_type, body);
    Json(slot.current())
}

async fn remove_study_plan(State(state): State<AppState>) -> StatusCode {
    state.study_plan.lock().await.remove();
    StatusCode::NO_CONTENT
}

async fn download_study_plan(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Response, AppError> {
    let handle = Uuid::parse_str(&handle).map_err(|_| AppError::NotFound)?;
    let (name, bytes) = state
        .study_plan
        .lock()
        .await
        .document(handle)
        .ok_or(AppError::NotFound)?;

    Ok((
        [
            (header::CONTENT_TYPE, PDF_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, format!("inline; filename=\"{}\"", name)),
        ],
        bytes,
    )
        .into_response())
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("invalid date {:?}, expected YYYY-MM-DD", raw)))
}

fn date_or_today(raw: Option<&str>) -> Result<NaiveDate, AppError> {
    match raw {
        Some(raw) => parse_date(raw),
        None => Ok(Local::now().date_naive()),
    }
}
