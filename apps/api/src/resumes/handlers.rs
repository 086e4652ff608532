use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::resume::{Resume, ResumeInsight};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// A parsed resume submission: identifying metadata plus the uploaded file.
struct Submission {
    user_id: Option<String>,
    email: Option<String>,
    file: Option<(String, Bytes)>,
}

/// Drains a multipart body into its known fields. Unknown fields are ignored;
/// presence is checked by the handlers, nothing else is validated.
async fn read_submission(mut multipart: Multipart) -> Result<Submission, AppError> {
    let mut submission = Submission {
        user_id: None,
        email: None,
        file: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("user_id") => {
                submission.user_id = Some(read_text(field).await?);
            }
            Some("email") => {
                submission.email = Some(read_text(field).await?);
            }
            Some("resume") => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| {
                        AppError::Validation("Resume field must have a filename".to_string())
                    })?;
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read resume field: {e}"))
                })?;
                submission.file = Some((filename, bytes));
            }
            _ => {} // Ignore unknown fields.
        }
    }

    Ok(submission)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    let name = field.name().unwrap_or_default().to_string();
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read '{name}' field: {e}")))
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("Missing '{field}' field")))
}

/// POST /api/v1/resumes
///
/// Accepts a multipart form with `user_id`, `email` and a `resume` file.
/// The file goes to the object store first, then a new record is inserted;
/// the two writes are independent and a persistence failure leaves the
/// uploaded object in place.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeInsight>), AppError> {
    let submission = read_submission(multipart).await?;
    let user_id = require(submission.user_id, "user_id")?;
    let email = require(submission.email, "email")?;
    let (filename, bytes) = require(submission.file, "resume")?;

    let mut resume = Resume::from_upload(user_id, email, bytes, &filename);
    resume.upload(&state.storage).await?;
    state.resumes.save(&resume).await?;

    Ok((StatusCode::CREATED, Json(ResumeInsight::from(&resume))))
}

/// PUT /api/v1/resumes/:user_id
///
/// Replaces a user's stored resume: uploads the new file under a fresh
/// object name, then points the existing record's `url` at it. 404 if the
/// user has no record; the previous object is not deleted.
pub async fn handle_replace(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<ResumeInsight>, AppError> {
    let existing = state.resumes.find_by_user_id(&user_id).await?;

    let submission = read_submission(multipart).await?;
    let (filename, bytes) = require(submission.file, "resume")?;

    let mut resume = Resume::from_upload(user_id, existing.email, bytes, &filename);
    resume.upload(&state.storage).await?;
    state.resumes.update(&resume).await?;

    Ok(Json(ResumeInsight::from(&resume)))
}

/// GET /api/v1/resumes/:user_id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ResumeInsight>, AppError> {
    let resume = state.resumes.find_by_user_id(&user_id).await?;
    Ok(Json(ResumeInsight::from(&resume)))
}

/// GET /api/v1/resumes/lookup?email=
pub async fn handle_lookup(
    State(state): State<AppState>,
    Query(params): Query<EmailQuery>,
) -> Result<Json<ResumeInsight>, AppError> {
    let resume = state.resumes.find_by_email(&params.email).await?;
    Ok(Json(ResumeInsight::from(&resume)))
}

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeInsight>>, AppError> {
    let resumes = state.resumes.find_all().await?;
    Ok(Json(resumes.iter().map(ResumeInsight::from).collect()))
}
