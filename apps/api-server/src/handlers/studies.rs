//! Study handlers.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cideacc_core::domain::Study;
use cideacc_core::ports::AssetUpload;
use cideacc_core::publish::StudyInput;
use cideacc_shared::dto::{PublishResponse, PublishStudyRequest, StudyResponse};

use crate::handlers::posts::decode_file;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u64>,
    #[serde(default)]
    pub featured: bool,
}

/// POST /api/studies - Protected route
pub async fn create(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<PublishStudyRequest>,
) -> AppResult<HttpResponse> {
    let (input, pdf, thumbnail) = into_input(body.into_inner())?;

    let progress = |pct: u8| tracing::debug!(pct, "study asset upload");
    let outcome = state
        .publisher
        .publish_study(input, pdf, thumbnail, None, Some(&progress))
        .await?;

    Ok(HttpResponse::Created().json(PublishResponse {
        success: true,
        id: outcome.id.to_string(),
        message: outcome.message,
    }))
}

/// PUT /api/studies/{id} - Protected route
pub async fn update(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PublishStudyRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let (input, pdf, thumbnail) = into_input(body.into_inner())?;

    let progress = |pct: u8| tracing::debug!(pct, "study asset upload");
    let outcome = state
        .publisher
        .publish_study(input, pdf, thumbnail, Some(id), Some(&progress))
        .await?;

    Ok(HttpResponse::Ok().json(PublishResponse {
        success: true,
        id: outcome.id.to_string(),
        message: outcome.message,
    }))
}

/// DELETE /api/studies/{id} - Protected route
pub async fn delete(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.publisher.delete_study(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/studies?limit=N&featured=true
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let limit = query.limit.unwrap_or(20).min(100);
    let studies = if query.featured {
        state.studies.list_featured(limit).await?
    } else {
        state.studies.list_recent(limit).await?
    };

    let response: Vec<StudyResponse> = studies.into_iter().map(to_response).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub pdf_url: String,
}

/// POST /api/studies/{id}/download
///
/// Counts the download and hands back the PDF location. Public: the reader
/// pages call this without credentials.
pub async fn download(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let study = state
        .studies
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No study with id '{id}'")))?;

    state.studies.increment_downloads(id).await?;

    Ok(HttpResponse::Ok().json(DownloadResponse {
        pdf_url: study.pdf_url,
    }))
}

fn into_input(
    req: PublishStudyRequest,
) -> Result<(StudyInput, Option<AssetUpload>, Option<AssetUpload>), AppError> {
    let pdf = req.pdf_file.map(decode_file).transpose()?;
    let thumbnail = req.thumbnail_file.map(decode_file).transpose()?;

    Ok((
        StudyInput {
            title: req.title,
            description: req.description,
            category: req.category,
            author: req.author,
            publish_date: req.publish_date,
            tags: req.tags,
            featured: req.featured,
        },
        pdf,
        thumbnail,
    ))
}

fn to_response(study: Study) -> StudyResponse {
    StudyResponse {
        id: study.id.to_string(),
        title: study.title,
        description: study.description,
        category: study.category,
        author: study.author,
        publish_date: study.publish_date,
        tags: study.tags,
        featured: study.featured,
        pdf_url: study.pdf_url,
        thumbnail_url: study.thumbnail_url,
        download_count: study.download_count,
        created_at: study.created_at.to_rfc3339(),
        updated_at: study.updated_at.to_rfc3339(),
    }
}
