//! Blog post handlers.

use actix_web::{HttpResponse, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use uuid::Uuid;

use cideacc_core::domain::{Post, PostStatus};
use cideacc_core::ports::AssetUpload;
use cideacc_core::publish::PostInput;
use cideacc_shared::dto::{FilePayload, PostResponse, PublishPostRequest, PublishResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u64>,
}

/// POST /api/posts - Protected route
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PublishPostRequest>,
) -> AppResult<HttpResponse> {
    let (input, image) = into_input(body.into_inner())?;

    let progress = |pct: u8| tracing::debug!(pct, "featured image upload");
    let outcome = state
        .publisher
        .publish_post(identity.user_id, input, image, None, Some(&progress))
        .await?;

    Ok(HttpResponse::Created().json(PublishResponse {
        success: true,
        id: outcome.id.to_string(),
        message: outcome.message,
    }))
}

/// PUT /api/posts/{id} - Protected route
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PublishPostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let (input, image) = into_input(body.into_inner())?;

    let progress = |pct: u8| tracing::debug!(pct, "featured image upload");
    let outcome = state
        .publisher
        .publish_post(identity.user_id, input, image, Some(id), Some(&progress))
        .await?;

    Ok(HttpResponse::Ok().json(PublishResponse {
        success: true,
        id: outcome.id.to_string(),
        message: outcome.message,
    }))
}

/// DELETE /api/posts/{id} - Protected route
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .publisher
        .delete_post(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/posts?limit=N
pub async fn list_published(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let limit = query.limit.unwrap_or(20).min(100);
    let posts = state.posts.list_published(limit).await?;

    let response: Vec<PostResponse> = posts.into_iter().map(to_response).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/posts/mine - Protected route
///
/// Every post of the acting author, drafts included. Backs the admin
/// dashboard listing.
pub async fn list_mine(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let posts = state.posts.find_by_author(identity.user_id).await?;

    let response: Vec<PostResponse> = posts.into_iter().map(to_response).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/posts/{slug}
pub async fn get_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let post = state
        .posts
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No post with slug '{slug}'")))?;

    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// Decode the JSON body into workflow input plus the optional inline image.
fn into_input(req: PublishPostRequest) -> Result<(PostInput, Option<AssetUpload>), AppError> {
    let status = PostStatus::parse(&req.status).ok_or_else(|| {
        AppError::BadRequest("status must be \"draft\" or \"published\"".to_string())
    })?;

    let image = req.featured_image.map(decode_file).transpose()?;

    Ok((
        PostInput {
            title: req.title,
            excerpt: req.excerpt,
            content: req.content,
            status,
            category: req.category,
            new_category: req.new_category,
        },
        image,
    ))
}

pub(super) fn decode_file(payload: FilePayload) -> Result<AssetUpload, AppError> {
    let bytes = BASE64
        .decode(payload.data.as_bytes())
        .map_err(|_| AppError::BadRequest(format!("'{}' is not valid base64", payload.name)))?;

    Ok(AssetUpload {
        bytes,
        file_name: payload.name,
        content_type: payload.content_type,
    })
}

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        title: post.title,
        slug: post.slug,
        excerpt: post.excerpt,
        content: post.content,
        status: post.status.as_str().to_string(),
        categories: post.categories,
        featured_image_url: post.featured_image_url,
        views_count: post.views_count,
        likes_count: post.likes_count,
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
    }
}
