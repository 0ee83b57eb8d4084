//! Category handlers.

use actix_web::{HttpResponse, web};

use cideacc_shared::dto::CategoryResponse;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/categories
///
/// Feeds the admin form's category dropdown.
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.list_all().await?;

    let response: Vec<CategoryResponse> = categories
        .into_iter()
        .map(|c| CategoryResponse {
            slug: c.slug,
            name: c.name,
        })
        .collect();

    Ok(HttpResponse::Ok().json(response))
}
