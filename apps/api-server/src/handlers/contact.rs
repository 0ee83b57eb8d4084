//! Contact form handler.

use actix_web::{HttpResponse, web};

use cideacc_shared::ApiResponse;
use cideacc_shared::dto::ContactRequest;

use crate::middleware::error::{AppError, AppResult};

/// POST /api/contact
///
/// Accepts a contact form submission. Delivery is an operational concern
/// (mail relay, inbox integration); here the message is validated and logged
/// so nothing is silently dropped while no relay is configured.
pub async fn submit(body: web::Json<ContactRequest>) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    validate(&req)?;

    tracing::info!(
        name = %req.name,
        email = %req.email,
        message_len = req.message.chars().count(),
        "contact form submission received"
    );

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        (),
        "Message received. We will get back to you soon.",
    )))
}

fn validate(req: &ContactRequest) -> Result<(), AppError> {
    if req.name.trim().chars().count() < 2 {
        return Err(AppError::Validation {
            field: "name".to_string(),
            message: "must be at least 2 characters".to_string(),
        });
    }

    if !req.email.contains('@') {
        return Err(AppError::Validation {
            field: "email".to_string(),
            message: "must be a valid email address".to_string(),
        });
    }

    if req.message.trim().chars().count() < 10 {
        return Err(AppError::Validation {
            field: "message".to_string(),
            message: "must be at least 10 characters".to_string(),
        });
    }

    Ok(())
}
