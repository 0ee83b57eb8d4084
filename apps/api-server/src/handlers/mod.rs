//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod contact;
mod health;
mod posts;
mod studies;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/categories", web::get().to(categories::list))
            .route("/contact", web::post().to(contact::submit))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Blog posts
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_published))
                    .route("", web::post().to(posts::create))
                    .route("/mine", web::get().to(posts::list_mine))
                    .route("/{slug}", web::get().to(posts::get_by_slug))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete)),
            )
            // Studies
            .service(
                web::scope("/studies")
                    .route("", web::get().to(studies::list))
                    .route("", web::post().to(studies::create))
                    .route("/{id}", web::put().to(studies::update))
                    .route("/{id}", web::delete().to(studies::delete))
                    .route("/{id}/download", web::post().to(studies::download)),
            ),
    );
}
