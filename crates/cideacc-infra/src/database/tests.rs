use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use cideacc_core::domain::Post;
use cideacc_core::ports::{BaseRepository, PostRepository, StudyRepository, UserRepository};

use super::entity::{post, user};
use super::postgres::{
    PostgresPostRepository, PostgresStudyRepository, PostgresUserRepository, mask_email,
};

fn post_model(title: &str, status: &str) -> post::Model {
    let now = Utc::now();
    post::Model {
        id: Uuid::new_v4(),
        author_id: Uuid::new_v4(),
        title: title.to_string(),
        slug: "test-post".to_string(),
        excerpt: "Un extracto suficientemente largo.".to_string(),
        content: "Contenido con más de veinte caracteres.".to_string(),
        status: status.to_string(),
        categories: serde_json::json!(["Investigación"]),
        featured_image_url: Some("https://assets.example/posts/1_cover.png".to_string()),
        views_count: 0,
        likes_count: 0,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn find_post_by_id_maps_model() {
    let model = post_model("Test Post", "draft");
    let id = model.id;
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result: Option<Post> = repo.find_by_id(id).await.unwrap();

    let found = result.unwrap();
    assert_eq!(found.title, "Test Post");
    assert_eq!(found.categories, vec!["Investigación".to_string()]);
}

#[tokio::test]
async fn list_published_maps_all_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            post_model("First", "published"),
            post_model("Second", "published"),
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let posts = repo.list_published(20).await.unwrap();

    assert_eq!(posts.len(), 2);
    assert!(posts.iter().all(|p| p.featured_image_url.is_some()));
}

#[tokio::test]
async fn find_by_email_accepts_multibyte_addresses() {
    // Accented local parts are everyday input here; the lookup (and its
    // masked debug log) must not choke on them.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<user::Model>::new()])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let result = repo.find_by_email("ñoño@example.com").await.unwrap();
    assert!(result.is_none());
}

#[test]
fn email_mask_keeps_first_char_and_domain() {
    assert_eq!(mask_email("ñoño@example.com"), "ñ***@example.com");
    assert_eq!(mask_email("admin@cideacc.org"), "a***@cideacc.org");
    // Too short to mask meaningfully, or not an address at all.
    assert_eq!(mask_email("a@example.com"), "***");
    assert_eq!(mask_email("not-an-email"), "***");
}

#[tokio::test]
async fn increment_downloads_requires_existing_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();

    let repo = PostgresStudyRepository::new(db);
    repo.increment_downloads(Uuid::new_v4()).await.unwrap();
    assert!(repo.increment_downloads(Uuid::new_v4()).await.is_err());
}
