//! Application state - shared across all handlers.

use std::sync::Arc;

use cideacc_core::Publisher;
use cideacc_core::ports::{
    AssetStore, CategoryRepository, PostRepository, StudyRepository, UserRepository,
};
use cideacc_infra::{
    InMemoryAssetStore, InMemoryCategoryRepository, InMemoryPostRepository,
    InMemoryStudyRepository, InMemoryUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub studies: Arc<dyn StudyRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub users: Arc<dyn UserRepository>,
    pub publisher: Arc<Publisher>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let assets = Self::build_assets(config);
        let (posts, studies, categories, users) = Self::build_repos(config).await;

        let publisher = Arc::new(Publisher::new(
            posts.clone(),
            studies.clone(),
            categories.clone(),
            assets,
        ));

        tracing::info!("Application state initialized");

        Self {
            posts,
            studies,
            categories,
            users,
            publisher,
        }
    }

    fn build_assets(config: &AppConfig) -> Arc<dyn AssetStore> {
        #[cfg(feature = "http-storage")]
        if let Some(endpoint) = &config.storage_endpoint {
            let public_base_url = config
                .storage_public_url
                .clone()
                .unwrap_or_else(|| endpoint.clone());
            return Arc::new(cideacc_infra::HttpAssetStore::new(
                cideacc_infra::HttpStorageConfig {
                    endpoint: endpoint.clone(),
                    public_base_url,
                },
            ));
        }

        let _ = config;
        tracing::warn!("STORAGE_ENDPOINT not set. Assets are kept in memory.");
        Arc::new(InMemoryAssetStore::new())
    }

    #[allow(clippy::type_complexity)]
    async fn build_repos(
        config: &AppConfig,
    ) -> (
        Arc<dyn PostRepository>,
        Arc<dyn StudyRepository>,
        Arc<dyn CategoryRepository>,
        Arc<dyn UserRepository>,
    ) {
        #[cfg(feature = "postgres")]
        if let Some(url) = &config.database_url {
            let db_config = cideacc_infra::database::DatabaseConfig {
                url: url.clone(),
                max_connections: config.db_max_connections,
                min_connections: config.db_min_connections,
            };
            match cideacc_infra::database::connect(&db_config).await {
                Ok(db) => {
                    return (
                        Arc::new(cideacc_infra::PostgresPostRepository::new(db.clone())),
                        Arc::new(cideacc_infra::PostgresStudyRepository::new(db.clone())),
                        Arc::new(cideacc_infra::PostgresCategoryRepository::new(db.clone())),
                        Arc::new(cideacc_infra::PostgresUserRepository::new(db)),
                    );
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {e}. Using in-memory fallback."
                    );
                }
            }
        }

        let _ = config;
        tracing::warn!("Running without a database (in-memory mode). Data is not persisted.");
        (
            Arc::new(InMemoryPostRepository::new()),
            Arc::new(InMemoryStudyRepository::new()),
            Arc::new(InMemoryCategoryRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
        )
    }
}
