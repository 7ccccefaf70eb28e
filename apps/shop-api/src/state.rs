//! Shared application state.
//!
//! Built once at startup and handed to each domain's router.

use axum_helpers::{JwtAuth, UploadStore};
use domain_notifications::Mailer;
use mongodb::{Client, Database};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Shares the underlying connection pool across clones
    pub mongo_client: Client,
    pub db: Database,
    pub jwt: JwtAuth,
    pub uploads: UploadStore,
    pub mailer: Mailer,
}

impl AppState {
    pub fn new(config: Config, mongo_client: Client) -> eyre::Result<Self> {
        let db = mongo_client.database(config.mongodb.database());
        let jwt = JwtAuth::new(&config.jwt);
        let uploads = UploadStore::new(config.uploads.clone());
        let mailer = Mailer::from_config(&config.email)?;

        Ok(Self {
            config,
            mongo_client,
            db,
            jwt,
            uploads,
            mailer,
        })
    }
}
