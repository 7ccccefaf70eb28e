//! MongoDB implementations of UserRepository and SessionRepository

use async_trait::async_trait;
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, Document, doc, to_bson},
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;
use uuid::Uuid;

use database::mongodb::{id_filter, uuid_bson};

use crate::error::{UserError, UserResult};
use crate::models::{Session, User, UserFilter};
use crate::repository::{SessionRepository, UserRepository};

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<User>("users"),
        }
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<User>(collection_name),
        }
    }

    pub async fn init_indexes(&self) -> UserResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_email_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "confirmation_token": 1 })
                .options(
                    IndexOptions::builder()
                        .sparse(true)
                        .name("idx_confirmation_token".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "reset_password_token_hash": 1 })
                .options(
                    IndexOptions::builder()
                        .sparse(true)
                        .name("idx_reset_token".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("User indexes initialized");
        Ok(())
    }

    /// Matches the user only while fewer than `max` attempts are recorded;
    /// a missing counter counts as zero
    fn otp_claim_filter(id: Uuid, max: i32) -> Document {
        let mut filter = id_filter(id);
        filter.insert("otp_attempts", doc! { "$not": { "$gte": max } });
        filter
    }

    fn build_filter(filter: &UserFilter) -> Document {
        let mut doc = Document::new();

        if let Some(email) = &filter.email {
            doc.insert(
                "email",
                doc! { "$regex": database::mongodb::escape_regex(&email.to_lowercase()), "$options": "i" },
            );
        }
        if let Some(is_verified) = filter.is_verified {
            doc.insert("is_verified", is_verified);
        }

        doc
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: User) -> UserResult<User> {
        match self.collection.insert_one(&user).await {
            Ok(_) => {
                tracing::info!(user_id = %user.id, "User created");
                Ok(user)
            }
            Err(e) if database::mongodb::is_duplicate_key_error(&e) => Err(UserError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(id_filter(id)).await?)
    }

    #[instrument(skip(self))]
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    #[instrument(skip_all)]
    async fn get_by_confirmation_token(&self, token: &str) -> UserResult<Option<User>> {
        Ok(self
            .collection
            .find_one(doc! { "confirmation_token": token })
            .await?)
    }

    #[instrument(skip_all)]
    async fn get_by_reset_token_hash(&self, token_hash: &str) -> UserResult<Option<User>> {
        Ok(self
            .collection
            .find_one(doc! { "reset_password_token_hash": token_hash })
            .await?)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>> {
        let options = FindOptions::builder()
            .limit(filter.limit)
            .skip(filter.offset)
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: UserFilter) -> UserResult<u64> {
        Ok(self
            .collection
            .count_documents(Self::build_filter(&filter))
            .await?)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: User) -> UserResult<User> {
        let result = self.collection.replace_one(id_filter(user.id), &user).await?;
        if result.matched_count == 0 {
            return Err(UserError::NotFound(user.id));
        }
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let result = self.collection.delete_one(id_filter(id)).await?;
        if result.deleted_count > 0 {
            tracing::info!(user_id = %id, "User deleted");
        }
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn claim_otp_attempt(&self, id: Uuid, max: i32) -> UserResult<bool> {
        let result = self
            .collection
            .update_one(
                Self::otp_claim_filter(id, max),
                doc! { "$inc": { "otp_attempts": 1 } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }
}

pub struct MongoSessionRepository {
    collection: Collection<Session>,
}

impl MongoSessionRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Session>("sessions"),
        }
    }

    pub async fn init_indexes(&self) -> UserResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "user_id": 1, "revoked_at": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_user_revoked".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Session indexes initialized");
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for MongoSessionRepository {
    #[instrument(skip(self, session), fields(session_id = %session.id, user_id = %session.user_id))]
    async fn create(&self, session: Session) -> UserResult<Session> {
        self.collection.insert_one(&session).await?;
        Ok(session)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<Session>> {
        Ok(self.collection.find_one(id_filter(id)).await?)
    }

    #[instrument(skip(self))]
    async fn revoke(&self, id: Uuid, replaced_by: Option<Uuid>) -> UserResult<bool> {
        let mut filter = id_filter(id);
        filter.insert("revoked_at", Bson::Null);

        let update = doc! {
            "$set": {
                "revoked_at": to_bson(&Utc::now()).unwrap_or(Bson::Null),
                "replaced_by": replaced_by.map(uuid_bson).unwrap_or(Bson::Null),
            }
        };

        let result = self.collection.update_one(filter, update).await?;
        Ok(result.modified_count > 0)
    }

    #[instrument(skip(self))]
    async fn revoke_all_for_user(&self, user_id: Uuid) -> UserResult<u64> {
        let filter = doc! {
            "user_id": uuid_bson(user_id),
            "revoked_at": Bson::Null,
        };
        let update = doc! {
            "$set": { "revoked_at": to_bson(&Utc::now()).unwrap_or(Bson::Null) }
        };

        let result = self.collection.update_many(filter, update).await?;
        tracing::info!(user_id = %user_id, revoked = result.modified_count, "Sessions revoked");
        Ok(result.modified_count)
    }
}
