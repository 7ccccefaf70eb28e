//! MongoDB implementation of AdminRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;
use uuid::Uuid;

use database::mongodb::id_filter;

use crate::error::{AdminError, AdminResult};
use crate::models::{Admin, AdminFilter};
use crate::repository::AdminRepository;

pub struct MongoAdminRepository {
    collection: Collection<Admin>,
}

impl MongoAdminRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Admin>("admins"),
        }
    }

    pub async fn init_indexes(&self) -> AdminResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("idx_email_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("Admin indexes initialized");
        Ok(())
    }

    fn build_filter(filter: &AdminFilter) -> Document {
        let mut doc = Document::new();
        if let Some(role) = filter.role {
            doc.insert("role", role.to_string());
        }
        if let Some(is_active) = filter.is_active {
            doc.insert("is_active", is_active);
        }
        doc
    }
}

#[async_trait]
impl AdminRepository for MongoAdminRepository {
    #[instrument(skip(self, admin), fields(admin_id = %admin.id))]
    async fn create(&self, admin: Admin) -> AdminResult<Admin> {
        self.collection.insert_one(&admin).await?;
        tracing::info!(admin_id = %admin.id, role = %admin.role, "Admin created");
        Ok(admin)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> AdminResult<Option<Admin>> {
        Ok(self.collection.find_one(id_filter(id)).await?)
    }

    #[instrument(skip(self))]
    async fn get_by_email(&self, email: &str) -> AdminResult<Option<Admin>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: AdminFilter) -> AdminResult<Vec<Admin>> {
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

    #[instrument(skip(self, admin), fields(admin_id = %admin.id))]
    async fn update(&self, admin: Admin) -> AdminResult<Admin> {
        let result = self
            .collection
            .replace_one(id_filter(admin.id), &admin)
            .await?;
        if result.matched_count == 0 {
            return Err(AdminError::NotFound(admin.id));
        }
        Ok(admin)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> AdminResult<bool> {
        let result = self.collection.delete_one(id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AdminRole;
    use mongodb::bson::to_raw_document_buf;

    #[test]
    fn test_id_filter_matches_stored_admin() {
        let admin = Admin::new(
            "Root".into(),
            "root@example.com".into(),
            "hash".into(),
            AdminRole::SuperAdmin,
        );
        let doc = to_raw_document_buf(&admin).unwrap().to_document().unwrap();

        assert_eq!(doc.get("_id"), id_filter(admin.id).get("_id"));
    }

    #[test]
    fn test_build_filter_role() {
        let filter = AdminFilter {
            role: Some(AdminRole::SuperAdmin),
            ..Default::default()
        };
        let doc = MongoAdminRepository::build_filter(&filter);
        assert_eq!(doc.get_str("role").unwrap(), "super_admin");
        assert!(!doc.contains_key("is_active"));
    }
}
