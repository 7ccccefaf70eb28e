use tracing::instrument;
use uuid::Uuid;

use super::{CatalogService, validate};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{CreateVariant, ProductVariant, UpdateVariant, VariantFilter};

impl CatalogService {
    async fn find_variant(&self, id: Uuid) -> CatalogResult<ProductVariant> {
        self.variants
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::VariantNotFound(id))
    }

    #[instrument(skip(self, input), fields(product_id = %input.product_id))]
    pub async fn create_variant(&self, input: CreateVariant) -> CatalogResult<ProductVariant> {
        validate(&input)?;
        if self.products.get_by_id(input.product_id).await?.is_none() {
            return Err(CatalogError::InvalidReference {
                entity: "product",
                id: input.product_id,
            });
        }

        self.variants.create(ProductVariant::new(input)).await
    }

    #[instrument(skip(self))]
    pub async fn get_variant(&self, id: Uuid) -> CatalogResult<ProductVariant> {
        self.find_variant(id).await
    }

    #[instrument(skip(self))]
    pub async fn list_variants(&self, filter: VariantFilter) -> CatalogResult<Vec<ProductVariant>> {
        self.variants.list(filter).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_variant(
        &self,
        id: Uuid,
        input: UpdateVariant,
    ) -> CatalogResult<ProductVariant> {
        validate(&input)?;
        let mut variant = self.find_variant(id).await?;
        variant.apply_update(input);
        self.variants.update(variant).await
    }

    #[instrument(skip(self))]
    pub async fn delete_variant(&self, id: Uuid) -> CatalogResult<ProductVariant> {
        let variant = self.find_variant(id).await?;
        if !self.variants.delete(id).await? {
            return Err(CatalogError::VariantNotFound(id));
        }
        tracing::info!(variant_id = %id, product_id = %variant.product_id, "Variant deleted");
        Ok(variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateProduct, Product};
    use crate::service::test_support::Mocks;

    fn create(product_id: Uuid) -> CreateVariant {
        CreateVariant {
            product_id,
            size: "41".into(),
            color: "white".into(),
            price: 199.0,
            stock: 10,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_requires_product() {
        let mut mocks = Mocks::default();
        mocks.products.expect_get_by_id().returning(|_| Ok(None));
        mocks.variants.expect_create().never();

        let result = mocks
            .into_service()
            .create_variant(create(Uuid::now_v7()))
            .await;

        assert!(matches!(
            result,
            Err(CatalogError::InvalidReference {
                entity: "product",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_create_for_existing_product() {
        let product = Product::new(CreateProduct {
            name: "Runner".into(),
            base_price: 150.0,
            ..Default::default()
        });
        let product_id = product.id;

        let mut mocks = Mocks::default();
        mocks
            .products
            .expect_get_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        mocks.variants.expect_create().returning(Ok);

        let variant = mocks
            .into_service()
            .create_variant(create(product_id))
            .await
            .unwrap();

        assert_eq!(variant.product_id, product_id);
        assert_eq!(variant.stock, 10);
    }

    #[tokio::test]
    async fn test_negative_stock_rejected() {
        let mut mocks = Mocks::default();
        mocks.products.expect_get_by_id().never();

        let result = mocks
            .into_service()
            .create_variant(CreateVariant {
                stock: -1,
                ..create(Uuid::now_v7())
            })
            .await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_missing_variant() {
        let mut mocks = Mocks::default();
        mocks.variants.expect_get_by_id().returning(|_| Ok(None));

        let result = mocks.into_service().get_variant(Uuid::now_v7()).await;
        assert!(matches!(result, Err(CatalogError::VariantNotFound(_))));
    }
}
