use std::collections::HashMap;

use tracing::instrument;
use uuid::Uuid;

use super::{CatalogService, validate};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    CreateProduct, Product, ProductDetails, ProductFilter, ProductVariant, UpdateProduct,
};

impl CatalogService {
    /// Fail with 400 when a referenced category or mark is missing
    async fn ensure_product_refs(
        &self,
        category_id: Option<Uuid>,
        mark_id: Option<Uuid>,
    ) -> CatalogResult<()> {
        if let Some(id) = category_id {
            if self.categories.get_by_id(id).await?.is_none() {
                return Err(CatalogError::InvalidReference {
                    entity: "category",
                    id,
                });
            }
        }
        if let Some(id) = mark_id {
            if self.marks.get_by_id(id).await?.is_none() {
                return Err(CatalogError::InvalidReference { entity: "mark", id });
            }
        }
        Ok(())
    }

    pub(crate) async fn find_product(&self, id: Uuid) -> CatalogResult<Product> {
        self.products
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))
    }

    /// Resolve category, mark and variants for a page of products with one
    /// query per collection
    async fn populate(&self, products: Vec<Product>) -> CatalogResult<Vec<ProductDetails>> {
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let mut category_ids: Vec<Uuid> = products.iter().filter_map(|p| p.category_id).collect();
        category_ids.sort_unstable();
        category_ids.dedup();
        let mut mark_ids: Vec<Uuid> = products.iter().filter_map(|p| p.mark_id).collect();
        mark_ids.sort_unstable();
        mark_ids.dedup();
        let product_ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();

        let categories: HashMap<Uuid, _> = self
            .categories
            .get_many(category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let marks: HashMap<Uuid, _> = self
            .marks
            .get_many(mark_ids)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let mut variants: HashMap<Uuid, Vec<ProductVariant>> = HashMap::new();
        for variant in self.variants.list_by_products(product_ids).await? {
            variants.entry(variant.product_id).or_default().push(variant);
        }

        Ok(products
            .into_iter()
            .map(|product| ProductDetails {
                category: product.category_id.and_then(|id| categories.get(&id).cloned()),
                mark: product.mark_id.and_then(|id| marks.get(&id).cloned()),
                variants: variants.remove(&product.id).unwrap_or_default(),
                product,
            })
            .collect())
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product> {
        validate(&input)?;
        self.ensure_product_refs(input.category_id, input.mark_id)
            .await?;

        self.products.create(Product::new(input)).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> CatalogResult<ProductDetails> {
        let product = self.find_product(id).await?;
        let mut details = self.populate(vec![product]).await?;
        details.pop().ok_or(CatalogError::ProductNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: ProductFilter) -> CatalogResult<Vec<ProductDetails>> {
        let products = self.products.list(filter).await?;
        self.populate(products).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product> {
        validate(&input)?;
        let mut product = self.find_product(id).await?;
        self.ensure_product_refs(input.category_id, input.mark_id)
            .await?;

        product.apply_update(input);
        self.products.update(product).await
    }

    /// Delete a product with its variants and reviews; returns the removed record
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> CatalogResult<Product> {
        let product = self.find_product(id).await?;
        if !self.products.delete(id).await? {
            return Err(CatalogError::ProductNotFound(id));
        }

        let variants = self.variants.delete_by_product(id).await?;
        let reviews = self.reviews.delete_by_product(id).await?;
        tracing::info!(product_id = %id, variants, reviews, "Product deleted");
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CreateCategory, CreateVariant, Mark};
    use crate::service::test_support::Mocks;

    fn create() -> CreateProduct {
        CreateProduct {
            name: "Runner".into(),
            base_price: 300.0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_with_missing_category_is_bad_reference() {
        let mut mocks = Mocks::default();
        mocks.categories.expect_get_by_id().returning(|_| Ok(None));
        mocks.products.expect_create().never();

        let result = mocks
            .into_service()
            .create_product(CreateProduct {
                category_id: Some(Uuid::now_v7()),
                ..create()
            })
            .await;

        assert!(matches!(
            result,
            Err(CatalogError::InvalidReference {
                entity: "category",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let mut mocks = Mocks::default();
        mocks.products.expect_create().never();

        let result = mocks
            .into_service()
            .create_product(CreateProduct {
                name: String::new(),
                ..create()
            })
            .await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_with_existing_mark() {
        let mark = Mark::new(crate::models::CreateMark {
            name: "Nike".into(),
            image: None,
        });
        let mark_id = mark.id;

        let mut mocks = Mocks::default();
        mocks
            .marks
            .expect_get_by_id()
            .returning(move |_| Ok(Some(mark.clone())));
        mocks.products.expect_create().returning(Ok);

        let product = mocks
            .into_service()
            .create_product(CreateProduct {
                mark_id: Some(mark_id),
                ..create()
            })
            .await
            .unwrap();

        assert_eq!(product.mark_id, Some(mark_id));
        assert_eq!(product.ratings_average, 4.5);
    }

    #[tokio::test]
    async fn test_get_product_populates_relations() {
        let category = Category::new(CreateCategory {
            name: "Shoes".into(),
            ..Default::default()
        });
        let product = Product::new(CreateProduct {
            category_id: Some(category.id),
            ..create()
        });
        let variant = ProductVariant::new(CreateVariant {
            product_id: product.id,
            size: "42".into(),
            color: "black".into(),
            price: 320.0,
            stock: 3,
            ..Default::default()
        });
        let id = product.id;

        let mut mocks = Mocks::default();
        mocks
            .products
            .expect_get_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        mocks
            .categories
            .expect_get_many()
            .returning(move |_| Ok(vec![category.clone()]));
        mocks.marks.expect_get_many().returning(|_| Ok(vec![]));
        mocks
            .variants
            .expect_list_by_products()
            .returning(move |_| Ok(vec![variant.clone()]));

        let details = mocks.into_service().get_product(id).await.unwrap();

        assert_eq!(details.category.unwrap().name, "Shoes");
        assert!(details.mark.is_none());
        assert_eq!(details.variants.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_product_cascades() {
        let product = Product::new(create());
        let id = product.id;

        let mut mocks = Mocks::default();
        mocks
            .products
            .expect_get_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        mocks.products.expect_delete().returning(|_| Ok(true));
        mocks
            .variants
            .expect_delete_by_product()
            .withf(move |product_id| *product_id == id)
            .times(1)
            .returning(|_| Ok(2));
        mocks
            .reviews
            .expect_delete_by_product()
            .withf(move |product_id| *product_id == id)
            .times(1)
            .returning(|_| Ok(1));

        let removed = mocks.into_service().delete_product(id).await.unwrap();
        assert_eq!(removed.id, id);
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let mut mocks = Mocks::default();
        mocks.products.expect_get_by_id().returning(|_| Ok(None));
        mocks.variants.expect_delete_by_product().never();

        let result = mocks.into_service().delete_product(Uuid::now_v7()).await;
        assert!(matches!(result, Err(CatalogError::ProductNotFound(_))));
    }
}
