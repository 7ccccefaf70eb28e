use std::collections::HashMap;

use tracing::instrument;
use uuid::Uuid;

use super::{CatalogService, validate};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{CreateMark, Mark, MarkFilter, MarkWithProducts, Product, UpdateMark};

impl CatalogService {
    async fn find_mark(&self, id: Uuid) -> CatalogResult<Mark> {
        self.marks
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::MarkNotFound(id))
    }

    async fn with_products(&self, marks: Vec<Mark>) -> CatalogResult<Vec<MarkWithProducts>> {
        let ids = marks.iter().map(|m| m.id).collect();
        let mut products: HashMap<Uuid, Vec<Product>> = HashMap::new();
        for product in self.products.list_by_marks(ids).await? {
            if let Some(mark_id) = product.mark_id {
                products.entry(mark_id).or_default().push(product);
            }
        }

        Ok(marks
            .into_iter()
            .map(|mark| MarkWithProducts {
                products: products.remove(&mark.id).unwrap_or_default(),
                mark,
            })
            .collect())
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_mark(&self, input: CreateMark) -> CatalogResult<Mark> {
        validate(&input)?;
        self.marks.create(Mark::new(input)).await
    }

    #[instrument(skip(self))]
    pub async fn get_mark(&self, id: Uuid) -> CatalogResult<MarkWithProducts> {
        let mark = self.find_mark(id).await?;
        let mut populated = self.with_products(vec![mark]).await?;
        populated.pop().ok_or(CatalogError::MarkNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_marks(&self, filter: MarkFilter) -> CatalogResult<Vec<MarkWithProducts>> {
        let marks = self.marks.list(filter).await?;
        self.with_products(marks).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_mark(&self, id: Uuid, input: UpdateMark) -> CatalogResult<Mark> {
        validate(&input)?;
        let mut mark = self.find_mark(id).await?;
        mark.apply_update(input);
        self.marks.update(mark).await
    }

    /// Delete a mark, leaving its products without one
    #[instrument(skip(self))]
    pub async fn delete_mark(&self, id: Uuid) -> CatalogResult<Mark> {
        let mark = self.find_mark(id).await?;
        if !self.marks.delete(id).await? {
            return Err(CatalogError::MarkNotFound(id));
        }

        let detached = self.products.detach_mark(id).await?;
        tracing::info!(mark_id = %id, detached, "Mark deleted");
        Ok(mark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateProduct;
    use crate::service::test_support::Mocks;

    fn mark(name: &str) -> Mark {
        Mark::new(CreateMark {
            name: name.into(),
            image: None,
        })
    }

    #[tokio::test]
    async fn test_list_groups_products_by_mark() {
        let nike = mark("Nike");
        let puma = mark("Puma");
        let product = Product::new(CreateProduct {
            name: "Air".into(),
            base_price: 500.0,
            mark_id: Some(nike.id),
            ..Default::default()
        });
        let marks = vec![nike, puma];

        let mut mocks = Mocks::default();
        mocks
            .marks
            .expect_list()
            .returning(move |_| Ok(marks.clone()));
        mocks
            .products
            .expect_list_by_marks()
            .withf(|ids| ids.len() == 2)
            .returning(move |_| Ok(vec![product.clone()]));

        let listed = mocks
            .into_service()
            .list_marks(MarkFilter::default())
            .await
            .unwrap();

        assert_eq!(listed[0].products.len(), 1);
        assert!(listed[1].products.is_empty());
    }

    #[tokio::test]
    async fn test_delete_detaches_products() {
        let nike = mark("Nike");
        let id = nike.id;

        let mut mocks = Mocks::default();
        mocks
            .marks
            .expect_get_by_id()
            .returning(move |_| Ok(Some(nike.clone())));
        mocks.marks.expect_delete().returning(|_| Ok(true));
        mocks
            .products
            .expect_detach_mark()
            .withf(move |mark_id| *mark_id == id)
            .times(1)
            .returning(|_| Ok(3));

        let removed = mocks.into_service().delete_mark(id).await.unwrap();
        assert_eq!(removed.name, "Nike");
    }

    #[tokio::test]
    async fn test_get_missing_mark() {
        let mut mocks = Mocks::default();
        mocks.marks.expect_get_by_id().returning(|_| Ok(None));

        let result = mocks.into_service().get_mark(Uuid::now_v7()).await;
        assert!(matches!(result, Err(CatalogError::MarkNotFound(_))));
    }
}
