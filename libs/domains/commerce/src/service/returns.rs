use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use super::validate;
use crate::error::{CommerceError, CommerceResult};
use crate::models::{CreateReturn, ReturnFilter, ReturnRequest, UpdateReturn};
use crate::repository::ReturnRepository;

pub struct ReturnService<R: ReturnRepository> {
    repository: Arc<R>,
}

impl<R: ReturnRepository> ReturnService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input), fields(order_id = %input.order_id))]
    pub async fn create_return(
        &self,
        input: CreateReturn,
        caller: Uuid,
    ) -> CommerceResult<ReturnRequest> {
        validate(&input)?;
        let user_id = input.user_id.unwrap_or(caller);
        self.repository
            .create(ReturnRequest::new(input, user_id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_return(&self, id: Uuid) -> CommerceResult<ReturnRequest> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CommerceError::ReturnNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_returns(&self, filter: ReturnFilter) -> CommerceResult<Vec<ReturnRequest>> {
        self.repository.list(filter).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_return(
        &self,
        id: Uuid,
        input: UpdateReturn,
    ) -> CommerceResult<ReturnRequest> {
        validate(&input)?;
        let mut request = self.get_return(id).await?;
        request.apply_update(input);
        self.repository.update(request).await
    }

    #[instrument(skip(self))]
    pub async fn delete_return(&self, id: Uuid) -> CommerceResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CommerceError::ReturnNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReturnItem, ReturnStatus};
    use crate::repository::MockReturnRepository;

    fn create() -> CreateReturn {
        CreateReturn {
            user_id: None,
            order_id: Uuid::now_v7(),
            product: ReturnItem {
                variant_id: Uuid::now_v7(),
                amount: 2,
            },
        }
    }

    #[tokio::test]
    async fn test_create_records_requested() {
        let mut repo = MockReturnRepository::new();
        repo.expect_create().returning(Ok);

        let created = ReturnService::new(repo)
            .create_return(create(), Uuid::now_v7())
            .await
            .unwrap();

        assert_eq!(created.status, ReturnStatus::Requested);
        assert_eq!(created.history.len(), 1);
    }

    #[tokio::test]
    async fn test_status_change_is_persisted_with_history() {
        let existing = ReturnRequest::new(create(), Uuid::now_v7());
        let id = existing.id;

        let mut repo = MockReturnRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_update()
            .withf(|r| r.history.len() == 2 && r.history[1].action == "refunded")
            .times(1)
            .returning(Ok);

        let updated = ReturnService::new(repo)
            .update_return(
                id,
                UpdateReturn {
                    status: Some(ReturnStatus::Refunded),
                    product: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, ReturnStatus::Refunded);
    }

    #[tokio::test]
    async fn test_update_missing_return() {
        let mut repo = MockReturnRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));
        repo.expect_update().never();

        let result = ReturnService::new(repo)
            .update_return(Uuid::now_v7(), UpdateReturn::default())
            .await;

        assert!(matches!(result, Err(CommerceError::ReturnNotFound(_))));
    }
}
