use tracing::instrument;
use uuid::Uuid;

use super::{ContentService, validate};
use crate::error::{ContentError, ContentResult};
use crate::models::{CreateDefaultImage, DefaultImage, DefaultImageFilter, UpdateDefaultImage};

impl ContentService {
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_default_image(
        &self,
        input: CreateDefaultImage,
    ) -> ContentResult<DefaultImage> {
        validate(&input)?;
        self.default_images.create(DefaultImage::new(input)).await
    }

    #[instrument(skip(self))]
    pub async fn get_default_image(&self, id: Uuid) -> ContentResult<DefaultImage> {
        self.default_images
            .get_by_id(id)
            .await?
            .ok_or(ContentError::DefaultImageNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_default_images(
        &self,
        filter: DefaultImageFilter,
    ) -> ContentResult<Vec<DefaultImage>> {
        self.default_images.list(filter).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_default_image(
        &self,
        id: Uuid,
        input: UpdateDefaultImage,
    ) -> ContentResult<DefaultImage> {
        validate(&input)?;
        let mut image = self.get_default_image(id).await?;
        image.apply_update(input);
        self.default_images.update(image).await
    }

    #[instrument(skip(self))]
    pub async fn delete_default_image(&self, id: Uuid) -> ContentResult<DefaultImage> {
        let image = self.get_default_image(id).await?;
        if !self.default_images.delete(id).await? {
            return Err(ContentError::DefaultImageNotFound(id));
        }
        Ok(image)
    }
}
