use tracing::instrument;
use uuid::Uuid;

use super::{ContentService, validate};
use crate::error::{ContentError, ContentResult};
use crate::models::{CreateVideo, UpdateVideo, Video, VideoFilter};

impl ContentService {
    #[instrument(skip(self, input), fields(product_id = %input.product_id))]
    pub async fn create_video(&self, input: CreateVideo) -> ContentResult<Video> {
        validate(&input)?;
        self.videos.create(Video::new(input)).await
    }

    #[instrument(skip(self))]
    pub async fn get_video(&self, id: Uuid) -> ContentResult<Video> {
        self.videos
            .get_by_id(id)
            .await?
            .ok_or(ContentError::VideoNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_videos(&self, filter: VideoFilter) -> ContentResult<Vec<Video>> {
        self.videos.list(filter).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_video(&self, id: Uuid, input: UpdateVideo) -> ContentResult<Video> {
        validate(&input)?;
        let mut video = self.get_video(id).await?;
        video.apply_update(input);
        self.videos.update(video).await
    }

    #[instrument(skip(self))]
    pub async fn delete_video(&self, id: Uuid) -> ContentResult<()> {
        if !self.videos.delete(id).await? {
            return Err(ContentError::VideoNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::Mocks;

    #[tokio::test]
    async fn test_deactivate_video() {
        let video = Video::new(CreateVideo {
            product_id: Uuid::now_v7(),
            video_url: "https://cdn.example.com/v/1.mp4".into(),
            caption: None,
            thumbnail: None,
            is_active: true,
        });
        let id = video.id;

        let mut mocks = Mocks::default();
        mocks
            .videos
            .expect_get_by_id()
            .returning(move |_| Ok(Some(video.clone())));
        mocks.videos.expect_update().returning(Ok);

        let updated = mocks
            .into_service()
            .update_video(
                id,
                UpdateVideo {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(!updated.is_active);
        assert_eq!(updated.video_url, "https://cdn.example.com/v/1.mp4");
    }

    #[tokio::test]
    async fn test_delete_missing_video() {
        let mut mocks = Mocks::default();
        mocks.videos.expect_delete().returning(|_| Ok(false));

        let result = mocks.into_service().delete_video(Uuid::now_v7()).await;
        assert!(matches!(result, Err(ContentError::VideoNotFound(_))));
    }
}
