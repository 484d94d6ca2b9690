use crate::api::error::AppError;
use crate::entities::{actualities::ActualityStatus, videos::VideoSource};
use crate::utils::global_id::{self, decode_global_id, decode_global_ids};
use async_graphql::{ID, InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use validator::Validate;

/// Video descriptor submitted with an actuality preview.
#[derive(Debug, Clone, InputObject)]
pub struct VideoInput {
    /// Global id of an already stored video.
    pub id: Option<ID>,
    /// Platform specific id (e.g. the YouTube video id).
    pub video_id: Option<String>,
    pub link: Option<String>,
    pub source: VideoSource,
    pub thumbnail_link: Option<String>,
}

/// Input for the preview element rendered in the actuality card. Either
/// `previewPhotoId` or `video` has to be set.
#[derive(Debug, Clone, Default, InputObject)]
pub struct ActualityPreviewInput {
    pub preview_photo_id: Option<ID>,
    pub video: Option<VideoInput>,
}

#[derive(Debug, Clone, InputObject, Validate)]
pub struct ActualityInput {
    #[validate(
        custom(function = "crate::utils::validation::validate_not_blank"),
        length(min = 3, message = "Title must be at least 3 characters")
    )]
    pub title: String,
    pub active_since: DateTime<Utc>,
    pub active_to: Option<DateTime<Utc>>,
    pub sub_title: Option<String>,
    pub summary: Option<String>,
    pub text: Option<async_graphql::Json<serde_json::Value>>,
    pub cover_photo_id: Option<ID>,
    pub link: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: ActualityStatus,
    pub production_id: Option<ID>,
    pub is_pinned: bool,
    pub is_external: bool,
    /// kebab-case URL slug.
    #[validate(custom(function = "crate::utils::validation::validate_slug"))]
    pub slug: String,
    pub images: Option<Vec<ID>>,
    /// Used to render content in the actuality card.
    pub preview: ActualityPreviewInput,
}

/// Video descriptor after the key check. At least one of the three lookup
/// keys is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDescriptor {
    pub id: Option<i32>,
    pub video_id: Option<String>,
    pub link: Option<String>,
    pub source: VideoSource,
    pub thumbnail_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewChoice {
    Photo(i32),
    Video(VideoDescriptor),
}

/// A fully validated write with every global id decoded to a storage key.
#[derive(Debug, Clone)]
pub struct ActualityDraft {
    pub title: String,
    pub sub_title: String,
    pub summary: Option<String>,
    pub text: Option<serde_json::Value>,
    pub slug: String,
    pub link: Option<String>,
    pub status: ActualityStatus,
    pub is_pinned: bool,
    pub is_external: bool,
    pub active_since: DateTime<Utc>,
    pub active_to: Option<DateTime<Utc>>,
    pub cover_photo_id: Option<i32>,
    pub production_id: Option<i32>,
    pub tags: Vec<String>,
    pub image_ids: Vec<i32>,
    pub preview: PreviewChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, SimpleObject)]
pub struct Count {
    pub count: u64,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl VideoInput {
    pub fn into_descriptor(self) -> Result<VideoDescriptor, AppError> {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .map(|id| decode_global_id(global_id::VIDEO, &id))
            .transpose()?;
        let video_id = non_empty(self.video_id);
        let link = non_empty(self.link);

        if id.is_none() && video_id.is_none() && link.is_none() {
            return Err(AppError::VideoKeyMissing);
        }

        Ok(VideoDescriptor {
            id,
            video_id,
            link,
            source: self.source,
            thumbnail_link: non_empty(self.thumbnail_link),
        })
    }
}

impl ActualityPreviewInput {
    /// Exactly one of photo or video must be supplied.
    pub fn resolve(self) -> Result<PreviewChoice, AppError> {
        let photo = self.preview_photo_id.filter(|id| !id.is_empty());

        match (photo, self.video) {
            (None, None) => Err(AppError::PreviewMissing),
            (Some(_), Some(_)) => Err(AppError::PreviewAmbiguous),
            (Some(photo_id), None) => Ok(PreviewChoice::Photo(decode_global_id(
                global_id::PHOTO,
                &photo_id,
            )?)),
            (None, Some(video)) => Ok(PreviewChoice::Video(video.into_descriptor()?)),
        }
    }
}

impl ActualityInput {
    /// Runs every check that does not need the store. Nothing is written
    /// before this succeeds.
    pub fn into_draft(self) -> Result<ActualityDraft, AppError> {
        self.validate()?;

        let preview = self.preview.resolve()?;

        let cover_photo_id = self
            .cover_photo_id
            .filter(|id| !id.is_empty())
            .map(|id| decode_global_id(global_id::PHOTO, &id))
            .transpose()?;
        let production_id = self
            .production_id
            .filter(|id| !id.is_empty())
            .map(|id| decode_global_id(global_id::PRODUCTION, &id))
            .transpose()?;
        let image_ids = match self.images {
            Some(ids) => {
                let raw: Vec<String> = ids.into_iter().map(|id| id.0).collect();
                decode_global_ids(global_id::PHOTO, &raw)?
            }
            None => Vec::new(),
        };

        if let Some(active_to) = self.active_to {
            if active_to < self.active_since {
                return Err(AppError::validation(
                    "activeTo",
                    "activeTo must not be earlier than activeSince",
                ));
            }
        }

        Ok(ActualityDraft {
            title: self.title,
            sub_title: self.sub_title.unwrap_or_default(),
            summary: self.summary,
            text: self.text.map(|json| json.0),
            slug: self.slug,
            link: non_empty(self.link),
            status: self.status,
            is_pinned: self.is_pinned,
            is_external: self.is_external,
            active_since: self.active_since,
            active_to: self.active_to,
            cover_photo_id,
            production_id,
            tags: self.tags.unwrap_or_default(),
            image_ids,
            preview,
        })
    }
}
