use crate::entities::{actualities, actualities::ActualityStatus, photos, productions, tags, videos};
use crate::services::actuality_service::ActualityService;
use crate::services::pagination::Page;
use crate::services::preview::{CardContext, LinkTarget, PreviewRender, resolve_link, select_preview};
use crate::utils::global_id::{self, encode_global_id};
use async_graphql::connection::{Connection, Edge};
use async_graphql::{Context, ID, Json, Object, Result, ResultExt, SimpleObject, Union};
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub type ActualityConnection = Connection<String, ActualityNode>;

pub(crate) fn service<'a>(ctx: &Context<'a>) -> Result<&'a Arc<ActualityService>> {
    ctx.data::<Arc<ActualityService>>()
}

pub fn to_connection(page: Page<actualities::Model>) -> ActualityConnection {
    let mut connection = Connection::new(page.has_previous_page, page.has_next_page);
    connection.edges.extend(
        page.edges
            .into_iter()
            .map(|edge| Edge::new(edge.cursor, ActualityNode(edge.node))),
    );
    connection
}

pub struct ActualityNode(pub actualities::Model);

#[Object(name = "Actuality")]
impl ActualityNode {
    async fn id(&self) -> ID {
        ID(encode_global_id(global_id::ACTUALITY, self.0.id))
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn sub_title(&self) -> &str {
        &self.0.sub_title
    }

    async fn summary(&self) -> Option<&str> {
        self.0.summary.as_deref()
    }

    /// Rich text document as stored by the editor.
    async fn text(&self) -> Option<Json<serde_json::Value>> {
        self.0.text.clone().map(Json)
    }

    async fn slug(&self) -> &str {
        &self.0.slug
    }

    async fn link(&self) -> Option<&str> {
        self.0.link.as_deref()
    }

    async fn status(&self) -> ActualityStatus {
        self.0.status
    }

    async fn is_pinned(&self) -> bool {
        self.0.is_pinned
    }

    async fn is_external(&self) -> bool {
        self.0.is_external
    }

    async fn active_since(&self) -> DateTime<Utc> {
        self.0.active_since
    }

    async fn active_to(&self) -> Option<DateTime<Utc>> {
        self.0.active_to
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }

    async fn cover_photo(&self, ctx: &Context<'_>) -> Result<Option<PhotoNode>> {
        let photo = service(ctx)?.photo(self.0.cover_photo_id).await.extend()?;
        Ok(photo.map(PhotoNode))
    }

    async fn preview_photo(&self, ctx: &Context<'_>) -> Result<Option<PhotoNode>> {
        let photo = service(ctx)?
            .photo(self.0.preview_photo_id)
            .await
            .extend()?;
        Ok(photo.map(PhotoNode))
    }

    async fn video(&self, ctx: &Context<'_>) -> Result<Option<VideoNode>> {
        let video = service(ctx)?.video(self.0.video_id).await.extend()?;
        Ok(video.map(VideoNode))
    }

    async fn production(&self, ctx: &Context<'_>) -> Result<Option<ProductionNode>> {
        let production = service(ctx)?
            .production(self.0.production_id)
            .await
            .extend()?;
        Ok(production.map(ProductionNode))
    }

    /// Gallery images.
    async fn images(&self, ctx: &Context<'_>) -> Result<Vec<PhotoNode>> {
        let images = service(ctx)?.images_of(self.0.id).await.extend()?;
        Ok(images.into_iter().map(PhotoNode).collect())
    }

    /// Tags ordered by name.
    async fn tags(&self, ctx: &Context<'_>) -> Result<Vec<TagNode>> {
        let tags = service(ctx)?.tags_of(self.0.id).await.extend()?;
        Ok(tags.into_iter().map(TagNode).collect())
    }

    /// The media shown on the listing card, or null when the item has none.
    async fn preview(&self, ctx: &Context<'_>) -> Result<Option<ActualityPreview>> {
        let service = service(ctx)?;
        let video = service.video(self.0.video_id).await.extend()?;
        let preview_photo = service.photo(self.0.preview_photo_id).await.extend()?;
        let cover_photo = service.photo(self.0.cover_photo_id).await.extend()?;

        let card = CardContext {
            is_external: self.0.is_external,
            is_pinned: self.0.is_pinned,
            link: self.0.link.as_deref(),
            slug: &self.0.slug,
        };

        Ok(
            select_preview(video.as_ref(), preview_photo.as_ref(), cover_photo.as_ref())
                .map(|source| source.render(&card, video.as_ref()).into()),
        )
    }

    /// Where the card navigates to; null when it is not clickable.
    async fn href(&self) -> Option<String> {
        resolve_link(self.0.is_external, self.0.link.as_deref(), &self.0.slug)
            .map(|target| target.href().to_string())
    }
}

pub struct PhotoNode(pub photos::Model);

#[Object(name = "Photo")]
impl PhotoNode {
    async fn id(&self) -> ID {
        ID(encode_global_id(global_id::PHOTO, self.0.id))
    }

    async fn link(&self) -> &str {
        &self.0.link
    }

    async fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }
}

pub struct VideoNode(pub videos::Model);

#[Object(name = "Video")]
impl VideoNode {
    async fn id(&self) -> ID {
        ID(encode_global_id(global_id::VIDEO, self.0.id))
    }

    async fn source(&self) -> videos::VideoSource {
        self.0.source
    }

    async fn video_id(&self) -> Option<&str> {
        self.0.video_id.as_deref()
    }

    async fn link(&self) -> Option<&str> {
        self.0.link.as_deref()
    }

    async fn thumbnail_link(&self) -> Option<&str> {
        self.0.thumbnail_link.as_deref()
    }
}

pub struct TagNode(pub tags::Model);

#[Object(name = "Tag")]
impl TagNode {
    async fn id(&self) -> ID {
        ID(encode_global_id(global_id::TAG, self.0.id))
    }

    async fn name(&self) -> &str {
        &self.0.name
    }
}

pub struct ProductionNode(pub productions::Model);

#[Object(name = "Production")]
impl ProductionNode {
    async fn id(&self) -> ID {
        ID(encode_global_id(global_id::PRODUCTION, self.0.id))
    }

    async fn name(&self) -> &str {
        &self.0.name
    }
}

#[derive(SimpleObject)]
pub struct ImagePreview {
    pub src: String,
    pub alt: String,
    pub href: Option<String>,
    pub is_external_link: bool,
    pub is_pinned: bool,
}

#[derive(SimpleObject)]
pub struct YouTubePreview {
    pub embed_url: String,
    pub video_id: Option<String>,
    pub is_pinned: bool,
}

#[derive(SimpleObject)]
pub struct HostedVideoPreview {
    pub link: Option<String>,
    pub thumbnail_link: Option<String>,
    pub is_pinned: bool,
}

#[derive(Union)]
pub enum ActualityPreview {
    Image(ImagePreview),
    YouTube(YouTubePreview),
    HostedVideo(HostedVideoPreview),
}

impl From<PreviewRender> for ActualityPreview {
    fn from(render: PreviewRender) -> Self {
        match render {
            PreviewRender::Image {
                src,
                alt,
                target,
                is_pinned,
            } => ActualityPreview::Image(ImagePreview {
                src,
                alt,
                is_external_link: matches!(target, Some(LinkTarget::External(_))),
                href: target.map(|t| t.href().to_string()),
                is_pinned,
            }),
            PreviewRender::YouTube {
                embed_url,
                video_id,
                is_pinned,
            } => ActualityPreview::YouTube(YouTubePreview {
                embed_url,
                video_id,
                is_pinned,
            }),
            PreviewRender::HostedVideo {
                link,
                thumbnail_link,
                is_pinned,
            } => ActualityPreview::HostedVideo(HostedVideoPreview {
                link,
                thumbnail_link,
                is_pinned,
            }),
        }
    }
}
