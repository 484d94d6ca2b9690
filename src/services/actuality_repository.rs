use crate::api::error::AppError;
use crate::entities::actualities::ActualityStatus;
use crate::entities::{prelude::*, *};
use crate::models::actuality_model::{ActualityDraft, PreviewChoice, VideoDescriptor};
use crate::services::pagination::{ActualityCursor, Page, PageRequest};
use crate::services::reconciler::{RelationDelta, reconcile_images, reconcile_tags};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    TransactionTrait,
    sea_query::{Expr, Func, LikeExpr, Query},
};

/// Filters applied to a listing before ordering and pagination.
#[derive(Debug, Clone, Default)]
pub struct ActualityFilter {
    /// Only active items inside their publication window.
    pub published_only: bool,
    /// Items carrying at least one of these tags.
    pub tag_ids: Option<Vec<i32>>,
    pub exclude_id: Option<i32>,
    /// Case-insensitive substring of title or summary.
    pub search: Option<String>,
}

impl ActualityFilter {
    pub fn published() -> Self {
        Self {
            published_only: true,
            ..Default::default()
        }
    }
}

/// Storage seam for actualities and the media/tags attached to them.
#[async_trait]
pub trait ActualityRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<actualities::Model>, AppError>;

    async fn find_by_slug(
        &self,
        slug: &str,
        published_only: bool,
    ) -> Result<Option<actualities::Model>, AppError>;

    async fn find_page(
        &self,
        filter: &ActualityFilter,
        request: &PageRequest,
    ) -> Result<Page<actualities::Model>, AppError>;

    /// Resolves a descriptor to one stored video, creating it when no key
    /// matches.
    async fn upsert_video(&self, descriptor: &VideoDescriptor) -> Result<videos::Model, AppError>;

    /// Makes the tag and image associations of `actuality_id` equal to the
    /// desired sets.
    async fn reconcile_relations(
        &self,
        actuality_id: i32,
        tags: &[String],
        image_ids: &[i32],
    ) -> Result<(RelationDelta<String>, RelationDelta<i32>), AppError>;

    async fn create(&self, draft: ActualityDraft) -> Result<actualities::Model, AppError>;

    async fn update(&self, id: i32, draft: ActualityDraft) -> Result<actualities::Model, AppError>;

    async fn set_pinned(&self, id: i32, is_pinned: bool) -> Result<actualities::Model, AppError>;

    async fn set_status(
        &self,
        id: i32,
        status: ActualityStatus,
    ) -> Result<actualities::Model, AppError>;

    async fn set_status_many(&self, ids: &[i32], status: ActualityStatus) -> Result<u64, AppError>;

    async fn delete(&self, id: i32) -> Result<actualities::Model, AppError>;

    async fn tags_of(&self, actuality_id: i32) -> Result<Vec<tags::Model>, AppError>;

    async fn images_of(&self, actuality_id: i32) -> Result<Vec<photos::Model>, AppError>;

    async fn photo(&self, id: i32) -> Result<Option<photos::Model>, AppError>;

    async fn video(&self, id: i32) -> Result<Option<videos::Model>, AppError>;

    async fn production(&self, id: i32) -> Result<Option<productions::Model>, AppError>;
}

pub struct SeaOrmActualityRepository {
    db: DatabaseConnection,
}

impl SeaOrmActualityRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn cursor_of(model: &actualities::Model) -> ActualityCursor {
    ActualityCursor::new(model.is_pinned, model.active_since, model.id)
}

fn filter_condition(filter: &ActualityFilter) -> Condition {
    let mut cond = Condition::all();

    if filter.published_only {
        let now = Utc::now();
        cond = cond
            .add(actualities::Column::Status.eq(ActualityStatus::Active))
            .add(actualities::Column::ActiveSince.lte(now))
            .add(
                Condition::any()
                    .add(actualities::Column::ActiveTo.is_null())
                    .add(actualities::Column::ActiveTo.gt(now)),
            );
    }

    if let Some(ref tag_ids) = filter.tag_ids {
        cond = cond.add(
            actualities::Column::Id.in_subquery(
                Query::select()
                    .column(actuality_tags::Column::ActualityId)
                    .from(ActualityTags)
                    .and_where(actuality_tags::Column::TagId.is_in(tag_ids.clone()))
                    .to_owned(),
            ),
        );
    }

    if let Some(id) = filter.exclude_id {
        cond = cond.add(actualities::Column::Id.ne(id));
    }

    if let Some(ref search) = filter.search {
        let pattern = contains_pattern(search);
        cond = cond.add(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col(actualities::Column::Title)))
                        .like(LikeExpr::new(pattern.as_str()).escape('\\')),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col(actualities::Column::Summary)))
                        .like(LikeExpr::new(pattern.as_str()).escape('\\')),
                ),
        );
    }

    cond
}

/// Lower-cased `%term%` with the LIKE wildcards of `term` escaped by `\`.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.trim().to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

// Rows strictly after the cursor in (is_pinned DESC, active_since DESC, id DESC).
fn after_cursor(cursor: &ActualityCursor) -> Condition {
    Condition::any()
        .add(actualities::Column::IsPinned.lt(cursor.is_pinned))
        .add(
            Condition::all()
                .add(actualities::Column::IsPinned.eq(cursor.is_pinned))
                .add(actualities::Column::ActiveSince.lt(cursor.active_since)),
        )
        .add(
            Condition::all()
                .add(actualities::Column::IsPinned.eq(cursor.is_pinned))
                .add(actualities::Column::ActiveSince.eq(cursor.active_since))
                .add(actualities::Column::Id.lt(cursor.id)),
        )
}

async fn upsert_video_in<C: ConnectionTrait>(
    conn: &C,
    descriptor: &VideoDescriptor,
) -> Result<videos::Model, AppError> {
    if let Some(id) = descriptor.id {
        if let Some(found) = Videos::find_by_id(id).one(conn).await? {
            return Ok(found);
        }
    }
    if let Some(ref video_id) = descriptor.video_id {
        if let Some(found) = Videos::find()
            .filter(videos::Column::Source.eq(descriptor.source))
            .filter(videos::Column::VideoId.eq(video_id))
            .one(conn)
            .await?
        {
            return Ok(found);
        }
    }
    if let Some(ref link) = descriptor.link {
        if let Some(found) = Videos::find()
            .filter(videos::Column::Link.eq(link))
            .one(conn)
            .await?
        {
            return Ok(found);
        }
    }

    if descriptor.video_id.is_none() && descriptor.link.is_none() {
        // An id that matched nothing leaves no natural key to create from.
        return Err(AppError::VideoKeyMissing);
    }

    tracing::debug!(
        "Creating video row (source: {:?}, video_id: {:?})",
        descriptor.source,
        descriptor.video_id
    );

    let video = videos::ActiveModel {
        source: Set(descriptor.source),
        video_id: Set(descriptor.video_id.clone()),
        link: Set(descriptor.link.clone()),
        thumbnail_link: Set(descriptor.thumbnail_link.clone()),
        ..Default::default()
    };
    Ok(video.insert(conn).await?)
}

async fn find_or_create_tag<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<tags::Model, AppError> {
    if let Some(tag) = Tags::find()
        .filter(tags::Column::Name.eq(name))
        .one(conn)
        .await?
    {
        return Ok(tag);
    }

    let new_tag = tags::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    };
    Ok(new_tag.insert(conn).await?)
}

async fn reconcile_relations_in<C: ConnectionTrait>(
    conn: &C,
    actuality_id: i32,
    desired_tags: &[String],
    desired_images: &[i32],
) -> Result<(RelationDelta<String>, RelationDelta<i32>), AppError> {
    let current_tags: Vec<tags::Model> = Tags::find()
        .join(JoinType::InnerJoin, tags::Relation::ActualityTags.def())
        .filter(actuality_tags::Column::ActualityId.eq(actuality_id))
        .all(conn)
        .await?;
    let current_images: Vec<i32> = ActualityImages::find()
        .filter(actuality_images::Column::ActualityId.eq(actuality_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|link| link.photo_id)
        .collect();

    let tag_delta = reconcile_tags(
        current_tags.iter().map(|t| t.name.as_str()),
        desired_tags.iter().map(String::as_str),
    );
    let image_delta = reconcile_images(current_images, desired_images.iter().copied());

    if !tag_delta.to_disconnect.is_empty() {
        let ids: Vec<i32> = current_tags
            .iter()
            .filter(|t| tag_delta.to_disconnect.contains(&t.name))
            .map(|t| t.id)
            .collect();
        ActualityTags::delete_many()
            .filter(actuality_tags::Column::ActualityId.eq(actuality_id))
            .filter(actuality_tags::Column::TagId.is_in(ids))
            .exec(conn)
            .await?;
    }

    for name in &tag_delta.to_connect {
        let tag = find_or_create_tag(conn, name).await?;
        actuality_tags::ActiveModel {
            actuality_id: Set(actuality_id),
            tag_id: Set(tag.id),
        }
        .insert(conn)
        .await?;
    }

    if !image_delta.to_disconnect.is_empty() {
        ActualityImages::delete_many()
            .filter(actuality_images::Column::ActualityId.eq(actuality_id))
            .filter(actuality_images::Column::PhotoId.is_in(image_delta.to_disconnect.clone()))
            .exec(conn)
            .await?;
    }

    if !image_delta.to_connect.is_empty() {
        let existing = Photos::find()
            .filter(photos::Column::Id.is_in(image_delta.to_connect.clone()))
            .count(conn)
            .await?;
        if existing != image_delta.to_connect.len() as u64 {
            return Err(AppError::validation("images", "Some images do not exist"));
        }

        for photo_id in &image_delta.to_connect {
            actuality_images::ActiveModel {
                actuality_id: Set(actuality_id),
                photo_id: Set(*photo_id),
            }
            .insert(conn)
            .await?;
        }
    }

    Ok((tag_delta, image_delta))
}

/// Resolves the preview to `(preview_photo_id, video_id)`; exactly one is set.
async fn resolve_preview_in<C: ConnectionTrait>(
    conn: &C,
    preview: &PreviewChoice,
) -> Result<(Option<i32>, Option<i32>), AppError> {
    match preview {
        PreviewChoice::Photo(photo_id) => Ok((Some(*photo_id), None)),
        PreviewChoice::Video(descriptor) => {
            let video = upsert_video_in(conn, descriptor).await?;
            Ok((None, Some(video.id)))
        }
    }
}

fn apply_draft(active: &mut actualities::ActiveModel, draft: &ActualityDraft) {
    active.title = Set(draft.title.clone());
    active.sub_title = Set(draft.sub_title.clone());
    active.summary = Set(draft.summary.clone());
    active.text = Set(draft.text.clone());
    active.slug = Set(draft.slug.clone());
    active.link = Set(draft.link.clone());
    active.status = Set(draft.status);
    active.is_pinned = Set(draft.is_pinned);
    active.is_external = Set(draft.is_external);
    active.active_since = Set(draft.active_since);
    active.active_to = Set(draft.active_to);
    active.cover_photo_id = Set(draft.cover_photo_id);
    active.production_id = Set(draft.production_id);
    active.updated_at = Set(Utc::now());
}

#[async_trait]
impl ActualityRepository for SeaOrmActualityRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<actualities::Model>, AppError> {
        Ok(Actualities::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_slug(
        &self,
        slug: &str,
        published_only: bool,
    ) -> Result<Option<actualities::Model>, AppError> {
        let filter = ActualityFilter {
            published_only,
            ..Default::default()
        };
        Ok(Actualities::find()
            .filter(filter_condition(&filter))
            .filter(actualities::Column::Slug.eq(slug))
            .one(&self.db)
            .await?)
    }

    async fn find_page(
        &self,
        filter: &ActualityFilter,
        request: &PageRequest,
    ) -> Result<Page<actualities::Model>, AppError> {
        let mut select = Actualities::find().filter(filter_condition(filter));

        if let Some(ref cursor) = request.after {
            select = select.filter(after_cursor(cursor));
        }

        let rows = select
            .order_by_desc(actualities::Column::IsPinned)
            .order_by_desc(actualities::Column::ActiveSince)
            .order_by_desc(actualities::Column::Id)
            .limit(request.first + 1)
            .all(&self.db)
            .await?;

        Ok(Page::from_rows(rows, request, cursor_of))
    }

    async fn upsert_video(&self, descriptor: &VideoDescriptor) -> Result<videos::Model, AppError> {
        upsert_video_in(&self.db, descriptor).await
    }

    async fn reconcile_relations(
        &self,
        actuality_id: i32,
        tags: &[String],
        image_ids: &[i32],
    ) -> Result<(RelationDelta<String>, RelationDelta<i32>), AppError> {
        let txn = self.db.begin().await?;
        let deltas = reconcile_relations_in(&txn, actuality_id, tags, image_ids).await?;
        txn.commit().await?;
        Ok(deltas)
    }

    async fn create(&self, draft: ActualityDraft) -> Result<actualities::Model, AppError> {
        let txn = self.db.begin().await?;

        let (preview_photo_id, video_id) = resolve_preview_in(&txn, &draft.preview).await?;

        let now = Utc::now();
        let mut active = actualities::ActiveModel {
            preview_photo_id: Set(preview_photo_id),
            video_id: Set(video_id),
            created_at: Set(now),
            ..Default::default()
        };
        apply_draft(&mut active, &draft);

        let saved = active
            .insert(&txn)
            .await
            .map_err(|e| AppError::from_store(e, AppError::ActualityAlreadyExists))?;

        reconcile_relations_in(&txn, saved.id, &draft.tags, &draft.image_ids).await?;

        txn.commit().await?;
        Ok(saved)
    }

    async fn update(&self, id: i32, draft: ActualityDraft) -> Result<actualities::Model, AppError> {
        let txn = self.db.begin().await?;

        let existing = Actualities::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(AppError::ActualityNotFound)?;

        let (preview_photo_id, video_id) = resolve_preview_in(&txn, &draft.preview).await?;

        let mut active: actualities::ActiveModel = existing.into();
        apply_draft(&mut active, &draft);
        active.preview_photo_id = Set(preview_photo_id);
        active.video_id = Set(video_id);

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| AppError::from_store(e, AppError::ActualityAlreadyExists))?;

        reconcile_relations_in(&txn, id, &draft.tags, &draft.image_ids).await?;

        txn.commit().await?;
        Ok(updated)
    }

    async fn set_pinned(&self, id: i32, is_pinned: bool) -> Result<actualities::Model, AppError> {
        let existing = Actualities::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::ActualityNotFound)?;

        let mut active: actualities::ActiveModel = existing.into();
        active.is_pinned = Set(is_pinned);
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    async fn set_status(
        &self,
        id: i32,
        status: ActualityStatus,
    ) -> Result<actualities::Model, AppError> {
        let existing = Actualities::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::ActualityNotFound)?;

        let mut active: actualities::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    async fn set_status_many(&self, ids: &[i32], status: ActualityStatus) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = Actualities::update_many()
            .col_expr(actualities::Column::Status, Expr::value(status))
            .col_expr(actualities::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(actualities::Column::Id.is_in(ids.to_vec()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete(&self, id: i32) -> Result<actualities::Model, AppError> {
        let txn = self.db.begin().await?;

        let existing = Actualities::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(AppError::ActualityNotFound)?;

        // Join rows go with the actuality; tags, photos and videos stay.
        ActualityTags::delete_many()
            .filter(actuality_tags::Column::ActualityId.eq(id))
            .exec(&txn)
            .await?;
        ActualityImages::delete_many()
            .filter(actuality_images::Column::ActualityId.eq(id))
            .exec(&txn)
            .await?;
        Actualities::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(existing)
    }

    async fn tags_of(&self, actuality_id: i32) -> Result<Vec<tags::Model>, AppError> {
        Ok(Tags::find()
            .join(JoinType::InnerJoin, tags::Relation::ActualityTags.def())
            .filter(actuality_tags::Column::ActualityId.eq(actuality_id))
            .order_by_asc(tags::Column::Name)
            .all(&self.db)
            .await?)
    }

    async fn images_of(&self, actuality_id: i32) -> Result<Vec<photos::Model>, AppError> {
        Ok(Photos::find()
            .join(JoinType::InnerJoin, photos::Relation::ActualityImages.def())
            .filter(actuality_images::Column::ActualityId.eq(actuality_id))
            .order_by_asc(photos::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn photo(&self, id: i32) -> Result<Option<photos::Model>, AppError> {
        Ok(Photos::find_by_id(id).one(&self.db).await?)
    }

    async fn video(&self, id: i32) -> Result<Option<videos::Model>, AppError> {
        Ok(Videos::find_by_id(id).one(&self.db).await?)
    }

    async fn production(&self, id: i32) -> Result<Option<productions::Model>, AppError> {
        Ok(Productions::find_by_id(id).one(&self.db).await?)
    }
}
