use crate::api::error::AppError;
use crate::config::AppConfig;
use crate::entities::{actualities, actualities::ActualityStatus, photos, productions, tags, videos};
use crate::models::actuality_model::{ActualityInput, Count};
use crate::services::actuality_repository::{ActualityFilter, ActualityRepository};
use crate::services::pagination::{Page, PageRequest};
use crate::utils::keyed_mutex::KeyedMutex;
use std::sync::Arc;
use tracing::{debug, info};

/// Actuality use cases shared by every resolver.
///
/// Writes on a single actuality are serialized through a per-id lock, and
/// each write runs in one store transaction, so two concurrent updates of
/// the same item cannot interleave their relation changes.
pub struct ActualityService {
    repo: Arc<dyn ActualityRepository>,
    locks: KeyedMutex<i32>,
    default_page_size: u64,
    max_page_size: u64,
}

impl ActualityService {
    pub fn new(repo: Arc<dyn ActualityRepository>, config: &AppConfig) -> Self {
        Self {
            repo,
            locks: KeyedMutex::new(),
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        }
    }

    pub fn page_request(
        &self,
        first: Option<i32>,
        after: Option<&str>,
    ) -> Result<PageRequest, AppError> {
        PageRequest::from_args(first, after, self.default_page_size, self.max_page_size)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<actualities::Model, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::ActualityNotFound)
    }

    /// Published item by slug. Drafts and expired items read as missing.
    pub async fn get_published_by_slug(&self, slug: &str) -> Result<actualities::Model, AppError> {
        self.repo
            .find_by_slug(slug, true)
            .await?
            .ok_or(AppError::ActualityNotFound)
    }

    pub async fn list(
        &self,
        filter: &ActualityFilter,
        request: &PageRequest,
    ) -> Result<Page<actualities::Model>, AppError> {
        debug!(
            "Listing actualities (first: {}, after: {}, published_only: {})",
            request.first,
            request.after.is_some(),
            filter.published_only
        );
        self.repo.find_page(filter, request).await
    }

    /// Published items sharing a tag with the given set, ordered like every
    /// other listing. An empty tag set yields an empty page.
    pub async fn related_by_tags(
        &self,
        tag_ids: Vec<i32>,
        ignored_id: Option<i32>,
        request: &PageRequest,
    ) -> Result<Page<actualities::Model>, AppError> {
        if tag_ids.is_empty() {
            return Ok(Page::empty());
        }

        let filter = ActualityFilter {
            published_only: true,
            tag_ids: Some(tag_ids),
            exclude_id: ignored_id,
            search: None,
        };
        self.repo.find_page(&filter, request).await
    }

    pub async fn search(
        &self,
        term: &str,
        request: &PageRequest,
    ) -> Result<Page<actualities::Model>, AppError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Page::empty());
        }

        let filter = ActualityFilter {
            search: Some(term.to_string()),
            ..ActualityFilter::published()
        };
        self.repo.find_page(&filter, request).await
    }

    pub async fn create(&self, input: ActualityInput) -> Result<actualities::Model, AppError> {
        let draft = input.into_draft()?;
        let slug = draft.slug.clone();

        let created = self.repo.create(draft).await?;
        info!("📰 Actuality created: {} (id: {})", slug, created.id);
        Ok(created)
    }

    pub async fn update(
        &self,
        id: i32,
        input: ActualityInput,
    ) -> Result<actualities::Model, AppError> {
        let draft = input.into_draft()?;

        let guard = self.locks.lock(&id).await;
        let result = self.repo.update(id, draft).await;
        drop(guard);
        self.locks.cleanup();

        let updated = result?;
        info!("✏️ Actuality updated: {} (id: {})", updated.slug, id);
        Ok(updated)
    }

    /// ACTIVE when `is_active`, INACTIVE otherwise.
    pub async fn set_active_state(
        &self,
        id: i32,
        is_active: bool,
    ) -> Result<actualities::Model, AppError> {
        let status = status_for(is_active);

        let guard = self.locks.lock(&id).await;
        let result = self.repo.set_status(id, status).await;
        drop(guard);
        self.locks.cleanup();

        let updated = result?;
        info!("Actuality {} status set to {:?}", id, status);
        Ok(updated)
    }

    pub async fn set_pinned_state(
        &self,
        id: i32,
        is_pinned: bool,
    ) -> Result<actualities::Model, AppError> {
        let guard = self.locks.lock(&id).await;
        let result = self.repo.set_pinned(id, is_pinned).await;
        drop(guard);
        self.locks.cleanup();

        let updated = result?;
        info!("Actuality {} pinned: {}", id, is_pinned);
        Ok(updated)
    }

    /// Bulk status change. Unknown ids are skipped and not counted.
    pub async fn set_many_active_state(
        &self,
        ids: &[i32],
        is_active: bool,
    ) -> Result<Count, AppError> {
        let status = status_for(is_active);
        let count = self.repo.set_status_many(ids, status).await?;
        info!(
            "Bulk status change to {:?}: {} of {} actualities",
            status,
            count,
            ids.len()
        );
        Ok(Count { count })
    }

    pub async fn delete(&self, id: i32) -> Result<actualities::Model, AppError> {
        let guard = self.locks.lock(&id).await;
        let result = self.repo.delete(id).await;
        drop(guard);
        self.locks.cleanup();

        let deleted = result?;
        info!("🗑️ Actuality deleted: {} (id: {})", deleted.slug, id);
        Ok(deleted)
    }

    pub async fn tags_of(&self, actuality_id: i32) -> Result<Vec<tags::Model>, AppError> {
        self.repo.tags_of(actuality_id).await
    }

    pub async fn images_of(&self, actuality_id: i32) -> Result<Vec<photos::Model>, AppError> {
        self.repo.images_of(actuality_id).await
    }

    pub async fn photo(&self, id: Option<i32>) -> Result<Option<photos::Model>, AppError> {
        match id {
            Some(id) => self.repo.photo(id).await,
            None => Ok(None),
        }
    }

    pub async fn video(&self, id: Option<i32>) -> Result<Option<videos::Model>, AppError> {
        match id {
            Some(id) => self.repo.video(id).await,
            None => Ok(None),
        }
    }

    pub async fn production(&self, id: Option<i32>) -> Result<Option<productions::Model>, AppError> {
        match id {
            Some(id) => self.repo.production(id).await,
            None => Ok(None),
        }
    }
}

fn status_for(is_active: bool) -> ActualityStatus {
    if is_active {
        ActualityStatus::Active
    } else {
        ActualityStatus::Inactive
    }
}
