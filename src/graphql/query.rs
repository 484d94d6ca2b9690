use crate::graphql::types::{ActualityConnection, ActualityNode, service, to_connection};
use crate::services::actuality_repository::ActualityFilter;
use crate::utils::global_id::{self, decode_global_id};
use async_graphql::{Context, ID, Object, Result, ResultExt};

fn decode_tag_ids(tag_ids: &[ID]) -> Result<Vec<i32>> {
    tag_ids
        .iter()
        .map(|id| decode_global_id(global_id::TAG, id).extend())
        .collect()
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn get_actuality_by_id(&self, ctx: &Context<'_>, id: ID) -> Result<ActualityNode> {
        let id = decode_global_id(global_id::ACTUALITY, &id).extend()?;
        let actuality = service(ctx)?.get_by_id(id).await.extend()?;
        Ok(ActualityNode(actuality))
    }

    /// Administration listing over every status.
    async fn get_actualities(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<ActualityConnection> {
        let service = service(ctx)?;
        let request = service.page_request(first, after.as_deref()).extend()?;
        let page = service
            .list(&ActualityFilter::default(), &request)
            .await
            .extend()?;
        Ok(to_connection(page))
    }

    /// Public listing: active items inside their publication window.
    async fn actuality_list_web(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<ActualityConnection> {
        let service = service(ctx)?;
        let request = service.page_request(first, after.as_deref()).extend()?;
        let page = service
            .list(&ActualityFilter::published(), &request)
            .await
            .extend()?;
        Ok(to_connection(page))
    }

    async fn actuality_detail_by_slug(
        &self,
        ctx: &Context<'_>,
        slug: String,
    ) -> Result<ActualityNode> {
        let actuality = service(ctx)?
            .get_published_by_slug(&slug)
            .await
            .extend()?;
        Ok(ActualityNode(actuality))
    }

    async fn related_actualities_by_tags(
        &self,
        ctx: &Context<'_>,
        tag_ids: Vec<ID>,
        ignored_actuality_id: Option<ID>,
        first: Option<i32>,
    ) -> Result<ActualityConnection> {
        let service = service(ctx)?;
        let tag_ids = decode_tag_ids(&tag_ids)?;
        let ignored = ignored_actuality_id
            .map(|id| decode_global_id(global_id::ACTUALITY, &id))
            .transpose()
            .extend()?;
        let request = service.page_request(first, None).extend()?;

        let page = service
            .related_by_tags(tag_ids, ignored, &request)
            .await
            .extend()?;
        Ok(to_connection(page))
    }

    async fn actuality_search_by_tags_web(
        &self,
        ctx: &Context<'_>,
        tag_ids: Vec<ID>,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<ActualityConnection> {
        let service = service(ctx)?;
        let tag_ids = decode_tag_ids(&tag_ids)?;
        let request = service.page_request(first, after.as_deref()).extend()?;

        let page = service
            .related_by_tags(tag_ids, None, &request)
            .await
            .extend()?;
        Ok(to_connection(page))
    }

    async fn actuality_text_search_list_web(
        &self,
        ctx: &Context<'_>,
        search: String,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<ActualityConnection> {
        let service = service(ctx)?;
        let request = service.page_request(first, after.as_deref()).extend()?;
        let page = service.search(&search, &request).await.extend()?;
        Ok(to_connection(page))
    }
}
