use crate::graphql::types::{ActualityNode, service};
use crate::models::actuality_model::{ActualityInput, Count};
use crate::utils::global_id::{self, decode_global_id, decode_global_ids};
use async_graphql::{Context, ID, Object, Result, ResultExt};

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_actuality(
        &self,
        ctx: &Context<'_>,
        input: ActualityInput,
    ) -> Result<ActualityNode> {
        let created = service(ctx)?.create(input).await.extend()?;
        Ok(ActualityNode(created))
    }

    async fn update_actuality(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: ActualityInput,
    ) -> Result<ActualityNode> {
        let id = decode_global_id(global_id::ACTUALITY, &id).extend()?;
        let updated = service(ctx)?.update(id, input).await.extend()?;
        Ok(ActualityNode(updated))
    }

    async fn set_actuality_active_state(
        &self,
        ctx: &Context<'_>,
        id: ID,
        is_active: bool,
    ) -> Result<ActualityNode> {
        let id = decode_global_id(global_id::ACTUALITY, &id).extend()?;
        let updated = service(ctx)?
            .set_active_state(id, is_active)
            .await
            .extend()?;
        Ok(ActualityNode(updated))
    }

    async fn set_actuality_pinned_state(
        &self,
        ctx: &Context<'_>,
        id: ID,
        is_pinned: bool,
    ) -> Result<ActualityNode> {
        let id = decode_global_id(global_id::ACTUALITY, &id).extend()?;
        let updated = service(ctx)?
            .set_pinned_state(id, is_pinned)
            .await
            .extend()?;
        Ok(ActualityNode(updated))
    }

    async fn set_many_actualities_state(
        &self,
        ctx: &Context<'_>,
        id_list: Vec<ID>,
        is_active: bool,
    ) -> Result<Count> {
        let raw: Vec<String> = id_list.into_iter().map(|id| id.0).collect();
        let ids = decode_global_ids(global_id::ACTUALITY, &raw).extend()?;
        service(ctx)?
            .set_many_active_state(&ids, is_active)
            .await
            .extend()
    }

    async fn delete_actuality(&self, ctx: &Context<'_>, id: ID) -> Result<ActualityNode> {
        let id = decode_global_id(global_id::ACTUALITY, &id).extend()?;
        let deleted = service(ctx)?.delete(id).await.extend()?;
        Ok(ActualityNode(deleted))
    }
}
