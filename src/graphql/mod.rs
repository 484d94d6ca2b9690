pub mod mutation;
pub mod query;
pub mod types;

use crate::config::AppConfig;
use crate::services::actuality_service::ActualityService;
use async_graphql::{EmptySubscription, Schema};
use mutation::MutationRoot;
use query::QueryRoot;
use std::sync::Arc;

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the schema once at start-up; resolvers reach the service through
/// the schema data.
pub fn build_schema(service: Arc<ActualityService>, config: &AppConfig) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service)
        .limit_depth(config.graphql_depth_limit)
        .limit_complexity(config.graphql_complexity_limit)
        .finish()
}
