use crate::AppState;
use crate::api::error::AppError;
use crate::api::middleware::request_id::REQUEST_ID_HEADER;
use async_graphql::http::GraphiQLSource;
use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::Html,
};
use tracing::Instrument;

/// Executes a single GraphQL request.
pub async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let operation = request.operation_name.clone().unwrap_or_default();

    let span = tracing::debug_span!("graphql", %request_id, %operation);
    let response = state.schema.execute(request).instrument(span).await;

    if response.is_err() {
        tracing::debug!(
            "GraphQL request {} finished with {} error(s)",
            request_id,
            response.errors.len()
        );
    }

    Json(response)
}

/// Serves the GraphiQL IDE when enabled.
pub async fn graphiql(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    if !state.config.enable_graphiql {
        return Err(AppError::NotFound("GraphiQL is disabled".to_string()));
    }

    Ok(Html(GraphiQLSource::build().endpoint("/graphql").finish()))
}
