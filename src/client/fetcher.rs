use super::{ClientError, FeedItem, FeedPage, PageFetcher};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

const CARD_FIELDS: &str = "edges { cursor node { id title slug summary href isPinned activeSince } } pageInfo { hasNextPage endCursor }";

/// Which listing a feed pages through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedQuery {
    Published,
    Tagged(Vec<String>),
    Search(String),
}

impl FeedQuery {
    fn field(&self) -> &'static str {
        match self {
            FeedQuery::Published => "actualityListWeb",
            FeedQuery::Tagged(_) => "actualitySearchByTagsWeb",
            FeedQuery::Search(_) => "actualityTextSearchListWeb",
        }
    }

    fn document(&self) -> String {
        let (params, args) = match self {
            FeedQuery::Published => ("", ""),
            FeedQuery::Tagged(_) => (", $tagIds: [ID!]!", ", tagIds: $tagIds"),
            FeedQuery::Search(_) => (", $search: String!", ", search: $search"),
        };
        format!(
            "query Feed($first: Int, $after: String{params}) {{ {field}(first: $first, after: $after{args}) {{ {CARD_FIELDS} }} }}",
            field = self.field(),
        )
    }

    fn variables(&self, first: u32, after: Option<String>) -> Value {
        let mut vars = json!({ "first": first, "after": after });
        match self {
            FeedQuery::Published => {}
            FeedQuery::Tagged(tag_ids) => vars["tagIds"] = json!(tag_ids),
            FeedQuery::Search(term) => vars["search"] = json!(term),
        }
        vars
    }
}

#[derive(Deserialize)]
struct GraphqlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionData {
    edges: Vec<EdgeData>,
    page_info: PageInfoData,
}

#[derive(Deserialize)]
struct EdgeData {
    node: FeedItem,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfoData {
    has_next_page: bool,
    end_cursor: Option<String>,
}

/// Fetches feed pages from the GraphQL endpoint over HTTP.
#[derive(Clone)]
pub struct GraphqlPageFetcher {
    client: Client,
    endpoint: String,
    query: FeedQuery,
}

impl GraphqlPageFetcher {
    pub fn new(endpoint: impl Into<String>, query: FeedQuery) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            query,
        }
    }

    fn parse(&self, body: GraphqlResponse) -> Result<FeedPage, ClientError> {
        if let Some(first) = body.errors.first() {
            return Err(ClientError::GraphQL(first.message.clone()));
        }

        let connection = body
            .data
            .and_then(|mut data| data.get_mut(self.query.field()).map(Value::take))
            .filter(|c| !c.is_null())
            .ok_or(ClientError::MissingData)?;
        let connection: ConnectionData = serde_json::from_value(connection)
            .map_err(|e| ClientError::GraphQL(format!("Unexpected response shape: {e}")))?;

        Ok(FeedPage {
            items: connection.edges.into_iter().map(|e| e.node).collect(),
            end_cursor: connection.page_info.end_cursor,
            has_next_page: connection.page_info.has_next_page,
        })
    }
}

#[async_trait]
impl PageFetcher for GraphqlPageFetcher {
    async fn fetch_page(&self, first: u32, after: Option<String>) -> Result<FeedPage, ClientError> {
        let payload = json!({
            "query": self.query.document(),
            "variables": self.query.variables(first, after),
        });

        let body: GraphqlResponse = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        self.parse(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_name_the_listing_field() {
        let doc = FeedQuery::Search("opera".to_string()).document();
        assert!(doc.contains("actualityTextSearchListWeb(first: $first, after: $after, search: $search)"));
        assert!(doc.contains("$search: String!"));

        let doc = FeedQuery::Published.document();
        assert!(doc.starts_with("query Feed($first: Int, $after: String)"));
    }

    #[test]
    fn test_variables_carry_filter() {
        let vars = FeedQuery::Tagged(vec!["VGFnOjE=".to_string()]).variables(5, None);
        assert_eq!(vars["first"], json!(5));
        assert_eq!(vars["after"], Value::Null);
        assert_eq!(vars["tagIds"], json!(["VGFnOjE="]));
    }

    #[test]
    fn test_parse_page() {
        let fetcher = GraphqlPageFetcher::new("http://localhost:3000/graphql", FeedQuery::Published);
        let body: GraphqlResponse = serde_json::from_value(json!({
            "data": {
                "actualityListWeb": {
                    "edges": [{
                        "cursor": "abc",
                        "node": {
                            "id": "QWN0dWFsaXR5OjE=",
                            "title": "Premiere",
                            "slug": "premiere",
                            "summary": null,
                            "href": "/actuality/premiere",
                            "isPinned": true,
                            "activeSince": "2024-03-01T10:00:00Z"
                        }
                    }],
                    "pageInfo": { "hasNextPage": false, "endCursor": "abc" }
                }
            }
        }))
        .unwrap();

        let page = fetcher.parse(body).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].slug, "premiere");
        assert!(page.items[0].is_pinned);
        assert_eq!(page.end_cursor.as_deref(), Some("abc"));
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_parse_surfaces_graphql_errors() {
        let fetcher = GraphqlPageFetcher::new("http://localhost:3000/graphql", FeedQuery::Published);
        let body: GraphqlResponse = serde_json::from_value(json!({
            "data": null,
            "errors": [{ "message": "Invalid cursor: zzz" }]
        }))
        .unwrap();

        let err = fetcher.parse(body).unwrap_err();
        assert!(matches!(err, ClientError::GraphQL(ref m) if m == "Invalid cursor: zzz"));
    }
}
