use std::env;

/// Runtime configuration for the actuality service
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection string (default: "sqlite::memory:")
    pub database_url: String,

    /// HTTP port (default: 3000)
    pub port: u16,

    /// Page size used when a listing query omits `first` (default: 10)
    pub default_page_size: u64,

    /// Upper bound for `first` on every connection field (default: 50)
    pub max_page_size: u64,

    /// Maximum GraphQL query depth (default: 12)
    pub graphql_depth_limit: usize,

    /// Maximum GraphQL query complexity (default: 500)
    pub graphql_complexity_limit: usize,

    /// Serve the GraphiQL IDE on `GET /graphql` (default: true)
    pub enable_graphiql: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: 3000,
            default_page_size: 10,
            max_page_size: 50,
            graphql_depth_limit: 12,
            graphql_complexity_limit: 500,
            enable_graphiql: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            default_page_size: env::var("DEFAULT_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.default_page_size),

            max_page_size: env::var("MAX_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_page_size),

            graphql_depth_limit: env::var("GRAPHQL_DEPTH_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.graphql_depth_limit),

            graphql_complexity_limit: env::var("GRAPHQL_COMPLEXITY_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.graphql_complexity_limit),

            enable_graphiql: env::var("ENABLE_GRAPHIQL")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(default.enable_graphiql),
        }
        .normalized()
    }

    /// Config for local development and tests
    pub fn development() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: 3000,
            default_page_size: 10,
            max_page_size: 100,
            graphql_depth_limit: 16,
            graphql_complexity_limit: 1000,
            enable_graphiql: true,
        }
    }

    // The default page size can never exceed the cap.
    fn normalized(mut self) -> Self {
        if self.max_page_size == 0 {
            self.max_page_size = Self::default().max_page_size;
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            self.default_page_size = self.default_page_size.clamp(1, self.max_page_size);
        }
        self
    }
}
