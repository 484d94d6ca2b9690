use crate::config::AppConfig;
use crate::entities::{
    actualities, actuality_images, actuality_tags, photos, productions, tags, videos,
};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::time::Duration;
use tracing::info;

pub async fn setup_database(config: &AppConfig) -> anyhow::Result<DatabaseConnection> {
    info!("📂 Database: {}", config.database_url);

    let mut opt = ConnectOptions::new(&config.database_url);
    // Every connection to an in-memory SQLite database sees its own empty
    // database, so the pool must stay at one connection.
    let max_connections = if config.database_url.contains(":memory:") {
        1
    } else {
        100
    };
    opt.max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;

    info!("✅ Database connected successfully");

    run_migrations(&db).await?;

    Ok(db)
}

pub async fn run_migrations(db: &DatabaseConnection) -> anyhow::Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    info!("🔄 Running auto-migrations...");

    // Referenced tables first: media and tags, then actualities, then joins.
    let stmts = vec![
        (
            "photos",
            schema
                .create_table_from_entity(photos::Entity)
                .if_not_exists()
                .to_owned(),
        ),
        (
            "videos",
            schema
                .create_table_from_entity(videos::Entity)
                .if_not_exists()
                .to_owned(),
        ),
        (
            "productions",
            schema
                .create_table_from_entity(productions::Entity)
                .if_not_exists()
                .to_owned(),
        ),
        (
            "tags",
            schema
                .create_table_from_entity(tags::Entity)
                .if_not_exists()
                .to_owned(),
        ),
        (
            "actualities",
            schema
                .create_table_from_entity(actualities::Entity)
                .if_not_exists()
                .to_owned(),
        ),
        (
            "actuality_tags",
            schema
                .create_table_from_entity(actuality_tags::Entity)
                .if_not_exists()
                .to_owned(),
        ),
        (
            "actuality_images",
            schema
                .create_table_from_entity(actuality_images::Entity)
                .if_not_exists()
                .to_owned(),
        ),
    ];

    for (name, stmt) in stmts {
        let stmt = builder.build(&stmt);
        match db.execute(stmt).await {
            Ok(_) => info!("   - Table '{}' checked/created", name),
            Err(e) => {
                tracing::error!("   - Failed to create table '{}': {}", name, e);
                return Err(e.into());
            }
        }
    }

    info!("🔄 Checking indexes...");

    let indexes = [
        // Listing order and keyset range scans
        "CREATE INDEX IF NOT EXISTS idx_actualities_listing ON actualities(is_pinned, active_since, id)",
        "CREATE INDEX IF NOT EXISTS idx_actualities_status ON actualities(status)",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_videos_source_video_id ON videos(source, video_id)",
        "CREATE INDEX IF NOT EXISTS idx_actuality_tags_tag_id ON actuality_tags(tag_id)",
        "CREATE INDEX IF NOT EXISTS idx_actuality_images_photo_id ON actuality_images(photo_id)",
    ];

    for query in indexes {
        match db
            .execute(sea_orm::Statement::from_string(builder, query.to_owned()))
            .await
        {
            Ok(_) => info!("   - {}", query),
            Err(e) => tracing::warn!("   - Index creation warning: {} -> {}", query, e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{EntityTrait, PaginatorTrait};

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = setup_database(&AppConfig::default()).await.unwrap();
        run_migrations(&db).await.unwrap();

        assert_eq!(actualities::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(tags::Entity::find().count(&db).await.unwrap(), 0);
    }
}
