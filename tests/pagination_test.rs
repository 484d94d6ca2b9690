mod common;

use chrono::{DateTime, Duration, TimeZone, Utc};
use common::*;
use rust_actuality_backend::entities::{actualities, actualities::ActualityStatus, tags};
use rust_actuality_backend::services::actuality_repository::{
    ActualityFilter, ActualityRepository, SeaOrmActualityRepository,
};
use rust_actuality_backend::services::pagination::PageRequest;
use rust_actuality_backend::utils::global_id::{self, encode_global_id};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::json;

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap()
}

async fn insert_actuality(
    db: &DatabaseConnection,
    slug: &str,
    is_pinned: bool,
    active_since: DateTime<Utc>,
    status: ActualityStatus,
) -> actualities::Model {
    let now = Utc::now();
    actualities::ActiveModel {
        title: Set(format!("Title {slug}")),
        sub_title: Set(String::new()),
        summary: Set(Some(format!("Summary of {slug}"))),
        slug: Set(slug.to_string()),
        status: Set(status),
        is_pinned: Set(is_pinned),
        is_external: Set(false),
        active_since: Set(active_since),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// Two pinned and three unpinned rows with distinct publication dates.
async fn seed_fixture(db: &DatabaseConnection) {
    insert_actuality(db, "unpinned-old", false, day(1), ActualityStatus::Active).await;
    insert_actuality(db, "pinned-old", true, day(2), ActualityStatus::Active).await;
    insert_actuality(db, "unpinned-new", false, day(5), ActualityStatus::Active).await;
    insert_actuality(db, "pinned-new", true, day(4), ActualityStatus::Active).await;
    insert_actuality(db, "unpinned-mid", false, day(3), ActualityStatus::Active).await;
}

#[tokio::test]
async fn test_keyset_pages_cover_fixture_in_order() {
    let db = setup_test_db().await;
    seed_fixture(&db).await;
    let repo = SeaOrmActualityRepository::new(db.clone());

    let mut slugs = Vec::new();
    let mut after: Option<String> = None;
    let mut pages = 0;

    loop {
        let request = PageRequest::from_args(Some(2), after.as_deref(), 10, 50).unwrap();
        let page = repo
            .find_page(&ActualityFilter::default(), &request)
            .await
            .unwrap();
        pages += 1;

        assert_eq!(page.has_previous_page, after.is_some());
        slugs.extend(page.edges.iter().map(|e| e.node.slug.clone()));

        if !page.has_next_page {
            break;
        }
        after = page.end_cursor().map(str::to_string);
    }

    assert_eq!(pages, 3);
    assert_eq!(
        slugs,
        [
            "pinned-new",
            "pinned-old",
            "unpinned-new",
            "unpinned-mid",
            "unpinned-old"
        ]
    );
}

#[tokio::test]
async fn test_equal_timestamps_fall_back_to_id() {
    let db = setup_test_db().await;
    let repo = SeaOrmActualityRepository::new(db.clone());

    let a = insert_actuality(&db, "same-a", false, day(1), ActualityStatus::Active).await;
    let b = insert_actuality(&db, "same-b", false, day(1), ActualityStatus::Active).await;
    let c = insert_actuality(&db, "same-c", false, day(1), ActualityStatus::Active).await;

    let first = repo
        .find_page(
            &ActualityFilter::default(),
            &PageRequest::from_args(Some(2), None, 10, 50).unwrap(),
        )
        .await
        .unwrap();
    let ids: Vec<i32> = first.edges.iter().map(|e| e.node.id).collect();
    assert_eq!(ids, [c.id, b.id]);

    let second = repo
        .find_page(
            &ActualityFilter::default(),
            &PageRequest::from_args(Some(2), first.end_cursor(), 10, 50).unwrap(),
        )
        .await
        .unwrap();
    let ids: Vec<i32> = second.edges.iter().map(|e| e.node.id).collect();
    assert_eq!(ids, [a.id]);
    assert!(!second.has_next_page);
}

#[tokio::test]
async fn test_published_filter() {
    let db = setup_test_db().await;
    let repo = SeaOrmActualityRepository::new(db.clone());

    insert_actuality(&db, "live", false, day(1), ActualityStatus::Active).await;
    insert_actuality(&db, "draft", false, day(1), ActualityStatus::Draft).await;
    insert_actuality(
        &db,
        "scheduled",
        false,
        Utc::now() + Duration::days(30),
        ActualityStatus::Active,
    )
    .await;

    let expired = insert_actuality(&db, "expired", false, day(1), ActualityStatus::Active).await;
    let mut expired: actualities::ActiveModel = expired.into();
    expired.active_to = Set(Some(day(2)));
    expired.update(&db).await.unwrap();

    let request = PageRequest::from_args(None, None, 10, 50).unwrap();
    let page = repo
        .find_page(&ActualityFilter::published(), &request)
        .await
        .unwrap();
    let slugs: Vec<_> = page.edges.iter().map(|e| e.node.slug.as_str()).collect();
    assert_eq!(slugs, ["live"]);

    let all = repo
        .find_page(&ActualityFilter::default(), &request)
        .await
        .unwrap();
    assert_eq!(all.edges.len(), 4);
}

#[tokio::test]
async fn test_tag_and_search_filters() {
    let db = setup_test_db().await;
    let repo = SeaOrmActualityRepository::new(db.clone());

    let opera = insert_actuality(&db, "opera-night", false, day(3), ActualityStatus::Active).await;
    let ballet = insert_actuality(&db, "ballet-night", false, day(2), ActualityStatus::Active).await;
    insert_actuality(&db, "concert", false, day(1), ActualityStatus::Active).await;

    repo.reconcile_relations(opera.id, &["music".to_string(), "stage".to_string()], &[])
        .await
        .unwrap();
    repo.reconcile_relations(ballet.id, &["stage".to_string()], &[])
        .await
        .unwrap();

    let stage = repo.tags_of(ballet.id).await.unwrap();
    let stage: &tags::Model = &stage[0];

    let request = PageRequest::from_args(None, None, 10, 50).unwrap();
    let filter = ActualityFilter {
        tag_ids: Some(vec![stage.id]),
        exclude_id: Some(ballet.id),
        ..ActualityFilter::published()
    };
    let page = repo.find_page(&filter, &request).await.unwrap();
    let slugs: Vec<_> = page.edges.iter().map(|e| e.node.slug.as_str()).collect();
    assert_eq!(slugs, ["opera-night"]);

    let filter = ActualityFilter {
        search: Some("NIGHT".to_string()),
        ..ActualityFilter::published()
    };
    let page = repo.find_page(&filter, &request).await.unwrap();
    let slugs: Vec<_> = page.edges.iter().map(|e| e.node.slug.as_str()).collect();
    assert_eq!(slugs, ["opera-night", "ballet-night"]);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let db = setup_test_db().await;
    let repo = SeaOrmActualityRepository::new(db.clone());

    let sale = insert_actuality(&db, "sale", false, day(2), ActualityStatus::Active).await;
    let mut sale: actualities::ActiveModel = sale.into();
    sale.title = Set("Tickets 50% off".to_string());
    sale.update(&db).await.unwrap();
    insert_actuality(&db, "plain", false, day(1), ActualityStatus::Active).await;

    let request = PageRequest::from_args(None, None, 10, 50).unwrap();
    let search = |term: &str| ActualityFilter {
        search: Some(term.to_string()),
        ..ActualityFilter::published()
    };

    let page = repo.find_page(&search("%"), &request).await.unwrap();
    let slugs: Vec<_> = page.edges.iter().map(|e| e.node.slug.as_str()).collect();
    assert_eq!(slugs, ["sale"]);

    let page = repo.find_page(&search("_"), &request).await.unwrap();
    assert!(page.edges.is_empty());
}

#[tokio::test]
async fn test_graphql_connection_paging() {
    let (app, db) = setup_app().await;
    seed_fixture(&db).await;

    let query = r#"query Page($first: Int, $after: String) {
        actualityListWeb(first: $first, after: $after) {
            edges { cursor node { slug } }
            pageInfo { hasNextPage hasPreviousPage endCursor }
        }
    }"#;

    let first = graphql(&app, query, json!({ "first": 2 })).await;
    let conn = &first["data"]["actualityListWeb"];
    assert_eq!(conn["pageInfo"]["hasNextPage"], true);
    assert_eq!(conn["pageInfo"]["hasPreviousPage"], false);
    assert_eq!(conn["edges"][0]["node"]["slug"], "pinned-new");

    let cursor = conn["pageInfo"]["endCursor"].clone();
    let second = graphql(&app, query, json!({ "first": 2, "after": cursor })).await;
    let conn = &second["data"]["actualityListWeb"];
    assert_eq!(conn["pageInfo"]["hasPreviousPage"], true);
    assert_eq!(conn["edges"][0]["node"]["slug"], "unpinned-new");
    assert_eq!(conn["edges"][1]["node"]["slug"], "unpinned-mid");
}

#[tokio::test]
async fn test_graphql_rejects_bad_page_arguments() {
    let (app, _db) = setup_app().await;

    let bad_cursor = graphql(
        &app,
        r#"{ getActualities(first: 2, after: "not-a-cursor") { edges { cursor } } }"#,
        json!({}),
    )
    .await;
    assert_eq!(error_code(&bad_cursor), Some("INVALID_CURSOR"));

    let zero = graphql(
        &app,
        "{ getActualities(first: 0) { edges { cursor } } }",
        json!({}),
    )
    .await;
    assert_eq!(error_code(&zero), Some("VALIDATION_ERROR"));
    assert_eq!(zero["errors"][0]["extensions"]["field"], "first");
}

#[tokio::test]
async fn test_related_by_tags_over_graphql() {
    let (app, db) = setup_app().await;
    let photo = insert_photo(&db, "poster").await;

    for (slug, tags) in [
        ("main", vec!["opera"]),
        ("sibling", vec!["opera", "gala"]),
        ("unrelated", vec!["jazz"]),
    ] {
        let input = actuality_input(slug, &photo_gid(&photo), &tags);
        graphql(&app, CREATE_ACTUALITY, json!({ "input": input })).await;
    }

    let main = graphql(
        &app,
        r#"{ actualityDetailBySlug(slug: "main") { id tags { id name } } }"#,
        json!({}),
    )
    .await;
    let main = &main["data"]["actualityDetailBySlug"];
    let tag_ids: Vec<_> = main["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].clone())
        .collect();

    let related = graphql(
        &app,
        r#"query Related($tags: [ID!]!, $ignored: ID) {
            relatedActualitiesByTags(tagIds: $tags, ignoredActualityId: $ignored, first: 5) {
                edges { node { slug } }
            }
        }"#,
        json!({ "tags": tag_ids, "ignored": main["id"] }),
    )
    .await;
    assert_eq!(
        related["data"]["relatedActualitiesByTags"]["edges"],
        json!([{ "node": { "slug": "sibling" } }])
    );

    let wrong_type = graphql(
        &app,
        r#"query Related($tags: [ID!]!) {
            actualitySearchByTagsWeb(tagIds: $tags) { edges { node { slug } } }
        }"#,
        json!({ "tags": [encode_global_id(global_id::ACTUALITY, 1)] }),
    )
    .await;
    assert_eq!(error_code(&wrong_type), Some("INVALID_ID"));
}
