//! End-to-end tests for the HTTP surface.
//!
//! Each test builds the full router (`ServerBuilder::build`) over a seeded
//! in-memory store and drives it through `axum_test::TestServer`.

use axum::http::StatusCode;
use axum_test::TestServer;
use graphql_service::config::AppConfig;
use graphql_service::server::ServerBuilder;
use graphql_service::storage::in_memory_store;
use serde_json::{Value, json};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn server_with(config: AppConfig) -> TestServer {
    let store = in_memory_store();
    store.seed_member_types().await.unwrap();

    let app = ServerBuilder::new()
        .with_config(config)
        .with_store(store)
        .build()
        .unwrap();
    TestServer::new(app)
}

async fn server() -> TestServer {
    server_with(AppConfig::default()).await
}

async fn gql(server: &TestServer, query: &str, variables: Value) -> Value {
    let response = server
        .post("/graphql")
        .json(&json!({ "query": query, "variables": variables }))
        .await;
    response.assert_status(StatusCode::OK);
    response.json()
}

async fn create_user(server: &TestServer, name: &str, balance: f64) -> String {
    let body = gql(
        server,
        "mutation($dto: CreateUserInput!) { createUser(dto: $dto) { id name balance } }",
        json!({ "dto": { "name": name, "balance": balance } }),
    )
    .await;
    assert!(body.get("errors").is_none(), "{}", body);
    body["data"]["createUser"]["id"].as_str().unwrap().to_string()
}

async fn create_post(server: &TestServer, author_id: &str, title: &str) -> String {
    let body = gql(
        server,
        "mutation($dto: CreatePostInput!) { createPost(dto: $dto) { id } }",
        json!({ "dto": { "title": title, "content": "body", "authorId": author_id } }),
    )
    .await;
    assert!(body.get("errors").is_none(), "{}", body);
    body["data"]["createPost"]["id"].as_str().unwrap().to_string()
}

async fn create_profile(server: &TestServer, user_id: &str) -> Value {
    gql(
        server,
        "mutation($dto: CreateProfileInput!) { createProfile(dto: $dto) { id memberTypeId } }",
        json!({ "dto": {
            "isMale": true,
            "yearOfBirth": 1990,
            "memberTypeId": "business",
            "userId": user_id
        } }),
    )
    .await
}

fn error_code(body: &Value) -> &str {
    body["errors"][0]["extensions"]["code"].as_str().unwrap_or("")
}

// ---------------------------------------------------------------------------
// Health and auxiliary routes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health_routes() {
    let server = server().await;

    for path in ["/health", "/healthz"] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "graphql-service");
    }
}

#[tokio::test]
async fn test_schema_sdl_route() {
    let server = server().await;

    let response = server.get("/graphql/schema").await;
    response.assert_status(StatusCode::OK);
    let sdl = response.text();
    assert!(sdl.contains("type Query"));
    assert!(sdl.contains("type Mutation"));
    assert!(sdl.contains("subscribeTo"));
}

#[tokio::test]
async fn test_playground_can_be_disabled() {
    let enabled = server().await;
    enabled
        .get("/graphql/playground")
        .await
        .assert_status(StatusCode::OK);

    let mut config = AppConfig::default();
    config.graphql.playground = false;
    let disabled = server_with(config).await;
    disabled
        .get("/graphql/playground")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_body_keys_rejected() {
    let server = server().await;

    let response = server
        .post("/graphql")
        .json(&json!({ "query": "{ users { id } }", "mutation": "x" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_member_type_by_id() {
    let server = server().await;

    let body = gql(
        &server,
        "{ memberType(id: basic) { id discount postsLimitPerMonth } }",
        json!({}),
    )
    .await;
    assert_eq!(
        body["data"]["memberType"],
        json!({ "id": "basic", "discount": 2.3, "postsLimitPerMonth": 20 })
    );
}

#[tokio::test]
async fn test_missing_entities_resolve_to_null() {
    let server = server().await;
    let id = uuid::Uuid::new_v4().to_string();

    let body = gql(
        &server,
        "query($id: UUID!) { user(id: $id) { id } post(id: $id) { id } profile(id: $id) { id } }",
        json!({ "id": id }),
    )
    .await;
    assert!(body.get("errors").is_none(), "{}", body);
    assert_eq!(
        body["data"],
        json!({ "user": null, "post": null, "profile": null })
    );
}

#[tokio::test]
async fn test_invalid_uuid_is_a_graphql_error() {
    let server = server().await;

    let body = gql(&server, "{ user(id: \"not-a-uuid\") { id } }", json!({})).await;
    assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn test_nested_relations() {
    let server = server().await;
    let alice = create_user(&server, "alice", 10.0).await;
    let bob = create_user(&server, "bob", 20.0).await;
    create_post(&server, &alice, "hello").await;
    let profile = create_profile(&server, &alice).await;
    assert!(profile.get("errors").is_none(), "{}", profile);

    gql(
        &server,
        "mutation($u: UUID!, $a: UUID!) { subscribeTo(userId: $u, authorId: $a) { id } }",
        json!({ "u": bob, "a": alice }),
    )
    .await;

    let body = gql(
        &server,
        "query($id: UUID!) {
            user(id: $id) {
                name
                posts { title }
                profile { memberType { id discount } }
                subscribedToUser { name userSubscribedTo { name } }
                userSubscribedTo { name }
            }
        }",
        json!({ "id": alice }),
    )
    .await;

    assert!(body.get("errors").is_none(), "{}", body);
    assert_eq!(
        body["data"]["user"],
        json!({
            "name": "alice",
            "posts": [{ "title": "hello" }],
            "profile": { "memberType": { "id": "business", "discount": 7.7 } },
            "subscribedToUser": [{ "name": "bob", "userSubscribedTo": [{ "name": "alice" }] }],
            "userSubscribedTo": []
        })
    );
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_and_change_user() {
    let server = server().await;
    let id = create_user(&server, "carol", 1.5).await;

    let body = gql(
        &server,
        "mutation($id: UUID!, $dto: ChangeUserInput!) { changeUser(id: $id, dto: $dto) { name balance } }",
        json!({ "id": id, "dto": { "balance": 99.5 } }),
    )
    .await;
    assert_eq!(
        body["data"]["changeUser"],
        json!({ "name": "carol", "balance": 99.5 })
    );
}

#[tokio::test]
async fn test_change_unknown_post_is_not_found() {
    let server = server().await;

    let body = gql(
        &server,
        "mutation($id: UUID!) { changePost(id: $id, dto: { title: \"x\" }) { id } }",
        json!({ "id": uuid::Uuid::new_v4() }),
    )
    .await;
    assert_eq!(error_code(&body), "NOT_FOUND");
}

#[tokio::test]
async fn test_create_post_requires_author() {
    let server = server().await;

    let body = gql(
        &server,
        "mutation($dto: CreatePostInput!) { createPost(dto: $dto) { id } }",
        json!({ "dto": { "title": "t", "content": "c", "authorId": uuid::Uuid::new_v4() } }),
    )
    .await;
    assert_eq!(error_code(&body), "FOREIGN_KEY_VIOLATION");
}

#[tokio::test]
async fn test_second_profile_is_rejected() {
    let server = server().await;
    let user = create_user(&server, "dave", 0.0).await;

    let first = create_profile(&server, &user).await;
    assert!(first.get("errors").is_none(), "{}", first);

    let second = create_profile(&server, &user).await;
    assert_eq!(error_code(&second), "ALREADY_EXISTS");
}

#[tokio::test]
async fn test_change_profile_member_type() {
    let server = server().await;
    let user = create_user(&server, "erin", 0.0).await;
    let created = create_profile(&server, &user).await;
    let profile_id = created["data"]["createProfile"]["id"].as_str().unwrap();

    let body = gql(
        &server,
        "mutation($id: UUID!) { changeProfile(id: $id, dto: { memberTypeId: basic }) { memberTypeId yearOfBirth } }",
        json!({ "id": profile_id }),
    )
    .await;
    assert_eq!(
        body["data"]["changeProfile"],
        json!({ "memberTypeId": "basic", "yearOfBirth": 1990 })
    );
}

#[tokio::test]
async fn test_delete_user_cascades() {
    let server = server().await;
    let alice = create_user(&server, "alice", 0.0).await;
    let bob = create_user(&server, "bob", 0.0).await;
    create_post(&server, &alice, "p").await;
    create_profile(&server, &alice).await;
    gql(
        &server,
        "mutation($u: UUID!, $a: UUID!) { subscribeTo(userId: $u, authorId: $a) { id } }",
        json!({ "u": bob, "a": alice }),
    )
    .await;

    let body = gql(
        &server,
        "mutation($id: UUID!) { deleteUser(id: $id) }",
        json!({ "id": alice }),
    )
    .await;
    assert_eq!(body["data"]["deleteUser"], true);

    let body = gql(
        &server,
        "query($id: UUID!) { posts { id } profiles { id } user(id: $id) { userSubscribedTo { id } } }",
        json!({ "id": bob }),
    )
    .await;
    assert_eq!(
        body["data"],
        json!({ "posts": [], "profiles": [], "user": { "userSubscribedTo": [] } })
    );
}

#[tokio::test]
async fn test_delete_missing_post_returns_false() {
    let server = server().await;

    let body = gql(
        &server,
        "mutation($id: UUID!) { deletePost(id: $id) }",
        json!({ "id": uuid::Uuid::new_v4() }),
    )
    .await;
    assert_eq!(body["data"]["deletePost"], false);
}

#[tokio::test]
async fn test_delete_profile() {
    let server = server().await;
    let user = create_user(&server, "frank", 0.0).await;
    let created = create_profile(&server, &user).await;
    let profile_id = created["data"]["createProfile"]["id"].as_str().unwrap();

    for expected in [true, false] {
        let body = gql(
            &server,
            "mutation($id: UUID!) { deleteProfile(id: $id) }",
            json!({ "id": profile_id }),
        )
        .await;
        assert_eq!(body["data"]["deleteProfile"], expected);
    }

    let body = gql(
        &server,
        "query($id: UUID!) { user(id: $id) { profile { id } } }",
        json!({ "id": user }),
    )
    .await;
    assert_eq!(body["data"]["user"], json!({ "profile": null }));
}

#[tokio::test]
async fn test_subscribe_and_unsubscribe() {
    let server = server().await;
    let alice = create_user(&server, "alice", 0.0).await;
    let bob = create_user(&server, "bob", 0.0).await;

    let body = gql(
        &server,
        "mutation($u: UUID!, $a: UUID!) { subscribeTo(userId: $u, authorId: $a) { name userSubscribedTo { name } } }",
        json!({ "u": bob, "a": alice }),
    )
    .await;
    assert_eq!(
        body["data"]["subscribeTo"],
        json!({ "name": "bob", "userSubscribedTo": [{ "name": "alice" }] })
    );

    let body = gql(
        &server,
        "mutation($u: UUID!, $a: UUID!) { unsubscribeFrom(userId: $u, authorId: $a) }",
        json!({ "u": bob, "a": alice }),
    )
    .await;
    assert_eq!(body["data"]["unsubscribeFrom"], true);

    let body = gql(
        &server,
        "mutation($u: UUID!, $a: UUID!) { unsubscribeFrom(userId: $u, authorId: $a) }",
        json!({ "u": bob, "a": alice }),
    )
    .await;
    assert_eq!(body["data"]["unsubscribeFrom"], false);
}

#[tokio::test]
async fn test_self_subscription_rejected() {
    let server = server().await;
    let alice = create_user(&server, "alice", 0.0).await;

    let body = gql(
        &server,
        "mutation($u: UUID!) { subscribeTo(userId: $u, authorId: $u) { id } }",
        json!({ "u": alice }),
    )
    .await;
    assert_eq!(error_code(&body), "BAD_USER_INPUT");
}

// ---------------------------------------------------------------------------
// Depth limiting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_depth_limit_rejects_without_data() {
    let server = server().await;

    let body = gql(
        &server,
        "query Deep { users { userSubscribedTo { subscribedToUser { userSubscribedTo { \
         subscribedToUser { userSubscribedTo { id } } } } } } }",
        json!({}),
    )
    .await;
    assert_eq!(
        body["errors"][0]["message"],
        "'Deep' exceeds maximum operation depth of 5"
    );
    assert_eq!(error_code(&body), "GRAPHQL_VALIDATION_FAILED");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_too_deep_mutation_writes_nothing() {
    let server = server().await;

    let body = gql(
        &server,
        "mutation Deep { createUser(dto: { name: \"ghost\", balance: 1.0 }) { \
         userSubscribedTo { subscribedToUser { userSubscribedTo { subscribedToUser { \
         userSubscribedTo { id } } } } } } }",
        json!({}),
    )
    .await;
    assert_eq!(error_code(&body), "GRAPHQL_VALIDATION_FAILED");
    assert!(body["data"].is_null());

    let body = gql(&server, "{ users { id } }", json!({})).await;
    assert_eq!(body["data"]["users"], json!([]));
}

#[tokio::test]
async fn test_depth_at_limit_is_accepted() {
    let server = server().await;

    let body = gql(
        &server,
        "{ users { userSubscribedTo { subscribedToUser { userSubscribedTo { \
         subscribedToUser { id } } } } } }",
        json!({}),
    )
    .await;
    assert!(body.get("errors").is_none(), "{}", body);
    assert_eq!(body["data"]["users"], json!([]));
}

#[tokio::test]
async fn test_depth_limit_follows_config() {
    let mut config = AppConfig::default();
    config.graphql.max_depth = 1;
    let server = server_with(config).await;

    let body = gql(&server, "{ users { posts { id } } }", json!({})).await;
    assert_eq!(
        body["errors"][0]["message"],
        "'anonymous' exceeds maximum operation depth of 1"
    );
}
