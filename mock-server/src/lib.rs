//! In-process imitation of the Unipile REST API.
//!
//! Every request passing through the router is recorded (method, path, raw
//! query, API key, JSON body) before the `x-api-key` check, so tests can
//! assert on the exact wire shape an adapter produced. The comment and
//! reaction endpoints answer `201 Created` with an empty body, as the real
//! service sometimes does.

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

/// Account id the mock knows about.
pub const KNOWN_ACCOUNT_ID: &str = "acc_123";

/// One request as seen by the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub api_key: Option<String>,
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Debug)]
pub struct MockState {
    api_key: Arc<str>,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
    messages: Arc<RwLock<HashMap<String, Vec<Value>>>>,
    posts: Arc<RwLock<HashMap<String, Value>>>,
}

impl MockState {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: Arc::from(api_key),
            requests: Arc::default(),
            messages: Arc::default(),
            posts: Arc::default(),
        }
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    pub async fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.read().await.last().cloned()
    }
}

#[derive(Deserialize)]
struct SendMessage {
    text: String,
}

#[derive(Deserialize)]
struct NewPost {
    account_id: String,
    text: String,
}

pub fn app(api_key: &str) -> Router {
    app_with_state(MockState::new(api_key))
}

pub fn app_with_state(state: MockState) -> Router {
    Router::new()
        .route("/api/v1/chats", get(list_chats))
        .route("/api/v1/chats/{chat_id}", get(retrieve_chat))
        .route(
            "/api/v1/chats/{chat_id}/messages",
            get(list_chat_messages).post(send_chat_message),
        )
        .route("/api/v1/messages", get(list_all_messages))
        .route("/api/v1/accounts", get(list_accounts))
        .route("/api/v1/accounts/{account_id}", get(retrieve_account))
        .route("/api/v1/users/me", get(own_profile))
        .route("/api/v1/users/{identifier}/posts", get(list_user_posts))
        .route("/api/v1/posts", post(create_post))
        .route("/api/v1/posts/reaction", post(add_reaction))
        .route("/api/v1/posts/{post_id}", get(retrieve_post))
        .route(
            "/api/v1/posts/{post_id}/comments",
            get(list_post_comments).post(create_post_comment),
        )
        .route("/api/v1/posts/{post_id}/reactions", get(list_post_reactions))
        .route("/api/v1/linkedin/search", post(search))
        .layer(middleware::from_fn_with_state(state.clone(), record_and_authorize))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

fn header(request: &axum::http::request::Parts, name: &str) -> Option<String> {
    request
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn record_and_authorize(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };
    let recorded = RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        api_key: header(&parts, "x-api-key"),
        content_type: header(&parts, "content-type"),
        cache_control: header(&parts, "cache-control"),
        body: serde_json::from_slice(&bytes).ok(),
    };
    debug!(method = %recorded.method, path = %recorded.path, query = ?recorded.query, "mock request");
    let authorized = recorded.api_key.as_deref() == Some(&*state.api_key);
    state.requests.write().await.push(recorded);

    if !authorized {
        warn!("rejecting request without a valid x-api-key");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"status": 401, "type": "errors/missing_credentials"})),
        )
            .into_response();
    }
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn not_found(detail: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"status": 404, "type": "errors/resource_not_found", "detail": detail})),
    )
        .into_response()
}

async fn list_chats() -> Json<Value> {
    Json(json!({
        "object": "ChatList",
        "items": [{"object": "Chat", "id": "chat_1", "account_id": KNOWN_ACCOUNT_ID, "unread_count": 2}],
        "cursor": null,
    }))
}

async fn retrieve_chat(Path(chat_id): Path<String>) -> Json<Value> {
    Json(json!({"object": "Chat", "id": chat_id, "account_id": KNOWN_ACCOUNT_ID}))
}

async fn list_chat_messages(State(state): State<MockState>, Path(chat_id): Path<String>) -> Json<Value> {
    let messages = state.messages.read().await;
    let items = messages.get(&chat_id).cloned().unwrap_or_default();
    Json(json!({"object": "MessageList", "items": items, "cursor": null}))
}

async fn send_chat_message(
    State(state): State<MockState>,
    Path(chat_id): Path<String>,
    Json(input): Json<SendMessage>,
) -> (StatusCode, Json<Value>) {
    let id = Uuid::new_v4().to_string();
    let message = json!({"object": "Message", "id": id, "chat_id": chat_id, "text": input.text});
    state.messages.write().await.entry(chat_id).or_default().push(message);
    (StatusCode::CREATED, Json(json!({"object": "MessageSent", "message_id": id})))
}

async fn list_all_messages(State(state): State<MockState>) -> Json<Value> {
    let messages = state.messages.read().await;
    let items: Vec<Value> = messages.values().flatten().cloned().collect();
    Json(json!({"object": "MessageList", "items": items, "cursor": null}))
}

async fn list_accounts() -> Json<Value> {
    Json(json!({
        "object": "AccountList",
        "items": [{"object": "Account", "id": KNOWN_ACCOUNT_ID, "type": "LINKEDIN"}],
        "cursor": null,
    }))
}

async fn retrieve_account(Path(account_id): Path<String>) -> Response {
    if account_id != KNOWN_ACCOUNT_ID {
        return not_found("account not found");
    }
    Json(json!({"object": "Account", "id": account_id, "type": "LINKEDIN"})).into_response()
}

async fn own_profile() -> Json<Value> {
    Json(json!({"object": "AccountOwnerProfile", "provider": "LINKEDIN", "provider_id": "ACoAAmock", "first_name": "Ada"}))
}

async fn list_user_posts(State(state): State<MockState>, Path(identifier): Path<String>) -> Json<Value> {
    let posts = state.posts.read().await;
    let items: Vec<Value> = posts.values().cloned().collect();
    Json(json!({"object": "PostList", "identifier": identifier, "items": items, "cursor": null}))
}

async fn create_post(State(state): State<MockState>, Json(input): Json<NewPost>) -> (StatusCode, Json<Value>) {
    let id = Uuid::new_v4().to_string();
    let post = json!({"object": "Post", "id": id, "social_id": id, "author": input.account_id, "text": input.text});
    state.posts.write().await.insert(id.clone(), post);
    (StatusCode::CREATED, Json(json!({"object": "PostCreated", "post_id": id})))
}

async fn retrieve_post(State(state): State<MockState>, Path(post_id): Path<String>) -> Response {
    match state.posts.read().await.get(&post_id) {
        Some(post) => Json(post.clone()).into_response(),
        None => not_found("post not found"),
    }
}

async fn list_post_comments(Path(post_id): Path<String>) -> Json<Value> {
    Json(json!({"object": "CommentList", "post_id": post_id, "items": [], "cursor": null}))
}

async fn create_post_comment() -> StatusCode {
    StatusCode::CREATED
}

async fn list_post_reactions(Path(post_id): Path<String>) -> Json<Value> {
    Json(json!({"object": "ReactionList", "post_id": post_id, "items": [], "cursor": null}))
}

async fn add_reaction() -> StatusCode {
    StatusCode::CREATED
}

async fn search() -> Json<Value> {
    Json(json!({
        "object": "LinkedinSearch",
        "items": [],
        "paging": {"start": 0, "page_count": 0, "total_count": 0},
        "cursor": null,
    }))
}
