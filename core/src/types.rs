//! Typed parameters for each operation.
//!
//! # Design
//! Required parameters are plain fields and optional ones are `Option`s that
//! are skipped when `None`, so serializing a struct yields exactly the
//! `CallArgs` the dynamic path would receive. Enumerated values are closed
//! enums whose serialized names match the remote API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::operations::Operation;

/// Ties a parameter struct to the operation it invokes.
pub trait OperationParams: Serialize {
    const OPERATION: Operation;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    Like,
    Celebrate,
    Love,
    Insightful,
    Funny,
    Support,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Relevance,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePosted {
    PastDay,
    PastWeek,
    PastMonth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Videos,
    Images,
    LiveVideos,
    CollaborativeArticles,
    Documents,
}

/// `before` and `after` are ISO 8601 UTC datetimes here and elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListAllChats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    /// Comma-separated account ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListChatMessages {
    pub chat_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendChatMessage {
    pub chat_id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrieveChat {
    pub chat_id: String,
    /// Required by the remote API when `chat_id` is a provider id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListAllMessages {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListAllAccounts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrieveAccount {
    pub account_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListUserPosts {
    /// Provider internal id of the user or company.
    pub identifier: String,
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_company: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrieveOwnProfile {
    pub account_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievePost {
    pub post_id: String,
    pub account_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPostComments {
    pub post_id: String,
    pub account_id: String,
    /// List replies to this comment instead of top-level comments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePost {
    pub account_id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentions: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPostReactions {
    pub post_id: String,
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePostComment {
    pub post_social_id: String,
    pub account_id: String,
    pub text: String,
    /// Reply to this comment instead of commenting on the post.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<String>,
    /// Sent as `mentions`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentions_body: Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddReactionToPost {
    /// Sent as `post_id`.
    pub post_social_id: String,
    pub reaction_type: ReactionType,
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPosts {
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_posted: Option<DatePosted>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    /// e.g. `{"me": true}` or `{"member": ["MEMBER_ID"]}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_by: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentioning: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Map<String, Value>>,
}

impl SearchPosts {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            cursor: None,
            limit: None,
            keywords: None,
            sort_by: None,
            date_posted: None,
            content_type: None,
            posted_by: None,
            mentioning: None,
            author: None,
        }
    }
}

macro_rules! operation_params {
    ($($params:ty => $operation:ident),* $(,)?) => {
        $(
            impl OperationParams for $params {
                const OPERATION: Operation = Operation::$operation;
            }
        )*
    };
}

operation_params! {
    ListAllChats => ListAllChats,
    ListChatMessages => ListChatMessages,
    SendChatMessage => SendChatMessage,
    RetrieveChat => RetrieveChat,
    ListAllMessages => ListAllMessages,
    ListAllAccounts => ListAllAccounts,
    RetrieveAccount => RetrieveAccount,
    ListUserPosts => ListUserPosts,
    RetrieveOwnProfile => RetrieveOwnProfile,
    RetrievePost => RetrievePost,
    ListPostComments => ListPostComments,
    CreatePost => CreatePost,
    ListPostReactions => ListPostReactions,
    CreatePostComment => CreatePostComment,
    AddReactionToPost => AddReactionToPost,
    SearchPosts => SearchPosts,
}
