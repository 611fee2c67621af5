//! The sixteen Unipile operations exposed as tools.
//!
//! Query parameters are listed in the order they are emitted.

use std::fmt;
use std::str::FromStr;

use crate::endpoint::{EndpointDescriptor, ParamSpec, WireType, DEFAULT_FALLBACK_MESSAGE};
use crate::error::ApiError;
use crate::http::HttpMethod;

const REACTION_TYPES: &[&str] = &["like", "celebrate", "love", "insightful", "funny", "support"];
const SORT_BY: &[&str] = &["relevance", "date"];
const DATE_POSTED: &[&str] = &["past_day", "past_week", "past_month"];
const CONTENT_TYPES: &[&str] = &[
    "videos",
    "images",
    "live_videos",
    "collaborative_articles",
    "documents",
];

const CURSOR: ParamSpec =
    ParamSpec::query("cursor", WireType::String).describe("Pagination cursor for the next page of entries.");
const BEFORE: ParamSpec = ParamSpec::query("before", WireType::String)
    .describe("Only items created before this ISO 8601 UTC datetime (exclusive).");
const AFTER: ParamSpec = ParamSpec::query("after", WireType::String)
    .describe("Only items created after this ISO 8601 UTC datetime (exclusive).");
const LIMIT: ParamSpec = ParamSpec::query("limit", WireType::Integer).describe("Number of items to return.");
const SENDER_ID: ParamSpec =
    ParamSpec::query("sender_id", WireType::String).describe("Only messages from this sender.");
const ACCOUNT_ID_REQUIRED: ParamSpec = ParamSpec::query("account_id", WireType::String)
    .required()
    .describe("Unipile account to perform the request from.");
const COMMENT_ID: ParamSpec =
    ParamSpec::query("comment_id", WireType::String).describe("Target a comment instead of the post itself.");

static LIST_ALL_CHATS: EndpointDescriptor = EndpointDescriptor {
    name: "list_all_chats",
    description: "Lists all chats, filtered by unread status, date range, provider or account.",
    tags: &["linkedin", "chat", "list", "messaging", "api"],
    method: HttpMethod::Get,
    path: "/api/v1/chats",
    params: &[
        ParamSpec::query("unread", WireType::Bool).describe("Only unread chats (true) or only read chats (false)."),
        CURSOR,
        BEFORE,
        AFTER,
        LIMIT,
        ParamSpec::query("account_type", WireType::String).describe("Provider filter, e.g. \"linkedin\"."),
        ParamSpec::query("account_id", WireType::String).describe("Comma-separated account ids to filter by."),
    ],
    fixed_body: &[],
    fallback_message: DEFAULT_FALLBACK_MESSAGE,
};

static LIST_CHAT_MESSAGES: EndpointDescriptor = EndpointDescriptor {
    name: "list_chat_messages",
    description: "Lists the messages of one chat.",
    tags: &["linkedin", "chat", "message", "list", "messaging", "api"],
    method: HttpMethod::Get,
    path: "/api/v1/chats/{chat_id}/messages",
    params: &[
        ParamSpec::path("chat_id").describe("Chat to read messages from."),
        CURSOR,
        BEFORE,
        AFTER,
        LIMIT,
        SENDER_ID,
    ],
    fixed_body: &[],
    fallback_message: DEFAULT_FALLBACK_MESSAGE,
};

static SEND_CHAT_MESSAGE: EndpointDescriptor = EndpointDescriptor {
    name: "send_chat_message",
    description: "Sends a text message in a chat.",
    tags: &["linkedin", "chat", "message", "send", "create", "messaging", "api"],
    method: HttpMethod::Post,
    path: "/api/v1/chats/{chat_id}/messages",
    params: &[
        ParamSpec::path("chat_id").describe("Chat to send the message to."),
        ParamSpec::body("text", WireType::String)
            .required()
            .describe("Message text."),
    ],
    fixed_body: &[],
    fallback_message: DEFAULT_FALLBACK_MESSAGE,
};

static RETRIEVE_CHAT: EndpointDescriptor = EndpointDescriptor {
    name: "retrieve_chat",
    description: "Retrieves a chat by its Unipile or provider id.",
    tags: &["linkedin", "chat", "retrieve", "get", "messaging", "api"],
    method: HttpMethod::Get,
    path: "/api/v1/chats/{chat_id}",
    params: &[
        ParamSpec::path("chat_id").describe("Unipile or provider id of the chat."),
        ParamSpec::query("account_id", WireType::String)
            .describe("Account context; mandatory when chat_id is a provider id."),
    ],
    fixed_body: &[],
    fallback_message: DEFAULT_FALLBACK_MESSAGE,
};

static LIST_ALL_MESSAGES: EndpointDescriptor = EndpointDescriptor {
    name: "list_all_messages",
    description: "Lists messages across all chats.",
    tags: &["linkedin", "message", "list", "all_messages", "messaging", "api"],
    method: HttpMethod::Get,
    path: "/api/v1/messages",
    params: &[
        CURSOR,
        BEFORE,
        AFTER,
        LIMIT,
        SENDER_ID,
        ParamSpec::query("account_id", WireType::String).describe("Only messages of this linked account."),
    ],
    fixed_body: &[],
    fallback_message: DEFAULT_FALLBACK_MESSAGE,
};

static LIST_ALL_ACCOUNTS: EndpointDescriptor = EndpointDescriptor {
    name: "list_all_accounts",
    description: "Lists all linked accounts.",
    tags: &["linkedin", "account", "list", "unipile", "api", "important"],
    method: HttpMethod::Get,
    path: "/api/v1/accounts",
    params: &[CURSOR, LIMIT],
    fixed_body: &[],
    fallback_message: DEFAULT_FALLBACK_MESSAGE,
};

static RETRIEVE_ACCOUNT: EndpointDescriptor = EndpointDescriptor {
    name: "retrieve_account",
    description: "Retrieves a linked account by id.",
    tags: &["linkedin", "account", "retrieve", "get", "unipile", "api", "important"],
    method: HttpMethod::Get,
    path: "/api/v1/accounts/{account_id}",
    params: &[ParamSpec::path("account_id").describe("Account to retrieve.")],
    fixed_body: &[],
    fallback_message: DEFAULT_FALLBACK_MESSAGE,
};

static LIST_USER_POSTS: EndpointDescriptor = EndpointDescriptor {
    name: "list_user_posts",
    description: "Lists the posts of a user or company.",
    tags: &["linkedin", "post", "list", "user_posts", "company_posts", "content", "api"],
    method: HttpMethod::Get,
    path: "/api/v1/users/{identifier}/posts",
    params: &[
        ParamSpec::path("identifier").describe("Provider internal id of the user or company."),
        ACCOUNT_ID_REQUIRED,
        CURSOR,
        LIMIT,
        ParamSpec::query("is_company", WireType::Bool).describe("Whether the identifier is a company."),
    ],
    fixed_body: &[],
    fallback_message: DEFAULT_FALLBACK_MESSAGE,
};

static RETRIEVE_OWN_PROFILE: EndpointDescriptor = EndpointDescriptor {
    name: "retrieve_own_profile",
    description: "Retrieves the profile of the user behind an account.",
    tags: &["linkedin", "user", "profile", "me", "retrieve", "get", "api"],
    method: HttpMethod::Get,
    path: "/api/v1/users/me",
    params: &[ACCOUNT_ID_REQUIRED],
    fixed_body: &[],
    fallback_message: DEFAULT_FALLBACK_MESSAGE,
};

static RETRIEVE_POST: EndpointDescriptor = EndpointDescriptor {
    name: "retrieve_post",
    description: "Retrieves a post by id.",
    tags: &["linkedin", "post", "retrieve", "get", "content", "api", "important"],
    method: HttpMethod::Get,
    path: "/api/v1/posts/{post_id}",
    params: &[ParamSpec::path("post_id").describe("Post to retrieve."), ACCOUNT_ID_REQUIRED],
    fixed_body: &[],
    fallback_message: DEFAULT_FALLBACK_MESSAGE,
};

static LIST_POST_COMMENTS: EndpointDescriptor = EndpointDescriptor {
    name: "list_post_comments",
    description: "Lists the comments of a post, or the replies to one comment.",
    tags: &["linkedin", "post", "comment", "list", "content", "api"],
    method: HttpMethod::Get,
    path: "/api/v1/posts/{post_id}/comments",
    params: &[
        ParamSpec::path("post_id").describe("Social id of the post."),
        ACCOUNT_ID_REQUIRED,
        CURSOR,
        ParamSpec::query("limit", WireType::IntegerString).describe("Number of comments to return."),
        COMMENT_ID,
    ],
    fixed_body: &[],
    fallback_message: DEFAULT_FALLBACK_MESSAGE,
};

static CREATE_POST: EndpointDescriptor = EndpointDescriptor {
    name: "create_post",
    description: "Publishes a new post.",
    tags: &["linkedin", "post", "create", "share", "content", "api", "important"],
    method: HttpMethod::Post,
    path: "/api/v1/posts",
    params: &[
        ParamSpec::body("account_id", WireType::String)
            .required()
            .describe("Account that authors the post."),
        ParamSpec::body("text", WireType::String)
            .required()
            .describe("Post text."),
        ParamSpec::body("mentions", WireType::Array).describe("Mention objects referenced from the text."),
        ParamSpec::body("external_link", WireType::String).describe("External URL shown as a card."),
    ],
    fixed_body: &[],
    fallback_message: DEFAULT_FALLBACK_MESSAGE,
};

static LIST_POST_REACTIONS: EndpointDescriptor = EndpointDescriptor {
    name: "list_post_reactions",
    description: "Lists the reactions on a post or comment.",
    tags: &["linkedin", "post", "reaction", "list", "like", "content", "api"],
    method: HttpMethod::Get,
    path: "/api/v1/posts/{post_id}/reactions",
    params: &[
        ParamSpec::path("post_id").describe("Social id of the post."),
        ACCOUNT_ID_REQUIRED,
        CURSOR,
        LIMIT,
        COMMENT_ID,
    ],
    fixed_body: &[],
    fallback_message: DEFAULT_FALLBACK_MESSAGE,
};

static CREATE_POST_COMMENT: EndpointDescriptor = EndpointDescriptor {
    name: "create_post_comment",
    description: "Comments on a post, or replies to a comment.",
    tags: &["linkedin", "post", "comment", "create", "content", "api", "important"],
    method: HttpMethod::Post,
    path: "/api/v1/posts/{post_social_id}/comments",
    params: &[
        ParamSpec::path("post_social_id").describe("Social id of the post to comment on."),
        ParamSpec::body("account_id", WireType::String)
            .required()
            .describe("Account that writes the comment."),
        ParamSpec::body("text", WireType::String)
            .required()
            .describe("Comment text; supports mention placeholders like {{0}}."),
        ParamSpec::body("comment_id", WireType::String).describe("Reply to this comment instead of the post."),
        ParamSpec::body("mentions_body", WireType::Array)
            .wire("mentions")
            .describe("Mention objects for the placeholders in text."),
    ],
    fixed_body: &[],
    fallback_message: "Comment action processed.",
};

static ADD_REACTION_TO_POST: EndpointDescriptor = EndpointDescriptor {
    name: "add_reaction_to_post",
    description: "Adds a reaction to a post or comment.",
    tags: &["linkedin", "post", "reaction", "create", "like", "content", "api", "important"],
    method: HttpMethod::Post,
    path: "/api/v1/posts/reaction",
    params: &[
        ParamSpec::body("account_id", WireType::String)
            .required()
            .describe("Account that reacts."),
        ParamSpec::body("post_social_id", WireType::String)
            .wire("post_id")
            .required()
            .describe("Social id of the post to react to."),
        ParamSpec::body("reaction_type", WireType::String)
            .required()
            .choices(REACTION_TYPES)
            .describe("Reaction kind."),
        ParamSpec::body("comment_id", WireType::String).describe("React to this comment instead of the post."),
    ],
    fixed_body: &[],
    fallback_message: "Reaction action processed.",
};

static SEARCH_POSTS: EndpointDescriptor = EndpointDescriptor {
    name: "search_posts",
    description: "Searches posts by keywords, date, content type, author or mentions.",
    tags: &["linkedin", "post", "search", "find", "content", "api", "important"],
    method: HttpMethod::Post,
    path: "/api/v1/linkedin/search",
    params: &[
        ACCOUNT_ID_REQUIRED,
        CURSOR,
        ParamSpec::query("limit", WireType::Integer).describe("Number of items to return (up to 50)."),
        ParamSpec::body("keywords", WireType::String).describe("Keywords to search for."),
        ParamSpec::body("sort_by", WireType::String)
            .choices(SORT_BY)
            .describe("Result ordering."),
        ParamSpec::body("date_posted", WireType::String)
            .choices(DATE_POSTED)
            .describe("Posting date window."),
        ParamSpec::body("content_type", WireType::String)
            .choices(CONTENT_TYPES)
            .describe("Kind of content in the post."),
        ParamSpec::body("posted_by", WireType::Object).describe("Poster filter, e.g. {\"me\": true}."),
        ParamSpec::body("mentioning", WireType::Object).describe("Mention filter, e.g. {\"company\": [\"ID\"]}."),
        ParamSpec::body("author", WireType::Object).describe("Author filter, e.g. {\"industry\": [\"ID\"]}."),
    ],
    fixed_body: &[("api", "classic"), ("category", "posts")],
    fallback_message: DEFAULT_FALLBACK_MESSAGE,
};

/// A callable Unipile operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListAllChats,
    ListChatMessages,
    SendChatMessage,
    RetrieveChat,
    ListAllMessages,
    ListAllAccounts,
    RetrieveAccount,
    ListUserPosts,
    RetrieveOwnProfile,
    RetrievePost,
    ListPostComments,
    CreatePost,
    ListPostReactions,
    CreatePostComment,
    AddReactionToPost,
    SearchPosts,
}

impl Operation {
    /// Every operation, in tool registration order.
    pub const ALL: [Operation; 16] = [
        Operation::ListAllChats,
        Operation::ListChatMessages,
        Operation::SendChatMessage,
        Operation::RetrieveChat,
        Operation::ListAllMessages,
        Operation::ListAllAccounts,
        Operation::RetrieveAccount,
        Operation::ListUserPosts,
        Operation::RetrieveOwnProfile,
        Operation::RetrievePost,
        Operation::ListPostComments,
        Operation::CreatePost,
        Operation::ListPostReactions,
        Operation::CreatePostComment,
        Operation::AddReactionToPost,
        Operation::SearchPosts,
    ];

    pub fn descriptor(self) -> &'static EndpointDescriptor {
        match self {
            Operation::ListAllChats => &LIST_ALL_CHATS,
            Operation::ListChatMessages => &LIST_CHAT_MESSAGES,
            Operation::SendChatMessage => &SEND_CHAT_MESSAGE,
            Operation::RetrieveChat => &RETRIEVE_CHAT,
            Operation::ListAllMessages => &LIST_ALL_MESSAGES,
            Operation::ListAllAccounts => &LIST_ALL_ACCOUNTS,
            Operation::RetrieveAccount => &RETRIEVE_ACCOUNT,
            Operation::ListUserPosts => &LIST_USER_POSTS,
            Operation::RetrieveOwnProfile => &RETRIEVE_OWN_PROFILE,
            Operation::RetrievePost => &RETRIEVE_POST,
            Operation::ListPostComments => &LIST_POST_COMMENTS,
            Operation::CreatePost => &CREATE_POST,
            Operation::ListPostReactions => &LIST_POST_REACTIONS,
            Operation::CreatePostComment => &CREATE_POST_COMMENT,
            Operation::AddReactionToPost => &ADD_REACTION_TO_POST,
            Operation::SearchPosts => &SEARCH_POSTS,
        }
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ApiError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| ApiError::invalid_argument("tool", format!("unknown tool `{name}`")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::endpoint::{BodyPlacement, Location};

    #[test]
    fn names_are_unique_and_round_trip() {
        let names: HashSet<&str> = Operation::ALL.iter().map(|op| op.name()).collect();
        assert_eq!(names.len(), 16);
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn unknown_name_is_invalid_argument() {
        let err = "delete_everything".parse::<Operation>().unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument { .. }));
    }

    #[test]
    fn every_path_placeholder_has_a_path_param() {
        for op in Operation::ALL {
            let descriptor = op.descriptor();
            let placeholders: Vec<&str> = descriptor
                .path
                .split('/')
                .filter_map(|seg| seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
                .collect();
            let path_params: Vec<&str> = descriptor
                .params
                .iter()
                .filter(|p| p.location == Location::Path)
                .map(|p| p.name)
                .collect();
            assert_eq!(placeholders, path_params, "{op}");
        }
    }

    #[test]
    fn get_operations_have_no_body_fields() {
        for op in Operation::ALL {
            let descriptor = op.descriptor();
            if descriptor.method == HttpMethod::Get {
                assert!(
                    descriptor
                        .params
                        .iter()
                        .all(|p| !matches!(p.location, Location::Body(_))),
                    "{op}"
                );
                assert!(descriptor.fixed_body.is_empty(), "{op}");
            }
        }
    }

    #[test]
    fn comment_id_query_param_is_shared() {
        for op in [Operation::ListPostComments, Operation::ListPostReactions] {
            assert_eq!(op.descriptor().param("comment_id"), Some(&COMMENT_ID), "{op}");
        }
    }

    #[test]
    fn built_in_body_fields_merge() {
        for op in Operation::ALL {
            for param in op.descriptor().params {
                assert_ne!(param.location, Location::Body(BodyPlacement::Replace), "{op}: {}", param.name);
            }
        }
    }

    #[test]
    fn param_names_are_unique_per_operation() {
        for op in Operation::ALL {
            let params = op.descriptor().params;
            let names: HashSet<&str> = params.iter().map(|p| p.name).collect();
            assert_eq!(names.len(), params.len(), "{op}");
        }
    }
}
