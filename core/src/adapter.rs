//! Build, send, normalize: one outbound call per invocation.

use serde_json::Value;
use tracing::{info_span, instrument};

use crate::args::CallArgs;
use crate::client::UnipileClient;
use crate::config::{ClientConfig, CredentialProvider};
use crate::endpoint::EndpointDescriptor;
use crate::error::ApiError;
use crate::operations::Operation;
use crate::tools::ToolInfo;
use crate::transport::Transport;
use crate::types::*;

/// Request adapter over an injected `Transport`.
///
/// Credentials are resolved at construction; afterwards the adapter holds no
/// mutable state and can be shared across threads.
#[derive(Debug, Clone)]
pub struct UnipileAdapter<T> {
    client: UnipileClient,
    transport: T,
}

impl<T: Transport> UnipileAdapter<T> {
    pub fn new(config: ClientConfig, transport: T) -> Result<Self, ApiError> {
        Ok(Self {
            client: UnipileClient::new(config)?,
            transport,
        })
    }

    /// Resolve credentials once and build the adapter.
    pub fn from_provider(provider: &dyn CredentialProvider, transport: T) -> Result<Self, ApiError> {
        Self::new(ClientConfig::from_provider(provider)?, transport)
    }

    pub fn client(&self) -> &UnipileClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Every callable operation, in registration order.
    pub fn list_tools(&self) -> &'static [Operation] {
        &Operation::ALL
    }

    pub fn tool_info(&self) -> Vec<ToolInfo> {
        self.list_tools().iter().copied().map(ToolInfo::from).collect()
    }

    pub fn call(&self, operation: Operation, args: &CallArgs) -> Result<Value, ApiError> {
        self.call_descriptor(operation.descriptor(), args)
    }

    /// Invoke a tool by name with host-supplied JSON arguments.
    #[instrument(skip(self, args))]
    pub fn call_tool(&self, name: &str, args: Value) -> Result<Value, ApiError> {
        let operation: Operation = name.parse()?;
        self.call(operation, &CallArgs::from_json(args)?)
    }

    pub fn call_descriptor(&self, descriptor: &EndpointDescriptor, args: &CallArgs) -> Result<Value, ApiError> {
        let _span = info_span!("unipile_call", operation = descriptor.name).entered();
        let request = self.client.build_request(descriptor, args)?;
        let response = self.transport.send(&request)?;
        self.client.parse_response(descriptor, response)
    }

    pub fn invoke<P: OperationParams>(&self, params: &P) -> Result<Value, ApiError> {
        self.call(P::OPERATION, &CallArgs::from_params(params)?)
    }

    pub fn list_all_chats(&self, params: &ListAllChats) -> Result<Value, ApiError> {
        self.invoke(params)
    }

    pub fn list_chat_messages(&self, params: &ListChatMessages) -> Result<Value, ApiError> {
        self.invoke(params)
    }

    pub fn send_chat_message(&self, params: &SendChatMessage) -> Result<Value, ApiError> {
        self.invoke(params)
    }

    pub fn retrieve_chat(&self, params: &RetrieveChat) -> Result<Value, ApiError> {
        self.invoke(params)
    }

    pub fn list_all_messages(&self, params: &ListAllMessages) -> Result<Value, ApiError> {
        self.invoke(params)
    }

    pub fn list_all_accounts(&self, params: &ListAllAccounts) -> Result<Value, ApiError> {
        self.invoke(params)
    }

    pub fn retrieve_account(&self, params: &RetrieveAccount) -> Result<Value, ApiError> {
        self.invoke(params)
    }

    pub fn list_user_posts(&self, params: &ListUserPosts) -> Result<Value, ApiError> {
        self.invoke(params)
    }

    pub fn retrieve_own_profile(&self, params: &RetrieveOwnProfile) -> Result<Value, ApiError> {
        self.invoke(params)
    }

    pub fn retrieve_post(&self, params: &RetrievePost) -> Result<Value, ApiError> {
        self.invoke(params)
    }

    pub fn list_post_comments(&self, params: &ListPostComments) -> Result<Value, ApiError> {
        self.invoke(params)
    }

    pub fn create_post(&self, params: &CreatePost) -> Result<Value, ApiError> {
        self.invoke(params)
    }

    pub fn list_post_reactions(&self, params: &ListPostReactions) -> Result<Value, ApiError> {
        self.invoke(params)
    }

    pub fn create_post_comment(&self, params: &CreatePostComment) -> Result<Value, ApiError> {
        self.invoke(params)
    }

    pub fn add_reaction_to_post(&self, params: &AddReactionToPost) -> Result<Value, ApiError> {
        self.invoke(params)
    }

    pub fn search_posts(&self, params: &SearchPosts) -> Result<Value, ApiError> {
        self.invoke(params)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::config::{ApiKey, StaticCredentials};
    use crate::http::{HttpRequest, HttpResponse};

    /// Records every request and replays scripted responses.
    #[derive(Debug, Default)]
    struct ScriptedTransport {
        sent: Mutex<Vec<HttpRequest>>,
        replies: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
    }

    impl ScriptedTransport {
        fn replying(status: u16, body: &str) -> Self {
            let transport = Self::default();
            transport.push(Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }));
            transport
        }

        fn push(&self, reply: Result<HttpResponse, ApiError>) {
            self.replies.lock().unwrap().push_back(reply);
        }

        fn sent(&self) -> Vec<HttpRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Transport for ScriptedTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.sent.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport("no scripted reply".to_string())))
        }
    }

    fn adapter(transport: ScriptedTransport) -> UnipileAdapter<ScriptedTransport> {
        UnipileAdapter::new(ClientConfig::new("http://unipile.test", ApiKey::new("k")), transport).unwrap()
    }

    #[test]
    fn typed_call_sends_one_request_and_returns_json() {
        let adapter = adapter(ScriptedTransport::replying(200, r#"{"object":"ChatList","items":[]}"#));
        let result = adapter
            .list_all_chats(&ListAllChats {
                unread: Some(true),
                limit: Some(50),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(result, json!({"object": "ChatList", "items": []}));

        let sent = adapter.transport().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "http://unipile.test/api/v1/chats?unread=true&limit=50");
    }

    #[test]
    fn invalid_arguments_never_reach_the_transport() {
        let adapter = adapter(ScriptedTransport::default());
        let err = adapter
            .call_tool("retrieve_post", json!({"post_id": "p1"}))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument { .. }));
        assert!(adapter.transport().sent().is_empty());
    }

    #[test]
    fn unknown_tool_never_reaches_the_transport() {
        let adapter = adapter(ScriptedTransport::default());
        let err = adapter.call_tool("delete_account", json!({})).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument { .. }));
        assert!(adapter.transport().sent().is_empty());
    }

    #[test]
    fn transport_errors_propagate_unchanged() {
        let transport = ScriptedTransport::default();
        transport.push(Err(ApiError::Transport("connection refused".to_string())));
        let adapter = adapter(transport);
        let err = adapter
            .retrieve_account(&RetrieveAccount {
                account_id: "acc_123".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(ref msg) if msg == "connection refused"));
        assert_eq!(adapter.transport().sent().len(), 1);
    }

    #[test]
    fn http_error_status_is_not_retried() {
        let adapter = adapter(ScriptedTransport::replying(503, "unavailable"));
        let err = adapter.call(Operation::ListAllAccounts, &CallArgs::new()).unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(adapter.transport().sent().len(), 1);
    }

    #[test]
    fn empty_success_body_becomes_status_message() {
        let adapter = adapter(ScriptedTransport::replying(201, ""));
        let result = adapter
            .add_reaction_to_post(&AddReactionToPost {
                post_social_id: "urn:li:activity:1".to_string(),
                reaction_type: ReactionType::Like,
                account_id: "A1".to_string(),
                comment_id: None,
            })
            .unwrap();
        assert_eq!(result, json!({"status": 201, "message": "Reaction action processed."}));
    }

    #[test]
    fn missing_api_key_fails_before_any_request() {
        let provider = StaticCredentials::new([("subdomain", "api8"), ("port", "13851")]);
        let transport = ScriptedTransport::default();
        let err = UnipileAdapter::from_provider(&provider, &transport).unwrap_err();
        assert!(matches!(err, ApiError::Configuration { .. }));
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn list_tools_matches_registration_order() {
        let adapter = adapter(ScriptedTransport::default());
        let names: Vec<&str> = adapter.list_tools().iter().map(|op| op.name()).collect();
        assert_eq!(names.first(), Some(&"list_all_chats"));
        assert_eq!(names.last(), Some(&"search_posts"));
        assert_eq!(names.len(), 16);
        assert_eq!(adapter.tool_info().len(), 16);
    }
}
