//! Request adapter for the Unipile messaging and social API.
//!
//! # Overview
//! Sixteen remote operations (chats, messages, accounts, posts, comments,
//! reactions, profile, search) are described as static `EndpointDescriptor`
//! data and consumed by one generic build/parse routine. A host tool
//! framework discovers them through the tool registry and invokes them by
//! name with JSON arguments; Rust callers use the typed methods on
//! `UnipileAdapter`.
//!
//! # Design
//! - `UnipileClient` is stateless: it holds the resolved base endpoint and
//!   API key, builds `HttpRequest` values and parses `HttpResponse` values
//!   without touching the network.
//! - `UnipileAdapter` pairs a client with an injected `Transport` and makes
//!   exactly one outbound call per invocation. No retry, no caching.
//! - Credentials are resolved once at construction. Missing values surface
//!   as `ApiError::Configuration` before any request is built.

pub mod adapter;
pub mod args;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod operations;
pub mod tools;
pub mod transport;
pub mod types;

pub use adapter::UnipileAdapter;
pub use args::CallArgs;
pub use client::UnipileClient;
pub use config::{ApiKey, ClientConfig, CredentialProvider, EnvCredentials, StaticCredentials};
pub use endpoint::{BodyPlacement, EndpointDescriptor, Location, ParamSpec, WireType};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use operations::Operation;
pub use tools::ToolInfo;
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::*;
