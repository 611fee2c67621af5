//! Static metadata describing one remote operation.
//!
//! # Design
//! Every operation is data: an HTTP method, a path template with `{name}`
//! placeholders, and a parameter table saying where each argument goes on
//! the wire. One generic routine (`UnipileClient::build_request`) consumes
//! any descriptor, so the per-field placement (path, query, body; merge or
//! replace) is a declared, reviewable property instead of something that
//! emerges from conditional code.

use serde_json::{json, Map, Value};

use crate::http::HttpMethod;

/// How a body field combines with the fields assembled before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyPlacement {
    /// Insert alongside the other body fields.
    Merge,
    /// Discard every body field assembled so far and keep only this one.
    ///
    /// Reproduces the older comment payload where `mentions` overwrote the
    /// body; no built-in operation uses it.
    Replace,
}

/// Where a parameter lands in the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Path,
    Query,
    Body(BodyPlacement),
}

/// Accepted argument shape and its wire serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    String,
    Bool,
    Integer,
    /// An integer the remote API wants as a JSON string.
    IntegerString,
    Object,
    Array,
}

impl WireType {
    /// JSON Schema type name for the argument (not the wire form).
    pub fn schema_type(self) -> &'static str {
        match self {
            WireType::String => "string",
            WireType::Bool => "boolean",
            WireType::Integer | WireType::IntegerString => "integer",
            WireType::Object => "object",
            WireType::Array => "array",
        }
    }
}

/// One entry in an operation's parameter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Argument name as supplied by the caller.
    pub name: &'static str,
    /// Name emitted on the wire. Usually equal to `name`.
    pub wire_name: &'static str,
    pub location: Location,
    pub wire_type: WireType,
    pub required: bool,
    /// Closed set of accepted string values. Empty means unrestricted.
    pub choices: &'static [&'static str],
    pub description: &'static str,
}

impl ParamSpec {
    const fn new(name: &'static str, location: Location, wire_type: WireType) -> Self {
        Self {
            name,
            wire_name: name,
            location,
            wire_type,
            required: false,
            choices: &[],
            description: "",
        }
    }

    pub const fn path(name: &'static str) -> Self {
        Self::new(name, Location::Path, WireType::String).required()
    }

    pub const fn query(name: &'static str, wire_type: WireType) -> Self {
        Self::new(name, Location::Query, wire_type)
    }

    pub const fn body(name: &'static str, wire_type: WireType) -> Self {
        Self::new(name, Location::Body(BodyPlacement::Merge), wire_type)
    }

    pub const fn replacing_body(name: &'static str, wire_type: WireType) -> Self {
        Self::new(name, Location::Body(BodyPlacement::Replace), wire_type)
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    pub const fn wire(self, wire_name: &'static str) -> Self {
        Self { wire_name, ..self }
    }

    pub const fn choices(self, choices: &'static [&'static str]) -> Self {
        Self { choices, ..self }
    }

    pub const fn describe(self, description: &'static str) -> Self {
        Self {
            description,
            ..self
        }
    }
}

/// Static description of one remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub method: HttpMethod,
    /// Path relative to the base endpoint, e.g. `/api/v1/chats/{chat_id}`.
    pub path: &'static str,
    pub params: &'static [ParamSpec],
    /// Body fields that are always sent, placed before any argument.
    pub fixed_body: &'static [(&'static str, &'static str)],
    /// Message used when a successful response has no JSON body.
    pub fallback_message: &'static str,
}

pub const DEFAULT_FALLBACK_MESSAGE: &str = "Request processed.";

impl EndpointDescriptor {
    pub fn param(&self, name: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn required_params(&self) -> impl Iterator<Item = &'static ParamSpec> {
        self.params.iter().filter(|p| p.required)
    }

    /// JSON Schema for the operation's arguments, for tool discovery.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in self.params {
            let mut schema = Map::new();
            schema.insert("type".into(), json!(param.wire_type.schema_type()));
            if !param.description.is_empty() {
                schema.insert("description".into(), json!(param.description));
            }
            if !param.choices.is_empty() {
                schema.insert("enum".into(), json!(param.choices));
            }
            properties.insert(param.name.into(), Value::Object(schema));
        }
        let required: Vec<&str> = self.required_params().map(|p| p.name).collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: &[ParamSpec] = &[
        ParamSpec::path("chat_id"),
        ParamSpec::query("limit", WireType::Integer).describe("Page size"),
        ParamSpec::body("post_social_id", WireType::String)
            .wire("post_id")
            .required(),
        ParamSpec::body("reaction_type", WireType::String).choices(&["like", "love"]),
    ];

    const DESCRIPTOR: EndpointDescriptor = EndpointDescriptor {
        name: "sample",
        description: "Sample operation",
        tags: &["sample"],
        method: HttpMethod::Post,
        path: "/api/v1/chats/{chat_id}",
        params: PARAMS,
        fixed_body: &[],
        fallback_message: DEFAULT_FALLBACK_MESSAGE,
    };

    #[test]
    fn builders_set_fields() {
        let chat = DESCRIPTOR.param("chat_id").unwrap();
        assert_eq!(chat.location, Location::Path);
        assert!(chat.required);

        let post = DESCRIPTOR.param("post_social_id").unwrap();
        assert_eq!(post.wire_name, "post_id");
        assert_eq!(post.location, Location::Body(BodyPlacement::Merge));

        assert!(DESCRIPTOR.param("missing").is_none());
    }

    #[test]
    fn input_schema_lists_required_and_choices() {
        let schema = DESCRIPTOR.input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["chat_id", "post_social_id"]));
        assert_eq!(schema["properties"]["limit"]["type"], "integer");
        assert_eq!(schema["properties"]["limit"]["description"], "Page size");
        assert_eq!(
            schema["properties"]["reaction_type"]["enum"],
            json!(["like", "love"])
        );
        assert!(schema["properties"]["chat_id"].get("enum").is_none());
    }

    #[test]
    fn integer_string_advertises_integer() {
        assert_eq!(WireType::IntegerString.schema_type(), "integer");
    }
}
