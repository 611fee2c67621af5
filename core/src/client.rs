//! Stateless HTTP request builder and response parser for the Unipile API.
//!
//! # Design
//! `UnipileClient` holds only the resolved base endpoint and API key and
//! carries no mutable state between calls. Every operation goes through the
//! same two steps: `build_request` turns an `EndpointDescriptor` plus
//! `CallArgs` into an `HttpRequest`, and `parse_response` turns the
//! `HttpResponse` into a JSON value. The round-trip in between belongs to a
//! `Transport`, keeping this module deterministic and free of I/O.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::args::CallArgs;
use crate::config::ClientConfig;
use crate::endpoint::{BodyPlacement, EndpointDescriptor, Location, ParamSpec, WireType};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::operations::Operation;

/// Synchronous, stateless request builder for the Unipile API.
#[derive(Debug, Clone)]
pub struct UnipileClient {
    config: ClientConfig,
    base: Url,
}

impl UnipileClient {
    /// Fails with `ApiError::Configuration` if the base endpoint is not an
    /// absolute URL that can carry a path, or if it has a query or fragment.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let base = Url::parse(config.base_url())
            .map_err(|e| ApiError::configuration(format!("invalid base URL `{}`: {e}", config.base_url())))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::configuration(format!(
                "base URL `{}` cannot carry a path",
                config.base_url()
            )));
        }
        if base.query().is_some() || base.fragment().is_some() {
            return Err(ApiError::configuration(format!(
                "base URL `{}` must not carry a query or fragment",
                config.base_url()
            )));
        }
        Ok(Self { config, base })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build(&self, operation: Operation, args: &CallArgs) -> Result<HttpRequest, ApiError> {
        self.build_request(operation.descriptor(), args)
    }

    pub fn parse(&self, operation: Operation, response: HttpResponse) -> Result<Value, ApiError> {
        self.parse_response(operation.descriptor(), response)
    }

    /// Build the request for `descriptor` from `args`.
    ///
    /// Arguments the descriptor does not declare, required parameters that
    /// are not provided, and values of the wrong shape are all rejected with
    /// `ApiError::InvalidArgument`.
    pub fn build_request(&self, descriptor: &EndpointDescriptor, args: &CallArgs) -> Result<HttpRequest, ApiError> {
        for name in args.names() {
            if descriptor.param(name).is_none() {
                return Err(ApiError::invalid_argument(
                    name,
                    format!("not a parameter of `{}`", descriptor.name),
                ));
            }
        }

        let mut values = Vec::with_capacity(descriptor.params.len());
        for param in descriptor.params {
            match args.get(param.name) {
                Some(value) => values.push((param, wire_value(param, value)?)),
                None if param.required => {
                    return Err(ApiError::invalid_argument(param.name, "missing required parameter"));
                }
                None => {}
            }
        }

        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ApiError::configuration("base URL cannot carry a path"))?;
            segments.pop_if_empty();
            for segment in descriptor.path.split('/').filter(|s| !s.is_empty()) {
                match placeholder(segment) {
                    Some(name) => {
                        let value = values
                            .iter()
                            .find(|(p, _)| p.location == Location::Path && p.name == name)
                            .map(|(_, v)| text(v))
                            .ok_or_else(|| ApiError::invalid_argument(name, "missing path parameter"))?;
                        // `push` drops dot segments, which would resolve to another endpoint.
                        if value == "." || value == ".." {
                            return Err(ApiError::invalid_argument(
                                name,
                                format!("`{value}` is not a valid path segment"),
                            ));
                        }
                        segments.push(&value);
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }

        let query: Vec<(&str, String)> = values
            .iter()
            .filter(|(p, _)| p.location == Location::Query)
            .map(|(p, v)| (p.wire_name, text(v)))
            .collect();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let body = match descriptor.method {
            HttpMethod::Get => None,
            HttpMethod::Post => Some(body(descriptor, &values)?),
        };

        let request = HttpRequest {
            method: descriptor.method,
            url: url.into(),
            headers: vec![
                ("x-api-key".to_string(), self.config.api_key().expose().to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Cache-Control".to_string(), "no-cache".to_string()),
            ],
            body,
        };
        debug!(
            operation = descriptor.name,
            method = %request.method,
            url = %request.url,
            "built request"
        );
        Ok(request)
    }

    /// Interpret a response for `descriptor`.
    ///
    /// Non-2xx statuses become `ApiError::Http`. A 2xx response yields its
    /// JSON body unchanged, or `{"status": <code>, "message": <text>}` when
    /// the body is empty or not JSON.
    pub fn parse_response(&self, descriptor: &EndpointDescriptor, response: HttpResponse) -> Result<Value, ApiError> {
        debug!(operation = descriptor.name, status = response.status, "received response");
        if !response.is_success() {
            return Err(ApiError::Http {
                status: response.status,
                body: response.body,
            });
        }
        if response.body.trim().is_empty() {
            warn!(
                operation = descriptor.name,
                status = response.status,
                "empty response body, returning status message"
            );
            return Ok(fallback(descriptor, response.status));
        }
        match serde_json::from_str(&response.body) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(
                    operation = descriptor.name,
                    status = response.status,
                    error = %e,
                    "response body is not JSON, returning status message"
                );
                Ok(fallback(descriptor, response.status))
            }
        }
    }
}

fn fallback(descriptor: &EndpointDescriptor, status: u16) -> Value {
    json!({
        "status": status,
        "message": descriptor.fallback_message,
    })
}

fn placeholder(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

fn body(descriptor: &EndpointDescriptor, values: &[(&ParamSpec, Value)]) -> Result<String, ApiError> {
    let mut body = Map::new();
    for (key, value) in descriptor.fixed_body {
        body.insert(key.to_string(), Value::String(value.to_string()));
    }
    for (param, value) in values {
        match param.location {
            Location::Body(BodyPlacement::Merge) => {}
            Location::Body(BodyPlacement::Replace) => body.clear(),
            Location::Path | Location::Query => continue,
        }
        body.insert(param.wire_name.to_string(), value.clone());
    }
    serde_json::to_string(&body).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Check `value` against the declared wire type and return its wire form.
fn wire_value(param: &ParamSpec, value: &Value) -> Result<Value, ApiError> {
    let mismatch = || {
        ApiError::invalid_argument(
            param.name,
            format!("expected {}, got {value}", param.wire_type.schema_type()),
        )
    };
    match param.wire_type {
        WireType::String => {
            let s = value.as_str().ok_or_else(mismatch)?;
            if !param.choices.is_empty() && !param.choices.contains(&s) {
                return Err(ApiError::invalid_argument(
                    param.name,
                    format!("`{s}` is not one of {:?}", param.choices),
                ));
            }
            Ok(value.clone())
        }
        WireType::Bool if value.is_boolean() => Ok(value.clone()),
        WireType::Integer if value.is_i64() || value.is_u64() => Ok(value.clone()),
        WireType::IntegerString => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::String(n.to_string())),
            Value::String(s) if s.parse::<i64>().is_ok() => Ok(value.clone()),
            _ => Err(mismatch()),
        },
        WireType::Object if value.is_object() => Ok(value.clone()),
        WireType::Array if value.is_array() => Ok(value.clone()),
        _ => Err(mismatch()),
    }
}

/// Text form used for path segments and query values.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
