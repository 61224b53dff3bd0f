//! Stateless JSON-RPC dispatcher shared by every resource server.
//!
//! One dispatcher is parameterised by a [`ToolRegistry`], the scope its domain
//! requires and a [`ScopePolicy`]; adding a tool domain is a matter of registering
//! tools, not of writing another protocol handler.

use axum::http::{HeaderMap, StatusCode};
use serde_json::{Map, Value, json};

use super::scope::ScopePolicy;
use crate::config::ResourceConfig;
use crate::error::RpcError;
use crate::models::{CallerIdentity, JsonRpcRequest, JsonRpcResponse, ToolInfo};
use crate::tools::ToolRegistry;

/// MCP protocol revision announced by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC dispatcher for one tool domain.
#[derive(Debug)]
pub struct Dispatcher {
    server_name: String,
    registry: ToolRegistry,
    domain_scope: String,
    policy: ScopePolicy,
    default_scope: String,
    strict_identity: bool,
}

impl Dispatcher {
    /// Dispatcher whose default scope is the domain scope, with the standard aliases.
    #[must_use]
    pub fn new(server_name: impl Into<String>, registry: ToolRegistry, domain_scope: impl Into<String>) -> Self {
        let domain_scope = domain_scope.into();
        Self {
            server_name: server_name.into(),
            registry,
            default_scope: domain_scope.clone(),
            domain_scope,
            policy: ScopePolicy::standard(),
            strict_identity: false,
        }
    }

    /// Dispatcher for a configured resource server.
    #[must_use]
    pub fn from_config(config: &ResourceConfig) -> Self {
        let domain = config.domain;
        Self::new(domain.service_name(), domain.registry(), domain.required_scope())
            .with_default_scope(&config.default_scope)
            .strict(config.strict_identity)
    }

    #[must_use]
    pub fn with_policy(mut self, policy: ScopePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_default_scope(mut self, scope: impl Into<String>) -> Self {
        self.default_scope = scope.into();
        self
    }

    /// In strict mode a missing scope header means no scopes.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_identity = strict;
        self
    }

    #[must_use]
    pub const fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    #[must_use]
    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// Caller identity from forwarded headers, with this server's defaults.
    #[must_use]
    pub fn caller(&self, headers: &HeaderMap) -> CallerIdentity {
        CallerIdentity::from_headers(headers, &self.default_scope, self.strict_identity)
    }

    /// Handle a raw request body.
    ///
    /// A body that is not a JSON-RPC request is the only HTTP-level failure (400);
    /// every other outcome is 200 with a JSON-RPC result or error.
    pub async fn dispatch(&self, body: &[u8], caller: &CallerIdentity) -> (StatusCode, JsonRpcResponse) {
        match serde_json::from_slice::<JsonRpcRequest>(body) {
            Ok(request) => (StatusCode::OK, self.handle(request, caller).await),
            Err(e) => {
                tracing::debug!(error = %e, "Rejecting unparseable JSON-RPC body");
                (StatusCode::BAD_REQUEST, JsonRpcResponse::error(None, &RpcError::Parse(e.to_string())))
            }
        }
    }

    /// Handle a parsed request.
    pub async fn handle(&self, request: JsonRpcRequest, caller: &CallerIdentity) -> JsonRpcResponse {
        tracing::debug!(method = %request.method, sub = %caller.sub, "Handling JSON-RPC request");

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.initialize()),
            "tools/list" => Ok(self.tools_list()),
            "tools/call" => self.tools_call(&request.params, caller).await,
            other => Err(RpcError::UnknownMethod(other.to_string())),
        };

        match outcome {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(err) => {
                tracing::info!(method = %request.method, code = err.code(), error = %err, "JSON-RPC error");
                JsonRpcResponse::error(Some(request.id), &err)
            }
        }
    }

    fn initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": self.server_name,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    fn tools_list(&self) -> Value {
        let tools: Vec<ToolInfo> = self
            .registry
            .list()
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema_json().clone(),
            })
            .collect();

        json!({ "tools": tools })
    }

    async fn tools_call(&self, params: &Map<String, Value>, caller: &CallerIdentity) -> Result<Value, RpcError> {
        // Domain scope is checked before the tool name is resolved.
        self.policy.check(&self.domain_scope, &caller.scopes)?;

        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::InvalidParams("Missing 'name' parameter".to_string()))?;

        let empty = Map::new();
        let arguments = match params.get("arguments") {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(arguments)) => arguments,
            Some(_) => return Err(RpcError::InvalidParams("'arguments' must be an object".to_string())),
        };

        let tool = self.registry.resolve(name).ok_or_else(|| RpcError::UnknownTool(name.to_string()))?;

        if tool.required_scope() != self.domain_scope {
            self.policy.check(tool.required_scope(), &caller.scopes)?;
        }

        let args = tool.schema().coerce(arguments)?;

        tracing::info!(tool = %name, sub = %caller.sub, "Executing tool");
        let text = tool.call(&args).await;

        Ok(json!({
            "content": [{
                "type": "text",
                "text": text
            }],
            "user": caller.user_json()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{AddTool, ToolDomain, WeatherAlertsTool};

    fn caller(scopes: &str) -> CallerIdentity {
        CallerIdentity {
            sub: "u1".into(),
            email: "u1@example.com".into(),
            roles: vec![],
            scopes: scopes.split_whitespace().map(String::from).collect(),
        }
    }

    fn calculator() -> Dispatcher {
        Dispatcher::new("calc", ToolDomain::Calculator.registry(), "calculator:read")
    }

    async fn call(dispatcher: &Dispatcher, body: Value, scopes: &str) -> (StatusCode, Value) {
        let (status, response) = dispatcher.dispatch(body.to_string().as_bytes(), &caller(scopes)).await;
        (status, serde_json::to_value(response).unwrap())
    }

    #[tokio::test]
    async fn test_add_returns_text_and_user() {
        let body = json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call",
                          "params": {"name": "add", "arguments": {"a": 2, "b": 3}}});
        let (status, value) = call(&calculator(), body, "calculator:read").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["result"]["content"][0]["type"], "text");
        assert!(value["result"]["content"][0]["text"].as_str().unwrap().contains("Result: 5"));
        assert_eq!(value["result"]["user"], json!({"sub": "u1", "email": "u1@example.com"}));
    }

    #[tokio::test]
    async fn test_scope_is_checked_before_tool_lookup() {
        let body = json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call",
                          "params": {"name": "does-not-exist"}});
        let (_, value) = call(&calculator(), body, "weather:read").await;
        assert_eq!(value["error"]["code"], -32600);
    }

    #[tokio::test]
    async fn test_missing_name_is_invalid_params() {
        let body = json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {}});
        let (_, value) = call(&calculator(), body, "openid").await;
        assert_eq!(value["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_non_object_arguments() {
        let body = json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call",
                          "params": {"name": "add", "arguments": [2, 3]}});
        let (_, value) = call(&calculator(), body, "calculator:read").await;
        assert_eq!(value["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_per_tool_scope_is_enforced() {
        let registry = ToolRegistry::new().register(AddTool, "weather:read").register(WeatherAlertsTool, "weather:alerts");
        let dispatcher = Dispatcher::new("weather", registry, "weather:read");

        let body = json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call",
                          "params": {"name": "get_weather_alerts"}});
        let (_, value) = call(&dispatcher, body.clone(), "weather:read").await;
        assert_eq!(value["error"]["data"], "Required scope: weather:alerts");

        let (_, value) = call(&dispatcher, body, "weather:read weather:alerts").await;
        assert!(value["result"].is_object());
    }

    #[tokio::test]
    async fn test_policy_without_aliases() {
        let dispatcher = calculator().with_policy(ScopePolicy::new());
        let body = json!({"jsonrpc": "2.0", "id": 6, "method": "tools/call",
                          "params": {"name": "add", "arguments": {"a": 1, "b": 1}}});
        let (_, value) = call(&dispatcher, body, "openid").await;
        assert_eq!(value["error"]["code"], -32600);
    }

    #[test]
    fn test_caller_uses_server_defaults() {
        let dispatcher = calculator().with_default_scope("openid");
        assert_eq!(dispatcher.caller(&HeaderMap::new()).scopes, ["openid"]);
        assert!(calculator().strict(true).caller(&HeaderMap::new()).scopes.is_empty());
    }
}
