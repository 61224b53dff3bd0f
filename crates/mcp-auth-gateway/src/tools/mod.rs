//! MCP tool implementations and the per-domain registry.
//!
//! Each tool provides:
//! 1. A name, description and input schema for `tools/list`
//! 2. A handler that receives schema-validated arguments and returns text
//!
//! Handlers never fail at the protocol level. Domain errors (division by zero,
//! negative square roots) are part of the returned text.

mod calculator;
mod schema;
mod weather;

pub use calculator::*;
pub use schema::{ArgKind, ArgSpec, ArgValue, InputSchema, ToolArguments};
pub use weather::*;

/// Trait for MCP tools.
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Tool name (e.g., "add").
    fn name(&self) -> &'static str;

    /// Tool description for LLM.
    fn description(&self) -> &'static str;

    /// Input schema, used for both publication and validation.
    fn input_schema(&self) -> InputSchema;

    /// Execute the tool with validated arguments.
    async fn execute(&self, args: &ToolArguments) -> String;
}

/// A registered tool.
pub struct ToolDescriptor {
    name: &'static str,
    description: &'static str,
    schema: InputSchema,
    schema_json: serde_json::Value,
    required_scope: String,
    handler: Box<dyn McpTool>,
}

impl ToolDescriptor {
    fn new(handler: Box<dyn McpTool>, required_scope: String) -> Self {
        let schema = handler.input_schema();
        Self {
            name: handler.name(),
            description: handler.description(),
            schema_json: schema.to_json(),
            schema,
            required_scope,
            handler,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    #[must_use]
    pub const fn schema(&self) -> &InputSchema {
        &self.schema
    }

    /// JSON Schema as published.
    #[must_use]
    pub const fn input_schema_json(&self) -> &serde_json::Value {
        &self.schema_json
    }

    /// Scope a caller needs to invoke this tool.
    #[must_use]
    pub fn required_scope(&self) -> &str {
        &self.required_scope
    }

    /// Run the handler.
    pub async fn call(&self, args: &ToolArguments) -> String {
        self.handler.execute(args).await
    }
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("required_scope", &self.required_scope)
            .finish()
    }
}

/// Tools of one resource server, in registration order.
///
/// Built at start-up and read-only afterwards.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
}

impl ToolRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool requiring `scope`. A second tool with the same name is
    /// ignored.
    #[must_use]
    pub fn register(mut self, tool: impl McpTool + 'static, scope: &str) -> Self {
        if self.resolve(tool.name()).is_some() {
            tracing::warn!(tool = tool.name(), "Duplicate tool registration ignored");
            return self;
        }
        self.tools.push(ToolDescriptor::new(Box::new(tool), scope.to_string()));
        self
    }

    /// All tools in registration order.
    #[must_use]
    pub fn list(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Look up a tool by name.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Tool names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Tool domains, one resource server each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ToolDomain {
    /// Arithmetic tools
    Calculator,
    /// Mock weather tools
    Weather,
}

impl ToolDomain {
    /// Scope every tool of the domain requires.
    #[must_use]
    pub const fn required_scope(self) -> &'static str {
        match self {
            Self::Calculator => "calculator:read",
            Self::Weather => "weather:read",
        }
    }

    /// Service identifier used in `initialize` and `/health`.
    #[must_use]
    pub const fn service_name(self) -> &'static str {
        match self {
            Self::Calculator => "mcp-calculator-server",
            Self::Weather => "mcp-weather-server",
        }
    }

    /// Human-readable name for `/info`.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Calculator => "MCP Calculator Server",
            Self::Weather => "MCP Weather Server",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Calculator => "Calculator MCP server - Stateless Resource Server",
            Self::Weather => "Weather data MCP server - Stateless Resource Server",
        }
    }

    /// Default listening port.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Calculator => 8001,
            Self::Weather => 8002,
        }
    }

    /// Registry with all tools of the domain.
    #[must_use]
    pub fn registry(self) -> ToolRegistry {
        let scope = self.required_scope();
        match self {
            Self::Calculator => ToolRegistry::new()
                .register(AddTool, scope)
                .register(SubtractTool, scope)
                .register(MultiplyTool, scope)
                .register(DivideTool, scope)
                .register(PowerTool, scope)
                .register(SqrtTool, scope),
            Self::Weather => ToolRegistry::new()
                .register(WeatherForecastTool, scope)
                .register(WeatherAlertsTool, scope)
                .register(UvIndexTool, scope),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculator_registration_order() {
        let registry = ToolDomain::Calculator.registry();
        assert_eq!(registry.names(), ["add", "subtract", "multiply", "divide", "power", "sqrt"]);
        assert!(registry.list().iter().all(|t| t.required_scope() == "calculator:read"));
    }

    #[test]
    fn test_weather_registration_order() {
        let registry = ToolDomain::Weather.registry();
        assert_eq!(registry.names(), ["get_weather_forecast", "get_weather_alerts", "get_uv_index"]);
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = ToolDomain::Calculator.registry();
        assert!(registry.resolve("add").is_some());
        assert!(registry.resolve("modulo").is_none());
    }

    #[test]
    fn test_duplicate_registration_is_ignored() {
        let registry = ToolRegistry::new().register(AddTool, "a").register(AddTool, "b");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.list()[0].required_scope(), "a");
    }
}
