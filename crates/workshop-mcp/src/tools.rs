use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::args::Arguments;
use crate::content::ToolOutput;
use crate::error::{RegistryError, ToolError};

/// Definition of an MCP tool as listed by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: InputSchema,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: InputSchema) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// JSON-Schema-like description of a tool's arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: IndexMap<String, PropertySchema>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl InputSchema {
    /// An object schema without properties.
    pub fn object() -> Self {
        Self {
            kind: "object".to_string(),
            properties: IndexMap::new(),
            required: Vec::new(),
        }
    }

    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: PropertySchema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    #[must_use]
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    /// First name listed in `required` that has no entry in `properties`.
    pub fn undeclared_required(&self) -> Option<&str> {
        self.required
            .iter()
            .map(String::as_str)
            .find(|name| !self.properties.contains_key(*name))
    }
}

/// JSON type of a single property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Integer,
    Boolean,
}

/// Schema of one tool argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: PropertyType,
    pub description: String,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl PropertySchema {
    pub fn new(kind: PropertyType, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            allowed: None,
            default: None,
        }
    }

    pub fn string(description: impl Into<String>) -> Self {
        Self::new(PropertyType::String, description)
    }

    pub fn number(description: impl Into<String>) -> Self {
        Self::new(PropertyType::Number, description)
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self::new(PropertyType::Integer, description)
    }

    #[must_use]
    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.allowed = Some(values.iter().map(ToString::to_string).collect());
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// A callable unit exposed through `tools/call`.
///
/// Tools receive their read-only collaborator data at construction time.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and input schema. Must be stable across calls.
    fn definition(&self) -> ToolDefinition;

    /// Validate `args` and run the tool.
    async fn execute(&self, args: &Arguments) -> Result<ToolOutput, ToolError>;
}

struct RegisteredTool {
    definition: ToolDefinition,
    tool: Box<dyn Tool>,
}

/// Ordered set of the tools one server exposes.
#[derive(Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool, keeping registration order.
    ///
    /// # Errors
    ///
    /// Fails if the name is already taken or the schema requires a property
    /// it does not declare.
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<(), RegistryError> {
        let definition = tool.definition();

        if let Some(property) = definition.input_schema.undeclared_required() {
            return Err(RegistryError::UndeclaredRequired {
                tool: definition.name.clone(),
                property: property.to_string(),
            });
        }
        if self.tools.contains_key(&definition.name) {
            return Err(RegistryError::DuplicateTool(definition.name));
        }

        tracing::debug!(tool = %definition.name, "registered tool");
        self.tools.insert(
            definition.name.clone(),
            RegisteredTool {
                definition,
                tool: Box::new(tool),
            },
        );
        Ok(())
    }

    /// Builder-style [`ToolRegistry::register`].
    ///
    /// # Errors
    ///
    /// See [`ToolRegistry::register`].
    pub fn with(mut self, tool: impl Tool + 'static) -> Result<Self, RegistryError> {
        self.register(tool)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|entry| entry.tool.as_ref())
    }

    /// Definitions for `tools/list`, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|entry| entry.definition.clone()).collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct Echo {
        name: &'static str,
        schema: InputSchema,
    }

    #[async_trait]
    impl Tool for Echo {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new(self.name, "Echo the arguments back.", self.schema.clone())
        }

        async fn execute(&self, args: &Arguments) -> Result<ToolOutput, ToolError> {
            Ok(ToolOutput::json(args)?)
        }
    }

    fn echo(name: &'static str) -> Echo {
        Echo {
            name,
            schema: InputSchema::object()
                .property("message", PropertySchema::string("Text to echo"))
                .required("message"),
        }
    }

    #[test]
    fn definitions_keep_registration_order() {
        let registry = ToolRegistry::new()
            .with(echo("zeta"))
            .and_then(|r| r.with(echo("alpha")))
            .and_then(|r| r.with(echo("mid")))
            .unwrap();

        let names: Vec<String> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert_eq!(registry.names().collect::<Vec<_>>(), ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("echo")).unwrap();

        let err = registry.register(echo("echo")).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTool(name) if name == "echo"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn required_must_be_declared() {
        let tool = Echo {
            name: "broken",
            schema: InputSchema::object().required("ghost"),
        };

        let err = ToolRegistry::new().register(tool).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn schema_serializes_like_json_schema() {
        let schema = InputSchema::object()
            .property(
                "period",
                PropertySchema::string("Analysis period")
                    .one_of(&["day", "week", "month"])
                    .default_value("week"),
            )
            .property("limit", PropertySchema::number("How many").default_value(10));

        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["type"], "object");
        assert_eq!(json["properties"]["period"]["enum"], json!(["day", "week", "month"]));
        assert_eq!(json["properties"]["period"]["default"], "week");
        assert_eq!(json["properties"]["limit"]["type"], "number");
        assert_eq!(json["required"], json!([]));
        assert!(json["properties"]["limit"].get("enum").is_none());
    }

    #[test]
    fn definition_uses_input_schema_key() {
        let json = serde_json::to_string(&echo("echo").definition()).unwrap();
        assert!(json.contains("inputSchema"));
    }

    #[tokio::test]
    async fn lookup_and_execute() {
        let registry = ToolRegistry::new().with(echo("echo")).unwrap();
        let tool = registry.get("echo").unwrap();
        assert!(registry.get("other").is_none());

        let args = Arguments::from_params(Some(&json!({"message": "hi"})));
        let output = tool.execute(&args).await.unwrap();
        assert_eq!(output, ToolOutput::Value(json!({"message": "hi"})));
    }
}
