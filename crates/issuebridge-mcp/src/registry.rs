//! Tool registry and declarative parameter schemas.
//!
//! Each tool declares its parameters once; the same declaration drives
//! the JSON Schema advertised on `tools/list` and the argument check run
//! before a handler is invoked. The tool set is fixed at startup.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use issuebridge_core::{Error, Result};
use serde_json::{Map, Value};

use crate::protocol::{ToolCallResult, ToolDefinition};

/// Declared type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// A JSON string
    Text,
    /// A JSON array of strings
    TextList,
}

/// One declared tool parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ParamKind,
    pub required: bool,
}

/// Declarative description of a tool.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
}

impl ToolSpec {
    /// Render the parameter declarations as a JSON Schema object.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &self.params {
            let schema = match param.kind {
                ParamKind::Text => serde_json::json!({
                    "type": "string",
                    "description": param.description,
                }),
                ParamKind::TextList => serde_json::json!({
                    "type": "array",
                    "items": { "type": "string" },
                    "description": param.description,
                }),
            };
            properties.insert(param.name.to_string(), schema);
            if param.required {
                required.push(Value::String(param.name.to_string()));
            }
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Check that every required parameter is present and non-null.
    ///
    /// Presence-only validation; type mismatches surface when the handler
    /// parses the arguments.
    pub fn validate(&self, args: &Map<String, Value>) -> Result<()> {
        for param in &self.params {
            if !param.required {
                continue;
            }
            match args.get(param.name) {
                Some(value) if !value.is_null() => {}
                _ => {
                    return Err(Error::InvalidArguments(format!(
                        "missing required parameter '{}' for tool '{}'",
                        param.name, self.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Protocol-facing definition for tools/list.
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Executable side of a tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Run the tool against already-validated arguments.
    async fn call(&self, args: Map<String, Value>) -> Result<ToolCallResult>;
}

impl std::fmt::Debug for dyn ToolHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ToolHandler")
    }
}

struct RegisteredTool {
    spec: ToolSpec,
    handler: Arc<dyn ToolHandler>,
}

/// The fixed set of named tools.
///
/// Built once at startup; immutable afterwards. Listing order follows
/// registration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its declared name.
    pub fn register(&mut self, spec: ToolSpec, handler: Arc<dyn ToolHandler>) -> Result<()> {
        if self.index.contains_key(spec.name) {
            return Err(Error::DuplicateTool(spec.name.to_string()));
        }
        self.index.insert(spec.name, self.tools.len());
        self.tools.push(RegisteredTool { spec, handler });
        Ok(())
    }

    /// Resolve a tool by name.
    pub fn resolve(&self, name: &str) -> Result<(&ToolSpec, &Arc<dyn ToolHandler>)> {
        match self.index.get(name) {
            Some(&i) => {
                let tool = &self.tools[i];
                Ok((&tool.spec, &tool.handler))
            }
            None => Err(Error::UnknownTool(name.to_string())),
        }
    }

    /// Definitions of all registered tools, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.spec.definition()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Resolve, validate, and invoke a tool.
    ///
    /// Every per-invocation failure is converted into an error result
    /// here; the caller always gets a `ToolCallResult` to push back on
    /// the session, never a crash.
    pub async fn dispatch(&self, name: &str, arguments: Option<Value>) -> ToolCallResult {
        let (spec, handler) = match self.resolve(name) {
            Ok(resolved) => resolved,
            Err(e) => return ToolCallResult::error(e.to_string()),
        };

        let args = match arguments {
            None => Map::new(),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return ToolCallResult::error(format!(
                    "Invalid arguments: expected an object, got {}",
                    json_type_name(&other)
                ));
            }
        };

        if let Err(e) = spec.validate(&args) {
            return ToolCallResult::error(e.to_string());
        }

        match handler.call(args).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "Tool handler failed");
                ToolCallResult::error(e.to_string())
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
