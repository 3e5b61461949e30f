use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AgentError;

/// The JSON types a tool parameter may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    String,
    Number,
    Boolean,
}

impl ParameterKind {
    fn as_str(&self) -> &'static str {
        match self {
            ParameterKind::String => "string",
            ParameterKind::Number => "number",
            ParameterKind::Boolean => "boolean",
        }
    }
}

/// One named parameter in a tool declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub kind: ParameterKind,
    pub required: bool,
    /// Model-facing guidance on how to fill the field
    pub description: String,
}

impl ToolParameter {
    /// An optional string parameter, the common case for search tools
    pub fn string<N, D>(name: N, description: D) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        ToolParameter {
            name: name.into(),
            kind: ParameterKind::String,
            required: false,
            description: description.into(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A tool that can be used by a model.
///
/// Parameters are held as a typed table; the provider's JSON-Schema
/// representation is rendered only at the wire boundary via
/// [`Tool::input_schema`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// The name of the tool
    pub name: String,
    /// A description of what the tool does
    pub description: String,
    /// Parameters that the tool accepts
    pub parameters: Vec<ToolParameter>,
}

impl Tool {
    /// Create a new tool with the given name and description
    pub fn new<N, D>(name: N, description: D, parameters: Vec<ToolParameter>) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Tool {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Render the parameter table as a JSON-Schema object. Fields the
    /// declaration does not name are always forbidden.
    pub fn input_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        for param in &self.parameters {
            properties.insert(
                param.name.clone(),
                json!({
                    "type": param.kind.as_str(),
                    "description": param.description,
                }),
            );
        }

        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": Value::Object(properties),
            "required": required,
            "additionalProperties": false,
        })
    }
}

/// A tool call request that a system can execute
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    /// The name of the tool to execute
    pub name: String,
    /// The arguments for the execution, already parsed from the
    /// provider's raw argument text
    pub arguments: Value,
}

impl ToolCall {
    /// Create a new ToolCall with the given name and arguments
    pub fn new<S: Into<String>>(name: S, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// A tool call that failed validation at the provider boundary. The
/// wire form is kept verbatim: the next round must replay the
/// assistant's call entry unchanged so the tool message answering it
/// still has a matching id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvalidToolCall {
    /// Function name as received
    pub name: String,
    /// Raw argument text as received
    pub arguments: String,
    pub error: AgentError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_schema_rendering() {
        let tool = Tool::new(
            "lookup",
            "Looks something up",
            vec![
                ToolParameter::string("code", "An identifier"),
                ToolParameter::string("date", "An ISO date").required(),
            ],
        );

        let schema = tool.input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["code"]["type"], "string");
        assert_eq!(schema["properties"]["code"]["description"], "An identifier");
        assert_eq!(schema["required"], json!(["date"]));
        assert_eq!(schema["additionalProperties"], json!(false));
    }

    #[test]
    fn test_input_schema_no_required_fields() {
        let tool = Tool::new(
            "lookup",
            "Looks something up",
            vec![ToolParameter::string("code", "An identifier")],
        );

        let schema = tool.input_schema();
        assert_eq!(schema["required"], json!([]));
    }
}
