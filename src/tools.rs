use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

use crate::ai_sdk::{FunctionDefinition, ToolDefinitionApi};
use crate::error::{ArgumentsError, ChatError, Result};
use crate::schema;

/// `tool_choice` already gives these names a meaning on the wire.
const RESERVED_NAMES: [&str; 2] = ["auto", "none"];

/// The single function the model is forced to call, along with the schema
/// its arguments must satisfy. `T` is the validated argument type.
pub struct ToolSpec<T> {
    name: String,
    description: Option<String>,
    parameters: Value,
    validator: jsonschema::Validator,
    output: PhantomData<fn() -> T>,
}

impl<T: JsonSchema> ToolSpec<T> {
    /// Declares a tool whose arguments are described by `T`'s derived schema.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::from_json_schema(name, schema::schema_value_for::<T>()?)
    }
}

impl<T> ToolSpec<T> {
    /// Declares a tool from a raw JSON Schema document.
    pub fn from_json_schema(name: impl Into<String>, json_schema: Value) -> Result<Self> {
        let name = name.into();
        if RESERVED_NAMES.contains(&name.as_str()) {
            return Err(ChatError::ReservedToolName(name));
        }

        let validator = jsonschema::validator_for(&json_schema)
            .map_err(|e| ChatError::InvalidSchema(e.to_string()))?;

        Ok(Self {
            name,
            description: None,
            parameters: schema::to_parameter_schema(json_schema),
            validator,
            output: PhantomData,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The descriptor sent as the function's `parameters`.
    pub fn parameters(&self) -> &Value {
        &self.parameters
    }

    pub(crate) fn definition(&self) -> ToolDefinitionApi {
        ToolDefinitionApi::Function {
            function: FunctionDefinition {
                name: self.name.clone(),
                description: self.description.clone(),
                parameters: self.parameters.clone(),
            },
        }
    }
}

impl<T: DeserializeOwned> ToolSpec<T> {
    /// Runs raw argument text through decode, schema validation and
    /// deserialization, in that order.
    pub fn parse_arguments(&self, raw: &str) -> std::result::Result<T, ArgumentsError> {
        let value: Value = serde_json::from_str(raw).map_err(ArgumentsError::Decode)?;
        self.validate(&value)?;
        serde_json::from_value(value).map_err(ArgumentsError::Deserialize)
    }

    fn validate(&self, value: &Value) -> std::result::Result<(), ArgumentsError> {
        if self.validator.is_valid(value) {
            return Ok(());
        }

        let messages: Vec<String> = self
            .validator
            .iter_errors(value)
            .take(3)
            .map(|err| format!("{} at {}", err, err.instance_path))
            .collect();
        Err(ArgumentsError::Schema(messages.join("; ")))
    }
}

impl<T> fmt::Debug for ToolSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSpec")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize, JsonSchema)]
    struct Point {
        x: f64,
    }

    #[test]
    fn reserved_names_are_rejected() {
        for name in RESERVED_NAMES {
            let err = ToolSpec::<Point>::new(name).unwrap_err();
            assert!(matches!(err, ChatError::ReservedToolName(n) if n == name));
        }
        assert!(ToolSpec::<Point>::new("automatic").is_ok());
    }

    #[test]
    fn definition_carries_name_description_and_parameters() {
        let tool = ToolSpec::<Point>::new("plot")
            .unwrap()
            .with_description("Plot a point");

        let definition = serde_json::to_value(tool.definition()).unwrap();
        assert_eq!(definition["type"], json!("function"));
        assert_eq!(definition["function"]["name"], json!("plot"));
        assert_eq!(definition["function"]["description"], json!("Plot a point"));
        assert!(definition["function"]["parameters"].get("$schema").is_none());
        assert_eq!(
            definition["function"]["parameters"]["required"],
            json!(["x"])
        );
    }

    #[test]
    fn valid_arguments_are_deserialized() {
        let tool = ToolSpec::<Point>::new("plot").unwrap();
        assert_eq!(tool.parse_arguments("{\"x\": 5}").unwrap(), Point { x: 5.0 });
    }

    #[test]
    fn each_stage_reports_its_own_failure() {
        let tool = ToolSpec::<Point>::new("plot").unwrap();

        assert!(matches!(
            tool.parse_arguments("not json"),
            Err(ArgumentsError::Decode(_))
        ));
        assert!(matches!(
            tool.parse_arguments("{\"x\": \"five\"}"),
            Err(ArgumentsError::Schema(_))
        ));
    }

    #[test]
    fn deserialize_stage_catches_what_the_schema_allows() {
        // The raw schema is looser than the target type.
        let tool = ToolSpec::<Point>::from_json_schema("plot", json!({"type": "object"})).unwrap();
        assert!(matches!(
            tool.parse_arguments("{}"),
            Err(ArgumentsError::Deserialize(_))
        ));
    }

    #[test]
    fn invalid_schema_is_rejected_at_construction() {
        let err = ToolSpec::<Value>::from_json_schema("plot", json!({"type": 12})).unwrap_err();
        assert!(matches!(err, ChatError::InvalidSchema(_)));
    }
}
