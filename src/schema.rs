//! Conversion of argument schemas into the `parameters` descriptor sent with
//! a tool declaration.

use schemars::{JsonSchema, schema_for};
use serde_json::Value;

use crate::error::{ChatError, Result};

const DIALECT_KEY: &str = "$schema";

/// Strips the dialect tag from a JSON Schema document so it can be sent as a
/// function's `parameters`. Everything else is passed through untouched.
pub fn to_parameter_schema(mut schema: Value) -> Value {
    if let Value::Object(map) = &mut schema {
        map.remove(DIALECT_KEY);
    }
    schema
}

/// The full JSON Schema schemars derives for `T`, dialect tag included.
pub fn schema_value_for<T: JsonSchema>() -> Result<Value> {
    serde_json::to_value(schema_for!(T)).map_err(ChatError::SchemaSerialization)
}

/// Parameter descriptor for `T`.
pub fn parameter_schema_for<T: JsonSchema>() -> Result<Value> {
    schema_value_for::<T>().map(to_parameter_schema)
}
