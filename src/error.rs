use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChatError>;

/// Errors surfaced by a single `chat` call. None of them are retried.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Unexpected message role: {0}")]
    InvalidMessageRole(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(#[source] serde_json::Error),

    #[error("Tool name `{0}` is reserved")]
    ReservedToolName(String),

    /// Held as text: jsonschema's compile error borrows the schema document.
    #[error("Invalid tool schema: {0}")]
    InvalidSchema(String),

    #[error("Tool schema could not be serialized: {0}")]
    SchemaSerialization(#[source] serde_json::Error),

    #[error("Expected tool calls but none were found")]
    ToolCallMissing,

    #[error("Unexpected tool call: expected `{expected}`, got `{actual}`")]
    UnexpectedToolCall { expected: String, actual: String },

    #[error("Invalid arguments for tool call {id}: {source}")]
    ToolArgumentsInvalid {
        id: String,
        #[source]
        source: ArgumentsError,
    },

    #[error("Completion response contained no choices")]
    EmptyCompletion,

    #[error("API error: {status} - {body}")]
    Api { status: StatusCode, body: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Which stage of the argument pipeline rejected a tool call.
#[derive(Debug, Error)]
pub enum ArgumentsError {
    #[error("arguments are not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("arguments do not match the schema: {0}")]
    Schema(String),

    #[error("arguments could not be deserialized: {0}")]
    Deserialize(#[source] serde_json::Error),
}
