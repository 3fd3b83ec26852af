//! Wire records for the chat-completion endpoint.

mod openai;

pub use openai::{
    Choice, CompletionRequest, CompletionResponse, FunctionCall, FunctionDefinition, FunctionName,
    MessageParam, ResponseMessageApi, ToolCallApi, ToolChoice, ToolDefinitionApi,
};
