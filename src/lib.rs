//! Typed chat-completion adapter with a forced tool call.
//!
//! Messages are mapped onto the chat-completion wire format, one tool may be
//! declared from a schemars-derived schema, and every call the model returns
//! is decoded and validated against that schema before it reaches the caller.

mod adapter;
pub mod ai_sdk;
mod client;
mod error;
mod messages;
pub mod schema;
mod tools;

pub use adapter::{
    CallResult, ChatAdapter, ChatRequest, ChatResponse, DEFAULT_MODEL, ResponseMessage,
    ResponseWithCalls,
};
pub use client::{ChatCompletions, DEFAULT_BASE_URL, OpenAiClient};
pub use error::{ArgumentsError, ChatError, Result};
pub use messages::{Call, Message, Role, parse_transcript};
pub use tools::ToolSpec;
