use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ai_sdk::{CompletionRequest, MessageParam, ResponseMessageApi, ToolChoice};
use crate::client::{ChatCompletions, OpenAiClient};
use crate::error::{ChatError, Result};
use crate::messages::{Message, Role};
use crate::tools::ToolSpec;

pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";

/// The conversation so far, plus the tool the model must call, if any.
#[derive(Debug)]
pub struct ChatRequest<T> {
    pub messages: Vec<Message>,
    pub tool: Option<ToolSpec<T>>,
}

impl ChatRequest<serde_json::Value> {
    /// A free-text request.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            tool: None,
        }
    }
}

impl<T> ChatRequest<T> {
    /// A request forcing the model to call `tool`.
    pub fn with_tool(messages: Vec<Message>, tool: ToolSpec<T>) -> Self {
        Self {
            messages,
            tool: Some(tool),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseMessage {
    pub role: Role,
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallResult<T> {
    pub id: String,
    pub arguments: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseWithCalls<T> {
    pub role: Role,
    pub content: Option<String>,
    pub calls: Vec<CallResult<T>>,
}

/// What `chat` produced: plain text when no tool was declared, validated
/// calls when one was.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChatResponse<T> {
    Message(ResponseMessage),
    WithCalls(ResponseWithCalls<T>),
}

impl<T> ChatResponse<T> {
    pub fn role(&self) -> Role {
        match self {
            ChatResponse::Message(message) => message.role,
            ChatResponse::WithCalls(message) => message.role,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            ChatResponse::Message(message) => message.content.as_deref(),
            ChatResponse::WithCalls(message) => message.content.as_deref(),
        }
    }

    pub fn into_message(self) -> Option<ResponseMessage> {
        match self {
            ChatResponse::Message(message) => Some(message),
            ChatResponse::WithCalls(_) => None,
        }
    }

    pub fn into_calls(self) -> Option<ResponseWithCalls<T>> {
        match self {
            ChatResponse::WithCalls(message) => Some(message),
            ChatResponse::Message(_) => None,
        }
    }
}

/// Translates conversations into chat-completion requests and validates what
/// comes back.
pub struct ChatAdapter<C = OpenAiClient> {
    client: C,
    model: String,
}

impl ChatAdapter<OpenAiClient> {
    /// Builds its own HTTP client from an API key. The key is not checked
    /// until the first request.
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self::with_client(OpenAiClient::new(api_key))
    }
}

impl<C: ChatCompletions> ChatAdapter<C> {
    pub fn with_client(client: C) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Sends the conversation in one round trip. With a tool declared, every
    /// returned call must target that tool and carry arguments its schema
    /// accepts; the first call that does not fails the whole request.
    #[tracing::instrument(skip_all, err, fields(model = %self.model))]
    pub async fn chat<T: DeserializeOwned>(
        &self,
        request: &ChatRequest<T>,
    ) -> Result<ChatResponse<T>> {
        let completion_request = self.completion_request(request);

        tracing::debug!(
            messages = completion_request.messages.len(),
            tool = request.tool.as_ref().map(|tool| tool.name()),
            "sending chat completion request"
        );

        let mut response = self.client.complete(&completion_request).await?;
        if response.choices.is_empty() {
            return Err(ChatError::EmptyCompletion);
        }
        let message = response.choices.swap_remove(0).message;

        tracing::debug!(
            role = %message.role,
            calls = message.tool_calls.as_ref().map_or(0, Vec::len),
            "received chat completion response"
        );

        match &request.tool {
            None => Ok(ChatResponse::Message(ResponseMessage {
                role: message.role,
                content: message.content,
            })),
            Some(tool) => validate_calls(tool, message).map(ChatResponse::WithCalls),
        }
    }

    fn completion_request<T>(&self, request: &ChatRequest<T>) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: request.messages.iter().map(MessageParam::from).collect(),
            tools: request.tool.as_ref().map(|tool| vec![tool.definition()]),
            tool_choice: request
                .tool
                .as_ref()
                .map(|tool| ToolChoice::function(tool.name())),
        }
    }
}

fn validate_calls<T: DeserializeOwned>(
    tool: &ToolSpec<T>,
    message: ResponseMessageApi,
) -> Result<ResponseWithCalls<T>> {
    let tool_calls = message.tool_calls.unwrap_or_default();
    if tool_calls.is_empty() {
        return Err(ChatError::ToolCallMissing);
    }

    let calls = tool_calls
        .iter()
        .map(|call| {
            let function = call.function();
            if function.name != tool.name() {
                return Err(ChatError::UnexpectedToolCall {
                    expected: tool.name().to_string(),
                    actual: function.name.clone(),
                });
            }

            let arguments = tool.parse_arguments(&function.arguments).map_err(|source| {
                ChatError::ToolArgumentsInvalid {
                    id: call.id().to_string(),
                    source,
                }
            })?;

            Ok(CallResult {
                id: call.id().to_string(),
                arguments,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ResponseWithCalls {
        role: message.role,
        content: message.content,
        calls,
    })
}
