use serde::{Deserialize, Serialize};

use crate::messages::{Call, Message, Role};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<MessageParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinitionApi>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum MessageParam {
    System {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    User {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Assistant {
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_calls: Option<Vec<ToolCallApi>>,
    },
    Tool {
        tool_call_id: String,
        content: String,
    },
}

impl From<&Message> for MessageParam {
    fn from(message: &Message) -> Self {
        match message {
            Message::System { name, content } => MessageParam::System {
                content: content.clone(),
                name: name.clone(),
            },
            Message::User { name, content } => MessageParam::User {
                content: content.clone(),
                name: name.clone(),
            },
            Message::Assistant {
                name,
                content,
                calls,
            } => MessageParam::Assistant {
                content: content.clone(),
                name: name.clone(),
                tool_calls: calls
                    .as_deref()
                    .filter(|calls| !calls.is_empty())
                    .map(|calls| calls.iter().map(ToolCallApi::from).collect()),
            },
            Message::Tool { id, content } => MessageParam::Tool {
                tool_call_id: id.clone(),
                content: content.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolCallApi {
    Function { id: String, function: FunctionCall },
}

impl ToolCallApi {
    pub fn id(&self) -> &str {
        match self {
            ToolCallApi::Function { id, .. } => id,
        }
    }

    pub fn function(&self) -> &FunctionCall {
        match self {
            ToolCallApi::Function { function, .. } => function,
        }
    }
}

impl From<&Call> for ToolCallApi {
    fn from(call: &Call) -> Self {
        ToolCallApi::Function {
            id: call.id.clone(),
            function: FunctionCall {
                name: call.name.clone(),
                arguments: call.arguments.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolDefinitionApi {
    Function { function: FunctionDefinition },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolChoice {
    Function { function: FunctionName },
}

impl ToolChoice {
    pub fn function(name: impl Into<String>) -> Self {
        ToolChoice::Function {
            function: FunctionName { name: name.into() },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionName {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub message: ResponseMessageApi,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessageApi {
    pub role: Role,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallApi>>,
}
