use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{ChatError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "system" => Some(Role::System),
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            "tool" => Some(Role::Tool),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tool invocation made by an assistant turn. `arguments` is the raw,
/// unparsed JSON text the model produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

/// One turn of a conversation, tagged by its role.
///
/// A `Tool` message answers the `Call` with the same `id` from an earlier
/// assistant turn. That pairing is not checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        content: String,
    },
    User {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        content: String,
    },
    Assistant {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default)]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        calls: Option<Vec<Call>>,
    },
    Tool {
        id: String,
        content: String,
    },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            name: None,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            name: None,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant {
            name: None,
            content: Some(content.into()),
            calls: None,
        }
    }

    /// An assistant turn that only invokes tools.
    pub fn assistant_calls(calls: Vec<Call>) -> Self {
        Message::Assistant {
            name: None,
            content: None,
            calls: Some(calls),
        }
    }

    pub fn tool(id: impl Into<String>, content: impl Into<String>) -> Self {
        Message::Tool {
            id: id.into(),
            content: content.into(),
        }
    }

    /// Sets the participant name. Tool messages carry no name and are
    /// returned unchanged.
    pub fn with_name(mut self, participant: impl Into<String>) -> Self {
        match &mut self {
            Message::System { name, .. }
            | Message::User { name, .. }
            | Message::Assistant { name, .. } => *name = Some(participant.into()),
            Message::Tool { .. } => {}
        }
        self
    }

    pub fn role(&self) -> Role {
        match self {
            Message::System { .. } => Role::System,
            Message::User { .. } => Role::User,
            Message::Assistant { .. } => Role::Assistant,
            Message::Tool { .. } => Role::Tool,
        }
    }
}

impl TryFrom<Value> for Message {
    type Error = ChatError;

    fn try_from(value: Value) -> Result<Self> {
        match value.get("role") {
            Some(Value::String(role)) if Role::parse(role).is_some() => {}
            Some(Value::String(role)) => return Err(ChatError::InvalidMessageRole(role.clone())),
            Some(other) => return Err(ChatError::InvalidMessageRole(other.to_string())),
            None => return Err(ChatError::InvalidMessageRole(String::new())),
        }

        serde_json::from_value(value).map_err(ChatError::InvalidMessage)
    }
}

/// Parses a JSON array of role-tagged messages, rejecting unknown roles
/// with `InvalidMessageRole`.
pub fn parse_transcript(text: &str) -> Result<Vec<Message>> {
    let values: Vec<Value> = serde_json::from_str(text).map_err(ChatError::InvalidMessage)?;
    values.into_iter().map(Message::try_from).collect()
}
