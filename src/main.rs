use clap::Parser;
use forced_tool_chat::{
    ChatAdapter, ChatRequest, DEFAULT_BASE_URL, DEFAULT_MODEL, Message, OpenAiClient, ToolSpec,
    parse_transcript,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

type MainResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Send one chat-completion request, optionally forcing a tool call.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: String,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, env = "FORCED_TOOL_CHAT_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// System message prepended to the conversation.
    #[arg(long)]
    system: Option<String>,

    /// A single user message.
    #[arg(long, conflicts_with = "transcript", required_unless_present = "transcript")]
    prompt: Option<String>,

    /// JSON array of role-tagged messages.
    #[arg(long)]
    transcript: Option<PathBuf>,

    /// Name of the tool the model must call.
    #[arg(long, requires = "tool_schema")]
    tool: Option<String>,

    #[arg(long, requires = "tool")]
    tool_description: Option<String>,

    /// JSON Schema file describing the tool's arguments.
    #[arg(long, requires = "tool")]
    tool_schema: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> MainResult<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let messages = read_messages(&cli)?;

    let client = OpenAiClient::new(cli.api_key.clone()).with_base_url(&cli.base_url);
    let adapter = ChatAdapter::with_client(client).with_model(cli.model.clone());

    let request = match (&cli.tool, &cli.tool_schema) {
        (Some(name), Some(path)) => {
            let schema = serde_json::from_str(&std::fs::read_to_string(path)?)?;
            let mut tool = ToolSpec::<serde_json::Value>::from_json_schema(name.as_str(), schema)?;
            if let Some(description) = &cli.tool_description {
                tool = tool.with_description(description.as_str());
            }
            ChatRequest::with_tool(messages, tool)
        }
        _ => ChatRequest::new(messages),
    };

    let response = adapter.chat(&request).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

fn read_messages(cli: &Cli) -> MainResult<Vec<Message>> {
    let mut messages = Vec::new();
    if let Some(system) = &cli.system {
        messages.push(Message::system(system.as_str()));
    }

    match (&cli.prompt, &cli.transcript) {
        (Some(prompt), _) => messages.push(Message::user(prompt.as_str())),
        (None, Some(path)) => messages.extend(parse_transcript(&std::fs::read_to_string(path)?)?),
        (None, None) => return Err("pass --prompt or --transcript".into()),
    }

    Ok(messages)
}
