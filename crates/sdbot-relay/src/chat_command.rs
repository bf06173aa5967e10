//! Slash command parsing and the static replies that go with it.

pub const PONG_REPLY: &str = "pong";
pub const UNKNOWN_COMMAND_REPLY: &str = "I don't know that command";
pub const QUERY_USAGE: &str = "Usage: /query <jql>";

pub fn chat_command_usage() -> String {
    [
        "Hello, I'm Jira Bot. Supported commands:",
        "/recent - open tasks created during the last week",
        "/all - all open tasks",
        "/query <jql> - issues matching your own JQL search",
        "/ping - check that I'm alive",
    ]
    .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Start,
    Ping,
    Recent,
    All,
    Query { jql: String },
    Invalid { message: String },
    Unknown,
}

impl ChatCommand {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Start => "/start",
            Self::Ping => "/ping",
            Self::Recent => "/recent",
            Self::All => "/all",
            Self::Query { .. } => "/query",
            Self::Invalid { .. } => "invalid",
            Self::Unknown => "unknown",
        }
    }
}

/// Returns `None` for blank text, which the relay ignores without replying.
pub fn parse_chat_command(text: &str) -> Option<ChatCommand> {
    // Surrounding whitespace is dropped, so "   " is ignored and "/ping " is a ping.
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let token = parts.next().unwrap_or_default();
    let remainder = parts.next().unwrap_or_default().trim();
    // Group chats address commands as `/all@botname`.
    let command = token.split('@').next().unwrap_or(token);

    let parsed = match (command, remainder.is_empty()) {
        ("/start", true) => ChatCommand::Start,
        ("/ping", true) => ChatCommand::Ping,
        ("/recent", true) => ChatCommand::Recent,
        ("/all", true) => ChatCommand::All,
        ("/query", true) => ChatCommand::Invalid {
            message: QUERY_USAGE.to_string(),
        },
        ("/query", false) => ChatCommand::Query {
            jql: remainder.to_string(),
        },
        _ => ChatCommand::Unknown,
    };
    Some(parsed)
}
