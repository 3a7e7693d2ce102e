/// Chat message reduced to what the command handlers need
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub chat_id: i64,
    /// Telegram user id, matched against `telegram_id` in the staff collection
    pub user_id: i64,
    /// Telegram username without "@", if the user has one
    pub username: Option<String>,
    pub first_name: String,
    pub text: String,
}

impl IncomingMessage {
    /// Name used in greetings
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.first_name)
    }
}

/// How the reply text should be rendered by the chat platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyFormat {
    Plain,
    Markdown,
}

/// Reply produced by the dispatcher
#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub response: String,
    pub format: ReplyFormat,
}

impl DispatchResult {
    pub fn plain(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            format: ReplyFormat::Plain,
        }
    }

    pub fn markdown(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            format: ReplyFormat::Markdown,
        }
    }
}
