use crate::channels::format;
use crate::channels::types::{DispatchResult, IncomingMessage};
use crate::directus::{self, StaffDirectory};
use crate::error::BackendError;
use crate::models::Employee;
use std::sync::Arc;

/// Commands understood by the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    MyAccesses,
    Help,
    Refresh,
    Unknown,
}

impl Command {
    const KNOWN: [(&'static str, Command); 4] = [
        ("/start", Command::Start),
        ("/myaccesses", Command::MyAccesses),
        ("/help", Command::Help),
        ("/refresh", Command::Refresh),
    ];

    /// Prefix match on the message text. `None` for text that is not a command.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim_start();
        if !text.starts_with('/') {
            return None;
        }

        Some(
            Self::KNOWN
                .iter()
                .find(|(prefix, _)| text.starts_with(prefix))
                .map(|(_, cmd)| *cmd)
                .unwrap_or(Command::Unknown),
        )
    }
}

/// Routes chat commands to their handlers and builds the replies
pub struct CommandDispatcher {
    directory: Arc<dyn StaffDirectory>,
}

impl CommandDispatcher {
    pub fn new(directory: Arc<dyn StaffDirectory>) -> Self {
        Self { directory }
    }

    /// Handle one message. Returns `None` when the bot should stay silent.
    pub async fn dispatch(&self, message: &IncomingMessage) -> Option<DispatchResult> {
        let command = Command::parse(&message.text)?;

        log::info!(
            "[DISPATCH] {:?} from user {} in chat {}",
            command,
            message.user_id,
            message.chat_id
        );

        let result = match command {
            Command::Start => self.handle_start(message).await,
            Command::MyAccesses => self.handle_my_accesses(message).await,
            Command::Help => DispatchResult::markdown(format::HELP),
            Command::Refresh => self.handle_refresh().await,
            Command::Unknown => DispatchResult::plain(format::UNKNOWN_COMMAND),
        };

        Some(result)
    }

    async fn resolve(&self, message: &IncomingMessage) -> Result<Option<Employee>, BackendError> {
        self.directory
            .resolve_employee(message.user_id, message.username.as_deref())
            .await
    }

    async fn handle_start(&self, message: &IncomingMessage) -> DispatchResult {
        match self.resolve(message).await {
            Ok(Some(employee)) => DispatchResult::plain(format::welcome(&employee)),
            Ok(None) => {
                log::info!("[DISPATCH] /start from unregistered user {}", message.user_id);
                DispatchResult::plain(format::onboarding(message))
            }
            Err(e) => {
                log::error!("[DISPATCH] /start failed for user {}: {}", message.user_id, e);
                DispatchResult::plain(format::backend_failure(&e, "connect to the staff directory"))
            }
        }
    }

    async fn handle_my_accesses(&self, message: &IncomingMessage) -> DispatchResult {
        let employee = match self.resolve(message).await {
            Ok(Some(employee)) => employee,
            Ok(None) => return DispatchResult::plain(format::not_registered(message)),
            Err(e) => {
                log::error!(
                    "[DISPATCH] /myaccesses failed for user {}: {}",
                    message.user_id,
                    e
                );
                return DispatchResult::plain(format::backend_failure(&e, "load your accesses"));
            }
        };

        let accesses = directus::list_accesses(Some(&employee));
        if accesses.is_empty() {
            return DispatchResult::plain(format::NO_ACCESSES);
        }

        log::info!(
            "[DISPATCH] Showing {} accesses to user {}",
            accesses.len(),
            message.user_id
        );
        DispatchResult::markdown(format::access_list(&employee, &accesses))
    }

    async fn handle_refresh(&self) -> DispatchResult {
        if self.directory.check_connectivity().await {
            DispatchResult::plain(format::CONNECTIVITY_OK)
        } else {
            DispatchResult::plain(format::CONNECTIVITY_FAILED)
        }
    }
}
