//! Reply texts for the chat commands

use crate::channels::types::IncomingMessage;
use crate::error::BackendError;
use crate::models::{AccessItem, Employee};
use std::fmt::Write;

pub const UNKNOWN_COMMAND: &str = "❓ Unknown command. Use /help to see the available commands.";

pub const NO_ACCESSES: &str = "📋 You have no accesses assigned yet.\n\
    Contact an administrator to get access.";

pub const CONNECTIVITY_OK: &str = "✅ Connection to the staff directory is up.";

pub const CONNECTIVITY_FAILED: &str =
    "❌ The staff directory is unreachable. Please contact an administrator.";

pub const DESCRIPTION_PLACEHOLDER: &str = "No description";

pub const HELP: &str = "🤖 *Available commands:*\n\n\
    /start - Start working with the bot\n\
    /myaccesses - Show your accesses\n\
    /refresh - Check the connection to the staff directory\n\
    /help - Show this message\n\n\
    💡 *How it works:*\n\
    1. An administrator adds your Telegram ID to the staff directory\n\
    2. An administrator assigns accesses to you\n\
    3. Use /myaccesses to view them\n\n\
    📞 *Not registered yet?*\n\
    Send your Telegram ID to an administrator";

fn username_line(message: &IncomingMessage) -> String {
    match message.username.as_deref() {
        Some(username) => format!("Your username: @{}", username),
        None => "Your username: not set".to_string(),
    }
}

/// Tells an unregistered user which identifiers to hand to an administrator
pub fn not_registered(message: &IncomingMessage) -> String {
    format!(
        "❌ You are not in the staff directory.\n\
         Ask an administrator to add your Telegram ID.\n\n\
         Your Telegram ID: `{}`\n\
         {}",
        message.user_id,
        username_line(message)
    )
}

pub fn onboarding(message: &IncomingMessage) -> String {
    format!(
        "👋 Hi, {}!\n\n\
         I'm the bot that shows employees their assigned accesses.\n\n\
         {}",
        message.display_name(),
        not_registered(message)
    )
}

pub fn welcome(employee: &Employee) -> String {
    format!(
        "👋 Welcome, {}!\n\n\
         📋 Position: {}\n\
         🏢 Department: {}\n\n\
         Use /myaccesses to see your accesses.\n\
         Use /help for the list of commands.",
        employee.full_name, employee.position, employee.department
    )
}

/// Numbered list of credentials; lines for missing fields are left out
pub fn access_list(employee: &Employee, accesses: &[AccessItem]) -> String {
    let mut text = format!("🔑 Your accesses ({}):\n\n", employee.full_name);

    for (index, access) in accesses.iter().enumerate() {
        let _ = writeln!(text, "*{}. {}*", index + 1, access.name);
        let _ = writeln!(
            text,
            "   📝 {}",
            access.description.as_deref().unwrap_or(DESCRIPTION_PLACEHOLDER)
        );
        if let Some(login) = &access.login {
            let _ = writeln!(text, "   🔐 Login: `{}`", login);
        }
        if let Some(password) = &access.password {
            let _ = writeln!(text, "   🔑 Password: `{}`", password);
        }
        if let Some(link) = &access.link {
            let _ = writeln!(text, "   🔗 Link: {}", link);
        }
        text.push('\n');
    }

    text
}

/// User-safe text for a failed backend call
pub fn backend_failure(error: &BackendError, action: &str) -> String {
    match error {
        BackendError::Unauthorized => {
            "🔒 The bot's access token for the staff directory is invalid. \
             Please report this to an administrator."
                .to_string()
        }
        BackendError::Forbidden => {
            "🔒 The bot is not allowed to read the staff directory. \
             Please report this to an administrator."
                .to_string()
        }
        _ => format!("❌ Failed to {}. Please try again later.", action),
    }
}
