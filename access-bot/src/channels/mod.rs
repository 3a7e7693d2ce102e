pub mod dispatcher;
pub mod format;
pub mod telegram;
pub mod types;

pub use dispatcher::CommandDispatcher;
