mod chat_history_sidebar;
mod chat_input;
mod chat_message;
mod markdown;
mod navbar;
mod quick_examples_sidebar;

pub use chat_history_sidebar::ChatHistorySidebar;
pub use chat_input::ChatInput;
pub use chat_message::ChatMessage;
pub use navbar::Navbar;
pub use quick_examples_sidebar::QuickExamplesSidebar;
