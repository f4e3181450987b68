pub mod chat;
pub mod compact;
