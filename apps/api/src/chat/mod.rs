//! Student ↔ sponsor messaging over the `chat_messages` table.

pub mod handlers;
pub mod store;
