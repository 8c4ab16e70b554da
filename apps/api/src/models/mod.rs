pub mod chat;
pub mod reward;
pub mod student;
