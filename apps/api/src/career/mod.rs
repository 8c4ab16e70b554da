//! Career guidance: a structured pathway for a stated dream, and a shorter
//! four-list roadmap from free text. Both always return a complete plan.

pub mod handlers;
pub mod models;
pub mod pathway;
pub mod prompts;
