//! Credits and rewards: the catalog, a student's redemptions, cart checkout and
//! the progress summary (nudges, badges, performance labels).

pub mod handlers;
pub mod progress;
pub mod store;
