pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{career, chat, mentor, quiz, rewards, session};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session
        .route(
            "/api/v1/session",
            post(session::handlers::handle_login)
                .get(session::handlers::handle_restore)
                .delete(session::handlers::handle_logout),
        )
        // Career guidance
        .route(
            "/api/v1/career/pathway",
            post(career::handlers::handle_pathway),
        )
        .route(
            "/api/v1/career/roadmap",
            post(career::handlers::handle_roadmap),
        )
        // AI mentor
        .route("/api/v1/mentor/ask", post(mentor::handlers::handle_ask))
        .route(
            "/api/v1/mentor/dream-path",
            post(mentor::handlers::handle_dream_path),
        )
        .route(
            "/api/v1/mentor/options",
            get(mentor::handlers::handle_options),
        )
        // English quiz
        .route("/api/v1/quiz/levels", get(quiz::handlers::handle_list_levels))
        .route(
            "/api/v1/quiz/levels/:level",
            get(quiz::handlers::handle_get_level),
        )
        .route("/api/v1/quiz/answer", post(quiz::handlers::handle_answer))
        .route("/api/v1/quiz/advance", post(quiz::handlers::handle_advance))
        .route("/api/v1/quiz/tutor", post(quiz::handlers::handle_tutor))
        // Rewards
        .route("/api/v1/rewards", get(rewards::handlers::handle_list_rewards))
        .route(
            "/api/v1/rewards/redemptions",
            get(rewards::handlers::handle_list_redemptions),
        )
        .route(
            "/api/v1/rewards/checkout",
            post(rewards::handlers::handle_checkout),
        )
        .route("/api/v1/progress", get(rewards::handlers::handle_progress))
        // Chat
        .route("/api/v1/chats", get(chat::handlers::handle_list_chats))
        .route(
            "/api/v1/chats/:chat_id/messages",
            get(chat::handlers::handle_list_messages).post(chat::handlers::handle_send_message),
        )
        .with_state(state)
}
