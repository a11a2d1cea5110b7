use serde::{Deserialize, Serialize};

/// One chat turn: the student's message and the assistant's reply.
/// Append-only; the most recent turns seed the assistant's context window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionLog {
    pub user_message: String,
    pub agent_response: String,
    pub created_at: String,
}
